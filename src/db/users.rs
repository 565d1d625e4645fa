use async_trait::async_trait;
use mongodb::{bson::doc, Collection, Database};

use crate::db::{is_duplicate_key, CredentialStore, USERS};
use crate::models::user_models::User;
use crate::utils::error::{AppError, AppResult};

pub struct MongoCredentialStore {
    users: Collection<User>,
}

impl MongoCredentialStore {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection::<User>(USERS),
        }
    }
}

#[async_trait]
impl CredentialStore for MongoCredentialStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        match self.users.insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Conflict("Email already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
