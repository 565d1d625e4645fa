use mongodb::bson::oid::ObjectId;
use tracing::info;

use crate::models::user_models::{AuthUser, User};
use crate::services::required;
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    password::{hash_password, verify_password},
};

const CREDENTIALS_REQUIRED: &str = "Email and password required";

fn invalid_credentials() -> AppError {
    AppError::InvalidCredentials("Invalid credentials".to_string())
}

pub async fn register(
    state: &AppState,
    email: Option<String>,
    password: Option<String>,
) -> AppResult<ObjectId> {
    let email = required(email, CREDENTIALS_REQUIRED)?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::ValidationError(CREDENTIALS_REQUIRED.to_string()))?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(password, state.config.bcrypt_cost).await?;
    let user = User::new(email, password_hash);

    // The unique email index still rejects a concurrent registration.
    state.users.create(&user).await?;

    info!("Registered user {}", user.id);
    Ok(user.id)
}

pub async fn login(
    state: &AppState,
    email: Option<String>,
    password: Option<String>,
) -> AppResult<String> {
    let email = required(email, CREDENTIALS_REQUIRED)?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::ValidationError(CREDENTIALS_REQUIRED.to_string()))?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(password, user.password_hash.clone()).await? {
        return Err(invalid_credentials());
    }

    state.tokens.create_token(&user.id, &user.email)
}

pub fn profile(identity: &AuthUser) -> AuthUser {
    identity.clone()
}
