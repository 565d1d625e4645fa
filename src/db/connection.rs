use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use tracing::info;

use crate::db::{POLLS, USERS, VOTE_RECORDS};
use crate::models::{poll_models::Poll, user_models::User, vote_record_models::VoteRecord};
use crate::utils::error::AppResult;

pub async fn init_db(mongo_uri: &str, db_name: &str) -> AppResult<Database> {
    let mut client_options = ClientOptions::parse(mongo_uri).await?;

    client_options.app_name = Some("PollingApp".to_string());

    let client = Client::with_options(client_options)?;
    let database = client.database(db_name);

    ensure_indexes(&database).await?;

    info!("Database connection successful ({db_name})");

    Ok(database)
}

/// Uniqueness of emails and of one vote per `(poll, voter)` is enforced here,
/// at write time, not by the workflows' existence checks.
pub async fn ensure_indexes(db: &Database) -> AppResult<()> {
    let unique = || IndexOptions::builder().unique(true).build();

    db.collection::<User>(USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
        )
        .await?;

    db.collection::<VoteRecord>(VOTE_RECORDS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "poll_id": 1, "voter_id": 1 })
                .options(unique())
                .build(),
        )
        .await?;

    db.collection::<Poll>(POLLS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "start_date": 1, "end_date": 1 })
                .build(),
        )
        .await?;

    Ok(())
}
