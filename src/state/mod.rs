use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::db::{
    connection::init_db, memory::MemoryStore, polls::MongoPollRepository,
    users::MongoCredentialStore, votes::MongoVoteLedger, CredentialStore, PollRepository,
    VoteLedger,
};
use crate::utils::{error::AppResult, session::TokenService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub polls: Arc<dyn PollRepository>,
    pub votes: Arc<dyn VoteLedger>,
    pub tokens: TokenService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        polls: Arc<dyn PollRepository>,
        votes: Arc<dyn VoteLedger>,
        config: Config,
    ) -> Self {
        let tokens = TokenService::new(config.jwt_secret.clone(), config.jwt_expires_in);
        Self {
            users,
            polls,
            votes,
            tokens,
            config: Arc::new(config),
        }
    }

    /// All three collaborators backed by one in-process store.
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store.clone(), store, config)
    }

    pub async fn connect(config: Config) -> AppResult<Self> {
        match config.storage {
            StorageBackend::Memory => Ok(Self::in_memory(config)),
            StorageBackend::Mongo => {
                let db = init_db(&config.mongo_uri, &config.db_name).await?;
                Ok(Self::new(
                    Arc::new(MongoCredentialStore::new(&db)),
                    Arc::new(MongoPollRepository::new(&db)),
                    Arc::new(MongoVoteLedger::new(&db)),
                    config,
                ))
            }
        }
    }
}
