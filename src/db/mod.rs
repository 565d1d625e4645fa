//! Storage collaborators used by the workflows.
//!
//! Each trait is the narrow interface a workflow needs from durable storage.
//! The MongoDB implementations live next to the connection setup, and
//! [`memory::MemoryStore`] provides the same guarantees in process.

pub mod connection;
pub mod memory;
pub mod polls;
pub mod users;
pub mod votes;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use crate::models::{
    poll_models::{Poll, PollStatus, PollUpdate},
    user_models::User,
    vote_record_models::VoteRecord,
};
use crate::utils::error::AppResult;

pub const USERS: &str = "users";
pub const POLLS: &str = "polls";
pub const VOTE_RECORDS: &str = "vote_records";

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, user: &User) -> AppResult<()>;
}

#[async_trait]
pub trait PollRepository: Send + Sync {
    async fn insert(&self, poll: &Poll) -> AppResult<()>;

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Poll>>;

    /// Polls matching `status` at `now`, newest first.
    async fn list(&self, status: PollStatus, now: DateTime<Utc>) -> AppResult<Vec<Poll>>;

    /// Writes only the provided fields and returns the stored poll afterwards.
    async fn apply_update(&self, id: &ObjectId, update: &PollUpdate) -> AppResult<Option<Poll>>;

    /// Atomically adds one vote to the option matched by `(poll_id, option_id)`.
    /// Returns false when no such option exists anymore.
    async fn increment_option(&self, poll_id: &ObjectId, option_id: &ObjectId) -> AppResult<bool>;

    async fn delete(&self, id: &ObjectId) -> AppResult<bool>;
}

#[async_trait]
pub trait VoteLedger: Send + Sync {
    async fn exists(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<bool>;

    async fn find(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<Option<VoteRecord>>;

    /// Fails with `Conflict` when the voter already has a record for the poll.
    async fn insert(&self, vote: &VoteRecord) -> AppResult<()>;

    async fn remove(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<bool>;

    async fn delete_for_poll(&self, poll_id: &ObjectId) -> AppResult<u64>;

    /// Deletes the poll's ballots whose option is not in `keep`.
    async fn delete_outside_options(&self, poll_id: &ObjectId, keep: &[ObjectId]) -> AppResult<u64>;

    async fn count_for_poll(&self, poll_id: &ObjectId) -> AppResult<u64>;
}

const DUPLICATE_KEY: i32 = 11000;

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}
