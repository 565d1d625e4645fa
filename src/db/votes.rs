use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, Database,
};

use crate::db::{is_duplicate_key, VoteLedger, VOTE_RECORDS};
use crate::models::vote_record_models::VoteRecord;
use crate::utils::error::{AppError, AppResult};

pub struct MongoVoteLedger {
    votes: Collection<VoteRecord>,
}

impl MongoVoteLedger {
    pub fn new(db: &Database) -> Self {
        Self {
            votes: db.collection::<VoteRecord>(VOTE_RECORDS),
        }
    }
}

#[async_trait]
impl VoteLedger for MongoVoteLedger {
    async fn exists(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<bool> {
        Ok(self.find(poll_id, voter_id).await?.is_some())
    }

    async fn find(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<Option<VoteRecord>> {
        Ok(self
            .votes
            .find_one(doc! { "poll_id": *poll_id, "voter_id": *voter_id })
            .await?)
    }

    async fn insert(&self, vote: &VoteRecord) -> AppResult<()> {
        match self.votes.insert_one(vote).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Conflict("User has already voted".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<bool> {
        let result = self
            .votes
            .delete_one(doc! { "poll_id": *poll_id, "voter_id": *voter_id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_for_poll(&self, poll_id: &ObjectId) -> AppResult<u64> {
        let result = self.votes.delete_many(doc! { "poll_id": *poll_id }).await?;
        Ok(result.deleted_count)
    }

    async fn delete_outside_options(&self, poll_id: &ObjectId, keep: &[ObjectId]) -> AppResult<u64> {
        let result = self
            .votes
            .delete_many(doc! { "poll_id": *poll_id, "option_id": { "$nin": keep.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn count_for_poll(&self, poll_id: &ObjectId) -> AppResult<u64> {
        Ok(self
            .votes
            .count_documents(doc! { "poll_id": *poll_id })
            .await?)
    }
}
