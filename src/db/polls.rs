use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection, Database,
};

use crate::db::{PollRepository, POLLS};
use crate::models::poll_models::{Poll, PollStatus, PollUpdate};
use crate::utils::error::AppResult;

pub struct MongoPollRepository {
    polls: Collection<Poll>,
}

impl MongoPollRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            polls: db.collection::<Poll>(POLLS),
        }
    }
}

fn status_filter(status: PollStatus, now: DateTime<Utc>) -> Document {
    let now = bson::DateTime::from_chrono(now);
    match status {
        PollStatus::Active => doc! {
            "start_date": { "$lte": now },
            "end_date": { "$gte": now },
        },
        PollStatus::Closed => doc! { "end_date": { "$lt": now } },
    }
}

fn set_document(update: &PollUpdate) -> AppResult<Document> {
    let mut set = Document::new();

    if let Some(question) = &update.question {
        set.insert("question", question.as_str());
    }
    if let Some(options) = &update.options {
        set.insert("options", bson::to_bson(options)?);
    }
    if let Some(start_date) = update.start_date {
        set.insert("start_date", bson::DateTime::from_chrono(start_date));
    }
    if let Some(end_date) = update.end_date {
        set.insert("end_date", bson::DateTime::from_chrono(end_date));
    }

    Ok(set)
}

#[async_trait]
impl PollRepository for MongoPollRepository {
    async fn insert(&self, poll: &Poll) -> AppResult<()> {
        self.polls.insert_one(poll).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Poll>> {
        Ok(self.polls.find_one(doc! { "_id": *id }).await?)
    }

    async fn list(&self, status: PollStatus, now: DateTime<Utc>) -> AppResult<Vec<Poll>> {
        let cursor = self
            .polls
            .find(status_filter(status, now))
            .sort(doc! { "created_at": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn apply_update(&self, id: &ObjectId, update: &PollUpdate) -> AppResult<Option<Poll>> {
        let set = set_document(update)?;
        if set.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .polls
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn increment_option(&self, poll_id: &ObjectId, option_id: &ObjectId) -> AppResult<bool> {
        let filter = doc! { "_id": *poll_id, "options.id": *option_id };
        let update = doc! { "$inc": { "options.$.votes": 1_i64 } };

        let result = self.polls.update_one(filter, update).await?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self.polls.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}
