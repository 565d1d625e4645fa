use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use crate::db::{CredentialStore, PollRepository, VoteLedger};
use crate::models::{
    poll_models::{Poll, PollStatus, PollUpdate},
    user_models::User,
    vote_record_models::VoteRecord,
};
use crate::utils::error::{AppError, AppResult};

/// In-process backend. Every operation runs under a single lock acquisition,
/// which gives the same write-time uniqueness and atomic increments the
/// MongoDB indexes and `$inc` provide.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, User>>,
    polls: Mutex<HashMap<ObjectId, Poll>>,
    votes: Mutex<HashMap<(ObjectId, ObjectId), VoteRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> AppResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| AppError::InternalError("In-memory store lock poisoned".to_string()))
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(lock(&self.users)?.get(email).cloned())
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        let mut users = lock(&self.users)?;
        if users.contains_key(&user.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl PollRepository for MemoryStore {
    async fn insert(&self, poll: &Poll) -> AppResult<()> {
        lock(&self.polls)?.insert(poll.id, poll.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Poll>> {
        Ok(lock(&self.polls)?.get(id).cloned())
    }

    async fn list(&self, status: PollStatus, now: DateTime<Utc>) -> AppResult<Vec<Poll>> {
        let mut polls: Vec<Poll> = lock(&self.polls)?
            .values()
            .filter(|poll| status.matches(poll, now))
            .cloned()
            .collect();

        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(polls)
    }

    async fn apply_update(&self, id: &ObjectId, update: &PollUpdate) -> AppResult<Option<Poll>> {
        let mut polls = lock(&self.polls)?;
        Ok(polls.get_mut(id).map(|poll| {
            update.apply_to(poll);
            poll.clone()
        }))
    }

    async fn increment_option(&self, poll_id: &ObjectId, option_id: &ObjectId) -> AppResult<bool> {
        let mut polls = lock(&self.polls)?;
        let option = polls
            .get_mut(poll_id)
            .and_then(|poll| poll.options.iter_mut().find(|option| &option.id == option_id));

        Ok(match option {
            Some(option) => {
                option.votes += 1;
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<bool> {
        Ok(lock(&self.polls)?.remove(id).is_some())
    }
}

#[async_trait]
impl VoteLedger for MemoryStore {
    async fn exists(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<bool> {
        Ok(lock(&self.votes)?.contains_key(&(*poll_id, *voter_id)))
    }

    async fn find(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<Option<VoteRecord>> {
        Ok(lock(&self.votes)?.get(&(*poll_id, *voter_id)).cloned())
    }

    async fn insert(&self, vote: &VoteRecord) -> AppResult<()> {
        let mut votes = lock(&self.votes)?;
        let key = (vote.poll_id, vote.voter_id);
        if votes.contains_key(&key) {
            return Err(AppError::Conflict("User has already voted".to_string()));
        }
        votes.insert(key, vote.clone());
        Ok(())
    }

    async fn remove(&self, poll_id: &ObjectId, voter_id: &ObjectId) -> AppResult<bool> {
        Ok(lock(&self.votes)?.remove(&(*poll_id, *voter_id)).is_some())
    }

    async fn delete_for_poll(&self, poll_id: &ObjectId) -> AppResult<u64> {
        let mut votes = lock(&self.votes)?;
        let before = votes.len();
        votes.retain(|(poll, _), _| poll != poll_id);
        Ok((before - votes.len()) as u64)
    }

    async fn delete_outside_options(&self, poll_id: &ObjectId, keep: &[ObjectId]) -> AppResult<u64> {
        let mut votes = lock(&self.votes)?;
        let before = votes.len();
        votes.retain(|(poll, _), vote| poll != poll_id || keep.contains(&vote.option_id));
        Ok((before - votes.len()) as u64)
    }

    async fn count_for_poll(&self, poll_id: &ObjectId) -> AppResult<u64> {
        Ok(lock(&self.votes)?
            .keys()
            .filter(|(poll, _)| poll == poll_id)
            .count() as u64)
    }
}
