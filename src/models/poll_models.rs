use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub question: String,
    pub options: Vec<PollOption>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub end_date: DateTime<Utc>,
    pub created_by: ObjectId,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollOption {
    pub id: ObjectId,
    pub text: String,
    pub votes: i64,
}

impl PollOption {
    pub fn new(text: String) -> Self {
        Self {
            id: ObjectId::new(),
            text,
            votes: 0,
        }
    }
}

impl Poll {
    /// Voting window is inclusive on both ends.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }

    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    pub fn has_option(&self, option_id: &ObjectId) -> bool {
        self.options.iter().any(|option| &option.id == option_id)
    }

    pub fn total_votes(&self) -> i64 {
        self.options.iter().map(|option| option.votes).sum()
    }
}

/// Filter accepted by the poll listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollStatus {
    #[default]
    Active,
    Closed,
}

impl FromStr for PollStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PollStatus::Active),
            "closed" => Ok(PollStatus::Closed),
            other => Err(format!("Unknown poll status '{other}'")),
        }
    }
}

impl PollStatus {
    pub fn matches(&self, poll: &Poll, now: DateTime<Utc>) -> bool {
        match self {
            PollStatus::Active => poll.is_active(now),
            PollStatus::Closed => poll.end_date < now,
        }
    }
}

/// Body of a poll creation request. Every field is optional so that missing
/// input surfaces as a validation error instead of a decoding failure.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PollDraft {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update sent by a poll owner. Provided fields overwrite.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PollPatch {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Validated field changes handed to the poll repository.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollUpdate {
    pub question: Option<String>,
    pub options: Option<Vec<PollOption>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl PollUpdate {
    pub fn is_empty(&self) -> bool {
        self.question.is_none()
            && self.options.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    pub fn apply_to(&self, poll: &mut Poll) {
        if let Some(question) = &self.question {
            poll.question = question.clone();
        }
        if let Some(options) = &self.options {
            poll.options = options.clone();
        }
        if let Some(start_date) = self.start_date {
            poll.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            poll.end_date = end_date;
        }
    }
}
