use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::poll_models::{Poll, PollOption};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub option_id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ListPollsQuery {
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OptionResponse {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
}

impl From<PollOption> for OptionResponse {
    fn from(option: PollOption) -> Self {
        Self {
            id: option.id.to_hex(),
            text: option.text,
            votes: Some(option.votes),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub question: String,
    pub options: Vec<OptionResponse>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<Poll> for PollResponse {
    fn from(poll: Poll) -> Self {
        Self {
            id: poll.id.to_hex(),
            question: poll.question,
            options: poll.options.into_iter().map(OptionResponse::from).collect(),
            start_date: poll.start_date,
            end_date: poll.end_date,
            created_by: poll.created_by.to_hex(),
            created_at: poll.created_at,
        }
    }
}

impl PollResponse {
    /// Drops every option's vote count.
    pub fn redacted(mut self) -> Self {
        for option in &mut self.options {
            option.votes = None;
        }
        self
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PollResults {
    pub question: String,
    pub options: Vec<OptionResponse>,
    pub active: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusResponse {
    pub has_voted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
