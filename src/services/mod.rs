//! Workflows behind the HTTP handlers. Handlers only decode requests and
//! encode responses; every rule about users, polls and votes lives here.

pub mod auth_service;
pub mod poll_service;
pub mod vote_service;

use mongodb::bson::oid::ObjectId;

use crate::utils::error::{AppError, AppResult};

/// Treats absent and blank values alike.
pub(crate) fn required(value: Option<String>, message: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::ValidationError(message.to_string()))
}

/// An id that cannot name a stored poll is reported as a missing poll.
pub(crate) fn parse_poll_id(poll_id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(poll_id).map_err(|_| poll_not_found())
}

pub(crate) fn poll_not_found() -> AppError {
    AppError::NotFound("Poll not found".to_string())
}
