use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use tracing::info;

use crate::controllers::poll_controllers::models::{PollResponse, PollResults};
use crate::models::{
    poll_models::{Poll, PollDraft, PollOption, PollPatch, PollStatus, PollUpdate},
    user_models::AuthUser,
};
use crate::services::{parse_poll_id, poll_not_found, required};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Trims option texts and rejects blank, duplicate or too few options.
fn build_options(texts: Vec<String>) -> AppResult<Vec<PollOption>> {
    let texts: Vec<String> = texts.into_iter().map(|t| t.trim().to_string()).collect();

    if texts.len() < 2 {
        return Err(AppError::ValidationError(
            "At least 2 options required".to_string(),
        ));
    }
    if texts.iter().any(|t| t.is_empty()) {
        return Err(AppError::ValidationError(
            "Poll options cannot be empty".to_string(),
        ));
    }

    let mut deduped: Vec<&String> = Vec::with_capacity(texts.len());
    for text in &texts {
        if !deduped.contains(&text) {
            deduped.push(text);
        }
    }
    if deduped.len() != texts.len() {
        return Err(AppError::ValidationError(
            "Poll options must be unique".to_string(),
        ));
    }

    Ok(texts.into_iter().map(PollOption::new).collect())
}

fn check_window(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> AppResult<()> {
    if start_date >= end_date {
        return Err(AppError::ValidationError(
            "startDate must be before endDate".to_string(),
        ));
    }
    Ok(())
}

pub async fn create(state: &AppState, owner: &AuthUser, draft: PollDraft) -> AppResult<Poll> {
    let question = required(draft.question, "Question and at least 2 options required")?;
    let options = build_options(draft.options.unwrap_or_default())?;
    let (start_date, end_date) = match (draft.start_date, draft.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::ValidationError(
                "startDate and endDate required".to_string(),
            ))
        }
    };
    check_window(start_date, end_date)?;

    let poll = Poll {
        id: ObjectId::new(),
        question,
        options,
        start_date,
        end_date,
        created_by: owner.id,
        created_at: Utc::now(),
    };

    state.polls.insert(&poll).await?;

    info!("Poll {} created by {}", poll.id, owner.id);
    Ok(poll)
}

pub async fn list(state: &AppState, status: Option<&str>) -> AppResult<Vec<Poll>> {
    let status = match status {
        None | Some("") => PollStatus::default(),
        Some(raw) => raw.parse().map_err(AppError::ValidationError)?,
    };

    state.polls.list(status, Utc::now()).await
}

async fn load(state: &AppState, poll_id: &str) -> AppResult<Poll> {
    let id = parse_poll_id(poll_id)?;
    state.polls.find_by_id(&id).await?.ok_or_else(poll_not_found)
}

/// Anonymous callers do not see counts while a poll is live.
pub async fn get_by_id(
    state: &AppState,
    poll_id: &str,
    viewer: Option<&AuthUser>,
) -> AppResult<PollResponse> {
    let poll = load(state, poll_id).await?;
    let active = poll.is_active(Utc::now());

    let response = PollResponse::from(poll);
    if active && viewer.is_none() {
        return Ok(response.redacted());
    }
    Ok(response)
}

/// Owner-only mutations are refused once the poll has closed.
async fn load_for_owner(state: &AppState, poll_id: &str, caller: &AuthUser) -> AppResult<Poll> {
    let poll = load(state, poll_id).await?;

    if poll.created_by != caller.id {
        return Err(AppError::AuthorizationError("Not authorized".to_string()));
    }
    if poll.is_closed(Utc::now()) {
        return Err(AppError::StateError("Poll already closed".to_string()));
    }

    Ok(poll)
}

pub async fn update(
    state: &AppState,
    poll_id: &str,
    caller: &AuthUser,
    patch: PollPatch,
) -> AppResult<Poll> {
    let poll = load_for_owner(state, poll_id, caller).await?;

    // A blank question leaves the stored one untouched.
    let question = patch
        .question
        .map(|question| question.trim().to_string())
        .filter(|question| !question.is_empty());
    let options = patch.options.map(build_options).transpose()?;

    let update = PollUpdate {
        question,
        options,
        start_date: patch.start_date,
        end_date: patch.end_date,
    };

    let mut preview = poll.clone();
    update.apply_to(&mut preview);
    check_window(preview.start_date, preview.end_date)?;

    let updated = state
        .polls
        .apply_update(&poll.id, &update)
        .await?
        .ok_or_else(poll_not_found)?;

    // Ballots already counted on the new options stay; the rest went with the old ones.
    if let Some(options) = &update.options {
        let keep: Vec<ObjectId> = options.iter().map(|option| option.id).collect();
        let purged = state.votes.delete_outside_options(&poll.id, &keep).await?;
        info!("Poll {} options replaced, {purged} vote(s) cleared", poll.id);
    }

    Ok(updated)
}

pub async fn delete(state: &AppState, poll_id: &str, caller: &AuthUser) -> AppResult<()> {
    let poll = load_for_owner(state, poll_id, caller).await?;

    // Votes go before the poll; no ballot may outlive it.
    let removed = state.votes.delete_for_poll(&poll.id).await?;
    if !state.polls.delete(&poll.id).await? {
        return Err(poll_not_found());
    }

    info!("Poll {} deleted with {removed} vote(s)", poll.id);
    Ok(())
}

/// Public tally. Never redacted, live or final.
pub async fn results(state: &AppState, poll_id: &str) -> AppResult<PollResults> {
    let poll = load(state, poll_id).await?;
    let active = poll.is_active(Utc::now());

    let message = if active {
        "Poll is still active, showing live results"
    } else {
        "Poll closed, final results"
    };

    Ok(PollResults {
        question: poll.question,
        options: poll.options.into_iter().map(Into::into).collect(),
        active,
        message: message.to_string(),
    })
}
