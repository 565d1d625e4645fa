//! Casting a ballot.
//!
//! A vote is accepted only while the poll window is open and only once per
//! `(poll, voter)`. The existence check gives a friendly early answer, but the
//! ledger's uniqueness constraint is what decides a race between identical
//! requests: the loser gets `Conflict` and never reaches the counter.
//!
//! The counter update is a single compound-keyed increment in the poll
//! repository. When it no longer finds the option (the owner replaced the
//! option list after the poll was read), the ballot that was just written is
//! taken back so counters and ledger stay in step.

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tracing::{error, info, warn};

use crate::models::{user_models::AuthUser, vote_record_models::VoteRecord};
use crate::services::{parse_poll_id, poll_not_found};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

fn option_not_found() -> AppError {
    AppError::ValidationError("Option not found".to_string())
}

pub async fn cast(
    state: &AppState,
    poll_id: &str,
    voter: &AuthUser,
    option_id: Option<String>,
) -> AppResult<()> {
    let option_id = option_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("optionId required".to_string()))?;

    let poll_id = parse_poll_id(poll_id)?;
    let poll = state
        .polls
        .find_by_id(&poll_id)
        .await?
        .ok_or_else(poll_not_found)?;

    if !poll.is_active(Utc::now()) {
        return Err(AppError::StateError("Poll is not active".to_string()));
    }

    let option_id = ObjectId::parse_str(option_id.trim()).map_err(|_| option_not_found())?;
    if !poll.has_option(&option_id) {
        return Err(option_not_found());
    }

    if state.votes.exists(&poll.id, &voter.id).await? {
        return Err(AppError::Conflict("User has already voted".to_string()));
    }

    state
        .votes
        .insert(&VoteRecord::new(poll.id, voter.id, option_id))
        .await?;

    match state.polls.increment_option(&poll.id, &option_id).await {
        Ok(true) => {
            info!("Vote recorded on poll {} by {}", poll.id, voter.id);
            Ok(())
        }
        Ok(false) => {
            warn!(
                "Option {option_id} vanished from poll {} before counting, withdrawing vote",
                poll.id
            );
            withdraw(state, &poll.id, &voter.id).await;
            Err(option_not_found())
        }
        Err(e) => {
            warn!("Counting vote on poll {} failed, withdrawing vote: {e}", poll.id);
            withdraw(state, &poll.id, &voter.id).await;
            Err(e)
        }
    }
}

/// Takes back an uncounted ballot. Removal failures are logged, never returned.
async fn withdraw(state: &AppState, poll_id: &ObjectId, voter_id: &ObjectId) {
    if let Err(e) = state.votes.remove(poll_id, voter_id).await {
        error!("Withdrawing uncounted vote on poll {poll_id} by {voter_id} failed: {e}");
    }
}

/// The caller's own ballot on a poll, if any.
pub async fn find_own(
    state: &AppState,
    poll_id: &str,
    voter: &AuthUser,
) -> AppResult<Option<VoteRecord>> {
    let poll_id = parse_poll_id(poll_id)?;
    if state.polls.find_by_id(&poll_id).await?.is_none() {
        return Err(poll_not_found());
    }

    state.votes.find(&poll_id, &voter.id).await
}
