use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::controllers::poll_controllers::models::VoteStatusResponse;
use crate::models::user_models::AuthUser;
use crate::services::vote_service;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn check_user_vote(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<VoteStatusResponse>> {
    let ballot = vote_service::find_own(&state, &poll_id, &user).await?;

    Ok(Json(VoteStatusResponse {
        has_voted: ballot.is_some(),
        option_id: ballot.map(|vote| vote.option_id.to_hex()),
    }))
}
