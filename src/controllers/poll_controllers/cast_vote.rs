use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::poll_controllers::models::{CastVoteRequest, MessageResponse};
use crate::models::user_models::AuthUser;
use crate::services::vote_service;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn cast_vote(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CastVoteRequest>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    vote_service::cast(&state, &poll_id, &user, payload.option_id).await?;

    Ok(Json(MessageResponse::new("Vote cast successfully")))
}
