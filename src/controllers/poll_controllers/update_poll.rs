use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::poll_controllers::models::PollResponse;
use crate::models::{poll_models::PollPatch, user_models::AuthUser};
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn update_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(patch), _): WithRejection<Json<PollPatch>, AppError>,
) -> AppResult<Json<PollResponse>> {
    let poll = poll_service::update(&state, &poll_id, &user, patch).await?;

    Ok(Json(poll.into()))
}
