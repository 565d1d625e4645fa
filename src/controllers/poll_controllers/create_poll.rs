use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::poll_controllers::models::PollResponse;
use crate::models::{poll_models::PollDraft, user_models::AuthUser};
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn create_poll(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<PollDraft>, AppError>,
) -> AppResult<(StatusCode, Json<PollResponse>)> {
    let poll = poll_service::create(&state, &user, payload).await?;

    Ok((StatusCode::CREATED, Json(poll.into())))
}
