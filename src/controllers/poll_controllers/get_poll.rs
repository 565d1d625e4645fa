use axum::{
    extract::{Path, State},
    Json,
};

use crate::controllers::poll_controllers::models::PollResponse;
use crate::middleware::jwt::MaybeAuthUser;
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn get_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
) -> AppResult<Json<PollResponse>> {
    let poll = poll_service::get_by_id(&state, &poll_id, viewer.as_ref()).await?;

    Ok(Json(poll))
}
