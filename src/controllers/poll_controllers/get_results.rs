use axum::{
    extract::{Path, State},
    Json,
};

use crate::controllers::poll_controllers::models::PollResults;
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn get_results(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<PollResults>> {
    let results = poll_service::results(&state, &poll_id).await?;

    Ok(Json(results))
}
