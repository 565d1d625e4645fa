use axum::{
    extract::{Query, State},
    Json,
};

use crate::controllers::poll_controllers::models::{ListPollsQuery, PollResponse};
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn get_all_polls(
    State(state): State<AppState>,
    Query(query): Query<ListPollsQuery>,
) -> AppResult<Json<Vec<PollResponse>>> {
    let polls = poll_service::list(&state, query.status.as_deref()).await?;

    Ok(Json(polls.into_iter().map(PollResponse::from).collect()))
}
