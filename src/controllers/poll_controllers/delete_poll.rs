use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::controllers::poll_controllers::models::MessageResponse;
use crate::models::user_models::AuthUser;
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn delete_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<MessageResponse>> {
    poll_service::delete(&state, &poll_id, &user).await?;

    Ok(Json(MessageResponse::new("Poll deleted")))
}
