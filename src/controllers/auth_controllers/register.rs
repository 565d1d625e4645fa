use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::controllers::auth_controllers::models::{CredentialsRequest, RegisterResponse};
use crate::services::auth_service;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CredentialsRequest>, AppError>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let user_id = auth_service::register(&state, body.email, body.password).await?;

    let response = RegisterResponse {
        message: "User registered".to_string(),
        user_id: user_id.to_hex(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
