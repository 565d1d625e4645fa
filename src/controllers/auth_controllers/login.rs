use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::controllers::auth_controllers::models::{CredentialsRequest, LoginResponse};
use crate::services::auth_service;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CredentialsRequest>, AppError>,
) -> AppResult<Json<LoginResponse>> {
    let token = auth_service::login(&state, body.email, body.password).await?;

    Ok(Json(LoginResponse { token }))
}
