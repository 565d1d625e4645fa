use axum::{extract::Extension, Json};

use crate::controllers::auth_controllers::models::ProfileResponse;
use crate::models::user_models::AuthUser;
use crate::services::auth_service;

pub async fn me(Extension(user): Extension<AuthUser>) -> Json<ProfileResponse> {
    let profile = auth_service::profile(&user);

    Json(ProfileResponse {
        id: profile.id.to_hex(),
        email: profile.email,
    })
}
