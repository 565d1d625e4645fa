use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::models::user_models::AuthUser;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

fn identify(
    state: &AppState,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> AppResult<AuthUser> {
    let TypedHeader(Authorization(bearer)) = bearer
        .ok_or_else(|| AppError::AuthenticationError("Authorization required".to_string()))?;

    state.tokens.verify_token(bearer.token())
}

/// Rejects requests without a valid `Authorization: Bearer` token and hands
/// the decoded identity to the handler as an `Extension<AuthUser>`.
pub async fn jwt_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = identify(&state, bearer)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Identity for routes where signing in is optional. A missing or invalid
/// token leaves the caller anonymous; a missing signing key is still an error.
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let bearer =
            Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
                .await
                .unwrap_or(None);

        match identify(state, bearer) {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(AppError::AuthenticationError(_)) => Ok(MaybeAuthUser(None)),
            Err(e) => Err(e),
        }
    }
}
