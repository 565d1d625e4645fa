use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::controllers::auth_controllers::{login, me, register};
use crate::middleware::jwt::jwt_auth;
use crate::state::AppState;

pub fn auth_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/me", get(me::me))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth));

    Router::new()
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .merge(protected)
        .with_state(state)
}
