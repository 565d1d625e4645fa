use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::controllers::poll_controllers::{
    cast_vote, check_vote, create_poll, delete_poll, get_poll, get_results, polls, update_poll,
};
use crate::middleware::jwt::jwt_auth;
use crate::state::AppState;

pub fn poll_routes(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(polls::get_all_polls))
        .route("/:id", get(get_poll::get_poll))
        .route("/:id/results", get(get_results::get_results));

    let protected = Router::new()
        .route("/", post(create_poll::create_poll))
        .route(
            "/:id",
            put(update_poll::update_poll).delete(delete_poll::delete_poll),
        )
        .route("/:id/vote", post(cast_vote::cast_vote))
        .route("/:id/my-vote", get(check_vote::check_user_vote))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth));

    public.merge(protected).with_state(state)
}
