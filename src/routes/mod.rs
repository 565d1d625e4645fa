pub mod auth_routes;
pub mod poll_routes;
