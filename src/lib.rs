//! Backend for an online polling application.
//!
//! Users register and sign in with email and password, create time-boxed
//! polls, cast one vote per poll and read live or final tallies. State lives
//! in MongoDB (or an in-process store for local runs and tests); the server
//! itself keeps no mutable state between requests.
//!
//! # Layout
//! - [`routes`] wires URLs to [`controllers`], which decode requests and call
//!   the workflows in [`services`].
//! - [`middleware::jwt`] is the bearer-token gate in front of protected routes.
//! - [`db`] holds the storage traits and their MongoDB and in-memory backends.
//!
//! # Configuration
//! Read from the environment (and `.env`): `SERVER_ADDR`, `STORAGE_BACKEND`,
//! `MONGO_URI`, `DB_NAME`, `CORS_ORIGIN`, `JWT_SECRET`, `JWT_EXPIRES_IN`,
//! `BCRYPT_COST`. Log filtering uses `RUST_LOG`.

use std::time::Instant;

use axum::{
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use once_cell::sync::Lazy;
use serde_json::json;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod controllers;
pub mod db;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use config::Config;
use state::AppState;
use utils::error::{AppError, AppResult};

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

fn cors_layer(origin: Option<&str>) -> AppResult<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    match origin {
        Some(origin) => {
            let origin = origin.parse::<HeaderValue>().map_err(|_| {
                AppError::ConfigurationError(format!("Failed to parse CORS origin: {origin}"))
            })?;
            Ok(cors.allow_origin(origin))
        }
        None => Ok(cors.allow_origin(Any)),
    }
}

pub fn app(state: AppState) -> AppResult<Router> {
    let cors = cors_layer(state.config.cors_origin.as_deref())?;

    let router = Router::new()
        .route("/", get(root))
        .route("/ws", get(realtime::ws_handler))
        .nest("/api/auth", routes::auth_routes::auth_routes(state.clone()))
        .nest("/api/polls", routes::poll_routes::poll_routes(state))
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

pub async fn start_server(config: Config) -> AppResult<()> {
    Lazy::force(&START_TIME);

    let addr = config.server_addr;

    info!("Initializing state...");
    let state = AppState::connect(config).await?;
    let app = app(state)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to bind to address {addr}: {e}")))?;
    info!("Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::InternalError(format!("Server error: {e}")))?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Compact `1d 2h 3m 4s` rendering that drops leading zero units.
fn format_uptime(elapsed: std::time::Duration) -> String {
    let total = elapsed.as_secs();
    let units = [
        (total / 86_400, "d"),
        ((total / 3_600) % 24, "h"),
        ((total / 60) % 60, "m"),
        (total % 60, "s"),
    ];

    let first = units
        .iter()
        .position(|(value, _)| *value > 0)
        .unwrap_or(units.len() - 1);

    units[first..]
        .iter()
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

async fn root() -> Json<serde_json::Value> {
    let elapsed = START_TIME.elapsed();

    Json(json!({
        "status": "ok",
        "uptimeSeconds": elapsed.as_secs(),
        "message": format!("Backend is running! Uptime: {}", format_uptime(elapsed)),
    }))
}
