//! Real-time channel. Clients may connect, but no application events are
//! published yet; only connection lifecycle is logged.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::Response,
};
use tracing::{debug, info};

static NEXT_SOCKET_ID: AtomicU64 = AtomicU64::new(1);

pub async fn ws_handler(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(handle_socket)
}

async fn handle_socket(mut socket: WebSocket) {
    let socket_id = NEXT_SOCKET_ID.fetch_add(1, Ordering::Relaxed);
    info!("Socket connected: {socket_id}");

    while let Some(message) = socket.recv().await {
        match message {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(other) => debug!("Socket {socket_id} sent {other:?}, ignoring"),
        }
    }

    info!("Socket disconnected: {socket_id}");
}
