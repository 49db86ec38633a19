//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a narration WebSocket.
//! It decodes client frames, delegates them to the connection's narration
//! state, and writes the replies back.

use crate::web::{
    narration::NarrationConnection,
    protocol::{ClientMessage, ServerMessage},
    state::AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use std::sync::Arc;
use storyland_core::Profile;
use tracing::{error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, profile))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, profile: Profile) {
    info!("New narration connection for profile: {}", profile.id);

    let (mut sender, mut receiver) = socket.split();
    let shutdown = app_state.shutdown.clone();
    let mut connection = NarrationConnection::new(app_state, profile);

    loop {
        let msg = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Server shutting down; closing narration connection.");
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
            msg = receiver.next() => msg,
        };

        match msg {
            Some(Ok(Message::Text(text))) => {
                let client_msg = match serde_json::from_str::<ClientMessage>(text.as_str()) {
                    Ok(client_msg) => client_msg,
                    Err(e) => {
                        warn!("Failed to deserialize client message: {}", e);
                        continue;
                    }
                };
                if let Some(reply) = connection.handle(client_msg).await {
                    if !send_message(&mut sender, &reply).await {
                        break;
                    }
                }
                if !connection.profile_is_active() {
                    info!("Profile is no longer active; closing narration connection.");
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
            Some(Ok(Message::Close(_))) => {
                info!("Client sent close message.");
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("Narration socket error: {}", e);
                break;
            }
            None => {
                info!("Client disconnected.");
                break;
            }
        }
    }

    info!("Narration connection closed.");
}

/// Serializes and sends one message. Returns `false` once the socket is gone.
async fn send_message(sender: &mut SplitSink<WebSocket, Message>, msg: &ServerMessage) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            return true;
        }
    };
    if sender.send(Message::Text(json.into())).await.is_err() {
        error!("Failed to send narration message.");
        return false;
    }
    true
}
