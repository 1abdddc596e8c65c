//! WebSocket transport.
//!
//! ```text
//! client -> server   {"type":"requestGameState"}
//!                    {"type":"move","piece":"A-P1","direction":"F"}
//!                    {"type":"reset"}
//! server -> client   {"type":"gameState","state":{...}}
//!                    {"type":"rejected","reason":"not_your_turn","detail":"..."}
//! ```
//!
//! Every socket gets a `gameState` on connect and after each accepted move or
//! reset in its session. Rejections go only to the socket that sent the move.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use gridduel_core::wire::StateModel;
use gridduel_core::{Direction, PieceId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::session::Session;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    RequestGameState,
    Move { piece: String, direction: String },
    Reset,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    GameState { state: StateModel },
    Rejected { reason: &'static str, detail: String },
}

pub async fn upgrade(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(ws.on_upgrade(move |socket| serve_socket(socket, session)))
}

/// Handle one client message. Returns the direct reply, if any; accepted
/// moves and resets reach this client through the session broadcast instead.
pub fn handle_message(session: &Session, text: &str) -> Option<ServerMessage> {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            return Some(ServerMessage::Rejected {
                reason: "malformed",
                detail: e.to_string(),
            })
        }
    };

    match message {
        ClientMessage::RequestGameState => Some(ServerMessage::GameState {
            state: session.snapshot(),
        }),
        ClientMessage::Move { piece, direction } => {
            let parsed = piece
                .parse::<PieceId>()
                .and_then(|p| direction.parse::<Direction>().map(|d| (p, d)));
            let (piece, direction) = match parsed {
                Ok(parsed) => parsed,
                Err(e) => {
                    return Some(ServerMessage::Rejected {
                        reason: "malformed",
                        detail: e.to_string(),
                    })
                }
            };
            match session.apply_move(piece, direction) {
                Ok(_) => None,
                Err(rejected) => Some(ServerMessage::Rejected {
                    reason: rejected.reason(),
                    detail: rejected.to_string(),
                }),
            }
        }
        ClientMessage::Reset => {
            session.reset();
            None
        }
    }
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).map_err(axum::Error::new)?;
    socket.send(Message::Text(text.into())).await
}

async fn serve_socket(mut socket: WebSocket, session: Arc<Session>) {
    info!(session = %session.id(), viewers = session.subscriber_count() + 1, "client connected");

    let (initial, mut updates) = session.subscribe();
    if send(&mut socket, &ServerMessage::GameState { state: initial })
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let Some(Ok(message)) = incoming else { break };
                let reply = match message {
                    Message::Text(text) => handle_message(&session, text.as_str()),
                    Message::Close(_) => break,
                    _ => None,
                };
                if let Some(reply) = reply {
                    if send(&mut socket, &reply).await.is_err() {
                        break;
                    }
                }
            }
            update = updates.recv() => {
                let state = match update {
                    Ok(state) => state,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(session = %session.id(), skipped, "subscriber lagged, resyncing");
                        // Fresh receiver and snapshot taken together keep ordering
                        let (state, fresh) = session.subscribe();
                        updates = fresh;
                        state
                    }
                    Err(RecvError::Closed) => break,
                };
                if send(&mut socket, &ServerMessage::GameState { state }).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(session = %session.id(), "client disconnected");
}
