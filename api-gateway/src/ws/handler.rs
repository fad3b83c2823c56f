//! WebSocket handler implementation
//!
//! `GET /ws` streams every price snapshot to the client as a JSON object
//! mapping symbol to price. The channel is server to client only: text the
//! client sends is ignored, a Close frame or read error ends the session.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use market_data::Subscription;
use tracing::{debug, info, warn};

use crate::AppState;

/// Why a streaming session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Writing a snapshot to the client failed
    WriteFailed,
    /// The client closed the connection or the read side ended
    ClientClosed,
    /// Reading from the client failed
    ReadFailed,
    /// The hub dropped this subscriber
    Unsubscribed,
}

/// Handle WebSocket connection
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Run one streaming session
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let subscription = state.market_data_service.subscribe();
    let session_id = subscription.id();
    info!("New WebSocket connection: {}", session_id);

    let (sender, receiver) = socket.split();
    let end = stream_snapshots(sender, receiver, subscription).await;

    info!("WebSocket connection {} closed: {:?}", session_id, end);
}

/// Forward snapshots from `subscription` to `sink` until the connection ends.
///
/// The subscription is consumed and dropped on every exit path, which
/// unregisters it from the hub even if this future panics or is cancelled.
pub async fn stream_snapshots<S, R, E>(
    mut sink: S,
    mut incoming: R,
    mut subscription: Subscription,
) -> SessionEnd
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let end = loop {
        tokio::select! {
            snapshot = subscription.recv() => {
                let Some(snapshot) = snapshot else {
                    break SessionEnd::Unsubscribed;
                };

                let text = match serde_json::to_string(snapshot.as_ref()) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Failed to serialize price snapshot: {}", e);
                        continue;
                    }
                };

                if let Err(e) = sink.send(Message::Text(text)).await {
                    debug!("Error sending snapshot: {}", e);
                    break SessionEnd::WriteFailed;
                }
            }
            message = incoming.next() => match message {
                Some(Ok(Message::Close(_))) | None => break SessionEnd::ClientClosed,
                Some(Err(e)) => {
                    debug!("Error reading from client: {}", e);
                    break SessionEnd::ReadFailed;
                }
                Some(Ok(_)) => {}
            },
        }
    };

    drop(subscription);
    let _ = sink.close().await;
    end
}
