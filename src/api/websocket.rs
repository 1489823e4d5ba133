//! WebSocket subscription endpoint
//!
//! Every connected client receives each raw activity event as a text frame.
//! Sending the text frame `init` requests a snapshot of the farm stats, which
//! is answered on that connection only.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{
    SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{
    api::state::ApiState,
    error::HubResult,
    registry::{Subscriber, SubscriberId},
};

/// Client frame requesting a snapshot
pub const SNAPSHOT_REQUEST: &str = "init";

/// Send half of one WebSocket connection
pub struct WebSocketSubscriber {
    sink: Mutex<SplitSink<WebSocket, Message>>,
}

impl WebSocketSubscriber {
    fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }
}

#[async_trait]
impl Subscriber for WebSocketSubscriber {
    async fn send_text(&self, text: String) -> HubResult<()> {
        self.sink.lock().await.send(Message::Text(text)).await?;
        Ok(())
    }
}

/// WebSocket upgrade handler
///
/// GET / and GET /api/v1/stream
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<ApiState>) -> Response {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

/// Serve one connection from registration until it closes
async fn handle_websocket(socket: WebSocket, state: ApiState) {
    let (sender, mut receiver) = socket.split();

    let subscriber = Arc::new(WebSocketSubscriber::new(sender));
    let id = state.registry.register(subscriber.clone()).await;
    info!(subscriber = id, "WebSocket client connected");

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) if text == SNAPSHOT_REQUEST => {
                send_snapshot(&state, id, &subscriber).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                // other text, binary, ping and pong frames are ignored
            }
            Err(e) => {
                debug!(subscriber = id, "error while reading from WebSocket: {e}");
                break;
            }
        }
    }

    state.registry.unregister(id).await;
    info!(subscriber = id, "WebSocket client disconnected");
}

async fn send_snapshot(state: &ApiState, id: SubscriberId, subscriber: &WebSocketSubscriber) {
    let snapshot = match state.stats.snapshot_json() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(subscriber = id, "error serializing snapshot: {e}");
            return;
        }
    };

    if let Err(e) = subscriber.send_text(snapshot).await {
        debug!(subscriber = id, "error while sending snapshot: {e}");
    }
}
