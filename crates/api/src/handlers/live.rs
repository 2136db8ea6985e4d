//! Live update channels. One WebSocket connection maps to one registry
//! connection; the registry pushes [`ResearchEvent`]s into an unbounded
//! channel that this handler drains onto the socket.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::debug;

use crate::routes::AppState;
use voyager_domain::EventScope;
use voyager_infrastructure::{ConnectionId, ConnectionRegistry};

/// Messages a client may send. Anything else is echoed back as an `ack`.
#[derive(Debug, Deserialize)]
struct ClientMessage {
    action: String,
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    timestamp: Option<Value>,
}

pub async fn job_websocket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    ws.on_upgrade(move |socket| serve_connection(socket, state.registry, EventScope::Job, job_id))
}

pub async fn user_websocket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    ws.on_upgrade(move |socket| serve_connection(socket, state.registry, EventScope::User, user_id))
}

pub async fn global_websocket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| {
        serve_connection(socket, state.registry, EventScope::Global, String::new())
    })
}

fn greeting(scope: EventScope, key: &str) -> Value {
    match scope {
        EventScope::Job => json!({
            "type": "connected",
            "job_id": key,
            "message": format!("Connected to research job {key}"),
        }),
        EventScope::User => json!({
            "type": "connected",
            "user_id": key,
            "message": format!("Connected to user channel {key}"),
        }),
        EventScope::Global => json!({
            "type": "connected",
            "message": "Connected to global channel",
        }),
    }
}

async fn serve_connection(
    socket: WebSocket,
    registry: Arc<ConnectionRegistry>,
    scope: EventScope,
    key: String,
) {
    let (tx, mut events) = mpsc::unbounded_channel();
    let conn = registry.connect(tx);
    registry.subscribe(conn, scope, &key);
    debug!(?scope, key, "websocket subscriber connected");

    let (mut sender, mut receiver) = socket.split();
    if send_json(&mut sender, &greeting(scope, &key)).await.is_err() {
        registry.disconnect(conn);
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    let Ok(raw) = serde_json::to_string(&event) else { continue };
                    if sender.send(Message::Text(raw.into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            incoming = receiver.next() => {
                if !handle_incoming(&mut sender, &registry, conn, incoming).await {
                    break;
                }
            }
        }
    }

    registry.disconnect(conn);
    debug!(?scope, "websocket subscriber disconnected");
}

/// Returns false when the connection should be torn down.
async fn handle_incoming(
    sender: &mut SplitSink<WebSocket, Message>,
    registry: &ConnectionRegistry,
    conn: ConnectionId,
    incoming: Option<Result<Message, axum::Error>>,
) -> bool {
    let reply = match incoming {
        Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => match message.action.as_str() {
                "ping" => json!({
                    "type": "pong",
                    "timestamp": message.timestamp,
                }),
                // Re-subscribes atomically: the registry drops the previous
                // job subscription when a new one is added.
                "subscribe" => match message.job_id {
                    Some(job_id) => {
                        registry.subscribe(conn, EventScope::Job, &job_id);
                        json!({ "type": "subscribed", "job_id": job_id })
                    }
                    None => json!({
                        "type": "error",
                        "message": "subscribe requires a job_id",
                    }),
                },
                _ => json!({ "type": "ack", "received": message.action }),
            },
            Err(_) => json!({ "type": "error", "message": "Invalid JSON" }),
        },
        Some(Ok(Message::Close(_))) | None => return false,
        Some(Ok(_)) => return true,
        Some(Err(e)) => {
            debug!(error = %e, "websocket receive error");
            return false;
        }
    };

    send_json(sender, &reply).await.is_ok()
}

async fn send_json(
    sender: &mut SplitSink<WebSocket, Message>,
    value: &Value,
) -> Result<(), axum::Error> {
    sender.send(Message::Text(value.to_string().into())).await
}
