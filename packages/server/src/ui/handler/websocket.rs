//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{domain::ConnectionId, ui::state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // コネクションは匿名: ハブ側で不透明なハンドルを払い出す
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This function handles the outbound message flow: broadcasts and targeted
/// pushes (via the rx channel) are sent to this connection's WebSocket.
///
/// # Arguments
///
/// * `rx` - Channel receiver for messages addressed to this connection
/// * `sender` - WebSocket sink to send messages to this connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this connection
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the connection and run the initial sync
    // (welcome + DEVICE_LIST snapshot, pushed to this connection only)
    if let Err(e) = state
        .connect_client_usecase
        .execute(connection_id.clone(), tx)
        .await
    {
        tracing::warn!(
            "Initial sync failed for connection '{}': {}",
            connection_id,
            e
        );
        // 登録済みの可能性があるので切断経路でクリーンアップする
        state
            .disconnect_client_usecase
            .execute(connection_id)
            .await;
        return;
    }
    tracing::info!("Connection '{}' established", connection_id);

    let (sender, mut receiver) = socket.split();

    // Spawn a task to push queued messages to this connection
    let mut send_task = pusher_loop(rx, sender);

    let connection_id_recv = connection_id.clone();
    let state_recv = state.clone();

    // Spawn a task to receive messages from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text: {}", text);

                    match state_recv
                        .dispatch_message_usecase
                        .execute(&text, Some(&connection_id_recv))
                        .await
                    {
                        Ok(kind) => {
                            tracing::debug!(
                                "Dispatched {} from connection '{}'",
                                kind,
                                connection_id_recv
                            );
                        }
                        // fail-open: 破棄はログのみ、送信元へ応答しない
                        Err(reason) => {
                            tracing::warn!(
                                "Discarded message from connection '{}': {}",
                                connection_id_recv,
                                reason
                            );
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_recv);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Unregister, unbind announced devices, broadcast the updated snapshot
    let removed = state
        .disconnect_client_usecase
        .execute(connection_id.clone())
        .await;
    if removed.is_empty() {
        tracing::info!("Connection '{}' cleaned up", connection_id);
    } else {
        tracing::info!(
            "Connection '{}' cleaned up, {} device(s) unregistered",
            connection_id,
            removed.len()
        );
    }
}
