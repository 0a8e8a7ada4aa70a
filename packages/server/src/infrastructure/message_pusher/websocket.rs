//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - コネクションごとの `UnboundedSender` を管理（Connection Set）
//! - コネクションへのメッセージ送信（push_to, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に
//! 使用します。これにより「WebSocket の生成」と「メッセージの送信」が
//! 分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, PusherChannel, Timestamp,
};

/// Connection Set の1エントリ
pub struct ConnectionEntry {
    /// コネクションへの送信チャンネル
    pub sender: PusherChannel,
    /// 接続時刻（切断時の uptime ログに使用）
    pub connected_at: Timestamp,
}

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `connections`: 接続中のコネクションと対応する sender のマップ
pub struct WebSocketMessagePusher {
    /// 接続中のコネクションの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: ConnectionEntry
    connections: Arc<Mutex<HashMap<ConnectionId, ConnectionEntry>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(connections: Arc<Mutex<HashMap<ConnectionId, ConnectionEntry>>>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
        connected_at: Timestamp,
    ) {
        let mut connections = self.connections.lock().await;
        connections.insert(
            connection_id.clone(),
            ConnectionEntry {
                sender,
                connected_at,
            },
        );
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) -> Option<Timestamp> {
        let mut connections = self.connections.lock().await;
        let entry = connections.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
        entry.map(|e| e.connected_at)
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        if let Some(entry) = connections.get(connection_id) {
            entry
                .sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id);
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(
                connection_id.to_string(),
            ))
        }
    }

    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        for (connection_id, entry) in connections.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = entry.sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    connection_id,
                    e
                );
            } else {
                tracing::debug!("Broadcasted message to connection '{}'", connection_id);
            }
        }

        Ok(())
    }

    async fn count_connections(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}
