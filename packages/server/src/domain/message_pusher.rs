//! MessagePusher trait 定義
//!
//! 接続中のコネクション集合（Connection Set）とメッセージ配信の
//! インターフェース。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

#[cfg(test)]
use mockall::automock;

use super::error::MessagePushError;
use super::value_object::{ConnectionId, Timestamp};

/// コネクションへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Message Pusher trait
///
/// ライブなコネクション集合を管理し、シリアライズ済みメッセージを
/// 配信する。ブロードキャストは全コネクション（送信元を含む）が対象。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクションを登録
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
        connected_at: Timestamp,
    );

    /// コネクションを登録解除（冪等）。登録時刻を返す
    async fn unregister_connection(&self, connection_id: &ConnectionId) -> Option<Timestamp>;

    /// 特定のコネクションにメッセージを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 全コネクションに同一のメッセージを配信
    ///
    /// 配信中に閉じたコネクションは警告ログのみでスキップし、
    /// 他のコネクションへの配信は継続する。
    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError>;

    /// 接続中のコネクション数を取得
    async fn count_connections(&self) -> usize;
}
