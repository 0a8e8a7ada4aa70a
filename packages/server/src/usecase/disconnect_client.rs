//! UseCase: コネクション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - コネクション登録解除、紐付きデバイスの削除、スナップショット配信
//!
//! ### なぜこのテストが必要か
//! - 切断した接続がアナウンスしたデバイスだけが削除されることを保証
//! - 残りのコネクションが更新後のスナップショットを受け取ることを保証
//! - 登録解除の冪等性（未登録の切断が no-op であること）を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：紐付きデバイスありの切断
//! - エッジケース：紐付けなしの切断、未登録コネクションの切断

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{
    ConnectionId, DeviceId, DeviceListEvent, DeviceRepository, MessagePusher,
};

use super::BroadcastSequencer;

/// コネクション切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn DeviceRepository>,
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 変異とブロードキャストを直列化する順序付けポイント
    sequencer: BroadcastSequencer,
    /// 接続時間（uptime）の算出用
    clock: Arc<dyn Clock>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn DeviceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: BroadcastSequencer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
            clock,
        }
    }

    /// コネクション切断を実行
    ///
    /// コネクション集合から登録解除し、その接続がアナウンスしたデバイスを
    /// レジストリから削除した上で、更新後のスナップショットを残りの全
    /// コネクションへ配信する。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断するコネクションの ID
    ///
    /// # Returns
    ///
    /// 削除したデバイス ID のリスト
    pub async fn execute(&self, connection_id: ConnectionId) -> Vec<DeviceId> {
        // 先に登録解除する。閉じかけのコネクション自身には配信しない
        match self
            .message_pusher
            .unregister_connection(&connection_id)
            .await
        {
            Some(connected_at) => {
                let uptime = self.clock.now_utc_millis() - connected_at.value();
                tracing::info!(
                    "Connection '{}' closed after {} ms",
                    connection_id,
                    uptime
                );
            }
            None => {
                tracing::debug!("Connection '{}' was not registered", connection_id);
            }
        }

        let _order = self.sequencer.lock().await;

        let removed = self.repository.remove_by_connection(&connection_id).await;
        if !removed.is_empty() {
            tracing::info!(
                "Removed {} device(s) announced by connection '{}'",
                removed.len(),
                connection_id
            );
        }

        let snapshot = self.repository.snapshot().await;
        let event = DeviceListEvent::from_snapshot(&snapshot);
        let json = serde_json::to_string(&event).unwrap();
        if let Err(e) = self.message_pusher.broadcast_all(&json).await {
            tracing::warn!("Failed to broadcast DEVICE_LIST after close: {}", e);
        }

        removed
    }
}
