//! UseCase: コネクション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - コネクション登録、welcome 送信、初期スナップショット送信
//!
//! ### なぜこのテストが必要か
//! - 新規接続が既存デバイスの一覧を必ず受け取ることを保証
//! - welcome → スナップショットの順序を保証
//! - 初期同期が接続本人だけに送られる（ブロードキャストしない）ことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空レジストリ／登録済みデバイスありでの接続
//! - エッジケース：他のコネクションには何も届かない

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{
    ConnectionId, DeviceListEvent, DeviceRepository, MessagePusher, PusherChannel, Timestamp,
};

use super::BroadcastSequencer;
use super::error::ConnectError;

/// 接続直後に送られる挨拶テキスト
pub const WELCOME_MESSAGE: &str = "Welcome to the irori device-control hub!";

/// コネクション接続のユースケース
pub struct ConnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn DeviceRepository>,
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 変異とブロードキャストを直列化する順序付けポイント
    sequencer: BroadcastSequencer,
    /// 接続時刻の取得（テストでは FixedClock を注入）
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
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

    /// コネクション接続を実行
    ///
    /// コネクションを登録し、welcome テキストと現在のデバイス一覧
    /// （DEVICE_LIST イベント）をそのコネクションだけに送信する。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 受け入れたコネクションの ID
    /// * `sender` - コネクションへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続成功（接続時刻を返す）
    /// * `Err(ConnectError)` - 初期同期の送信失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_utc_millis());
        self.message_pusher
            .register_connection(connection_id.clone(), sender, connected_at)
            .await;

        // 初期同期もシーケンサの内側で行う。こうすることで、新規接続が
        // 「直後のブロードキャストより古いスナップショット」を受け取る
        // ことはなくなる
        let _order = self.sequencer.lock().await;

        self.message_pusher
            .push_to(&connection_id, WELCOME_MESSAGE)
            .await
            .map_err(|e| ConnectError::InitialSyncFailed(e.to_string()))?;

        let snapshot = self.repository.snapshot().await;
        let event = DeviceListEvent::from_snapshot(&snapshot);
        let json = serde_json::to_string(&event).unwrap();
        self.message_pusher
            .push_to(&connection_id, &json)
            .await
            .map_err(|e| ConnectError::InitialSyncFailed(e.to_string()))?;

        Ok(connected_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DeviceId, DeviceRegistry, SwitchState},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryDeviceRepository,
        },
    };
    use irori_shared::time::FixedClock;
    use std::collections::HashMap;
    use tokio::sync::{Mutex, mpsc};

    fn create_test_usecase() -> (
        ConnectClientUseCase,
        Arc<InMemoryDeviceRepository>,
        Arc<WebSocketMessagePusher>,
    ) {
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let repository = Arc::new(InMemoryDeviceRepository::new(registry));
        let pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let usecase = ConnectClientUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(Mutex::new(())),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        );
        (usecase, repository, pusher)
    }

    #[tokio::test]
    async fn test_connect_sends_welcome_then_empty_snapshot() {
        // テスト項目: 接続直後に welcome と空の DEVICE_LIST がこの順で届く
        // given (前提条件):
        let (usecase, _repository, _pusher) = create_test_usecase();
        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(connection_id, tx).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Timestamp::new(1_700_000_000_000)));
        assert_eq!(rx.recv().await.unwrap(), WELCOME_MESSAGE);
        assert_eq!(
            rx.recv().await.unwrap(),
            r#"{"type":"DEVICE_LIST","devices":[]}"#
        );
    }

    #[tokio::test]
    async fn test_connect_snapshot_contains_known_devices() {
        // テスト項目: 登録済みデバイスが初期スナップショットに含まれる
        // given (前提条件):
        let (usecase, repository, _pusher) = create_test_usecase();
        let d1 = DeviceId::new("D1".to_string()).unwrap();
        repository.upsert_device(d1.clone(), None).await.unwrap();
        repository.set_state(d1, SwitchState::On).await.unwrap();

        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(connection_id, tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(rx.recv().await.unwrap(), WELCOME_MESSAGE);
        assert_eq!(
            rx.recv().await.unwrap(),
            r#"{"type":"DEVICE_LIST","devices":[{"deviceid":"D1","status":"on"}]}"#
        );
    }

    #[tokio::test]
    async fn test_connect_initial_sync_is_not_broadcast() {
        // テスト項目: 初期同期が既存のコネクションには送られない
        // given (前提条件):
        let (usecase, _repository, _pusher) = create_test_usecase();
        let first = ConnectionId::generate();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        usecase.execute(first, tx1).await.unwrap();
        rx1.recv().await.unwrap();
        rx1.recv().await.unwrap();

        // when (操作): 2つ目のコネクションが接続する
        let second = ConnectionId::generate();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        usecase.execute(second, tx2).await.unwrap();

        // then (期待する結果): 既存コネクションには何も届かない
        assert!(rx1.try_recv().is_err());
        assert_eq!(rx2.recv().await.unwrap(), WELCOME_MESSAGE);
    }

    #[tokio::test]
    async fn test_connect_registers_connection() {
        // テスト項目: 接続がコネクション集合に登録される
        // given (前提条件):
        let (usecase, _repository, pusher) = create_test_usecase();
        let connection_id = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(connection_id, tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(pusher.count_connections().await, 1);
    }
}
