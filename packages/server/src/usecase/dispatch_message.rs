//! UseCase: メッセージ分類・配信処理
//!
//! 受信ペイロードの解読、音声ショートハンドの変換、種別ごとのルーティング、
//! レジストリ更新、正規イベントの全コネクションへのファンアウトを担う。
//! 接続経由のメッセージも外部インテーク経由のコマンドも同じ経路を通る。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DispatchMessageUseCase::execute() メソッド
//! - メッセージ分類（エンベロープ解読、音声ショートハンド変換、種別分岐）
//! - レジストリ更新とブロードキャストの組み合わせ
//!
//! ### なぜこのテストが必要か
//! - ルーティングはハブの中核：全ての状態変化がここを通る
//! - fail-open 方針の検証：不正メッセージが変異もブロードキャストも
//!   起こさないことを保証
//! - 音声ショートハンドと明示的な制御メッセージの等価性を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：アナウンス、制御（LIGHT/FAN/AC）、ステータス転送
//! - 異常系：不正 JSON、必須フィールド欠落、未知の種別・ショートハンド
//! - エッジケース：アナウンス前の制御、重複アナウンス

use std::sync::Arc;

use crate::domain::{
    Action, ConnectionId, ControlEvent, DeviceId, DeviceListEvent, DeviceRepository, Envelope,
    MessageKind, MessagePusher, RepositoryError, StatusEvent, SwitchState,
};

use super::BroadcastSequencer;
use super::error::DiscardReason;

/// メッセージ分類・配信のユースケース
pub struct DispatchMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn DeviceRepository>,
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 変異とブロードキャストを直列化する順序付けポイント
    sequencer: BroadcastSequencer,
}

impl DispatchMessageUseCase {
    /// 新しい DispatchMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn DeviceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: BroadcastSequencer,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// 受信ペイロードを分類して処理する
    ///
    /// # Arguments
    ///
    /// * `raw` - 受信したペイロード（テキスト）
    /// * `origin` - 送信元コネクション（外部インテーク経由の場合は None）
    ///
    /// # Returns
    ///
    /// * `Ok(MessageKind)` - 処理・ブロードキャストしたイベント種別
    /// * `Err(DiscardReason)` - 破棄理由。呼び出し側はログを残すだけで
    ///   送信元には何も返さない（fail-open）
    pub async fn execute(
        &self,
        raw: &str,
        origin: Option<&ConnectionId>,
    ) -> Result<MessageKind, DiscardReason> {
        let envelope: Envelope = serde_json::from_str(raw)
            .map_err(|e| DiscardReason::MalformedPayload(e.to_string()))?;

        // 音声ショートハンドは通常のディスパッチより先に変換する
        if envelope.voicetype.is_some() {
            return self.dispatch_voice(&envelope).await;
        }

        let kind_raw = envelope
            .kind
            .as_deref()
            .ok_or(DiscardReason::MissingMessageKind)?;
        let kind = MessageKind::parse(kind_raw)
            .ok_or_else(|| DiscardReason::UnknownMessageKind(kind_raw.to_string()))?;

        match kind {
            MessageKind::DeviceList => self.handle_announce(&envelope, origin).await,
            MessageKind::LightControl | MessageKind::FanControl | MessageKind::AcControl => {
                let device_id = require_device_id(&envelope)?;
                let action = require_action(&envelope)?;
                self.handle_control(kind, device_id, action).await
            }
            MessageKind::DeviceStatus => self.handle_status(&envelope).await,
        }
    }

    /// 音声ショートハンドを通常の制御メッセージへ変換してディスパッチする
    ///
    /// ショートハンドと deviceid の両方が必要。`ac` のみエンベロープ自身の
    /// action フィールドを使う。
    async fn dispatch_voice(&self, envelope: &Envelope) -> Result<MessageKind, DiscardReason> {
        let device_id = require_device_id(envelope)?;
        let voicetype = envelope
            .voicetype
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        match voicetype.as_str() {
            "lighton" => {
                self.handle_control(MessageKind::LightControl, device_id, Action::On)
                    .await
            }
            "lightoff" => {
                self.handle_control(MessageKind::LightControl, device_id, Action::Off)
                    .await
            }
            "fanon" => {
                self.handle_control(MessageKind::FanControl, device_id, Action::On)
                    .await
            }
            "fanoff" => {
                self.handle_control(MessageKind::FanControl, device_id, Action::Off)
                    .await
            }
            "ac" => {
                let action = require_action(envelope)?;
                self.handle_control(MessageKind::AcControl, device_id, action)
                    .await
            }
            other => Err(DiscardReason::UnknownVoiceCommand(other.to_string())),
        }
    }

    /// DEVICE_LIST: デバイスアナウンスを登録し、スナップショット全体を配信する
    ///
    /// 既知の ID の再アナウンスでも配信は行う（全クライアントの同期を保つ）。
    async fn handle_announce(
        &self,
        envelope: &Envelope,
        origin: Option<&ConnectionId>,
    ) -> Result<MessageKind, DiscardReason> {
        let device_id = require_device_id(envelope)?;

        let _order = self.sequencer.lock().await;

        let added = self
            .repository
            .upsert_device(device_id.clone(), origin.cloned())
            .await
            .map_err(into_discard)?;
        if added {
            tracing::info!("Device '{}' added to the registry", device_id);
        } else {
            tracing::debug!("Device '{}' is already registered", device_id);
        }

        self.broadcast_snapshot().await;
        Ok(MessageKind::DeviceList)
    }

    /// 制御メッセージ: 状態を更新し、delta のみを全コネクションへ配信する
    async fn handle_control(
        &self,
        kind: MessageKind,
        device_id: DeviceId,
        action: Action,
    ) -> Result<MessageKind, DiscardReason> {
        let _order = self.sequencer.lock().await;

        let state = SwitchState::from(action);
        let previous = self
            .repository
            .set_state(device_id.clone(), state)
            .await
            .map_err(into_discard)?;
        match previous {
            Some(prev) if prev == state => {
                tracing::debug!("Device '{}' already {}", device_id, state);
            }
            Some(_) => tracing::info!("Device '{}' switched {}", device_id, state),
            None => {
                // 制御メッセージがアナウンスに先行したケース
                tracing::info!("Device '{}' created by control message, now {}", device_id, state);
            }
        }

        let event = ControlEvent {
            kind,
            deviceid: device_id.into_string(),
            action,
        };
        let json = serde_json::to_string(&event).unwrap();
        if let Err(e) = self.message_pusher.broadcast_all(&json).await {
            tracing::warn!("Failed to broadcast {} event: {}", kind, e);
        }
        Ok(kind)
    }

    /// DEVICE_STATUS: テレメトリをそのまま転送する。レジストリは変更しない
    async fn handle_status(&self, envelope: &Envelope) -> Result<MessageKind, DiscardReason> {
        let device_id = require_device_id(envelope)?;

        let event = StatusEvent {
            kind: MessageKind::DeviceStatus,
            deviceid: device_id.into_string(),
            status: envelope.status.clone(),
            ctype: envelope.ctype.clone(),
        };
        let json = serde_json::to_string(&event).unwrap();

        // 変異は無いが、全コネクションが同じ配信順序を観測できるよう
        // シーケンサは保持する
        let _order = self.sequencer.lock().await;
        if let Err(e) = self.message_pusher.broadcast_all(&json).await {
            tracing::warn!("Failed to broadcast DEVICE_STATUS event: {}", e);
        }
        Ok(MessageKind::DeviceStatus)
    }

    /// 現在のスナップショットを DEVICE_LIST イベントとして全コネクションへ配信
    ///
    /// 呼び出し側がシーケンサを保持していること。
    async fn broadcast_snapshot(&self) {
        let snapshot = self.repository.snapshot().await;
        let event = DeviceListEvent::from_snapshot(&snapshot);
        let json = serde_json::to_string(&event).unwrap();
        if let Err(e) = self.message_pusher.broadcast_all(&json).await {
            tracing::warn!("Failed to broadcast DEVICE_LIST event: {}", e);
        }
    }
}

fn require_device_id(envelope: &Envelope) -> Result<DeviceId, DiscardReason> {
    envelope
        .deviceid
        .as_ref()
        .ok_or(DiscardReason::MissingDeviceId)
        .and_then(|raw| {
            DeviceId::new(raw.clone()).map_err(|_| DiscardReason::MissingDeviceId)
        })
}

fn require_action(envelope: &Envelope) -> Result<Action, DiscardReason> {
    let raw = envelope
        .action
        .as_deref()
        .ok_or(DiscardReason::MissingAction)?;
    Action::parse(raw).ok_or_else(|| DiscardReason::InvalidAction(raw.to_string()))
}

fn into_discard(error: RepositoryError) -> DiscardReason {
    match error {
        RepositoryError::CapacityExceeded(capacity) => DiscardReason::RegistryFull(capacity),
    }
}
