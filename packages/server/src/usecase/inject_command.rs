//! UseCase: 外部コマンドインテーク
//!
//! トランスポート外（HTTP 層など）から届いたコマンドを、接続経由の
//! メッセージと同一のエンベロープ形式に包んでディスパッチャへ渡す。
//! バリデーションもブロードキャストも完全に同じ経路を通るため、
//! 由来によって挙動が変わることはない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - InjectCommandUseCase::execute() メソッド
//! - 外部コマンドと接続経由メッセージの等価性
//!
//! ### なぜこのテストが必要か
//! - HTTP 層がルーティングロジックを複製しないことがこの seam の目的
//! - 音声ショートハンドの変換・破棄が接続経由と一致することを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：fanoff などのショートハンド注入
//! - 異常系：未知のショートハンド

use std::sync::Arc;

use crate::domain::MessageKind;

use super::dispatch_message::DispatchMessageUseCase;
use super::error::DiscardReason;

/// 外部コマンドインテークのユースケース
pub struct InjectCommandUseCase {
    /// 共有ディスパッチャ（接続経由のメッセージと同じインスタンス）
    dispatcher: Arc<DispatchMessageUseCase>,
}

impl InjectCommandUseCase {
    /// 新しい InjectCommandUseCase を作成
    pub fn new(dispatcher: Arc<DispatchMessageUseCase>) -> Self {
        Self { dispatcher }
    }

    /// 外部コマンドを注入する
    ///
    /// # Arguments
    ///
    /// * `voicetype` - 音声ショートハンド（例: "fanoff"）
    /// * `deviceid` - 対象デバイスの ID
    ///
    /// # Returns
    ///
    /// ディスパッチャの結果をそのまま返す。呼び出し側（HTTP 層）は
    /// エンベロープ形式の受理のみ応答し、配信結果は応答しない。
    pub async fn execute(
        &self,
        voicetype: String,
        deviceid: String,
    ) -> Result<MessageKind, DiscardReason> {
        let envelope = serde_json::json!({
            "voicetype": voicetype,
            "deviceid": deviceid,
        })
        .to_string();

        // 由来の無いメッセージとしてディスパッチ（origin = None）
        self.dispatcher.execute(&envelope, None).await
    }
}
