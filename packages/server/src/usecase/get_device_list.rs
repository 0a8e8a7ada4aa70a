//! UseCase: デバイス一覧取得処理
//!
//! HTTP API 向けの読み取り専用スナップショット取得。ブロードキャストを
//! 伴わない単独の読み取りなので、シーケンサの外で実行される。

use std::sync::Arc;

use crate::domain::{Device, DeviceRepository};

/// デバイス一覧取得のユースケース
pub struct GetDeviceListUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn DeviceRepository>,
}

impl GetDeviceListUseCase {
    /// 新しい GetDeviceListUseCase を作成
    pub fn new(repository: Arc<dyn DeviceRepository>) -> Self {
        Self { repository }
    }

    /// 現在のレジストリのスナップショットを取得
    pub async fn execute(&self) -> Vec<Device> {
        self.repository.snapshot().await
    }
}
