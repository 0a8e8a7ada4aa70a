//! InMemory Device Repository 実装
//!
//! ドメイン層が定義する DeviceRepository trait の具体的な実装。
//! DeviceRegistry 集約をそのままインメモリのストレージとして使用します。
//!
//! ## 技術的負債
//!
//! ドメインモデル（`DeviceRegistry`）を直接ストレージとして使用しています。
//! インメモリ実装では許容される妥協ですが、将来デバイス履歴を永続化する
//! 際は DB Row → DTO → ドメインモデルの変換層が必要になります。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Device, DeviceId, DeviceRegistry, DeviceRepository, DomainError,
    RepositoryError, SwitchState,
};

/// インメモリ Device Repository 実装
///
/// DeviceRegistry 集約を保持し、ドメイン層の DeviceRepository trait を
/// 実装します（依存性の逆転）。
pub struct InMemoryDeviceRepository {
    /// DeviceRegistry ドメインモデル
    registry: Arc<Mutex<DeviceRegistry>>,
}

impl InMemoryDeviceRepository {
    /// 新しい InMemoryDeviceRepository を作成
    pub fn new(registry: Arc<Mutex<DeviceRegistry>>) -> Self {
        Self { registry }
    }
}

fn map_domain_error(error: DomainError) -> RepositoryError {
    match error {
        DomainError::RegistryFull(capacity) => RepositoryError::CapacityExceeded(capacity),
        // DeviceId は呼び出し前に検証済みなので、ここに来るのは容量超過のみ
        DomainError::EmptyDeviceId => unreachable!("DeviceId is validated before repository calls"),
    }
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn upsert_device(
        &self,
        id: DeviceId,
        announced_by: Option<ConnectionId>,
    ) -> Result<bool, RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.upsert(id, announced_by).map_err(map_domain_error)
    }

    async fn set_state(
        &self,
        id: DeviceId,
        state: SwitchState,
    ) -> Result<Option<SwitchState>, RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.set_state(&id, state).map_err(map_domain_error)
    }

    async fn remove_by_connection(&self, connection_id: &ConnectionId) -> Vec<DeviceId> {
        let mut registry = self.registry.lock().await;
        registry.remove_by_connection(connection_id)
    }

    async fn snapshot(&self) -> Vec<Device> {
        let registry = self.registry.lock().await;
        registry.snapshot()
    }

    async fn count_devices(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.len()
    }
}
