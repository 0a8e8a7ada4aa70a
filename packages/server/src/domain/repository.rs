//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::Device;
use super::error::RepositoryError;
use super::value_object::{ConnectionId, DeviceId, SwitchState};

/// Device Repository trait
///
/// ドメイン層が必要とするデバイスレジストリへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 依存性の逆転（DIP）
///
/// - ドメイン層が必要とするインターフェースをドメイン層自身が定義
/// - Infrastructure 層がドメイン層のインターフェースに依存
/// - ドメイン層は Infrastructure 層に依存しない
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// デバイスを登録（既存の場合は何もしない）。新規登録なら true を返す
    async fn upsert_device(
        &self,
        id: DeviceId,
        announced_by: Option<ConnectionId>,
    ) -> Result<bool, RepositoryError>;

    /// デバイスの状態を更新（未登録なら作成）。直前の状態を返す
    async fn set_state(
        &self,
        id: DeviceId,
        state: SwitchState,
    ) -> Result<Option<SwitchState>, RepositoryError>;

    /// 指定した接続がアナウンスしたデバイスを全て削除し、削除した ID を返す
    async fn remove_by_connection(&self, connection_id: &ConnectionId) -> Vec<DeviceId>;

    /// レジストリのスナップショット（アナウンス順のコピー）を取得
    async fn snapshot(&self) -> Vec<Device>;

    /// 登録済みデバイス数を取得
    async fn count_devices(&self) -> usize;
}
