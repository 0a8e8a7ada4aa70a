//! Domain entities: devices and the registry aggregate that owns them.

use super::error::DomainError;
use super::value_object::{ConnectionId, DeviceId, SwitchState};

/// Default upper bound on registry size. The source system grew its device
/// list without limit; the hub bounds it so a misbehaving client cannot
/// exhaust memory with fresh ids.
pub const DEFAULT_DEVICE_CAPACITY: usize = 1024;

/// One controllable unit tracked by the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Unique device identifier.
    pub id: DeviceId,
    /// Last-known on/off state.
    pub state: SwitchState,
    /// Connection that announced this device, when one did. Devices created
    /// implicitly by a control message (or announced via the external
    /// intake) have no binding and persist across connection churn.
    pub announced_by: Option<ConnectionId>,
}

/// The authoritative device registry.
///
/// Insertion-ordered: snapshots list devices in announcement order, the
/// same order every connected party sees. Holds the invariant that no two
/// entries share an id.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    capacity: usize,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DEVICE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            devices: Vec::new(),
            capacity,
        }
    }

    /// Insert the device with default state off if its id is unknown.
    ///
    /// Returns `true` when a new entry was created, `false` when the id was
    /// already present (in which case the existing entry, including its
    /// connection binding, is left untouched).
    pub fn upsert(
        &mut self,
        id: DeviceId,
        announced_by: Option<ConnectionId>,
    ) -> Result<bool, DomainError> {
        if self.devices.iter().any(|dev| dev.id == id) {
            return Ok(false);
        }
        if self.devices.len() >= self.capacity {
            return Err(DomainError::RegistryFull(self.capacity));
        }
        self.devices.push(Device {
            id,
            state: SwitchState::Off,
            announced_by,
        });
        Ok(true)
    }

    /// Set the state for `id`, creating an unbound entry when absent (a
    /// control message may legitimately precede any announcement).
    ///
    /// Returns the state prior to the update, `None` when the entry was
    /// newly created.
    pub fn set_state(
        &mut self,
        id: &DeviceId,
        state: SwitchState,
    ) -> Result<Option<SwitchState>, DomainError> {
        if let Some(device) = self.devices.iter_mut().find(|dev| &dev.id == id) {
            let previous = device.state;
            device.state = state;
            return Ok(Some(previous));
        }
        if self.devices.len() >= self.capacity {
            return Err(DomainError::RegistryFull(self.capacity));
        }
        self.devices.push(Device {
            id: id.clone(),
            state,
            announced_by: None,
        });
        Ok(None)
    }

    /// Remove every device announced by the given connection, returning the
    /// removed ids. Unbound devices are never touched.
    pub fn remove_by_connection(&mut self, connection_id: &ConnectionId) -> Vec<DeviceId> {
        let mut removed = Vec::new();
        self.devices.retain(|dev| {
            if dev.announced_by.as_ref() == Some(connection_id) {
                removed.push(dev.id.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Point-in-time copy of the registry, in announcement order. Never an
    /// alias of the live structure.
    pub fn snapshot(&self) -> Vec<Device> {
        self.devices.clone()
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|dev| &dev.id == id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device_id(raw: &str) -> DeviceId {
        DeviceId::new(raw.to_string()).unwrap()
    }

    #[test]
    fn test_upsert_new_device_defaults_to_off() {
        // テスト項目: 新規デバイスが off 状態で登録される
        // given (前提条件):
        let mut registry = DeviceRegistry::new();

        // when (操作):
        let added = registry.upsert(device_id("D1"), None).unwrap();

        // then (期待する結果):
        assert!(added);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&device_id("D1")).unwrap().state, SwitchState::Off);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        // テスト項目: 同じ ID を何度アナウンスしてもエントリは1件のまま
        // given (前提条件):
        let mut registry = DeviceRegistry::new();
        registry.upsert(device_id("D1"), None).unwrap();

        // when (操作):
        let added_again = registry.upsert(device_id("D1"), None).unwrap();
        let added_third = registry.upsert(device_id("D1"), None).unwrap();

        // then (期待する結果):
        assert!(!added_again);
        assert!(!added_third);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_upsert_does_not_rebind_existing_device() {
        // テスト項目: 既存デバイスへの再アナウンスで接続の紐付けが変わらない
        // given (前提条件):
        let mut registry = DeviceRegistry::new();
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();
        registry.upsert(device_id("D1"), Some(first.clone())).unwrap();

        // when (操作):
        registry.upsert(device_id("D1"), Some(second)).unwrap();

        // then (期待する結果):
        assert_eq!(
            registry.get(&device_id("D1")).unwrap().announced_by,
            Some(first)
        );
    }

    #[test]
    fn test_set_state_updates_and_returns_previous() {
        // テスト項目: 状態更新が直前の状態を返す
        // given (前提条件):
        let mut registry = DeviceRegistry::new();
        registry.upsert(device_id("D1"), None).unwrap();

        // when (操作):
        let previous = registry.set_state(&device_id("D1"), SwitchState::On).unwrap();

        // then (期待する結果):
        assert_eq!(previous, Some(SwitchState::Off));
        assert_eq!(registry.get(&device_id("D1")).unwrap().state, SwitchState::On);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_set_state_creates_missing_entry() {
        // テスト項目: 未登録デバイスへの制御で非紐付けエントリが作られる
        // given (前提条件):
        let mut registry = DeviceRegistry::new();

        // when (操作): アナウンス前に制御メッセージが届く
        let previous = registry.set_state(&device_id("D1"), SwitchState::On).unwrap();

        // then (期待する結果):
        assert_eq!(previous, None);
        let device = registry.get(&device_id("D1")).unwrap();
        assert_eq!(device.state, SwitchState::On);
        assert_eq!(device.announced_by, None);
    }

    #[test]
    fn test_set_state_never_duplicates_entries() {
        // テスト項目: 制御メッセージを繰り返してもエントリは増えない
        // given (前提条件):
        let mut registry = DeviceRegistry::new();
        registry.upsert(device_id("D1"), None).unwrap();

        // when (操作):
        for _ in 0..10 {
            registry.set_state(&device_id("D1"), SwitchState::On).unwrap();
            registry.set_state(&device_id("D1"), SwitchState::Off).unwrap();
        }

        // then (期待する結果): ID ごとにエントリは常に1件
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_by_connection_removes_only_bound_devices() {
        // テスト項目: 切断時にその接続がアナウンスしたデバイスだけ削除される
        // given (前提条件):
        let mut registry = DeviceRegistry::new();
        let conn = ConnectionId::generate();
        registry.upsert(device_id("D1"), Some(conn.clone())).unwrap();
        registry.upsert(device_id("D2"), None).unwrap();
        registry.upsert(device_id("D3"), Some(conn.clone())).unwrap();

        // when (操作):
        let removed = registry.remove_by_connection(&conn);

        // then (期待する結果):
        assert_eq!(removed, vec![device_id("D1"), device_id("D3")]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&device_id("D2")).is_some());
    }

    #[test]
    fn test_remove_by_connection_without_bindings_is_noop() {
        // テスト項目: 紐付けのない接続の削除は何も変更しない
        // given (前提条件):
        let mut registry = DeviceRegistry::new();
        registry.upsert(device_id("D1"), None).unwrap();

        // when (操作):
        let removed = registry.remove_by_connection(&ConnectionId::generate());

        // then (期待する結果):
        assert!(removed.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        // テスト項目: snapshot がライブ構造の別名ではなくコピーを返す
        // given (前提条件):
        let mut registry = DeviceRegistry::new();
        registry.upsert(device_id("D1"), None).unwrap();

        // when (操作):
        let snapshot = registry.snapshot();
        registry.set_state(&device_id("D1"), SwitchState::On).unwrap();

        // then (期待する結果): 取得済みスナップショットは変化しない
        assert_eq!(snapshot[0].state, SwitchState::Off);
        assert_eq!(registry.get(&device_id("D1")).unwrap().state, SwitchState::On);
    }

    #[test]
    fn test_snapshot_preserves_announcement_order() {
        // テスト項目: snapshot がアナウンス順を保つ
        // given (前提条件):
        let mut registry = DeviceRegistry::new();
        registry.upsert(device_id("D2"), None).unwrap();
        registry.upsert(device_id("D1"), None).unwrap();
        registry.upsert(device_id("D3"), None).unwrap();

        // when (操作):
        let snapshot = registry.snapshot();

        // then (期待する結果):
        let ids: Vec<&str> = snapshot.iter().map(|dev| dev.id.as_str()).collect();
        assert_eq!(ids, vec!["D2", "D1", "D3"]);
    }

    #[test]
    fn test_capacity_limit_rejects_new_devices() {
        // テスト項目: 容量超過時に新規登録が拒否される
        // given (前提条件):
        let mut registry = DeviceRegistry::with_capacity(2);
        registry.upsert(device_id("D1"), None).unwrap();
        registry.upsert(device_id("D2"), None).unwrap();

        // when (操作):
        let result = registry.upsert(device_id("D3"), None);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::RegistryFull(2)));
        assert_eq!(registry.len(), 2);

        // 既存デバイスの更新は容量に関係なく成功する
        assert!(registry.set_state(&device_id("D1"), SwitchState::On).is_ok());
    }
}
