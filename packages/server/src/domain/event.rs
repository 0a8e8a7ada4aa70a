//! Wire protocol: the inbound message envelope and the canonical events
//! broadcast after an accepted state change.
//!
//! Field names (`deviceid`, `Ctype`, `voicetype`) follow the protocol the
//! existing device firmware and panels already speak; they are not
//! renamed to Rust conventions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::Device;
use super::value_object::{Action, SwitchState};

/// Message kind discriminator, as it appears in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    DeviceList,
    LightControl,
    FanControl,
    AcControl,
    DeviceStatus,
}

impl MessageKind {
    /// Parse the wire form of the discriminator. Matching is exact; an
    /// unrecognized kind is the caller's cue to discard the message.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DEVICE_LIST" => Some(Self::DeviceList),
            "LIGHT_CONTROL" => Some(Self::LightControl),
            "FAN_CONTROL" => Some(Self::FanControl),
            "AC_CONTROL" => Some(Self::AcControl),
            "DEVICE_STATUS" => Some(Self::DeviceStatus),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DeviceList => "DEVICE_LIST",
            Self::LightControl => "LIGHT_CONTROL",
            Self::FanControl => "FAN_CONTROL",
            Self::AcControl => "AC_CONTROL",
            Self::DeviceStatus => "DEVICE_STATUS",
        };
        write!(f, "{}", name)
    }
}

/// Loosely-typed inbound envelope.
///
/// Every field is optional: presence is part of routing, and a missing
/// required field downgrades to a discard, never a decode error. Field
/// validation (non-empty id, exact `ON`/`OFF` action, known kind) happens
/// in the dispatcher so each failure can be logged with its reason.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub deviceid: Option<String>,
    pub action: Option<String>,
    pub status: Option<Value>,
    #[serde(rename = "Ctype")]
    pub ctype: Option<Value>,
    pub voicetype: Option<String>,
}

/// One `{deviceid, status}` entry of a DEVICE_LIST event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub deviceid: String,
    pub status: SwitchState,
}

impl From<&Device> for DeviceEntry {
    fn from(device: &Device) -> Self {
        Self {
            deviceid: device.id.as_str().to_string(),
            status: device.state,
        }
    }
}

/// Canonical DEVICE_LIST event carrying the full registry snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceListEvent {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub devices: Vec<DeviceEntry>,
}

impl DeviceListEvent {
    pub fn from_snapshot(snapshot: &[Device]) -> Self {
        Self {
            kind: MessageKind::DeviceList,
            devices: snapshot.iter().map(DeviceEntry::from).collect(),
        }
    }
}

/// Canonical control event (LIGHT_CONTROL / FAN_CONTROL / AC_CONTROL),
/// carrying the delta only, never the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlEvent {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub deviceid: String,
    pub action: Action,
}

/// Canonical DEVICE_STATUS event: device-originated telemetry passed
/// through verbatim, no registry interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub deviceid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(rename = "Ctype", skip_serializing_if = "Option::is_none")]
    pub ctype: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{ConnectionId, DeviceId};

    #[test]
    fn test_message_kind_parse_known_kinds() {
        // テスト項目: 既知の type 文字列がパースできる
        // given (前提条件):

        // when (操作):

        // then (期待する結果):
        assert_eq!(MessageKind::parse("DEVICE_LIST"), Some(MessageKind::DeviceList));
        assert_eq!(MessageKind::parse("LIGHT_CONTROL"), Some(MessageKind::LightControl));
        assert_eq!(MessageKind::parse("FAN_CONTROL"), Some(MessageKind::FanControl));
        assert_eq!(MessageKind::parse("AC_CONTROL"), Some(MessageKind::AcControl));
        assert_eq!(MessageKind::parse("DEVICE_STATUS"), Some(MessageKind::DeviceStatus));
    }

    #[test]
    fn test_message_kind_parse_is_exact() {
        // テスト項目: 未知・小文字の type がパースされない
        // given (前提条件):

        // when (操作):

        // then (期待する結果):
        assert_eq!(MessageKind::parse("device_list"), None);
        assert_eq!(MessageKind::parse("RESTART"), None);
        assert_eq!(MessageKind::parse(""), None);
    }

    #[test]
    fn test_envelope_decodes_partial_message() {
        // テスト項目: フィールドが欠けたメッセージもエンベロープとして読める
        // given (前提条件):
        let raw = r#"{"type":"LIGHT_CONTROL","deviceid":"D1"}"#;

        // when (操作):
        let envelope: Envelope = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(envelope.kind.as_deref(), Some("LIGHT_CONTROL"));
        assert_eq!(envelope.deviceid.as_deref(), Some("D1"));
        assert_eq!(envelope.action, None);
        assert_eq!(envelope.voicetype, None);
    }

    #[test]
    fn test_envelope_keeps_status_passthrough_as_json() {
        // テスト項目: status / Ctype が任意の JSON のまま保持される
        // given (前提条件):
        let raw = r#"{"type":"DEVICE_STATUS","deviceid":"D1","status":{"temp":22},"Ctype":"AC"}"#;

        // when (操作):
        let envelope: Envelope = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(envelope.status, Some(serde_json::json!({"temp": 22})));
        assert_eq!(envelope.ctype, Some(serde_json::json!("AC")));
    }

    #[test]
    fn test_device_list_event_serialization() {
        // テスト項目: DEVICE_LIST イベントが規定の形でシリアライズされる
        // given (前提条件):
        let devices = vec![
            Device {
                id: DeviceId::new("D1".to_string()).unwrap(),
                state: SwitchState::Off,
                announced_by: Some(ConnectionId::generate()),
            },
            Device {
                id: DeviceId::new("D2".to_string()).unwrap(),
                state: SwitchState::On,
                announced_by: None,
            },
        ];

        // when (操作):
        let event = DeviceListEvent::from_snapshot(&devices);
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果): 接続の紐付けはワイヤに出ない
        assert_eq!(
            json,
            r#"{"type":"DEVICE_LIST","devices":[{"deviceid":"D1","status":"off"},{"deviceid":"D2","status":"on"}]}"#
        );
    }

    #[test]
    fn test_control_event_serialization() {
        // テスト項目: 制御イベントが delta のみを運ぶ
        // given (前提条件):
        let event = ControlEvent {
            kind: MessageKind::FanControl,
            deviceid: "D1".to_string(),
            action: Action::On,
        };

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"FAN_CONTROL","deviceid":"D1","action":"ON"}"#);
    }

    #[test]
    fn test_status_event_omits_absent_fields() {
        // テスト項目: status/Ctype が無い場合フィールド自体が省略される
        // given (前提条件):
        let event = StatusEvent {
            kind: MessageKind::DeviceStatus,
            deviceid: "D1".to_string(),
            status: None,
            ctype: None,
        };

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"DEVICE_STATUS","deviceid":"D1"}"#);
    }

    #[test]
    fn test_status_event_passthrough_serialization() {
        // テスト項目: status/Ctype がそのまま転送される
        // given (前提条件):
        let event = StatusEvent {
            kind: MessageKind::DeviceStatus,
            deviceid: "D1".to_string(),
            status: Some(serde_json::json!("ONLINE")),
            ctype: Some(serde_json::json!("FAN")),
        };

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            r#"{"type":"DEVICE_STATUS","deviceid":"D1","status":"ONLINE","Ctype":"FAN"}"#
        );
    }
}
