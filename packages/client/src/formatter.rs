//! Message formatting utilities for client display.

use irori_server::domain::{ControlEvent, DeviceListEvent, MessageKind, StatusEvent};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a DEVICE_LIST event as a device table
    pub fn format_device_list(event: &DeviceListEvent) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Devices:\n");

        if event.devices.is_empty() {
            output.push_str("(No devices)\n");
        } else {
            for entry in &event.devices {
                output.push_str(&format!("{} [{}]\n", entry.deviceid, entry.status));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a control event notification
    pub fn format_control(event: &ControlEvent) -> String {
        let device_kind = match event.kind {
            MessageKind::LightControl => "light",
            MessageKind::FanControl => "fan",
            MessageKind::AcControl => "AC",
            // 制御イベント以外でここに来ることはない
            _ => "device",
        };
        format!(
            "\n* {} '{}' switched {}\n",
            device_kind, event.deviceid, event.action
        )
    }

    /// Format a DEVICE_STATUS telemetry notification
    pub fn format_status(event: &StatusEvent) -> String {
        let mut output = format!("\n~ status from '{}'", event.deviceid);
        if let Some(status) = &event.status {
            output.push_str(&format!(": {}", render_value(status)));
        }
        if let Some(ctype) = &event.ctype {
            output.push_str(&format!(" ({})", render_value(ctype)));
        }
        output.push('\n');
        output
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (welcome text, or anything unparseable)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← {}\n", text)
    }
}

/// Render a passthrough JSON value without quoting plain strings.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irori_server::domain::{Action, DeviceEntry, SwitchState};

    #[test]
    fn test_format_device_list_with_empty_devices() {
        // テスト項目: デバイスが空の場合、適切なメッセージが表示される
        // given (前提条件):
        let event = DeviceListEvent {
            kind: MessageKind::DeviceList,
            devices: vec![],
        };

        // when (操作):
        let result = MessageFormatter::format_device_list(&event);

        // then (期待する結果):
        assert!(result.contains("Devices:"));
        assert!(result.contains("(No devices)"));
        assert!(result.contains("============================================================"));
    }

    #[test]
    fn test_format_device_list_with_devices() {
        // テスト項目: デバイス一覧が状態付きで表示される
        // given (前提条件):
        let event = DeviceListEvent {
            kind: MessageKind::DeviceList,
            devices: vec![
                DeviceEntry {
                    deviceid: "D1".to_string(),
                    status: SwitchState::On,
                },
                DeviceEntry {
                    deviceid: "D2".to_string(),
                    status: SwitchState::Off,
                },
            ],
        };

        // when (操作):
        let result = MessageFormatter::format_device_list(&event);

        // then (期待する結果):
        assert!(result.contains("D1 [on]"));
        assert!(result.contains("D2 [off]"));
    }

    #[test]
    fn test_format_control() {
        // テスト項目: 制御イベントが種別名付きで表示される
        // given (前提条件):
        let event = ControlEvent {
            kind: MessageKind::FanControl,
            deviceid: "D1".to_string(),
            action: Action::On,
        };

        // when (操作):
        let result = MessageFormatter::format_control(&event);

        // then (期待する結果):
        assert!(result.contains("fan 'D1' switched ON"));
    }

    #[test]
    fn test_format_status_with_passthrough_fields() {
        // テスト項目: ステータス通知が status / Ctype 付きで表示される
        // given (前提条件):
        let event = StatusEvent {
            kind: MessageKind::DeviceStatus,
            deviceid: "D1".to_string(),
            status: Some(serde_json::json!("ONLINE")),
            ctype: Some(serde_json::json!("FAN")),
        };

        // when (操作):
        let result = MessageFormatter::format_status(&event);

        // then (期待する結果):
        assert!(result.contains("status from 'D1': ONLINE (FAN)"));
    }

    #[test]
    fn test_format_status_without_optional_fields() {
        // テスト項目: status / Ctype が無くても表示が崩れない
        // given (前提条件):
        let event = StatusEvent {
            kind: MessageKind::DeviceStatus,
            deviceid: "D1".to_string(),
            status: None,
            ctype: None,
        };

        // when (操作):
        let result = MessageFormatter::format_status(&event);

        // then (期待する結果):
        assert!(result.contains("status from 'D1'"));
        assert!(!result.contains(":"));
    }

    #[test]
    fn test_format_status_renders_structured_value() {
        // テスト項目: 構造化された status が JSON のまま表示される
        // given (前提条件):
        let event = StatusEvent {
            kind: MessageKind::DeviceStatus,
            deviceid: "D1".to_string(),
            status: Some(serde_json::json!({"temp": 22})),
            ctype: None,
        };

        // when (操作):
        let result = MessageFormatter::format_status(&event);

        // then (期待する結果):
        assert!(result.contains(r#"{"temp":22}"#));
    }

    #[test]
    fn test_format_binary_message() {
        // テスト項目: バイナリメッセージ通知が正しくフォーマットされる
        // given (前提条件):
        let byte_count = 1024;

        // when (操作):
        let result = MessageFormatter::format_binary_message(byte_count);

        // then (期待する結果):
        assert!(result.contains("1024 bytes"));
        assert!(result.contains("Received"));
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: 生メッセージがそのまま表示される
        // given (前提条件):
        let text = "Welcome to the irori device-control hub!";

        // when (操作):
        let result = MessageFormatter::format_raw_message(text);

        // then (期待する結果):
        assert!(result.contains("Welcome to the irori device-control hub!"));
    }
}
