//! Prompt command parsing.
//!
//! This module contains pure functions that translate prompt lines into
//! protocol messages without side effects, making them easy to test.

use crate::error::ClientError;

/// Usage text shown by the `help` command and on invalid input.
pub const USAGE: &str = "\
Commands:
  announce <deviceid>                 register a device on the hub
  light <deviceid> on|off             switch a light
  fan <deviceid> on|off               switch a fan
  ac <deviceid> on|off                switch an air conditioner
  status <deviceid> [status] [ctype]  report device telemetry
  voice <shorthand> <deviceid> [on|off]
                                      send a voice shorthand (lighton,
                                      lightoff, fanon, fanoff, ac)
  raw <json>                          send a raw payload verbatim
  help                                show this help";

/// Translate one prompt line into the protocol JSON to send.
///
/// # Arguments
///
/// * `line` - The trimmed, non-empty prompt line
///
/// # Returns
///
/// The serialized protocol message, or `ClientError::InvalidCommand` with
/// a human-readable explanation.
pub fn parse_command(line: &str) -> Result<String, ClientError> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next().unwrap_or_default().to_lowercase();
    let rest: Vec<&str> = tokens.collect();

    match command.as_str() {
        "announce" => {
            let [deviceid] = rest.as_slice() else {
                return Err(invalid("usage: announce <deviceid>"));
            };
            Ok(serde_json::json!({
                "type": "DEVICE_LIST",
                "deviceid": deviceid,
            })
            .to_string())
        }
        "light" | "fan" | "ac" => {
            let [deviceid, action] = rest.as_slice() else {
                return Err(invalid(&format!("usage: {} <deviceid> on|off", command)));
            };
            let action = parse_action(action)?;
            let kind = match command.as_str() {
                "light" => "LIGHT_CONTROL",
                "fan" => "FAN_CONTROL",
                _ => "AC_CONTROL",
            };
            Ok(serde_json::json!({
                "type": kind,
                "deviceid": deviceid,
                "action": action,
            })
            .to_string())
        }
        "status" => match rest.as_slice() {
            [deviceid] => Ok(serde_json::json!({
                "type": "DEVICE_STATUS",
                "deviceid": deviceid,
            })
            .to_string()),
            [deviceid, status] => Ok(serde_json::json!({
                "type": "DEVICE_STATUS",
                "deviceid": deviceid,
                "status": status,
            })
            .to_string()),
            [deviceid, status, ctype] => Ok(serde_json::json!({
                "type": "DEVICE_STATUS",
                "deviceid": deviceid,
                "status": status,
                "Ctype": ctype,
            })
            .to_string()),
            _ => Err(invalid("usage: status <deviceid> [status] [ctype]")),
        },
        "voice" => match rest.as_slice() {
            [shorthand, deviceid] => Ok(serde_json::json!({
                "voicetype": shorthand,
                "deviceid": deviceid,
            })
            .to_string()),
            [shorthand, deviceid, action] => {
                let action = parse_action(action)?;
                Ok(serde_json::json!({
                    "voicetype": shorthand,
                    "deviceid": deviceid,
                    "action": action,
                })
                .to_string())
            }
            _ => Err(invalid("usage: voice <shorthand> <deviceid> [on|off]")),
        },
        "raw" => {
            let payload = line
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest.trim())
                .unwrap_or_default();
            if payload.is_empty() {
                return Err(invalid("usage: raw <json>"));
            }
            Ok(payload.to_string())
        }
        other => Err(invalid(&format!(
            "unknown command '{}'. Type 'help' for the command list",
            other
        ))),
    }
}

/// Map `on`/`off` (case-insensitive) to the wire vocabulary `ON`/`OFF`.
fn parse_action(raw: &str) -> Result<&'static str, ClientError> {
    match raw.to_lowercase().as_str() {
        "on" => Ok("ON"),
        "off" => Ok("OFF"),
        _ => Err(invalid(&format!("invalid action '{}', expected on|off", raw))),
    }
}

fn invalid(message: &str) -> ClientError {
    ClientError::InvalidCommand(message.to_string())
}
