//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{CommandRequest, DeviceListResponse, DeviceSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the current device registry snapshot
pub async fn get_devices(State(state): State<Arc<AppState>>) -> Json<DeviceListResponse> {
    let devices = state.get_device_list_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries: Vec<DeviceSummaryDto> = devices.iter().map(DeviceSummaryDto::from).collect();

    Json(DeviceListResponse { devices: summaries })
}

/// External command intake (`POST /api/command`)
///
/// Answers only for the envelope shape: 400 when a required field is
/// missing, 200 once the command is handed to the dispatcher. The dispatch
/// outcome itself stays fail-open and is never reported to the caller.
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CommandRequest>,
) -> (StatusCode, &'static str) {
    let (Some(voicetype), Some(deviceid)) = (body.voicetype, body.deviceid) else {
        tracing::warn!("Command request missing voicetype or deviceid");
        return (
            StatusCode::BAD_REQUEST,
            "Invalid message format. Required fields: voicetype, deviceid.",
        );
    };

    match state
        .inject_command_usecase
        .execute(voicetype, deviceid)
        .await
    {
        Ok(kind) => tracing::info!("Injected command dispatched as {}", kind),
        Err(reason) => tracing::warn!("Injected command discarded: {}", reason),
    }

    (StatusCode::OK, "Message received and forwarded to the hub.")
}
