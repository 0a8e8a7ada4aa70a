//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Request body of the external command intake (`POST /api/command`).
///
/// Both fields are required; they are optional here so the handler can
/// answer a explicit 400 instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub voicetype: Option<String>,
    pub deviceid: Option<String>,
}

/// Response body of `GET /api/devices`.
#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub devices: Vec<DeviceSummaryDto>,
}

/// One device entry of the HTTP listing.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DeviceSummaryDto {
    pub deviceid: String,
    pub status: String,
}
