//! Conversion logic between DTOs and domain entities.

use crate::domain::entity::Device;
use crate::infrastructure::dto::http::DeviceSummaryDto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Device> for DeviceSummaryDto {
    fn from(device: &Device) -> Self {
        Self {
            deviceid: device.id.as_str().to_string(),
            status: device.state.to_string(),
        }
    }
}
