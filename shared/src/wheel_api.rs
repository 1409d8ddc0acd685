use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::session::{AckMethod, DeviceType, InputMethod};

// === API Types ===
//
// Wire shapes shared between the browser client and the backend store. All
// ids are generated client-side so requests can be replayed by the sync
// queue without minting duplicates.

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertSessionRequest {
    pub session_id: Uuid,
    pub team_name: Option<String>,
    pub input_method: Option<InputMethod>,
    pub device_type: Option<DeviceType>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveConfigurationRequest {
    pub configuration_id: Uuid,
    pub session_id: Uuid,
    pub names: Vec<String>,
    pub segment_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordSpinRequest {
    pub spin_id: Uuid,
    pub session_id: Uuid,
    pub configuration_id: Option<Uuid>,
    pub winner_label: String,
    pub is_respin: bool,
    pub power: f64,
    pub timestamp_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcknowledgeSpinRequest {
    pub method: AckMethod,
    pub timestamp_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareConfigurationRequest {
    pub team_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareConfigurationResponse {
    pub share_slug: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SharedConfigurationResponse {
    pub configuration_id: Uuid,
    pub names: Vec<String>,
    pub segment_count: usize,
    pub team_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: Option<String>,
}
