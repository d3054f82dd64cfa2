use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find matches for an existing record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "record_id", rename = "recordId")]
    pub record_id: String,
    /// Minimum confidence score a match must reach to be returned
    #[serde(default)]
    #[serde(alias = "min_confidence", rename = "minConfidence")]
    pub min_confidence: u8,
    /// Only consider candidates reported within this many days
    #[serde(default = "default_window_days")]
    #[serde(alias = "window_days", rename = "windowDays")]
    pub window_days: u32,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_window_days() -> u32 {
    30
}

fn default_limit() -> u16 {
    20
}

/// Request to mark a record resolved
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResolveRecordRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "record_id", rename = "recordId")]
    pub record_id: String,
}
