use crate::models::domain::RankedMatch;
use serde::{Deserialize, Serialize};

/// Response for the find matches endpoint
///
/// An empty `matches` array is a valid outcome ("no matches above
/// threshold"); rejected requests are reported with `ErrorResponse` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    #[serde(rename = "queryId")]
    pub query_id: String,
    pub matches: Vec<RankedMatch>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Resolve record response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRecordResponse {
    pub success: bool,
    #[serde(rename = "recordId")]
    pub record_id: String,
}
