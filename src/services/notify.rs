use crate::models::ConfidenceBand;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when dispatching a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Notification function returned error: {0}")]
    ApiError(String),
}

/// A match alert handed to the notification function
///
/// Push/email fan-out to the owner happens inside the function; this
/// service only names the records involved and how confident the match is.
#[derive(Debug, Clone, Serialize)]
pub struct MatchAlert {
    /// Unique id for this alert event, used for idempotency downstream
    #[serde(rename = "eventId")]
    pub event_id: Uuid,
    #[serde(rename = "ownerRef")]
    pub owner_ref: String,
    #[serde(rename = "recordId")]
    pub record_id: String,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "confidenceScore")]
    pub confidence_score: u8,
    #[serde(rename = "confidenceBand")]
    pub confidence_band: ConfidenceBand,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
}

/// Client for the Pawppy notification cloud function
pub struct NotifierClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl NotifierClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            client,
        }
    }

    /// Send a match alert
    ///
    /// Callers treat this as best-effort: ranking results are returned to
    /// the user whether or not the alert goes out.
    pub async fn send_match_alert(&self, alert: &MatchAlert) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Pawppy-Key", &self.api_key)
            .json(alert)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::ApiError(format!(
                "Failed to send match alert: {}",
                response.status()
            )));
        }

        tracing::debug!(
            "Dispatched match alert: {} -> {} (score {})",
            alert.record_id,
            alert.candidate_id,
            alert.confidence_score
        );

        Ok(())
    }
}
