use crate::models::{CandidateQuery, PetRecord};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the Pawppy document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Pawppy document store client
///
/// The store is the system of record for pet reports and listings. This
/// client only reads records and flips their status; record creation and
/// every other mutation belong to the intake apps.
pub struct PetStoreClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: StoreCollections,
}

/// Collection IDs in the document store
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub pet_records: String,
}

impl PetStoreClient {
    /// Create a new store client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: StoreCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.pet_records
        )
    }

    /// Fetch a single pet record by ID
    pub async fn get_record(&self, record_id: &str) -> Result<PetRecord, StoreError> {
        let url = format!("{}/{}", self.documents_url(), record_id);

        tracing::debug!("Fetching record: {}", record_id);

        let response = self
            .client
            .get(&url)
            .header("X-Pawppy-Key", &self.api_key)
            .header("X-Pawppy-Project", &self.project_id)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("Record {} not found", record_id)));
        }

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to fetch record: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let data = json.get("data").unwrap_or(&json);

        serde_json::from_value(data.clone())
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse record: {}", e)))
    }

    /// Query candidate records matching a coarse fetch directive
    ///
    /// Fine matching happens in the ranker; this only narrows by record
    /// type, active status, report window and an optional bounding box so
    /// the candidate set stays small.
    pub async fn query_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<PetRecord>, StoreError> {
        let mut queries = vec![
            format!("equal(\"recordType\", \"{}\")", query.record_type.as_str()),
            "equal(\"status\", \"active\")".to_string(),
            format!(
                "greaterThan(\"reportedAt\", \"{}\")",
                query.reported_after.to_rfc3339()
            ),
        ];

        // Geospatial bounding box pre-filter, when the query has a location
        if let Some(bbox) = &query.bounding_box {
            queries.push(format!("greaterThan(\"location.latitude\", {})", bbox.min_lat));
            queries.push(format!("lessThan(\"location.latitude\", {})", bbox.max_lat));
            queries.push(format!("greaterThan(\"location.longitude\", {})", bbox.min_lon));
            queries.push(format!("lessThan(\"location.longitude\", {})", bbox.max_lon));
        }

        queries.push(format!("limit({})", query.limit));

        let queries_json = serde_json::to_string(&queries)
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        let encoded_queries = urlencoding::encode(&queries_json);

        let full_url = format!("{}?query={}", self.documents_url(), encoded_queries);

        let response = self
            .client
            .get(&full_url)
            .header("X-Pawppy-Key", &self.api_key)
            .header("X-Pawppy-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to query candidates: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

        let records: Vec<PetRecord> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                serde_json::from_value(data.clone()).ok()
            })
            .collect();

        tracing::debug!("Queried {} candidates (total: {})", records.len(), total);

        Ok(records)
    }

    /// Mark a record as resolved
    ///
    /// Status transitions are one-way; the store rejects attempts to
    /// reactivate a resolved record.
    pub async fn resolve_record(&self, record_id: &str) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.documents_url(), record_id);

        let payload = serde_json::json!({ "status": "resolved" });

        let response = self
            .client
            .patch(&url)
            .header("X-Pawppy-Key", &self.api_key)
            .header("X-Pawppy-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("Record {} not found", record_id)));
        }

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to resolve record: {}",
                response.status()
            )));
        }

        tracing::debug!("Resolved record: {}", record_id);

        Ok(())
    }
}
