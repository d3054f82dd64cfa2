use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the notification log
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Notification log
///
/// Tracks which (record, candidate) pairs have already been alerted so that
/// repeated find-matches calls do not spam owners with the same match. This
/// is the only state the service owns; everything else lives in the
/// document store.
pub struct NotificationLog {
    pool: PgPool,
}

impl NotificationLog {
    /// Create a new notification log from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new notification log from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Record that an alert went out for a match
    ///
    /// Uses INSERT ... ON CONFLICT so a re-scored pair just refreshes the
    /// confidence and timestamp instead of failing.
    pub async fn record_notified(
        &self,
        record_id: &str,
        candidate_id: &str,
        confidence: i16,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO notified_matches (record_id, candidate_id, confidence, notified_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (record_id, candidate_id)
            DO UPDATE SET
                confidence = EXCLUDED.confidence,
                notified_at = EXCLUDED.notified_at
        "#;

        sqlx::query(query)
            .bind(record_id)
            .bind(candidate_id)
            .bind(confidence)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded notified match: {} -> {} (confidence {})",
            record_id,
            candidate_id,
            confidence
        );

        Ok(())
    }

    /// Get all candidate IDs already alerted for a record
    pub async fn get_notified(&self, record_id: &str) -> Result<Vec<String>, PostgresError> {
        let query = r#"
            SELECT candidate_id
            FROM notified_matches
            WHERE record_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(record_id)
            .fetch_all(&self.pool)
            .await?;

        let candidate_ids: Vec<String> = rows.iter().map(|row| row.get("candidate_id")).collect();

        tracing::debug!(
            "Record {} has {} alerted matches",
            record_id,
            candidate_ids.len()
        );

        Ok(candidate_ids)
    }

    /// Clear all log entries involving a record, on either side of the pair
    ///
    /// Called when a record is resolved: its alert history is no longer
    /// relevant and must not suppress alerts for future reports.
    pub async fn clear_for_record(&self, record_id: &str) -> Result<u64, PostgresError> {
        let query = r#"
            DELETE FROM notified_matches
            WHERE record_id = $1 OR candidate_id = $1
        "#;

        let result = sqlx::query(query).bind(record_id).execute(&self.pool).await?;

        tracing::info!(
            "Cleared {} notified matches for record {}",
            result.rows_affected(),
            record_id
        );

        Ok(result.rows_affected())
    }

    /// Get alert statistics for a record
    pub async fn get_alert_stats(&self, record_id: &str) -> Result<AlertStats, PostgresError> {
        let query = r#"
            SELECT
                COUNT(*) as total_alerts,
                MAX(confidence) as best_confidence,
                MAX(notified_at) as last_notified_at
            FROM notified_matches
            WHERE record_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(record_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(AlertStats {
            record_id: record_id.to_string(),
            total_alerts: row.get("total_alerts"),
            best_confidence: row.get("best_confidence"),
            last_notified_at: row.get("last_notified_at"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Alert statistics for a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertStats {
    #[serde(rename = "recordId")]
    pub record_id: String,
    #[serde(rename = "totalAlerts")]
    pub total_alerts: i64,
    #[serde(rename = "bestConfidence")]
    pub best_confidence: Option<i16>,
    #[serde(rename = "lastNotifiedAt")]
    pub last_notified_at: Option<chrono::DateTime<chrono::Utc>>,
}
