use crate::core::{RankError, Ranker};
use crate::core::distance::{calculate_bounding_box, is_within_bounding_box};
use crate::models::{
    BoundingBox, CandidateQuery, ConfidenceBand, ErrorResponse, FindMatchesRequest,
    FindMatchesResponse, HealthResponse, PetRecord, RankedMatch, ResolveRecordRequest,
    ResolveRecordResponse,
};
use crate::services::{
    CacheKey, CacheManager, MatchAlert, NotificationLog, PetStoreClient, NotifierClient,
    StoreError,
};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PetStoreClient>,
    pub cache: Arc<CacheManager>,
    pub log: Arc<NotificationLog>,
    pub notifier: Arc<NotifierClient>,
    pub ranker: Ranker,
    /// Radius of the coarse bounding-box pre-filter at the store
    pub search_radius_km: f64,
    pub max_limit: u16,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/records/resolve", web::post().to(resolve_record))
        .route("/records/{record_id}/alerts", web::get().to(alert_stats));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let log_healthy = state.log.health_check().await.unwrap_or(false);

    let status = if log_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "recordId": "string",
///   "minConfidence": 40,
///   "windowDays": 30,
///   "limit": 20
/// }
/// ```
///
/// An empty `matches` array is a valid outcome; a query whose candidate set
/// cannot logically match (wrong record-type pairing) is rejected with 422
/// so callers can tell the two apart.
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let record_id = &req.record_id;
    let limit = req.limit.min(state.max_limit) as usize;

    tracing::info!(
        "Finding matches for record: {}, min confidence: {}, limit: {}",
        record_id,
        req.min_confidence,
        limit
    );

    // Fetch the query record from the store
    let query_record = match state.store.get_record(record_id).await {
        Ok(record) => record,
        Err(StoreError::NotFound(msg)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Record not found".to_string(),
                message: msg,
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch record {}: {}", record_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch record".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    // Candidate fetch: cached per query record, coarse-filtered at the store
    let candidates = match fetch_candidates(&state, &query_record, req.window_days, limit).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to query candidates for {}: {}", record_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to query candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::debug!("Found {} candidates for {}", candidates.len(), record_id);

    // Run the matching core
    let outcome = match state
        .ranker
        .rank(&query_record, candidates, req.min_confidence)
    {
        Ok(outcome) => outcome,
        Err(e @ RankError::IncompatibleRecordTypes { .. }) => {
            tracing::info!("Rejected find_matches for {}: {}", record_id, e);
            return HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "incompatible_record_types".to_string(),
                message: e.to_string(),
                status_code: 422,
            });
        }
    };

    let mut matches = outcome.matches;
    matches.truncate(limit);

    // Alert the owner about new high-confidence matches, best-effort
    dispatch_alerts(&state, &query_record, &matches).await;

    let response = FindMatchesResponse {
        query_id: query_record.id,
        matches,
        total_candidates: outcome.total_candidates,
    };

    tracing::info!(
        "Returning {} matches for record {} (from {} candidates)",
        response.matches.len(),
        record_id,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Fetch candidates for a query record, through the cache
async fn fetch_candidates(
    state: &AppState,
    query_record: &PetRecord,
    window_days: u32,
    limit: usize,
) -> Result<Vec<PetRecord>, StoreError> {
    let cache_key = CacheKey::candidates(&query_record.id);

    if let Ok(cached) = state.cache.get::<Vec<PetRecord>>(&cache_key).await {
        tracing::debug!("Candidate cache hit for {}", query_record.id);
        return Ok(cached);
    }

    let directive = CandidateQuery {
        record_type: query_record.record_type.complement(),
        reported_after: chrono::Utc::now() - chrono::Duration::days(window_days as i64),
        bounding_box: query_record
            .location
            .map(|center| calculate_bounding_box(center, state.search_radius_km)),
        // Over-fetch so the fine threshold still has room to cut
        limit: limit * 5,
    };

    let mut candidates = state.store.query_candidates(&directive).await?;

    if let Some(bbox) = &directive.bounding_box {
        enforce_bounding_box(&mut candidates, bbox);
    }

    if let Err(e) = state.cache.set(&cache_key, &candidates).await {
        tracing::warn!("Failed to cache candidates for {}: {}", query_record.id, e);
    }

    Ok(candidates)
}

/// Drop candidates the store should not have returned
///
/// The store applies the box as separate range filters; re-check here so a
/// backend that ignores one of them cannot widen the search area. Candidates
/// without a location pass through and score without proximity.
fn enforce_bounding_box(candidates: &mut Vec<PetRecord>, bbox: &BoundingBox) {
    candidates.retain(|c| c.location.map_or(true, |loc| is_within_bounding_box(loc, bbox)));
}

/// Send alerts for high-band matches that have not been alerted before
async fn dispatch_alerts(state: &AppState, query_record: &PetRecord, matches: &[RankedMatch]) {
    let already_notified = match state.log.get_notified(&query_record.id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(
                "Failed to fetch notification log for {}, skipping alerts: {}",
                query_record.id,
                e
            );
            return;
        }
    };

    for m in matches {
        if m.confidence_band != ConfidenceBand::High {
            continue;
        }
        if already_notified.contains(&m.candidate_id) {
            continue;
        }

        let alert = MatchAlert {
            event_id: uuid::Uuid::new_v4(),
            owner_ref: query_record.owner_ref.clone(),
            record_id: query_record.id.clone(),
            candidate_id: m.candidate_id.clone(),
            confidence_score: m.confidence_score,
            confidence_band: m.confidence_band,
            distance_km: m.distance_km,
        };

        match state.notifier.send_match_alert(&alert).await {
            Ok(()) => {
                if let Err(e) = state
                    .log
                    .record_notified(
                        &query_record.id,
                        &m.candidate_id,
                        m.confidence_score as i16,
                    )
                    .await
                {
                    tracing::warn!(
                        "Alert sent but not logged for {} -> {}: {}",
                        query_record.id,
                        m.candidate_id,
                        e
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to send match alert {} -> {}: {}",
                    query_record.id,
                    m.candidate_id,
                    e
                );
            }
        }
    }
}

/// Resolve record endpoint
///
/// POST /api/v1/records/resolve
///
/// Marks a record resolved in the store and clears its alert history and
/// cached candidates. Resolution is one-way.
async fn resolve_record(
    state: web::Data<AppState>,
    req: web::Json<ResolveRecordRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let record_id = &req.record_id;

    match state.store.resolve_record(record_id).await {
        Ok(()) => {}
        Err(StoreError::NotFound(msg)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Record not found".to_string(),
                message: msg,
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to resolve record {}: {}", record_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to resolve record".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    }

    // Alert history and cached candidates are stale once resolved
    if let Err(e) = state.log.clear_for_record(record_id).await {
        tracing::warn!("Failed to clear notification log for {}: {}", record_id, e);
    }
    if let Err(e) = state.cache.delete(&CacheKey::candidates(record_id)).await {
        tracing::warn!("Failed to invalidate candidate cache for {}: {}", record_id, e);
    }

    HttpResponse::Ok().json(ResolveRecordResponse {
        success: true,
        record_id: record_id.clone(),
    })
}

/// Alert history endpoint
///
/// GET /api/v1/records/{record_id}/alerts
async fn alert_stats(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let record_id = path.into_inner();

    match state.log.get_alert_stats(&record_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            tracing::error!("Failed to fetch alert stats for {}: {}", record_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch alert stats".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
