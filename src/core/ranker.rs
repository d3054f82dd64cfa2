use crate::core::aliases::BreedAliases;
use crate::core::scoring::score_pair;
use crate::models::{ConfidenceBand, PetRecord, RankedMatch, RecordType, ScoringWeights};
use std::cmp::Ordering;
use thiserror::Error;

/// Errors reported by the ranker
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    /// The candidate set cannot logically match the query, e.g. a Lost query
    /// ranked against a set of other Lost records. Reported instead of an
    /// empty list so callers can tell a malformed request from "no matches".
    #[error("A {query:?} query can only be ranked against {expected:?} candidates")]
    IncompatibleRecordTypes {
        query: RecordType,
        expected: RecordType,
    },
}

/// Result of a ranking call
#[derive(Debug)]
pub struct RankOutcome {
    /// Full ranked sequence; pagination is the caller's concern
    pub matches: Vec<RankedMatch>,
    pub total_candidates: usize,
}

/// Match ranking orchestrator
///
/// Filters a candidate set to active records of the complementary type,
/// scores every survivor, applies the confidence threshold, and sorts by
/// confidence (desc), then distance (asc, unknown last), then report time
/// (asc — older reports are more likely still open).
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: ScoringWeights,
    aliases: BreedAliases,
}

impl Ranker {
    pub fn new(weights: ScoringWeights, aliases: BreedAliases) -> Self {
        Self { weights, aliases }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScoringWeights::default(), BreedAliases::builtin())
    }

    /// Rank a candidate set against a query record
    ///
    /// Scoring is pure per pair over immutable snapshots, so a call can be
    /// abandoned at any candidate boundary without side effects.
    pub fn rank(
        &self,
        query: &PetRecord,
        candidates: Vec<PetRecord>,
        min_confidence: u8,
    ) -> Result<RankOutcome, RankError> {
        let expected = query.record_type.complement();
        let total_candidates = candidates.len();

        let compatible: Vec<PetRecord> = candidates
            .into_iter()
            .filter(|candidate| candidate.record_type == expected)
            .collect();

        // A non-empty set with zero type-compatible members is a caller
        // error, not an empty result.
        if total_candidates > 0 && compatible.is_empty() {
            return Err(RankError::IncompatibleRecordTypes {
                query: query.record_type,
                expected,
            });
        }

        let mut scored: Vec<(RankedMatch, chrono::DateTime<chrono::Utc>)> = compatible
            .into_iter()
            .filter(|candidate| candidate.is_active())
            .filter(|candidate| candidate.id != query.id)
            .filter_map(|candidate| {
                let score = score_pair(query, &candidate, &self.weights, &self.aliases);

                if score.confidence_score < min_confidence {
                    return None;
                }

                let ranked = RankedMatch {
                    candidate_id: candidate.id,
                    confidence_score: score.confidence_score,
                    confidence_band: ConfidenceBand::from_score(score.confidence_score),
                    distance_km: score.distance_km,
                    attribute_breakdown: score.attribute_breakdown,
                };

                Some((ranked, candidate.reported_at))
            })
            .collect();

        scored.sort_by(|(a, a_reported), (b, b_reported)| {
            b.confidence_score
                .cmp(&a.confidence_score)
                .then_with(|| compare_distances(a.distance_km, b.distance_km))
                .then_with(|| a_reported.cmp(b_reported))
        });

        Ok(RankOutcome {
            matches: scored.into_iter().map(|(ranked, _)| ranked).collect(),
            total_candidates,
        })
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Ascending distance, unknown distances sorting last
#[inline]
fn compare_distances(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
