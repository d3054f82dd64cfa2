use crate::core::aliases::BreedAliases;
use crate::core::comparators::{
    compare_breed, compare_color, compare_features, compare_gender, compare_identifier,
    compare_size, compare_species, IdentifierMatch,
};
use crate::core::distance::distance_km;
use crate::models::{AttributeBreakdown, PetRecord, ScoringWeights};

/// Confidence score for one query/candidate pair
#[derive(Debug, Clone)]
pub struct MatchScore {
    /// Unitless confidence in [0, 100]; not a probability
    pub confidence_score: u8,
    /// Great-circle distance, `None` if either record lacks a location
    pub distance_km: Option<f64>,
    /// Per-factor point contributions, for explainability
    pub attribute_breakdown: AttributeBreakdown,
}

/// Score a candidate record against a query record
///
/// An exact identifier match is the one absolute rule: it short-circuits to
/// confidence 100 with a breakdown of `{identifier: 100}`. Otherwise each
/// factor contributes `weight * comparator_output` points and the sum is
/// rounded half-up and clamped to 100.
///
/// The breakdown records every factor that was evaluable, including zero-point
/// mismatches. Proximity is omitted when distance is unknown and features when
/// both tag sets are empty, so missing evidence never shows up as a penalty
/// line. Fixed weights are used throughout; factors with missing data simply
/// contribute nothing rather than triggering a renormalization.
pub fn score_pair(
    query: &PetRecord,
    candidate: &PetRecord,
    weights: &ScoringWeights,
    aliases: &BreedAliases,
) -> MatchScore {
    let distance = distance_km(query.location, candidate.location);

    let identifier = compare_identifier(
        query.identifier_code.as_deref(),
        candidate.identifier_code.as_deref(),
    );

    if identifier == IdentifierMatch::Match {
        let mut breakdown = AttributeBreakdown::new();
        breakdown.insert("identifier".to_string(), 100.0);

        return MatchScore {
            confidence_score: 100,
            distance_km: distance,
            attribute_breakdown: breakdown,
        };
    }

    let mut breakdown = AttributeBreakdown::new();
    let mut total = 0.0;

    let species_points = weights.species * compare_species(query.species, candidate.species);
    breakdown.insert("species".to_string(), species_points);
    total += species_points;

    let breed_points = weights.breed
        * compare_breed(
            aliases,
            &query.breed_primary,
            query.breed_secondary.as_deref(),
            &candidate.breed_primary,
            candidate.breed_secondary.as_deref(),
        );
    breakdown.insert("breed".to_string(), breed_points);
    total += breed_points;

    let color_points = weights.color
        * compare_color(
            &query.color_primary,
            query.color_secondary.as_deref(),
            &candidate.color_primary,
            candidate.color_secondary.as_deref(),
        );
    breakdown.insert("color".to_string(), color_points);
    total += color_points;

    // Full credit at 0 km, linearly decaying to none at the falloff distance.
    // Unknown distance contributes nothing and records no breakdown entry.
    if let Some(km) = distance {
        let proximity_points =
            weights.proximity * (1.0 - km / weights.proximity_falloff_km).max(0.0);
        breakdown.insert("proximity".to_string(), proximity_points);
        total += proximity_points;
    }

    let size_points = weights.size * compare_size(query.size_category, candidate.size_category);
    breakdown.insert("size".to_string(), size_points);
    total += size_points;

    let gender_points = weights.gender * compare_gender(query.gender, candidate.gender);
    breakdown.insert("gender".to_string(), gender_points);
    total += gender_points;

    if let Some(jaccard) = compare_features(
        &query.distinguishing_features,
        &candidate.distinguishing_features,
    ) {
        let features_points = weights.features * jaccard;
        breakdown.insert("features".to_string(), features_points);
        total += features_points;
    }

    MatchScore {
        confidence_score: clamp_score(total),
        distance_km: distance,
        attribute_breakdown: breakdown,
    }
}

/// Round half up, then clamp to [0, 100]
///
/// Every factor contributes non-negative points, so `f64::round` (half away
/// from zero) is round-half-up here.
#[inline]
fn clamp_score(total: f64) -> u8 {
    total.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Coordinate, Gender, RecordStatus, RecordType, SizeCategory, Species,
    };
    use chrono::Utc;

    fn lost_query() -> PetRecord {
        PetRecord {
            id: "lost_1".to_string(),
            record_type: RecordType::Lost,
            species: Species::Dog,
            breed_primary: "Labrador Retriever".to_string(),
            breed_secondary: None,
            color_primary: "Golden".to_string(),
            color_secondary: None,
            size_category: SizeCategory::Medium,
            gender: Gender::Male,
            distinguishing_features: vec![],
            identifier_code: None,
            location: Some(Coordinate {
                latitude: 12.9716,
                longitude: 77.5946,
            }),
            reported_at: Utc::now(),
            status: RecordStatus::Active,
            owner_ref: "owner_1".to_string(),
        }
    }

    fn found_candidate() -> PetRecord {
        PetRecord {
            id: "found_1".to_string(),
            record_type: RecordType::Found,
            species: Species::Dog,
            breed_primary: "Lab".to_string(),
            breed_secondary: None,
            color_primary: "Golden".to_string(),
            color_secondary: None,
            size_category: SizeCategory::Medium,
            gender: Gender::Unknown,
            distinguishing_features: vec![],
            identifier_code: None,
            // ~2 km north of the query
            location: Some(Coordinate {
                latitude: 12.9896,
                longitude: 77.5946,
            }),
            reported_at: Utc::now(),
            status: RecordStatus::Active,
            owner_ref: "owner_2".to_string(),
        }
    }

    #[test]
    fn test_strong_lost_found_pair_scores_high() {
        // species 30 + breed 17 (alias) + color 15 + proximity ~14.4 (2 km)
        // + size 10 + gender 5 (unknown) + no features = ~91.4 -> 91
        let score = score_pair(
            &lost_query(),
            &found_candidate(),
            &ScoringWeights::default(),
            &BreedAliases::builtin(),
        );

        assert_eq!(score.confidence_score, 91);
        assert_eq!(score.attribute_breakdown["species"], 30.0);
        assert_eq!(score.attribute_breakdown["breed"], 17.0);
        assert_eq!(score.attribute_breakdown["color"], 15.0);
        assert_eq!(score.attribute_breakdown["size"], 10.0);
        assert_eq!(score.attribute_breakdown["gender"], 5.0);
        assert!(!score.attribute_breakdown.contains_key("features"));
        let proximity = score.attribute_breakdown["proximity"];
        assert!((proximity - 14.4).abs() < 0.1, "proximity was {}", proximity);
    }

    #[test]
    fn test_identifier_match_short_circuits_to_100() {
        let mut query = lost_query();
        let mut candidate = found_candidate();
        query.identifier_code = Some("985112003456789".to_string());
        candidate.identifier_code = Some("985112003456789".to_string());
        // Make every other attribute maximally dissimilar
        candidate.species = Species::Cat;
        candidate.breed_primary = "siamese".to_string();
        candidate.color_primary = "black".to_string();
        candidate.size_category = SizeCategory::Large;
        candidate.gender = Gender::Female;

        let score = score_pair(
            &query,
            &candidate,
            &ScoringWeights::default(),
            &BreedAliases::builtin(),
        );

        assert_eq!(score.confidence_score, 100);
        assert_eq!(score.attribute_breakdown.len(), 1);
        assert_eq!(score.attribute_breakdown["identifier"], 100.0);
    }

    #[test]
    fn test_identifier_mismatch_does_not_penalize() {
        let mut with_codes_query = lost_query();
        let mut with_codes_candidate = found_candidate();
        with_codes_query.identifier_code = Some("985112003456789".to_string());
        with_codes_candidate.identifier_code = Some("985112000000000".to_string());

        let weights = ScoringWeights::default();
        let aliases = BreedAliases::builtin();

        let with_codes = score_pair(&with_codes_query, &with_codes_candidate, &weights, &aliases);
        let without_codes = score_pair(&lost_query(), &found_candidate(), &weights, &aliases);

        assert_eq!(with_codes.confidence_score, without_codes.confidence_score);
    }

    #[test]
    fn test_missing_location_contributes_nothing() {
        let query = lost_query();
        let mut candidate = found_candidate();
        candidate.location = None;

        let score = score_pair(
            &query,
            &candidate,
            &ScoringWeights::default(),
            &BreedAliases::builtin(),
        );

        assert_eq!(score.distance_km, None);
        assert!(!score.attribute_breakdown.contains_key("proximity"));
        // species 30 + breed 17 + color 15 + size 10 + gender 5 = 77
        assert_eq!(score.confidence_score, 77);
    }

    #[test]
    fn test_features_bonus_can_push_past_100_before_clamp() {
        let mut query = lost_query();
        let mut candidate = found_candidate();
        // Perfect match on everything, co-located, shared features
        candidate.breed_primary = query.breed_primary.clone();
        candidate.gender = Gender::Male;
        candidate.location = query.location;
        query.distinguishing_features = vec!["torn ear".to_string()];
        candidate.distinguishing_features = vec!["torn ear".to_string()];

        let score = score_pair(
            &query,
            &candidate,
            &ScoringWeights::default(),
            &BreedAliases::builtin(),
        );

        // Nominal 110 points, clamped
        assert_eq!(score.confidence_score, 100);
        assert_eq!(score.attribute_breakdown["features"], 10.0);
    }

    #[test]
    fn test_score_is_always_in_range() {
        let weights = ScoringWeights::default();
        let aliases = BreedAliases::builtin();

        let mut candidate = found_candidate();
        candidate.species = Species::Bird;
        candidate.breed_primary = "budgie".to_string();
        candidate.color_primary = "green".to_string();
        candidate.size_category = SizeCategory::Unknown;
        candidate.gender = Gender::Female;
        candidate.location = None;

        let worst = score_pair(&lost_query(), &candidate, &weights, &aliases);
        assert!(worst.confidence_score <= 100);

        let best = score_pair(&lost_query(), &lost_query(), &weights, &aliases);
        assert!(best.confidence_score <= 100);
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(clamp_score(90.5), 91);
        assert_eq!(clamp_score(90.4), 90);
        assert_eq!(clamp_score(107.2), 100);
        assert_eq!(clamp_score(0.0), 0);
    }
}
