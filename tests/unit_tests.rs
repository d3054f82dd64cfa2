// Unit tests for the Pawppy matching core

use chrono::Utc;
use pawppy_match::core::{
    aliases::BreedAliases,
    comparators::{
        compare_breed, compare_color, compare_features, compare_gender, compare_identifier,
        compare_size, compare_species, IdentifierMatch,
    },
    distance::{distance_km, haversine_distance},
    scoring::score_pair,
};
use pawppy_match::models::{
    ConfidenceBand, Coordinate, Gender, PetRecord, RecordStatus, RecordType, ScoringWeights,
    SizeCategory, Species,
};

fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate { latitude, longitude }
}

fn base_record(id: &str, record_type: RecordType) -> PetRecord {
    PetRecord {
        id: id.to_string(),
        record_type,
        species: Species::Dog,
        breed_primary: "Labrador Retriever".to_string(),
        breed_secondary: None,
        color_primary: "Golden".to_string(),
        color_secondary: None,
        size_category: SizeCategory::Medium,
        gender: Gender::Male,
        distinguishing_features: vec![],
        identifier_code: None,
        location: Some(coord(12.9716, 77.5946)),
        reported_at: Utc::now(),
        status: RecordStatus::Active,
        owner_ref: "owner".to_string(),
    }
}

#[test]
fn test_distance_to_self_is_zero() {
    let point = coord(40.7128, -74.0060);
    assert!(haversine_distance(point, point) < 0.001);
}

#[test]
fn test_distance_is_symmetric() {
    let nyc = coord(40.7128, -74.0060);
    let la = coord(34.0522, -118.2437);

    assert_eq!(haversine_distance(nyc, la), haversine_distance(la, nyc));

    // And the known NYC-LA distance is ~3944 km
    let distance = haversine_distance(nyc, la);
    assert!((distance - 3944.0).abs() < 100.0, "Expected ~3944km, got {}", distance);
}

#[test]
fn test_missing_coordinate_propagates_none() {
    let point = coord(40.7128, -74.0060);

    assert_eq!(distance_km(None, Some(point)), None);
    assert_eq!(distance_km(Some(point), None), None);
    assert_eq!(distance_km(None, None), None);
}

#[test]
fn test_species_comparator_is_binary() {
    assert_eq!(compare_species(Species::Rabbit, Species::Rabbit), 1.0);
    assert_eq!(compare_species(Species::Rabbit, Species::Bird), 0.0);
}

#[test]
fn test_breed_comparator_tiers() {
    let aliases = BreedAliases::builtin();

    // Exact > alias > secondary crossing > nothing
    assert_eq!(compare_breed(&aliases, "beagle", None, "Beagle", None), 1.0);
    assert_eq!(compare_breed(&aliases, "lab", None, "labrador retriever", None), 0.85);
    assert_eq!(
        compare_breed(&aliases, "beagle", Some("lab"), "labrador retriever", None),
        0.5
    );
    assert_eq!(compare_breed(&aliases, "beagle", None, "pug", None), 0.0);
}

#[test]
fn test_color_comparator_tiers() {
    assert_eq!(compare_color("black", None, "Black", None), 1.0);
    assert_eq!(compare_color("black", None, "brown", Some("black")), 0.6);
    assert_eq!(compare_color("black", None, "brown", None), 0.0);
}

#[test]
fn test_size_comparator_adjacency() {
    assert_eq!(compare_size(SizeCategory::Small, SizeCategory::Small), 1.0);
    assert_eq!(compare_size(SizeCategory::Small, SizeCategory::Medium), 0.4);
    assert_eq!(compare_size(SizeCategory::Small, SizeCategory::Large), 0.0);
    assert_eq!(compare_size(SizeCategory::Small, SizeCategory::Unknown), 0.0);
}

#[test]
fn test_gender_comparator_neutral_unknown() {
    assert_eq!(compare_gender(Gender::Female, Gender::Female), 1.0);
    assert_eq!(compare_gender(Gender::Female, Gender::Unknown), 0.5);
    assert_eq!(compare_gender(Gender::Female, Gender::Male), 0.0);
}

#[test]
fn test_features_comparator_jaccard() {
    let a = vec!["collar".to_string(), "limp".to_string()];
    let b = vec!["collar".to_string()];

    assert_eq!(compare_features(&a, &b), Some(0.5));
    assert_eq!(compare_features(&[], &[]), None);
}

#[test]
fn test_identifier_comparator_is_tri_state() {
    assert_eq!(compare_identifier(Some("A1"), Some("A1")), IdentifierMatch::Match);
    assert_eq!(compare_identifier(Some("A1"), Some("B2")), IdentifierMatch::Mismatch);
    assert_eq!(compare_identifier(Some("A1"), None), IdentifierMatch::Unknown);
    assert_eq!(compare_identifier(None, None), IdentifierMatch::Unknown);
}

#[test]
fn test_worked_example_scores_91_high() {
    let query = base_record("lost", RecordType::Lost);

    let mut candidate = base_record("found", RecordType::Found);
    candidate.breed_primary = "Lab".to_string();
    candidate.gender = Gender::Unknown;
    // ~2 km north
    candidate.location = Some(coord(12.9896, 77.5946));

    let score = score_pair(
        &query,
        &candidate,
        &ScoringWeights::default(),
        &BreedAliases::builtin(),
    );

    assert_eq!(score.confidence_score, 91);
    assert_eq!(ConfidenceBand::from_score(score.confidence_score), ConfidenceBand::High);
}

#[test]
fn test_identifier_overrides_every_other_attribute() {
    let mut query = base_record("lost", RecordType::Lost);
    query.identifier_code = Some("985112003456789".to_string());

    let mut candidate = base_record("found", RecordType::Found);
    candidate.identifier_code = Some("985112003456789".to_string());
    candidate.species = Species::Cat;
    candidate.breed_primary = "siamese".to_string();
    candidate.color_primary = "black".to_string();
    candidate.size_category = SizeCategory::Large;
    candidate.gender = Gender::Female;
    candidate.location = None;

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
fn test_candidate_without_location_gets_no_proximity_entry() {
    let query = base_record("lost", RecordType::Lost);
    let mut candidate = base_record("found", RecordType::Found);
    candidate.location = None;

    let score = score_pair(
        &query,
        &candidate,
        &ScoringWeights::default(),
        &BreedAliases::builtin(),
    );

    assert_eq!(score.distance_km, None);
    assert!(!score.attribute_breakdown.contains_key("proximity"));
}

#[test]
fn test_confidence_always_in_range() {
    let weights = ScoringWeights::default();
    let aliases = BreedAliases::builtin();
    let query = base_record("lost", RecordType::Lost);

    // Perfect twin, co-located, with shared feature tags (110 nominal points)
    let mut twin = base_record("found", RecordType::Found);
    twin.distinguishing_features = vec!["collar".to_string()];
    let mut tagged_query = query.clone();
    tagged_query.distinguishing_features = vec!["collar".to_string()];

    let best = score_pair(&tagged_query, &twin, &weights, &aliases);
    assert!(best.confidence_score <= 100);

    // Nothing in common at all
    let mut opposite = base_record("found", RecordType::Found);
    opposite.species = Species::Bird;
    opposite.breed_primary = "budgie".to_string();
    opposite.color_primary = "green".to_string();
    opposite.size_category = SizeCategory::Unknown;
    opposite.gender = Gender::Female;
    opposite.location = None;

    let worst = score_pair(&query, &opposite, &weights, &aliases);
    assert_eq!(worst.confidence_score, 0);
}
