use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Kind of pet record: what the report is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordType {
    Lost,
    Found,
    MatingListing,
    AdoptionListing,
}

impl RecordType {
    /// The record type a query of this type is matched against.
    ///
    /// Lost reports are matched against Found reports (and vice versa),
    /// while mating and adoption listings are matched among themselves.
    pub fn complement(self) -> RecordType {
        match self {
            RecordType::Lost => RecordType::Found,
            RecordType::Found => RecordType::Lost,
            RecordType::MatingListing => RecordType::MatingListing,
            RecordType::AdoptionListing => RecordType::AdoptionListing,
        }
    }

    /// Wire name, as stored in the document store
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Lost => "lost",
            RecordType::Found => "found",
            RecordType::MatingListing => "matingListing",
            RecordType::AdoptionListing => "adoptionListing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

/// Record lifecycle status. Transitions are one-way: Active -> Resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Resolved,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Resolved => "resolved",
        }
    }
}

/// A single lost, found, mating or adoption pet record
///
/// Created by intake forms and mutated only by the document store; the
/// matching core treats records as immutable snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetRecord {
    pub id: String,
    #[serde(rename = "recordType")]
    pub record_type: RecordType,
    pub species: Species,
    #[serde(rename = "breedPrimary")]
    pub breed_primary: String,
    #[serde(rename = "breedSecondary", default)]
    pub breed_secondary: Option<String>,
    #[serde(rename = "colorPrimary")]
    pub color_primary: String,
    #[serde(rename = "colorSecondary", default)]
    pub color_secondary: Option<String>,
    #[serde(rename = "sizeCategory", default = "default_size")]
    pub size_category: SizeCategory,
    #[serde(default = "default_gender")]
    pub gender: Gender,
    #[serde(rename = "distinguishingFeatures", default)]
    pub distinguishing_features: Vec<String>,
    #[serde(rename = "identifierCode", default)]
    pub identifier_code: Option<String>,
    /// Required for Lost/Found intake, optional for listings
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(rename = "reportedAt")]
    pub reported_at: chrono::DateTime<chrono::Utc>,
    #[serde(default = "default_status")]
    pub status: RecordStatus,
    /// Opaque reference to the owning account; never dereferenced here
    #[serde(rename = "ownerRef")]
    pub owner_ref: String,
}

impl PetRecord {
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}

fn default_size() -> SizeCategory {
    SizeCategory::Unknown
}

fn default_gender() -> Gender {
    Gender::Unknown
}

fn default_status() -> RecordStatus {
    RecordStatus::Active
}

/// Coarse human-facing label derived from a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    /// Pure classification of a score into a display band
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            ConfidenceBand::High
        } else if score >= 40 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Per-attribute point contributions that sum to a confidence score
pub type AttributeBreakdown = BTreeMap<String, f64>;

/// A scored candidate, as returned to callers
///
/// Ephemeral: computed per query and handed to the UI or the notification
/// dispatcher, never persisted by the matching core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "confidenceScore")]
    pub confidence_score: u8,
    #[serde(rename = "confidenceBand")]
    pub confidence_band: ConfidenceBand,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "attributeBreakdown")]
    pub attribute_breakdown: AttributeBreakdown,
}

/// Geospatial bounding box for coarse candidate pre-filtering
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Coarse candidate-fetch directive handed to the record store
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub record_type: RecordType,
    pub reported_after: chrono::DateTime<chrono::Utc>,
    pub bounding_box: Option<BoundingBox>,
    pub limit: usize,
}

/// Point budget per scoring factor
///
/// The nominal budget sums to 110: the distinguishing-features allocation is
/// a bonus that can push a strong match past 100 before the final clamp.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub species: f64,
    pub breed: f64,
    pub color: f64,
    pub proximity: f64,
    pub size: f64,
    pub gender: f64,
    pub features: f64,
    /// Distance at which proximity credit decays to zero
    pub proximity_falloff_km: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            species: 30.0,
            breed: 20.0,
            color: 15.0,
            proximity: 15.0,
            size: 10.0,
            gender: 10.0,
            features: 10.0,
            proximity_falloff_km: 50.0,
        }
    }
}
