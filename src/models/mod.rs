// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AttributeBreakdown, BoundingBox, CandidateQuery, ConfidenceBand, Coordinate, Gender,
    PetRecord, RankedMatch, RecordStatus, RecordType, ScoringWeights, SizeCategory, Species,
};
pub use requests::{FindMatchesRequest, ResolveRecordRequest};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, ResolveRecordResponse};
