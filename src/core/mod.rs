// Core algorithm exports
pub mod aliases;
pub mod comparators;
pub mod distance;
pub mod ranker;
pub mod scoring;

pub use aliases::{AliasError, BreedAliases};
pub use comparators::IdentifierMatch;
pub use distance::{calculate_bounding_box, distance_km, haversine_distance, is_within_bounding_box};
pub use ranker::{RankError, RankOutcome, Ranker};
pub use scoring::{score_pair, MatchScore};
