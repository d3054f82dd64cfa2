//! Pawppy Match - confidence-scored matching service for the Pawppy pet platform
//!
//! This library implements the matching core behind Pawppy's lost-and-found
//! alerts and mating/adoption suggestions: a weighted multi-attribute scorer
//! that turns a pair of pet records into a 0-100 confidence score, and a
//! ranker that orders a candidate set against a query record.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{distance::{distance_km, haversine_distance}, BreedAliases, RankError, Ranker};
pub use crate::models::{
    ConfidenceBand, FindMatchesRequest, FindMatchesResponse, PetRecord, RankedMatch,
    ScoringWeights,
};
