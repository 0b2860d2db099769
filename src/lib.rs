//! Facade crate for the Sahasi safety-scoring engine.
//!
//! This crate re-exports the core domain types and the stateful scorer, and
//! exposes the Overpass HTTP provider behind the `overpass` feature.

#![forbid(unsafe_code)]

pub use sahasi_core::{
    Coordinate, CoordinateError, NearbyPoiOracle, PoiCategory, PoiCategorySet, ProximityError,
    ProximityOutcome, ProximityProvider, ProximityRequest, SafetyScore, SearchRadius,
    SmoothingFactor, smooth,
};

pub use sahasi_scorer::{
    CachedProximityOracle, LocationEntry, LocationReading, ProximityCache, SafetyScorer,
    ScorerConfig,
};

#[cfg(feature = "overpass")]
pub use sahasi_data::{HttpOverpassProvider, OverpassConfig, OverpassQuery};
