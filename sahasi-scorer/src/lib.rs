//! Request-time safety scoring for the Sahasi engine.
//!
//! The crate provides the stateful half of the engine:
//! - **Proximity caching**: [`ProximityCache`] is a bounded LRU map from a
//!   rounded coordinate and radius to a presence answer, and
//!   [`CachedProximityOracle`] wraps any
//!   [`ProximityProvider`](sahasi_core::ProximityProvider) with it. Provider
//!   failures become [`ProximityOutcome::Unknown`](sahasi_core::ProximityOutcome)
//!   and are never cached.
//! - **Scoring**: [`SafetyScorer`] classifies each [`LocationEntry`] as safe
//!   or dangerous and smooths the result against the previous score.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use sahasi_core::{ProximityError, ProximityProvider, ProximityRequest};
//! use sahasi_scorer::{CachedProximityOracle, LocationEntry, SafetyScorer};
//!
//! struct EmptyArea;
//!
//! impl ProximityProvider for EmptyArea {
//!     fn any_poi_within(&self, _request: &ProximityRequest<'_>) -> Result<bool, ProximityError> {
//!         Ok(false)
//!     }
//! }
//!
//! let oracle = Arc::new(CachedProximityOracle::new(EmptyArea));
//! let mut scorer = SafetyScorer::new(Arc::clone(&oracle));
//!
//! let score = scorer.process(&LocationEntry::new(12.9716, 77.5946));
//! assert_eq!(score.value(), 26);
//! assert_eq!(oracle.cache().len(), 1);
//! ```

#![forbid(unsafe_code)]

mod cache;
mod entry;
mod oracle;
mod scorer;

pub use cache::{
    CacheCapacityError, CacheKey, CacheStats, DEFAULT_CACHE_CAPACITY, ProximityCache,
};
pub use entry::{EntryTime, LocationEntry, LocationReading, parse_timestamp};
pub use oracle::CachedProximityOracle;
pub use scorer::{SafetyScorer, ScorerConfig, raw_score};
