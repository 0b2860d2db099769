//! Core domain types for the Sahasi safety-scoring engine.
//!
//! The crate defines the vocabulary shared by the query builder, the cached
//! proximity oracle and the stateful scorer:
//!
//! - [`Coordinate`] and [`SearchRadius`] describe where to look.
//! - [`PoiCategory`] and [`PoiCategorySet`] describe what to look for.
//! - [`ProximityProvider`] abstracts the external POI data service and
//!   [`NearbyPoiOracle`] abstracts the cached, failure-absorbing layer above it.
//! - [`SafetyScore`], [`SmoothingFactor`] and [`smooth`] define the published
//!   score and its exponential smoothing.
//!
//! Constructors validate their input and return `Result`, so downstream
//! components only ever see in-range values.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod category;
mod coordinate;
pub mod proximity;
mod score;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use category::{CategorySetError, ElementKind, PoiCategory, PoiCategorySet, TagMatch};
pub use coordinate::{Coordinate, CoordinateError, SearchRadius, SearchRadiusError};
pub use proximity::{
    NearbyPoiOracle, ProximityError, ProximityOutcome, ProximityProvider, ProximityRequest,
};
pub use score::{SafetyScore, SafetyScoreError, SmoothingFactor, SmoothingFactorError, smooth};
