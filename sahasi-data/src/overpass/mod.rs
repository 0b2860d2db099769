//! Overpass API proximity provider.
//!
//! This module provides [`HttpOverpassProvider`], an implementation of
//! [`sahasi_core::ProximityProvider`] that asks an Overpass interpreter
//! whether any element matching a category set lies within a radius.
//!
//! # Architecture
//!
//! [`OverpassQuery`] renders the request as a single Overpass QL union that
//! returns at most one element. The provider posts it as a form-encoded
//! `data` field and treats a non-empty `elements` array as "found". The
//! synchronous provider trait is implemented by blocking on async HTTP calls
//! internally, keeping the scorer embeddable in synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use sahasi_core::{Coordinate, PoiCategorySet, ProximityProvider, ProximityRequest, SearchRadius};
//! use sahasi_data::overpass::{HttpOverpassProvider, OverpassConfig};
//!
//! let config = OverpassConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpOverpassProvider::with_config(config)?;
//!
//! let categories = PoiCategorySet::safety_defaults();
//! let coordinate = Coordinate::new(12.9716, 77.5946)?;
//! let request = ProximityRequest::new(&categories, coordinate, SearchRadius::DEFAULT);
//! let found = provider.any_poi_within(&request)?;
//! println!("safety POI nearby: {found}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod provider;
mod query;
mod response;

pub use provider::{
    DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, HttpOverpassProvider, OverpassConfig, ProviderBuildError,
};
pub use query::OverpassQuery;
