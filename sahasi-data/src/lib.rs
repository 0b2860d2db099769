//! Data-service adapters for the Sahasi safety engine.
//!
//! The [`overpass`] module turns a [`sahasi_core::ProximityRequest`] into an
//! Overpass QL union query and answers it over HTTP, implementing
//! [`sahasi_core::ProximityProvider`].

#![forbid(unsafe_code)]

pub mod overpass;

pub use overpass::{
    DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, HttpOverpassProvider, OverpassConfig, OverpassQuery,
    ProviderBuildError,
};
