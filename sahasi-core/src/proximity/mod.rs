//! Ask whether any safety POI lies within a radius of a coordinate.
//!
//! Two layers are modelled:
//!
//! - [`ProximityProvider`] talks to an external POI data service and reports
//!   transport or decoding failures as [`ProximityError`].
//! - [`NearbyPoiOracle`] sits above a provider and never fails; provider
//!   errors surface as [`ProximityOutcome::Unknown`] so callers can apply an
//!   explicit fallback policy.

mod error;
mod provider;

pub use error::ProximityError;
pub use provider::{NearbyPoiOracle, ProximityOutcome, ProximityProvider, ProximityRequest};
