//! Provider and oracle traits plus the request and outcome types they share.

use std::sync::Arc;

use crate::{Coordinate, PoiCategorySet, SearchRadius};

use super::error::ProximityError;

/// A single "is anything from `categories` within `radius` of `coordinate`?"
/// question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityRequest<'a> {
    /// Predicates to union together.
    pub categories: &'a PoiCategorySet,
    /// Centre of the search.
    pub coordinate: Coordinate,
    /// Search radius around `coordinate`.
    pub radius: SearchRadius,
}

impl<'a> ProximityRequest<'a> {
    /// Bundle the parts of a request.
    #[must_use]
    pub const fn new(
        categories: &'a PoiCategorySet,
        coordinate: Coordinate,
        radius: SearchRadius,
    ) -> Self {
        Self {
            categories,
            coordinate,
            radius,
        }
    }
}

/// Answer proximity requests against an external POI data service.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so a single provider
/// can serve many scorers. They should request existence only (at most one
/// element) rather than enumerating matches.
///
/// # Examples
///
/// ```rust
/// use sahasi_core::{
///     Coordinate, PoiCategorySet, ProximityError, ProximityProvider, ProximityRequest,
///     SearchRadius,
/// };
///
/// struct NothingNearby;
///
/// impl ProximityProvider for NothingNearby {
///     fn any_poi_within(&self, _request: &ProximityRequest<'_>) -> Result<bool, ProximityError> {
///         Ok(false)
///     }
/// }
///
/// let categories = PoiCategorySet::safety_defaults();
/// let coordinate = Coordinate::new(0.0, 0.0).expect("valid coordinate");
/// let request = ProximityRequest::new(&categories, coordinate, SearchRadius::DEFAULT);
/// assert_eq!(NothingNearby.any_poi_within(&request), Ok(false));
/// ```
pub trait ProximityProvider: Send + Sync {
    /// Return `Ok(true)` when at least one matching element exists.
    fn any_poi_within(&self, request: &ProximityRequest<'_>) -> Result<bool, ProximityError>;
}

impl<T: ProximityProvider + ?Sized> ProximityProvider for Arc<T> {
    fn any_poi_within(&self, request: &ProximityRequest<'_>) -> Result<bool, ProximityError> {
        (**self).any_poi_within(request)
    }
}

impl<T: ProximityProvider + ?Sized> ProximityProvider for Box<T> {
    fn any_poi_within(&self, request: &ProximityRequest<'_>) -> Result<bool, ProximityError> {
        (**self).any_poi_within(request)
    }
}

/// Result of asking an oracle about a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProximityOutcome {
    /// At least one matching POI exists within the radius.
    Found,
    /// The provider answered and nothing matched.
    NotFound,
    /// The provider failed; nothing is known about the location.
    Unknown,
}

impl ProximityOutcome {
    /// Map a provider answer to an outcome.
    #[must_use]
    pub const fn from_presence(found: bool) -> Self {
        if found { Self::Found } else { Self::NotFound }
    }
}

/// Infallible proximity lookup used by the scorer.
///
/// Implementations absorb provider failures into
/// [`ProximityOutcome::Unknown`] instead of returning errors.
pub trait NearbyPoiOracle {
    /// Report whether a safety POI lies within `radius` of `coordinate`.
    fn has_nearby_poi(&self, coordinate: Coordinate, radius: SearchRadius) -> ProximityOutcome;
}

impl<T: NearbyPoiOracle + ?Sized> NearbyPoiOracle for Arc<T> {
    fn has_nearby_poi(&self, coordinate: Coordinate, radius: SearchRadius) -> ProximityOutcome {
        (**self).has_nearby_poi(coordinate, radius)
    }
}

impl<T: NearbyPoiOracle + ?Sized> NearbyPoiOracle for &T {
    fn has_nearby_poi(&self, coordinate: Coordinate, radius: SearchRadius) -> ProximityOutcome {
        (**self).has_nearby_poi(coordinate, radius)
    }
}
