//! Cached nearby-POI oracle.
//!
//! [`CachedProximityOracle`] answers "is any safety POI within the radius?"
//! by consulting a [`ProximityCache`] first and a [`ProximityProvider`] on a
//! miss. Definitive answers are cached; failures are logged, reported as
//! [`ProximityOutcome::Unknown`] and left uncached so the next request for the
//! same key retries the provider.

use log::{debug, warn};
use sahasi_core::{
    Coordinate, NearbyPoiOracle, PoiCategorySet, ProximityOutcome, ProximityProvider,
    ProximityRequest, SearchRadius,
};

use crate::cache::{CacheKey, ProximityCache};

/// A [`NearbyPoiOracle`] that memoises provider answers in an LRU cache.
///
/// Queries go to the provider with the coordinate rounded to three decimal
/// places, so every coordinate sharing a cache key receives the answer for
/// the same query. The cache lock is never held while the provider runs;
/// concurrent misses on one key may therefore both query the provider, and
/// the later insert wins.
///
/// The oracle is `Send + Sync` whenever the provider is, so one instance can
/// be shared behind an [`Arc`](std::sync::Arc) by many scorers.
#[derive(Debug)]
pub struct CachedProximityOracle<P> {
    provider: P,
    categories: PoiCategorySet,
    cache: ProximityCache,
}

impl<P: ProximityProvider> CachedProximityOracle<P> {
    /// Wrap `provider` with the default safety categories and a 512-entry
    /// cache.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_parts(
            provider,
            PoiCategorySet::safety_defaults(),
            ProximityCache::default(),
        )
    }

    /// Wrap `provider` with explicit categories and cache.
    #[must_use]
    pub const fn with_parts(
        provider: P,
        categories: PoiCategorySet,
        cache: ProximityCache,
    ) -> Self {
        Self {
            provider,
            categories,
            cache,
        }
    }

    /// Categories that count as safety POIs.
    #[must_use]
    pub const fn categories(&self) -> &PoiCategorySet {
        &self.categories
    }

    /// The underlying answer cache.
    #[must_use]
    pub const fn cache(&self) -> &ProximityCache {
        &self.cache
    }

    /// The wrapped provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: ProximityProvider> NearbyPoiOracle for CachedProximityOracle<P> {
    fn has_nearby_poi(&self, coordinate: Coordinate, radius: SearchRadius) -> ProximityOutcome {
        let key = CacheKey::new(coordinate, radius);
        if let Some(found) = self.cache.get(&key) {
            debug!("proximity cache hit for {} within {radius}", key.rounded_coordinate());
            return ProximityOutcome::from_presence(found);
        }
        debug!("proximity cache miss for {} within {radius}", key.rounded_coordinate());

        let request = ProximityRequest::new(&self.categories, key.rounded_coordinate(), radius);
        match self.provider.any_poi_within(&request) {
            Ok(found) => {
                self.cache.insert(key, found);
                ProximityOutcome::from_presence(found)
            }
            Err(err) => {
                warn!(
                    "proximity lookup failed for {}; assuming a POI is nearby: {err}",
                    key.rounded_coordinate()
                );
                ProximityOutcome::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use sahasi_core::{ElementKind, PoiCategory, ProximityError};
    use sahasi_core::test_support::StubProximityProvider;
    use std::sync::Arc;

    fn at(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).expect("valid coordinate")
    }

    fn outage() -> ProximityError {
        ProximityError::NetworkError {
            url: "http://interpreter.invalid".to_owned(),
            message: "connection refused".to_owned(),
        }
    }

    #[fixture]
    fn empty_area() -> Arc<StubProximityProvider> {
        Arc::new(StubProximityProvider::answering(false))
    }

    #[rstest]
    fn caches_definitive_answers(empty_area: Arc<StubProximityProvider>) {
        let oracle = CachedProximityOracle::new(Arc::clone(&empty_area));

        let first = oracle.has_nearby_poi(at(12.9716, 77.5946), SearchRadius::DEFAULT);
        let second = oracle.has_nearby_poi(at(12.9716, 77.5946), SearchRadius::DEFAULT);

        assert_eq!(first, ProximityOutcome::NotFound);
        assert_eq!(second, ProximityOutcome::NotFound);
        assert_eq!(empty_area.calls(), 1);
        assert_eq!(oracle.cache().len(), 1);
    }

    #[rstest]
    fn nearby_coordinates_share_an_answer(empty_area: Arc<StubProximityProvider>) {
        let oracle = CachedProximityOracle::new(Arc::clone(&empty_area));

        let _ = oracle.has_nearby_poi(at(12.971_61, 77.594_62), SearchRadius::DEFAULT);
        let _ = oracle.has_nearby_poi(at(12.971_94, 77.594_58), SearchRadius::DEFAULT);

        assert_eq!(empty_area.calls(), 1);
    }

    #[rstest]
    fn queries_with_rounded_coordinate(empty_area: Arc<StubProximityProvider>) {
        let oracle = CachedProximityOracle::new(Arc::clone(&empty_area));

        let _ = oracle.has_nearby_poi(at(12.971_61, 77.594_62), SearchRadius::DEFAULT);

        let requests = empty_area.requests();
        let (coordinate, radius) = requests.first().copied().expect("one request");
        assert_eq!(coordinate.latitude(), 12.972);
        assert_eq!(coordinate.longitude(), 77.595);
        assert_eq!(radius, SearchRadius::DEFAULT);
    }

    #[rstest]
    fn different_radius_is_a_separate_lookup(empty_area: Arc<StubProximityProvider>) {
        let oracle = CachedProximityOracle::new(Arc::clone(&empty_area));
        let wide = SearchRadius::new(1_500).expect("positive radius");

        let _ = oracle.has_nearby_poi(at(1.0, 1.0), SearchRadius::DEFAULT);
        let _ = oracle.has_nearby_poi(at(1.0, 1.0), wide);

        assert_eq!(empty_area.calls(), 2);
    }

    #[rstest]
    fn failure_reports_unknown_and_is_not_cached() {
        let provider = Arc::new(StubProximityProvider::scripted([Err(outage()), Ok(false)]));
        let oracle = CachedProximityOracle::new(Arc::clone(&provider));

        let failed = oracle.has_nearby_poi(at(1.0, 1.0), SearchRadius::DEFAULT);
        assert_eq!(failed, ProximityOutcome::Unknown);
        assert!(oracle.cache().is_empty());

        let retried = oracle.has_nearby_poi(at(1.0, 1.0), SearchRadius::DEFAULT);
        assert_eq!(retried, ProximityOutcome::NotFound);
        assert_eq!(provider.calls(), 2);
    }

    #[rstest]
    fn found_answer_is_cached_as_present() {
        let provider = Arc::new(StubProximityProvider::answering(true));
        let oracle = CachedProximityOracle::new(Arc::clone(&provider));

        let _ = oracle.has_nearby_poi(at(1.0, 1.0), SearchRadius::DEFAULT);
        let key = CacheKey::new(at(1.0, 1.0), SearchRadius::DEFAULT);

        assert_eq!(oracle.cache().get(&key), Some(true));
    }

    #[rstest]
    fn custom_categories_reach_the_provider(empty_area: Arc<StubProximityProvider>) {
        let categories =
            PoiCategorySet::new([PoiCategory::exact(ElementKind::Node, "amenity", "police")])
                .expect("non-empty set");
        let oracle = CachedProximityOracle::with_parts(
            Arc::clone(&empty_area),
            categories.clone(),
            ProximityCache::default(),
        );

        let _ = oracle.has_nearby_poi(at(1.0, 1.0), SearchRadius::DEFAULT);

        assert_eq!(empty_area.calls(), 1);
        assert_eq!(empty_area.category_sets(), vec![categories]);
    }
}
