//! Bounded least-recently-used cache of proximity answers.

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use sahasi_core::{Coordinate, SearchRadius};
use thiserror::Error;

/// Number of cached answers kept when callers do not configure a capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CACHE_CAPACITY) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Decimal places kept in cache keys (about 111 m of latitude).
const KEY_SCALE: f64 = 1_000.0;

/// Cache key: a coordinate rounded to three decimal places plus a radius.
///
/// Equality and hashing use integer thousandths of a degree, so two keys
/// compare equal exactly when their rounded coordinates do.
///
/// # Examples
///
/// ```
/// use sahasi_core::{Coordinate, SearchRadius};
/// use sahasi_scorer::CacheKey;
///
/// let a = CacheKey::new(Coordinate::new(12.97161, 77.59462)?, SearchRadius::DEFAULT);
/// let b = CacheKey::new(Coordinate::new(12.97149, 77.59458)?, SearchRadius::DEFAULT);
/// assert_eq!(a, b);
/// assert_eq!(a.rounded_coordinate().latitude(), 12.972);
/// # Ok::<(), sahasi_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CacheKey {
    latitude_milli: i32,
    longitude_milli: i32,
    radius: SearchRadius,
    rounded: Coordinate,
}

impl CacheKey {
    /// Round `coordinate` to three decimals and pair it with `radius`.
    #[must_use]
    pub fn new(coordinate: Coordinate, radius: SearchRadius) -> Self {
        let latitude_milli = to_milli(coordinate.latitude());
        let longitude_milli = to_milli(coordinate.longitude());
        // Rounding an in-range value stays in range; keep the input otherwise.
        let rounded = Coordinate::new(from_milli(latitude_milli), from_milli(longitude_milli))
            .unwrap_or(coordinate);
        Self {
            latitude_milli,
            longitude_milli,
            radius,
            rounded,
        }
    }

    /// Latitude in thousandths of a degree.
    #[must_use]
    pub const fn latitude_milli(&self) -> i32 {
        self.latitude_milli
    }

    /// Longitude in thousandths of a degree.
    #[must_use]
    pub const fn longitude_milli(&self) -> i32 {
        self.longitude_milli
    }

    /// Radius part of the key.
    #[must_use]
    pub const fn radius(&self) -> SearchRadius {
        self.radius
    }

    /// The rounded coordinate this key represents.
    #[must_use]
    pub const fn rounded_coordinate(&self) -> Coordinate {
        self.rounded
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        (self.latitude_milli, self.longitude_milli, self.radius)
            == (other.latitude_milli, other.longitude_milli, other.radius)
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude_milli.hash(state);
        self.longitude_milli.hash(state);
        self.radius.hash(state);
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    reason = "validated coordinates scale to at most 180_000, well inside i32"
)]
fn to_milli(degrees: f64) -> i32 {
    (degrees * KEY_SCALE).round() as i32
}

#[expect(
    clippy::float_arithmetic,
    reason = "thousandths convert back to degrees by division"
)]
fn from_milli(milli: i32) -> f64 {
    f64::from(milli) / KEY_SCALE
}

/// Errors returned by [`ProximityCache::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheCapacityError {
    /// A cache must hold at least one entry.
    #[error("proximity cache capacity must be at least 1")]
    Zero,
}

/// Hit and miss counters for a [`ProximityCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found no entry.
    pub misses: u64,
}

/// Thread-safe, fixed-capacity LRU map from [`CacheKey`] to "any POI found".
///
/// When full, inserting a new key evicts the least recently used entry.
/// Lookups and inserts each take the internal lock once, so eviction is
/// atomic with respect to concurrent inserts and the cache never exceeds its
/// capacity.
pub struct ProximityCache {
    entries: Mutex<LruCache<CacheKey, bool>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for ProximityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Default for ProximityCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ProximityCache {
    /// Create a cache holding at most `capacity` answers.
    ///
    /// # Errors
    ///
    /// Returns [`CacheCapacityError::Zero`] for a zero capacity.
    pub fn new(capacity: usize) -> Result<Self, CacheCapacityError> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or(CacheCapacityError::Zero)
    }

    /// Create a cache from an already non-zero capacity.
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up `key`, marking it most recently used on a hit.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<bool> {
        let found = self.lock().get(key).copied();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store an answer, evicting the least recently used entry when full.
    pub fn insert(&self, key: CacheKey, found: bool) {
        self.lock().put(key, found);
    }

    /// Report whether `key` is cached without touching its recency.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains(key)
    }

    /// Number of cached answers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Report whether the cache holds no answers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of cached answers.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Drop every cached answer. Counters are kept.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Snapshot of the hit and miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, bool>> {
        // Every operation leaves the map consistent, so a poisoned lock only
        // means another thread panicked elsewhere while holding it.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
