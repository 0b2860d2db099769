//! Validated WGS84 coordinates and search radii.

use std::fmt;

use geo::Coord;
use thiserror::Error;

/// A validated WGS84 position.
///
/// Internally stored as a [`geo::Coord`] with `x = longitude` and
/// `y = latitude`, matching the convention used for OpenStreetMap data.
///
/// # Examples
///
/// ```
/// use sahasi_core::Coordinate;
///
/// let coordinate = Coordinate::new(12.9716, 77.5946)?;
/// assert_eq!(coordinate.latitude(), 12.9716);
/// assert_eq!(coordinate.as_coord().x, 77.5946);
/// # Ok::<(), sahasi_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    location: Coord<f64>,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was non-finite or outside `-90.0..=90.0`.
    #[error("latitude {latitude} is outside -90..=90")]
    LatitudeOutOfRange {
        /// Rejected latitude.
        latitude: f64,
    },
    /// Longitude was non-finite or outside `-180.0..=180.0`.
    #[error("longitude {longitude} is outside -180..=180")]
    LongitudeOutOfRange {
        /// Rejected longitude.
        longitude: f64,
    },
}

impl Coordinate {
    /// Validate and construct a coordinate from latitude and longitude.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is non-finite or out
    /// of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange { latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange { longitude });
        }
        Ok(Self {
            location: Coord {
                x: longitude,
                y: latitude,
            },
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Borrow the position as a `geo` coordinate.
    #[must_use]
    pub const fn as_coord(&self) -> Coord<f64> {
        self.location
    }
}

impl TryFrom<Coord<f64>> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(value.y, value.x)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude(), self.longitude())
    }
}

/// Search radius around a coordinate, in whole metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchRadius(u32);

/// Errors returned by [`SearchRadius::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchRadiusError {
    /// A zero radius cannot contain anything.
    #[error("search radius must be positive")]
    Zero,
}

impl SearchRadius {
    /// Radius used when callers do not configure one.
    pub const DEFAULT: Self = Self(600);

    /// Validate and construct a radius in metres.
    ///
    /// # Errors
    ///
    /// Returns [`SearchRadiusError::Zero`] for a zero radius.
    pub const fn new(metres: u32) -> Result<Self, SearchRadiusError> {
        if metres == 0 {
            return Err(SearchRadiusError::Zero);
        }
        Ok(Self(metres))
    }

    /// Radius in metres.
    #[must_use]
    pub const fn metres(self) -> u32 {
        self.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}
