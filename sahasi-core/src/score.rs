//! Published safety scores and their exponential smoothing.

use std::fmt;

use thiserror::Error;

/// Integer safety score in `0..=100`; higher is safer.
///
/// # Examples
///
/// ```
/// use sahasi_core::SafetyScore;
///
/// let score = SafetyScore::new(42)?;
/// assert_eq!(score.value(), 42);
/// assert!(SafetyScore::new(101).is_err());
/// # Ok::<(), sahasi_core::SafetyScoreError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct SafetyScore(u8);

/// Errors returned by [`SafetyScore::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SafetyScoreError {
    /// The value exceeded 100.
    #[error("safety score {value} exceeds 100")]
    OutOfRange {
        /// Rejected value.
        value: u8,
    },
}

impl SafetyScore {
    /// Lowest possible score.
    pub const MIN: Self = Self(0);
    /// Highest possible score.
    pub const MAX: Self = Self(100);
    /// Raw score for a location with at least one safety POI nearby.
    pub const SAFE: Self = Self(90);
    /// Raw score for a location with no safety POI nearby.
    pub const DANGEROUS: Self = Self(10);

    /// Validate and construct a score.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyScoreError::OutOfRange`] for values above 100.
    pub const fn new(value: u8) -> Result<Self, SafetyScoreError> {
        if value > Self::MAX.0 {
            return Err(SafetyScoreError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Score as a plain integer.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SafetyScore {
    type Error = SafetyScoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SafetyScore> for u8 {
    fn from(score: SafetyScore) -> Self {
        score.0
    }
}

impl fmt::Display for SafetyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weight given to the newest raw score during smoothing.
///
/// A factor of `1.0` disables smoothing; `0.0` freezes the score.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SmoothingFactor(f64);

/// Errors returned by [`SmoothingFactor::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SmoothingFactorError {
    /// The factor was non-finite or outside `0.0..=1.0`.
    #[error("smoothing factor {factor} must be between 0.0 and 1.0")]
    OutOfRange {
        /// Rejected factor.
        factor: f64,
    },
}

impl SmoothingFactor {
    /// Factor used when callers do not configure one.
    pub const DEFAULT: Self = Self(0.8);

    /// Validate and construct a smoothing factor.
    ///
    /// # Errors
    ///
    /// Returns [`SmoothingFactorError::OutOfRange`] for non-finite values or
    /// values outside `0.0..=1.0`.
    pub fn new(factor: f64) -> Result<Self, SmoothingFactorError> {
        if !factor.is_finite() || !(0.0..=1.0).contains(&factor) {
            return Err(SmoothingFactorError::OutOfRange { factor });
        }
        Ok(Self(factor))
    }

    /// The factor as a float.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for SmoothingFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Blend a raw score into the previous one with an exponential moving average.
///
/// Computes `round(factor * raw + (1 - factor) * previous)`, rounding halves
/// away from zero. The result always lies between `previous` and `raw`.
///
/// # Examples
///
/// ```
/// use sahasi_core::{SafetyScore, SmoothingFactor, smooth};
///
/// let next = smooth(SafetyScore::SAFE, SafetyScore::DANGEROUS, SmoothingFactor::DEFAULT);
/// assert_eq!(next.value(), 26);
/// let back = smooth(next, SafetyScore::SAFE, SmoothingFactor::DEFAULT);
/// assert_eq!(back.value(), 77);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the weighted blend is computed in f64 and clamped to 0..=100 before narrowing"
)]
pub fn smooth(previous: SafetyScore, raw: SafetyScore, factor: SmoothingFactor) -> SafetyScore {
    let weight = factor.get();
    let blended = weight * f64::from(raw.value()) + (1.0 - weight) * f64::from(previous.value());
    let rounded = blended
        .round()
        .clamp(f64::from(SafetyScore::MIN.0), f64::from(SafetyScore::MAX.0));
    SafetyScore(rounded as u8)
}
