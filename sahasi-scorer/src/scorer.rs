//! Stateful safety scorer.

use log::{debug, warn};
use sahasi_core::{
    NearbyPoiOracle, ProximityOutcome, SafetyScore, SearchRadius, SmoothingFactor, smooth,
};

use crate::entry::{LocationEntry, LocationReading};

/// Map an oracle outcome to a raw classification score.
///
/// An unknown outcome is scored as safe: an outage must never raise a false
/// alarm.
#[must_use]
pub const fn raw_score(outcome: ProximityOutcome) -> SafetyScore {
    match outcome {
        ProximityOutcome::Found | ProximityOutcome::Unknown => SafetyScore::SAFE,
        ProximityOutcome::NotFound => SafetyScore::DANGEROUS,
    }
}

/// Tunables for a [`SafetyScorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerConfig {
    /// Search radius passed to the oracle.
    pub radius: SearchRadius,
    /// Weight of the newest classification.
    pub smoothing: SmoothingFactor,
    /// Score reported before the first located entry.
    pub initial_score: SafetyScore,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            radius: SearchRadius::DEFAULT,
            smoothing: SmoothingFactor::DEFAULT,
            initial_score: SafetyScore::SAFE,
        }
    }
}

impl ScorerConfig {
    /// Set the search radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: SearchRadius) -> Self {
        self.radius = radius;
        self
    }

    /// Set the smoothing factor.
    #[must_use]
    pub const fn with_smoothing(mut self, smoothing: SmoothingFactor) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the score reported before the first located entry.
    #[must_use]
    pub const fn with_initial_score(mut self, initial_score: SafetyScore) -> Self {
        self.initial_score = initial_score;
        self
    }
}

/// Scores a stream of location entries for one session.
///
/// Each located entry is classified SAFE when the oracle finds (or cannot
/// rule out) a safety POI nearby and DANGEROUS otherwise; the reported score
/// is that classification smoothed against the previous score. Entries
/// without a usable coordinate leave the state untouched and return the
/// previous score.
///
/// A scorer holds per-session state, so `process` takes `&mut self`. Share
/// the oracle, not the scorer, between sessions.
///
/// # Examples
///
/// ```
/// use sahasi_core::ProximityOutcome;
/// use sahasi_core::test_support::ScriptedOracle;
/// use sahasi_scorer::{LocationEntry, SafetyScorer};
///
/// let oracle = ScriptedOracle::sequence([ProximityOutcome::NotFound, ProximityOutcome::Found]);
/// let mut scorer = SafetyScorer::new(oracle);
///
/// assert_eq!(scorer.process(&LocationEntry::new(12.97, 77.59)).value(), 26);
/// assert_eq!(scorer.process(&LocationEntry::new(12.98, 77.60)).value(), 77);
/// ```
#[derive(Debug)]
pub struct SafetyScorer<O> {
    oracle: O,
    config: ScorerConfig,
    previous_score: SafetyScore,
    previous_entry: Option<LocationReading>,
}

impl<O: NearbyPoiOracle> SafetyScorer<O> {
    /// Create a scorer with the default configuration.
    #[must_use]
    pub fn new(oracle: O) -> Self {
        Self::with_config(oracle, ScorerConfig::default())
    }

    /// Create a scorer with explicit configuration.
    #[must_use]
    pub const fn with_config(oracle: O, config: ScorerConfig) -> Self {
        Self {
            oracle,
            config,
            previous_score: config.initial_score,
            previous_entry: None,
        }
    }

    /// Score `entry` and update the session state.
    pub fn process(&mut self, entry: &LocationEntry) -> SafetyScore {
        let coordinate = match entry.coordinate() {
            Ok(Some(coordinate)) => coordinate,
            Ok(None) => {
                debug!("entry has no coordinate; keeping score {}", self.previous_score);
                return self.previous_score;
            }
            Err(err) => {
                warn!("ignoring entry with invalid coordinate: {err}");
                return self.previous_score;
            }
        };

        let outcome = self.oracle.has_nearby_poi(coordinate, self.config.radius);
        let score = smooth(self.previous_score, raw_score(outcome), self.config.smoothing);
        debug!(
            "scored {coordinate} as {outcome:?}: {} -> {score}",
            self.previous_score
        );

        self.previous_score = score;
        self.previous_entry = Some(LocationReading {
            coordinate,
            time: entry.timestamp(),
        });
        score
    }

    /// Score of the most recent located entry, or the initial score.
    #[must_use]
    pub const fn previous_score(&self) -> SafetyScore {
        self.previous_score
    }

    /// The most recent located entry.
    #[must_use]
    pub const fn previous_entry(&self) -> Option<&LocationReading> {
        self.previous_entry.as_ref()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// The oracle consulted for each located entry.
    #[must_use]
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Forget the session history, returning to the initial score.
    pub const fn reset(&mut self) {
        self.previous_score = self.config.initial_score;
        self.previous_entry = None;
    }
}
