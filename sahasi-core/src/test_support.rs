//! Deterministic test doubles for [`ProximityProvider`] and
//! [`NearbyPoiOracle`].
//!
//! Both doubles count their calls so tests can assert on caching behaviour,
//! and both are `Send + Sync` so they can be shared across threads.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::{
    Coordinate, NearbyPoiOracle, PoiCategorySet, ProximityError, ProximityOutcome,
    ProximityProvider, ProximityRequest, SearchRadius,
};

/// Stub provider returning pre-configured answers without network access.
///
/// Answers are consumed in order; the last one repeats once the script is
/// exhausted.
#[derive(Debug)]
pub struct StubProximityProvider {
    script: Mutex<VecDeque<Result<bool, ProximityError>>>,
    requests: Mutex<Vec<(Coordinate, SearchRadius)>>,
    category_sets: Mutex<Vec<PoiCategorySet>>,
    calls: AtomicUsize,
}

impl StubProximityProvider {
    /// Provider that always answers `found`.
    #[must_use]
    pub fn answering(found: bool) -> Self {
        Self::scripted([Ok(found)])
    }

    /// Provider that always fails with `error`.
    #[must_use]
    pub fn failing(error: ProximityError) -> Self {
        Self::scripted([Err(error)])
    }

    /// Provider returning `responses` in order, repeating the last one.
    ///
    /// An empty script behaves like [`StubProximityProvider::answering`] with
    /// `true`.
    #[must_use]
    pub fn scripted<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<bool, ProximityError>>,
    {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            category_sets: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests answered so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Coordinates and radii received, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<(Coordinate, SearchRadius)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Category sets received, in call order.
    #[must_use]
    pub fn category_sets(&self) -> Vec<PoiCategorySet> {
        self.category_sets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_response(&self) -> Result<bool, ProximityError> {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        if script.len() > 1 {
            script.pop_front().unwrap_or(Ok(true))
        } else {
            script.front().cloned().unwrap_or(Ok(true))
        }
    }
}

impl ProximityProvider for StubProximityProvider {
    fn any_poi_within(&self, request: &ProximityRequest<'_>) -> Result<bool, ProximityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((request.coordinate, request.radius));
        self.category_sets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.categories.clone());
        self.next_response()
    }
}

/// Oracle returning scripted outcomes, for driving scorers directly.
///
/// Outcomes are consumed in order; the last one repeats.
#[derive(Debug)]
pub struct ScriptedOracle {
    outcomes: Mutex<VecDeque<ProximityOutcome>>,
    lookups: Mutex<Vec<(Coordinate, SearchRadius)>>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    /// Oracle that always reports `outcome`.
    #[must_use]
    pub fn always(outcome: ProximityOutcome) -> Self {
        Self::sequence([outcome])
    }

    /// Oracle reporting `outcomes` in order, repeating the last one.
    ///
    /// An empty sequence reports [`ProximityOutcome::Found`].
    #[must_use]
    pub fn sequence<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ProximityOutcome>,
    {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            lookups: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Coordinates and radii looked up, in call order.
    #[must_use]
    pub fn lookups(&self) -> Vec<(Coordinate, SearchRadius)> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NearbyPoiOracle for ScriptedOracle {
    fn has_nearby_poi(&self, coordinate: Coordinate, radius: SearchRadius) -> ProximityOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((coordinate, radius));
        let mut outcomes = self.outcomes.lock().unwrap_or_else(PoisonError::into_inner);
        if outcomes.len() > 1 {
            outcomes.pop_front().unwrap_or(ProximityOutcome::Found)
        } else {
            outcomes.front().copied().unwrap_or(ProximityOutcome::Found)
        }
    }
}
