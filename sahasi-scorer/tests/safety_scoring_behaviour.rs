//! Behavioural tests for [`SafetyScorer`] over a cached oracle.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sahasi_core::test_support::StubProximityProvider;
use sahasi_core::{ProximityError, SafetyScore};
use sahasi_scorer::{CachedProximityOracle, LocationEntry, SafetyScorer, ScorerConfig};
use std::cell::{Cell, RefCell};
use std::sync::Arc;

type SharedOracle = Arc<CachedProximityOracle<Arc<StubProximityProvider>>>;

/// Per-scenario state shared between steps.
#[derive(Default)]
struct ScoringWorld {
    provider: RefCell<Option<Arc<StubProximityProvider>>>,
    oracle: RefCell<Option<SharedOracle>>,
    scorer: RefCell<Option<SafetyScorer<SharedOracle>>>,
    last_score: Cell<Option<SafetyScore>>,
}

#[fixture]
fn world() -> ScoringWorld {
    ScoringWorld::default()
}

fn install(world: &ScoringWorld, provider: StubProximityProvider) {
    let provider = Arc::new(provider);
    let oracle = Arc::new(CachedProximityOracle::new(Arc::clone(&provider)));
    *world.scorer.borrow_mut() = Some(SafetyScorer::new(Arc::clone(&oracle)));
    *world.oracle.borrow_mut() = Some(oracle);
    *world.provider.borrow_mut() = Some(provider);
}

fn score_entry(world: &ScoringWorld, entry: &LocationEntry) {
    let mut scorer = world.scorer.borrow_mut();
    let scorer = scorer.as_mut().expect("scorer must be configured");
    world.last_score.set(Some(scorer.process(entry)));
}

fn oracle(world: &ScoringWorld) -> SharedOracle {
    world
        .oracle
        .borrow()
        .clone()
        .expect("oracle must be configured")
}

// --- Given steps ---

#[given("an area without safety POIs")]
fn area_without_pois(world: &ScoringWorld) {
    install(world, StubProximityProvider::answering(false));
}

#[given("an area with safety POIs")]
fn area_with_pois(world: &ScoringWorld) {
    install(world, StubProximityProvider::answering(true));
}

#[given("an interpreter that fails once and then finds no safety POIs")]
fn flaky_interpreter(world: &ScoringWorld) {
    let outage = ProximityError::Timeout {
        url: "http://interpreter.invalid/api/interpreter".to_owned(),
        timeout_secs: 15,
    };
    install(world, StubProximityProvider::scripted([Err(outage), Ok(false)]));
}

#[given("a scorer starting at {initial}")]
fn scorer_starting_at(world: &ScoringWorld, initial: u8) {
    let initial = SafetyScore::new(initial).expect("initial score in range");
    let config = ScorerConfig::default().with_initial_score(initial);
    *world.scorer.borrow_mut() = Some(SafetyScorer::with_config(oracle(world), config));
}

// --- When steps ---

#[when("the location at latitude {latitude} and longitude {longitude} is scored")]
fn location_scored(world: &ScoringWorld, latitude: f64, longitude: f64) {
    score_entry(world, &LocationEntry::new(latitude, longitude));
}

#[when("an entry at latitude {latitude} and longitude {longitude} is scored")]
fn raw_entry_scored(world: &ScoringWorld, latitude: f64, longitude: f64) {
    score_entry(world, &LocationEntry::new(latitude, longitude));
}

#[when("an entry without coordinates is scored")]
fn entry_without_coordinates(world: &ScoringWorld) {
    let entry: LocationEntry =
        serde_json::from_str(r#"{"time": "2024-03-01T21:15:00Z"}"#).expect("entry parses");
    score_entry(world, &entry);
}

#[when("{count} consecutive entries at latitude {latitude} and longitude {longitude} are scored")]
fn consecutive_entries(world: &ScoringWorld, count: usize, latitude: f64, longitude: f64) {
    for _ in 0..count {
        score_entry(world, &LocationEntry::new(latitude, longitude));
    }
}

// --- Then steps ---

#[then("the score is {expected}")]
fn score_is(world: &ScoringWorld, expected: u8) {
    let score = world.last_score.get().expect("an entry must have been scored");
    assert_eq!(score.value(), expected);
}

#[then("the interpreter was queried {count} times")]
fn interpreter_queried(world: &ScoringWorld, count: usize) {
    let provider = world.provider.borrow();
    assert_eq!(provider.as_ref().expect("provider configured").calls(), count);
}

#[then("the answer cache holds {count} entries")]
fn cache_holds(world: &ScoringWorld, count: usize) {
    assert_eq!(oracle(world).cache().len(), count);
}

#[then("the last located entry is at latitude {latitude}")]
fn last_located(world: &ScoringWorld, latitude: f64) {
    let scorer = world.scorer.borrow();
    let reading = scorer
        .as_ref()
        .and_then(SafetyScorer::previous_entry)
        .copied()
        .expect("a located entry must be recorded");
    assert!((reading.coordinate.latitude() - latitude).abs() < 1e-9);
}

#[then("no located entry is recorded")]
fn no_located_entry(world: &ScoringWorld) {
    let scorer = world.scorer.borrow();
    let scorer = scorer.as_ref().expect("scorer must be configured");
    assert!(scorer.previous_entry().is_none());
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/safety_scoring.feature", name = $title)]
        fn $fn_name(world: ScoringWorld) {
            let _ = world;
        }
    };
}

register_scenario!(isolated_location, "an isolated location lowers the score");
register_scenario!(safe_location, "a safe location restores confidence");
register_scenario!(
    entry_without_coordinates_keeps_score,
    "an entry without coordinates keeps the previous score"
);
register_scenario!(
    impossible_coordinate,
    "an entry with an impossible coordinate is ignored"
);
register_scenario!(nearby_locations, "nearby locations share one lookup");
register_scenario!(outage, "an outage is scored as safe and retried");
register_scenario!(
    dangerous_streak,
    "a dangerous streak settles at the dangerous score"
);
