//! Many scorers sharing one cached oracle across threads.

use rstest::rstest;
use sahasi_core::test_support::StubProximityProvider;
use sahasi_core::{PoiCategorySet, SafetyScore};
use sahasi_scorer::{CachedProximityOracle, LocationEntry, ProximityCache, SafetyScorer};
use std::sync::Arc;
use std::thread;

const THREADS: u32 = 8;
const ENTRIES_PER_THREAD: u32 = 64;

fn entry(thread: u32, step: u32) -> LocationEntry {
    LocationEntry::new(f64::from(thread), f64::from(step) / 100.0)
}

#[rstest]
fn cache_stays_bounded_under_concurrent_scoring() {
    let provider = Arc::new(StubProximityProvider::answering(false));
    let cache = ProximityCache::new(16).expect("non-zero capacity");
    let oracle = Arc::new(CachedProximityOracle::with_parts(
        Arc::clone(&provider),
        PoiCategorySet::safety_defaults(),
        cache,
    ));

    thread::scope(|scope| {
        for worker in 0..THREADS {
            let oracle = Arc::clone(&oracle);
            scope.spawn(move || {
                let mut scorer = SafetyScorer::new(oracle);
                for step in 0..ENTRIES_PER_THREAD {
                    let score = scorer.process(&entry(worker, step));
                    assert!(score <= SafetyScore::SAFE && score >= SafetyScore::DANGEROUS);
                }
            });
        }
    });

    assert!(oracle.cache().len() <= 16);
    assert_eq!(
        provider.calls(),
        usize::try_from(THREADS * ENTRIES_PER_THREAD).expect("fits in usize")
    );
}

#[rstest]
fn sessions_keep_independent_scores() {
    let provider = Arc::new(StubProximityProvider::answering(false));
    let oracle = Arc::new(CachedProximityOracle::new(Arc::clone(&provider)));
    let mut walker = SafetyScorer::new(Arc::clone(&oracle));
    let mut idler = SafetyScorer::new(Arc::clone(&oracle));

    let _ = walker.process(&LocationEntry::new(12.9716, 77.5946));
    let _ = walker.process(&LocationEntry::new(12.9716, 77.5946));

    assert_eq!(walker.previous_score().value(), 13);
    assert_eq!(idler.previous_score(), SafetyScore::SAFE);
    assert_eq!(idler.process(&LocationEntry::new(12.9716, 77.5946)).value(), 26);
    assert_eq!(provider.calls(), 1);
}

#[rstest]
fn concurrent_lookups_of_one_key_leave_one_entry() {
    let provider = Arc::new(StubProximityProvider::answering(true));
    let oracle = Arc::new(CachedProximityOracle::new(Arc::clone(&provider)));

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let oracle = Arc::clone(&oracle);
            scope.spawn(move || {
                let mut scorer = SafetyScorer::new(oracle);
                let score = scorer.process(&LocationEntry::new(48.8566, 2.3522));
                assert_eq!(score, SafetyScore::SAFE);
            });
        }
    });

    assert_eq!(oracle.cache().len(), 1);
    assert!(provider.calls() >= 1);
}
