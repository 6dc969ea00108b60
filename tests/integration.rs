// ABOUTME: Integration tests driving the engine through the paged node family.
// ABOUTME: Covers executor equivalence and observed admission-rate behavior.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fanout::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// f(page, url): the deterministic leaf value for scenario checks.
fn leaf_value(page: u32, url_idx: u32) -> String {
    format!("fetched:p{}:u{}", page, url_idx)
}

/// Callbacks for a 3-page tree with 10 URLs per page (terminal at page 4).
fn scenario_callbacks() -> FetchCallbacks<String> {
    FetchCallbacks {
        fetch_page: Arc::new(|page| page <= 3),
        fetch_urls: Arc::new(|page| (0..10).map(|i| format!("p{}:u{}", page, i)).collect()),
        fetch_url: Arc::new(|url| format!("fetched:{}", url)),
    }
}

fn expected_values() -> Vec<String> {
    let mut want: Vec<String> = (1..=3)
        .flat_map(|p| (0..10).map(move |u| leaf_value(p, u)))
        .collect();
    want.sort();
    want
}

#[tokio::test]
async fn scenario_a_sequential_collects_all_values() {
    init_tracing();
    let sink = ResultSink::new();
    let root = PageWalk::new(scenario_callbacks(), sink.clone());

    execute_sequential(Box::new(root)).await;

    let mut got = sink.take();
    got.sort();
    assert_eq!(got, expected_values());
}

#[tokio::test]
async fn scenario_a_concurrent_collects_all_values() {
    init_tracing();
    let sink = ResultSink::new();
    let root = PageWalk::new(scenario_callbacks(), sink.clone());

    execute_concurrent(Box::new(root), None)
        .await
        .expect("traversal should succeed");

    let mut got = sink.take();
    got.sort();
    assert_eq!(got, expected_values());
}

#[tokio::test]
async fn scenario_a_concurrent_with_limiter_matches_sequential() {
    init_tracing();
    let sink = ResultSink::new();
    let root = PageWalk::new(scenario_callbacks(), sink.clone());
    let options = RateLimitOptions {
        interval: Duration::from_millis(5),
        reqs_rate: 10,
    };

    execute_concurrent(Box::new(root), Some(options))
        .await
        .expect("traversal should succeed");

    let mut got = sink.take();
    got.sort();
    assert_eq!(got, expected_values());
}

/// Callbacks for a single page of `urls` leaves, stamping each leaf fetch
/// time into `observed` so the admission rate can be checked externally.
fn observed_callbacks(urls: u32, observed: ResultSink<Instant>) -> FetchCallbacks<Instant> {
    FetchCallbacks {
        fetch_page: Arc::new(|page| page <= 1),
        fetch_urls: Arc::new(move |_| (0..urls).map(|i| format!("u{}", i)).collect()),
        fetch_url: Arc::new(move |_| {
            let now = Instant::now();
            observed.push(now);
            now
        }),
    }
}

fn sorted_gaps(mut times: Vec<Instant>) -> Vec<Duration> {
    times.sort();
    times.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

#[tokio::test]
async fn scenario_b_observed_rate_stays_within_configured_bound() {
    init_tracing();
    let observed = ResultSink::new();
    let sink = ResultSink::new();
    let root = PageWalk::new(observed_callbacks(4, observed.clone()), sink.clone());
    let options = RateLimitOptions {
        interval: Duration::from_millis(40),
        reqs_rate: 1,
    };

    execute_concurrent(Box::new(root), Some(options))
        .await
        .expect("traversal should succeed");
    assert_eq!(sink.len(), 4);

    // Leaf fetches run right after their spawn is admitted, and every spawn
    // consumes one admission, so consecutive leaf fetch times can never be
    // closer than one window (minus scheduling slack).
    for gap in sorted_gaps(observed.take()) {
        assert!(
            gap >= Duration::from_millis(30),
            "two fetches within one window at rate 1, gap was {:?}",
            gap
        );
    }
}

#[tokio::test]
async fn scenario_c_looser_engine_limit_violates_observer_bound() {
    init_tracing();
    let observed = ResultSink::new();
    let sink = ResultSink::new();
    let root = PageWalk::new(observed_callbacks(6, observed.clone()), sink.clone());
    // Engine admits 2 per window; an observer expecting at most 1 per window
    // must catch back-to-back fetches.
    let options = RateLimitOptions {
        interval: Duration::from_millis(40),
        reqs_rate: 2,
    };

    execute_concurrent(Box::new(root), Some(options))
        .await
        .expect("traversal should succeed");
    assert_eq!(sink.len(), 6);

    let gaps = sorted_gaps(observed.take());
    assert!(
        gaps.iter().any(|gap| *gap < Duration::from_millis(20)),
        "rate 2 per window should release pairs nearly together, gaps were {:?}",
        gaps
    );
}
