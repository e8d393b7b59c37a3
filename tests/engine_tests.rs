use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use httpmock::prelude::*;
use userfinder::config::{AppConfig, SiteConfig};
use userfinder::core::catalog::{Catalog, PlatformEntry};
use userfinder::core::engine::{dispatch, run, Engine};
use userfinder::core::types::ProbeResult;
use userfinder::modules::recon::username::{HttpProber, Probe};

const UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/117.0";

/// Nothing listens on port 1, so connecting fails immediately.
const REFUSED: &str = "http://127.0.0.1:1/{u}";

fn prober(timeout: Duration) -> Arc<HttpProber> {
    Arc::new(HttpProber::new(UA, timeout).unwrap())
}

#[tokio::test]
async fn mixed_outcomes_are_classified_and_ordered() {
    let server = MockServer::start();
    let ok = server.mock(|when, then| {
        when.method(GET).path("/a/alice").header("user-agent", UA);
        then.status(200);
    });
    let missing = server.mock(|when, then| {
        when.method(GET).path("/b/alice");
        then.status(404);
    });

    let catalog = Catalog::new(vec![
        PlatformEntry::new("C", REFUSED),
        PlatformEntry::new("b", format!("{}/b/{{u}}", server.base_url())),
        PlatformEntry::new("A", format!("{}/a/{{u}}", server.base_url())),
    ])
    .unwrap();

    let results = run(prober(Duration::from_secs(8)), &catalog, "alice", 15)
        .await
        .unwrap();

    ok.assert();
    missing.assert();
    assert_eq!(
        results,
        vec![
            ProbeResult::new("A", server.url("/a/alice"), true),
            ProbeResult::new("b", server.url("/b/alice"), false),
            ProbeResult::new("C", "http://127.0.0.1:1/alice", false),
        ]
    );
}

#[tokio::test]
async fn only_exact_200_counts_as_found() {
    let server = MockServer::start();
    for (path, status) in [("/s201/bob", 201), ("/s204/bob", 204), ("/s500/bob", 500)] {
        server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(status);
        });
    }
    let catalog = Catalog::new(
        ["s201", "s204", "s500"]
            .iter()
            .map(|p| PlatformEntry::new(*p, format!("{}/{}/{{u}}", server.base_url(), p)))
            .collect(),
    )
    .unwrap();

    let results = run(prober(Duration::from_secs(8)), &catalog, "bob", 2)
        .await
        .unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.found));
}

#[tokio::test]
async fn all_failures_still_yield_full_result_set() {
    let catalog = Catalog::new(
        (0..6)
            .map(|i| PlatformEntry::new(format!("dead{}", i), REFUSED))
            .collect(),
    )
    .unwrap();

    let results = dispatch(prober(Duration::from_secs(2)), &catalog, "nobody", 3)
        .await
        .unwrap();
    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|r| !r.found));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_site_times_out_without_holding_back_siblings() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/slow/carol");
        then.status(200).delay(Duration::from_secs(5));
    });
    for p in ["/f1/carol", "/f2/carol", "/f3/carol"] {
        server.mock(|when, then| {
            when.method(GET).path(p);
            then.status(200);
        });
    }
    let catalog = Catalog::new(
        ["slow", "f1", "f2", "f3"]
            .iter()
            .map(|p| PlatformEntry::new(*p, format!("{}/{}/{{u}}", server.base_url(), p)))
            .collect(),
    )
    .unwrap();

    let started = Instant::now();
    let results = run(prober(Duration::from_millis(500)), &catalog, "carol", 4)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
    let found: Vec<(&str, bool)> = results
        .iter()
        .map(|r| (r.platform.as_str(), r.found))
        .collect();
    assert_eq!(
        found,
        vec![("f1", true), ("f2", true), ("f3", true), ("slow", false)]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_sites_are_checked_in_parallel() {
    let server = MockServer::start();
    let names = ["s1", "s2", "s3", "s4", "s5", "s6"];
    for name in names {
        server.mock(|when, then| {
            when.method(GET).path(format!("/{}/hank", name));
            then.status(200).delay(Duration::from_millis(300));
        });
    }
    let catalog = Catalog::new(
        names
            .iter()
            .map(|p| PlatformEntry::new(*p, format!("{}/{}/{{u}}", server.base_url(), p)))
            .collect(),
    )
    .unwrap();

    let started = Instant::now();
    let results = run(prober(Duration::from_secs(8)), &catalog, "hank", 6)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(results.iter().all(|r| r.found));
    assert!(elapsed < Duration::from_millis(1200), "took {:?}", elapsed);
}

#[tokio::test]
async fn username_is_percent_encoded_on_the_wire() {
    let server = MockServer::start();
    let hit = server.mock(|when, then| {
        when.method(GET).path_contains("/u/a");
        then.status(200);
    });
    let entry = PlatformEntry::new("Enc", format!("{}/u/{{u}}", server.base_url()));

    let result = prober(Duration::from_secs(8)).probe(&entry, "a b/c").await;

    assert_eq!(result.url, server.url("/u/a+b%2Fc"));
    assert!(result.found);
    hit.assert();
}

#[tokio::test]
async fn engine_hits_mock_site() {
    let server = MockServer::start();
    let _hit = server.mock(|when, then| {
        when.method(GET).path("/user/tester");
        then.status(200);
    });

    let cfg = AppConfig {
        timeout_ms: 2000,
        max_concurrent_requests: 2,
        user_agent: "uf-test".to_string(),
        sites: vec![
            SiteConfig {
                name: "mock".into(),
                url: format!("{}/user/{{u}}", server.base_url()),
                enabled: true,
            },
            SiteConfig {
                name: "skipped".into(),
                url: REFUSED.into(),
                enabled: false,
            },
        ],
    };

    let engine = Engine::new(&cfg).unwrap();
    let res = engine.scan_username("tester").await.unwrap();
    assert_eq!(res, vec![ProbeResult::new("mock", server.url("/user/tester"), true)]);
}
