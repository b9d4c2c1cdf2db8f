// Integration tests for `Analyzer` against a wiremock manifest server.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use siteview_core::{AnalysisState, Analyzer, AnalyzerConfig, CoreError, FailureKind};

// ── Helpers ─────────────────────────────────────────────────────────

fn analyzer() -> Analyzer {
    Analyzer::new(AnalyzerConfig::default()).unwrap()
}

fn manifest(name: &str) -> Value {
    json!({
        "metadata": { "name": name, "updated": 0 },
        "items": [
            { "title": "Intro", "slug": "intro", "lastUpdated": 86_400 },
            { "title": "Draft" }
        ]
    })
}

async fn mount_manifest(server: &MockServer, at: &str, body: Value, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_successful_analysis_publishes_model() {
    let server = MockServer::start().await;
    mount_manifest(&server, "/site.json", manifest("Docs"), Duration::ZERO).await;

    let analyzer = analyzer();
    let mut states = analyzer.subscribe();
    assert_eq!(*states.borrow(), AnalysisState::Idle);

    let analysis = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(
        analysis.manifest_url.as_str(),
        format!("{}/site.json", server.uri())
    );
    assert_eq!(analysis.model.overview.name.as_deref(), Some("Docs"));
    assert_eq!(analysis.model.item_count(), 2);
    assert_eq!(
        analysis.model.items[0].content_url,
        format!("{}/intro", server.uri())
    );
    assert_eq!(analysis.model.items[1].content_url, "#");

    assert!(states.has_changed().unwrap());
    let state = states.borrow_and_update().clone();
    assert_eq!(state.model(), Some(&analysis.model));
    assert_eq!(state.generation(), Some(1));
    assert!(!state.is_loading());
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_manifest_is_a_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/site.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let analyzer = analyzer();
    let err = analyzer.analyze(&server.uri()).await.unwrap_err();

    assert!(matches!(err, CoreError::FetchFailed { status: Some(404), .. }));
    match analyzer.state() {
        AnalysisState::Failure { kind, .. } => assert_eq!(kind, FailureKind::Network),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_shape_is_a_validation_failure() {
    let server = MockServer::start().await;
    mount_manifest(&server, "/site.json", json!({ "items": [] }), Duration::ZERO).await;

    let analyzer = analyzer();
    let err = analyzer.analyze(&server.uri()).await.unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(
        analyzer.state(),
        AnalysisState::Failure {
            generation: 1,
            kind: FailureKind::Validation,
            message: "missing `metadata`".into(),
        }
    );
}

#[tokio::test]
async fn test_non_json_body_is_a_validation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/site.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html>"))
        .mount(&server)
        .await;

    let err = analyzer().analyze(&server.uri()).await.unwrap_err();

    assert_eq!(err.failure_kind(), Some(FailureKind::Validation));
}

#[tokio::test]
async fn test_empty_input_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = analyzer();
    let err = analyzer.analyze("   ").await.unwrap_err();

    assert_eq!(err.failure_kind(), Some(FailureKind::Normalization));
    assert!(matches!(
        analyzer.state(),
        AnalysisState::Failure {
            kind: FailureKind::Normalization,
            ..
        }
    ));
}

#[tokio::test]
async fn test_failure_discards_previous_model() {
    let server = MockServer::start().await;
    mount_manifest(&server, "/good/site.json", manifest("Good"), Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/bad/site.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let analyzer = analyzer();
    analyzer
        .analyze(&format!("{}/good", server.uri()))
        .await
        .unwrap();
    assert!(analyzer.state().model().is_some());

    analyzer
        .analyze(&format!("{}/bad/", server.uri()))
        .await
        .unwrap_err();

    let state = analyzer.state();
    assert!(state.model().is_none());
    assert!(!state.is_loading());
    assert_eq!(state.generation(), Some(2));
}

// ── Supersession ────────────────────────────────────────────────────

#[tokio::test]
async fn test_newer_request_supersedes_slow_one() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        "/slow/site.json",
        manifest("Slow"),
        Duration::from_millis(600),
    )
    .await;
    mount_manifest(&server, "/fast/site.json", manifest("Fast"), Duration::ZERO).await;

    let analyzer = analyzer();
    let slow = {
        let analyzer = analyzer.clone();
        let url = format!("{}/slow", server.uri());
        tokio::spawn(async move { analyzer.analyze(&url).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(analyzer.state().is_loading());

    let fast = analyzer
        .analyze(&format!("{}/fast", server.uri()))
        .await
        .unwrap();
    assert_eq!(fast.model.overview.name.as_deref(), Some("Fast"));

    let slow_result = slow.await.unwrap();
    assert!(matches!(slow_result, Err(CoreError::Superseded { .. })));

    let state = analyzer.state();
    assert_eq!(
        state.model().and_then(|m| m.overview.name.as_deref()),
        Some("Fast")
    );
    assert_eq!(state.generation(), Some(2));
}

#[tokio::test]
async fn test_stale_response_never_reaches_subscribers() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        "/slow/site.json",
        manifest("Slow"),
        Duration::from_millis(400),
    )
    .await;
    mount_manifest(&server, "/fast/site.json", manifest("Fast"), Duration::ZERO).await;

    let analyzer = analyzer();
    let mut states = analyzer.subscribe();
    let seen = tokio::spawn(async move {
        let mut names = Vec::new();
        while states.changed().await.is_ok() {
            if let Some(model) = states.borrow_and_update().model() {
                names.push(model.overview.name.clone());
            }
        }
        names
    });

    let slow = {
        let analyzer = analyzer.clone();
        let url = format!("{}/slow", server.uri());
        tokio::spawn(async move { analyzer.analyze(&url).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    analyzer
        .analyze(&format!("{}/fast", server.uri()))
        .await
        .unwrap();
    let _ = slow.await.unwrap();

    drop(analyzer);
    let names = seen.await.unwrap();
    assert_eq!(names, vec![Some("Fast".to_owned())]);
}

#[tokio::test]
async fn test_begin_orders_requests_by_call_not_by_poll() {
    let server = MockServer::start().await;
    mount_manifest(&server, "/first/site.json", manifest("First"), Duration::ZERO).await;
    mount_manifest(&server, "/second/site.json", manifest("Second"), Duration::ZERO).await;

    let analyzer = analyzer();
    let first = analyzer.begin(&format!("{}/first", server.uri()));
    let second = analyzer.begin(&format!("{}/second", server.uri()));

    let second = second.await.unwrap();
    assert_eq!(second.generation, 2);
    assert!(matches!(first.await, Err(CoreError::Superseded { .. })));
    assert_eq!(
        analyzer.state().model().and_then(|m| m.overview.name.as_deref()),
        Some("Second")
    );
}

#[tokio::test]
async fn test_reset_supersedes_in_flight_request() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        "/site.json",
        manifest("Slow"),
        Duration::from_millis(300),
    )
    .await;

    let analyzer = analyzer();
    let pending = {
        let analyzer = analyzer.clone();
        let url = server.uri();
        tokio::spawn(async move { analyzer.analyze(&url).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    analyzer.reset();

    assert!(matches!(
        pending.await.unwrap(),
        Err(CoreError::Superseded { .. })
    ));
    assert_eq!(analyzer.state(), AnalysisState::Idle);
}

#[tokio::test]
async fn test_state_serializes_with_tag() {
    let server = MockServer::start().await;
    mount_manifest(&server, "/site.json", manifest("Docs"), Duration::ZERO).await;

    let analyzer = analyzer();
    analyzer.analyze(&server.uri()).await.unwrap();

    let value = serde_json::to_value(analyzer.state()).unwrap();
    assert_eq!(value["state"], "success");
    assert_eq!(value["model"]["overview"]["name"], "Docs");
    assert_eq!(value["model"]["items"][0]["last_updated"], "1970-01-02 00:00:00 UTC");
}
