//! End-to-end tests for the HTTP surface.
//!
//! Drives the axum router with `tower::ServiceExt::oneshot` against recording
//! fakes, and once against the real in-process adapters.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shared_bus::{InMemoryCommandBus, UpdateCommand};
use tower::ServiceExt;
use wl_source_api::adapters::{BusUpdateQueue, InMemorySourceRegistry, StaticIdentityProvider};
use wl_source_api::domain::{Source, SourceId};
use wl_source_api::testing::{FakeIdentityProvider, FakeSourceRegistry, RecordingQueue};
use wl_source_api::{Clients, ServiceConfig, SourceUpdateServer};

struct TestApp {
    router: Router,
    identity: Arc<FakeIdentityProvider>,
    registry: Arc<FakeSourceRegistry>,
    queue: Arc<RecordingQueue>,
}

fn app_with(
    identity: FakeIdentityProvider,
    registry: FakeSourceRegistry,
    queue: RecordingQueue,
) -> TestApp {
    let identity = Arc::new(identity);
    let registry = Arc::new(registry);
    let queue = Arc::new(queue);

    let clients = Clients {
        identity: identity.clone(),
        registry: registry.clone(),
        queue: queue.clone(),
        bus: None,
    };
    let server = SourceUpdateServer::new(ServiceConfig::default(), clients)
        .expect("valid default config");

    TestApp {
        router: server.router(),
        identity,
        registry,
        queue,
    }
}

fn app() -> TestApp {
    app_with(
        FakeIdentityProvider::accepting(["abc123"]),
        FakeSourceRegistry::with_sources(["wl-42"]),
        RecordingQueue::accepting(),
    )
}

fn update_request(path: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_update_requested_for_known_source() {
    let app = app();

    let (status, body) = send(
        &app.router,
        update_request("/sources/wl-42/update", Some("Bearer abc123")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Update requested for source wl-42"}));
    assert_eq!(app.queue.published(), vec![UpdateCommand::incremental("wl-42")]);
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let app = app();

    let response = app
        .router
        .clone()
        .oneshot(update_request("/sources/wl-42/update", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Unauthorized"}));

    assert_eq!(app.identity.calls(), 0);
    assert_eq!(app.registry.calls(), 0);
    assert_eq!(app.queue.calls(), 0);
}

#[tokio::test]
async fn test_wrong_scheme_makes_no_downstream_calls() {
    let app = app();

    for value in ["bearer abc123", "Basic YWxhZGRpbjpvcGVu", "Bearer "] {
        let (status, body) =
            send(&app.router, update_request("/sources/wl-42/update", Some(value))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", value);
        assert_eq!(body, json!({"error": "Unauthorized"}));
    }

    assert_eq!(app.identity.calls(), 0);
    assert_eq!(app.registry.calls(), 0);
}

#[tokio::test]
async fn test_rejected_token() {
    let app = app();

    let (status, _) = send(
        &app.router,
        update_request("/sources/wl-42/update", Some("Bearer expired")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.identity.seen_tokens(), vec!["expired".to_string()]);
    assert_eq!(app.registry.calls(), 0);
}

#[tokio::test]
async fn test_unknown_source() {
    let app = app();

    let (status, body) = send(
        &app.router,
        update_request("/sources/wl-43/update", Some("Bearer abc123")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Source not found"}));
    assert_eq!(app.queue.calls(), 0);
}

#[tokio::test]
async fn test_blank_source_id() {
    let app = app();

    let (status, body) = send(
        &app.router,
        update_request("/sources/%20/update", Some("Bearer abc123")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Source not found"}));

    let (status, body) = send(
        &app.router,
        update_request("/sources//update", Some("Bearer abc123")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Source not found"}));

    // Auth still runs before the id is considered.
    let (status, _) = send(&app.router, update_request("/sources//update", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.registry.calls(), 0);
    assert_eq!(app.queue.calls(), 0);
}

#[tokio::test]
async fn test_registry_unavailable() {
    let app = app_with(
        FakeIdentityProvider::accepting(["abc123"]),
        FakeSourceRegistry::failing(),
        RecordingQueue::accepting(),
    );

    let (status, body) = send(
        &app.router,
        update_request("/sources/wl-42/update", Some("Bearer abc123")),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"message": "Source registry unavailable"}));
    assert_eq!(app.queue.calls(), 0);
}

#[tokio::test]
async fn test_dispatch_failure() {
    let app = app_with(
        FakeIdentityProvider::accepting(["abc123"]),
        FakeSourceRegistry::with_sources(["wl-42"]),
        RecordingQueue::rejecting(),
    );

    let (status, body) = send(
        &app.router,
        update_request("/sources/wl-42/update", Some("Bearer abc123")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"message": "Failed to request update for source wl-42"})
    );
    assert_eq!(app.queue.calls(), 1);
}

#[tokio::test]
async fn test_identity_provider_down_is_unauthorized() {
    let app = app_with(
        FakeIdentityProvider::failing(),
        FakeSourceRegistry::with_sources(["wl-42"]),
        RecordingQueue::accepting(),
    );

    let (status, body) = send(
        &app.router,
        update_request("/sources/wl-42/update", Some("Bearer abc123")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = app();

    send(
        &app.router,
        update_request("/sources/wl-42/update", Some("Bearer abc123")),
    )
    .await;
    send(&app.router, update_request("/sources/wl-42/update", None)).await;

    let get = |uri: &str| Request::get(uri).body(Body::empty()).unwrap();

    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app.router, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requests"]["total"], 2);
    assert_eq!(body["requests"]["accepted"], 1);
    assert_eq!(body["requests"]["unauthorized"], 1);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app();

    let (status, _) = send(
        &app.router,
        update_request("/words/wl-42", Some("Bearer abc123")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.identity.calls(), 0);
}

#[tokio::test]
async fn test_in_process_adapters_deliver_to_worker() {
    let registry = InMemorySourceRegistry::new("sources");
    registry.insert(Source::new(SourceId::parse(Some("wl-42")).unwrap()));

    let bus = Arc::new(InMemoryCommandBus::new());
    let mut worker = bus.subscribe();

    let clients = Clients {
        identity: Arc::new(StaticIdentityProvider::new(["abc123"])),
        registry: Arc::new(registry),
        queue: Arc::new(BusUpdateQueue::new(Arc::clone(&bus), "update-from-source")),
        bus: Some(Arc::clone(&bus)),
    };
    let server = SourceUpdateServer::new(ServiceConfig::default(), clients).unwrap();

    let (status, _) = send(
        &server.router(),
        update_request("/sources/wl-42/update", Some("Bearer abc123")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let envelope = worker.recv().await.unwrap();
    assert_eq!(envelope.queue, "update-from-source");
    assert_eq!(
        serde_json::to_value(&envelope.command).unwrap(),
        json!({"id": "wl-42", "force": false})
    );
}
