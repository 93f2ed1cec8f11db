use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::routing::get;
use mcpt_registry::{FetchError, HttpFetcher, RegistryDocument, RegistryFetcher};

const REGISTRY_BODY: &str = r#"{"tools":[{"id":"file-compass","name":"File Compass"}]}"#;

/// Serve `router` on an ephemeral port from a dedicated runtime thread so the
/// blocking fetcher under test never runs inside an async context.
fn spawn_server(router: Router) -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
                .await
                .expect("bind listener");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("send addr");
            axum::serve(listener, router).await.expect("serve");
        });
    });
    rx.recv().expect("server addr")
}

fn registry_router() -> Router {
    Router::new()
        .route(
            "/acme/tools/v1/registry.json",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], REGISTRY_BODY) }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                REGISTRY_BODY
            }),
        )
}

#[test]
fn fetches_body_on_success() {
    let addr = spawn_server(registry_router());
    let fetcher = HttpFetcher::new().expect("client");
    let body = fetcher
        .fetch(&format!("http://{addr}/acme/tools/v1/registry.json"))
        .expect("fetch");
    let doc: RegistryDocument = serde_json::from_str(&body).expect("parse");
    assert_eq!(doc.tools[0].id, "file-compass");
}

#[test]
fn non_success_status_is_an_error() {
    let addr = spawn_server(registry_router());
    let fetcher = HttpFetcher::new().expect("client");

    let err = fetcher
        .fetch(&format!("http://{addr}/broken"))
        .expect_err("500");
    assert!(matches!(err, FetchError::Status(500)), "got {err:?}");

    let err = fetcher
        .fetch(&format!("http://{addr}/nope/registry.json"))
        .expect_err("404");
    assert!(matches!(err, FetchError::Status(404)), "got {err:?}");
}

#[test]
fn slow_responses_time_out() {
    let addr = spawn_server(registry_router());
    let fetcher = HttpFetcher::with_timeout(Duration::from_millis(200)).expect("client");
    let err = fetcher
        .fetch(&format!("http://{addr}/slow"))
        .expect_err("timeout");
    assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
}

#[test]
fn refused_connection_is_a_transport_error() {
    let port = {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("probe");
        probe.local_addr().expect("addr").port()
    };
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(2)).expect("client");
    let err = fetcher
        .fetch(&format!("http://127.0.0.1:{port}/registry.json"))
        .expect_err("refused");
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}
