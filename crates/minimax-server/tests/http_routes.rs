// crates/minimax-server/tests/http_routes.rs
mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{eventually, scheduler, GatedExecutor};
use minimax_server::server::router;

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn status_reports_counters() {
    let sched = scheduler(3, 7, Duration::from_secs(5), GatedExecutor::new());
    let (status, body) = get(router(sched), "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "online",
            "active_workers": 0,
            "worker_limit": 3,
            "active_sessions": 0,
            "session_limit": 7,
        })
    );
}

#[tokio::test]
async fn tic_tac_toe_route_returns_evaluations() {
    let exec = GatedExecutor::new();
    exec.release(10);
    let sched = scheduler(1, 1, Duration::from_secs(5), exec);

    let (status, body) = get(router(sched), "/tic_tac_toe/xo_xo____?alpha_beta_pruning=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evaluations"], json!([-1.0, -1.0, 1.0, 0.0, -1.0]));
    assert_eq!(body["evaluated_nodes"], json!(109));
}

#[tokio::test]
async fn connect_four_route_accepts_depth_limit() {
    let exec = GatedExecutor::new();
    exec.release(10);
    let sched = scheduler(1, 1, Duration::from_secs(5), exec);

    let (status, body) = get(
        router(sched),
        "/connect_four/yy,r,r,,,,?depth_limit=true&depth_limit_value=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evaluations"], json!([0.04, 0.04, 0.02, 0.02, 0.02, 0.0, 0.0]));
    assert_eq!(body["evaluated_nodes"], json!(7));
}

#[tokio::test]
async fn validation_errors_are_400_without_a_task() {
    let exec = GatedExecutor::new();
    let sched = scheduler(1, 1, Duration::from_secs(5), exec.clone());
    let app = router(sched);

    for uri in [
        "/tic_tac_toe/xo",
        "/tic_tac_toe/oo_______",
        "/connect_four/yyyyyyy,,,,,,",
        "/connect_four/,,,,,,?depth_limit=true",
        "/connect_four/,,,,,,?depth_limit=true&depth_limit_value=26",
    ] {
        let (status, body) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["detail"].is_string(), "{uri}");
    }
    assert_eq!(exec.launched(), 0);
}

#[tokio::test]
async fn slow_analysis_is_504() {
    let exec = GatedExecutor::new();
    let sched = scheduler(1, 1, Duration::from_millis(50), exec.clone());

    let (status, body) = get(router(sched.clone()), "/tic_tac_toe/_________").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["detail"], json!("analysis timed out"));
    assert_eq!(exec.live(), 0);
    assert_eq!(sched.stats().active_workers, 0);
}

#[tokio::test]
async fn worker_failure_is_500() {
    let exec = GatedExecutor::failing();
    exec.release(1);
    let sched = scheduler(1, 1, Duration::from_secs(5), exec);

    let (status, body) = get(router(sched), "/tic_tac_toe/_________").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("worker crashed"));
}

#[tokio::test]
async fn abandoned_request_kills_its_worker() {
    let exec = GatedExecutor::new();
    let sched = scheduler(1, 1, Duration::from_secs(30), exec.clone());

    let request = Request::builder()
        .uri("/tic_tac_toe/_________")
        .body(Body::empty())
        .unwrap();
    // The client gives up before the gated job is released.
    let abandoned =
        tokio::time::timeout(Duration::from_millis(100), router(sched.clone()).oneshot(request)).await;
    assert!(abandoned.is_err());
    assert_eq!(exec.launched(), 1);

    eventually(|| exec.live() == 0 && sched.stats().active_workers == 0).await;
}
