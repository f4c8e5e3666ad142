mod common;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
};
use inventory_reservation_api::routes::{create_app, health::health_check};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_reports_unreachable_database() {
    let (code, response) = health_check(State(common::lazy_state())).await;
    assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "degraded");
    assert_eq!(data.database, "unavailable");
    assert_eq!(data.tracked_owners, 0);
}

#[tokio::test]
async fn health_route_is_unavailable_without_database() {
    let app = create_app(common::lazy_state());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn health_check_is_ok_with_database() -> anyhow::Result<()> {
    let Some(state) = common::db_state().await? else {
        return Ok(());
    };

    let (code, response) = health_check(State(state)).await;
    assert_eq!(code, StatusCode::OK);
    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "ok");
    Ok(())
}
