use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use ohub_database::Database;
use ohub_kernel::domain::registry::{FeatureSlice, InitializedSlice};
use ohub_kernel::server::{ApiState, ApiStateError, ErrorBody, system_router};
use std::any::Any;
use tower::ServiceExt;

#[derive(Debug)]
struct Greeter {
    greeting: &'static str,
}

impl FeatureSlice for Greeter {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Unregistered;

impl FeatureSlice for Unregistered {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

async fn database() -> Database {
    Database::builder().url("mem://").session("test", "kernel").init().await.expect("mem db")
}

#[tokio::test]
async fn slices_are_found_by_type() {
    let state = ApiState::builder()
        .db(database().await)
        .register_slice(InitializedSlice::new("greeter", Greeter { greeting: "hi" }))
        .build()
        .expect("state");

    assert_eq!(state.try_get_slice::<Greeter>().expect("greeter").greeting, "hi");
    assert_eq!(state.slice_names(), vec!["greeter"]);
    assert_eq!(state.config.server.port, 8080);

    let err = state.try_get_slice::<Unregistered>().unwrap_err();
    assert!(matches!(err, ApiStateError::MissingSlice { .. }));
}

#[test]
fn database_is_required() {
    let err = ApiState::builder().build().unwrap_err();
    assert!(matches!(err, ApiStateError::Validation { .. }));
}

#[tokio::test]
async fn health_reports_database_status() {
    let state = ApiState::builder().db(database().await).build().expect("state");
    let (router, _) = system_router::<ApiState>().with_state(state).split_for_parts();

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-store, no-cache, must-revalidate")
    );

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn error_body_omits_empty_details() {
    let plain = serde_json::to_value(ErrorBody::new("order_not_found", "missing")).expect("json");
    assert_eq!(plain, serde_json::json!({ "code": "order_not_found", "message": "missing" }));

    let detailed = ErrorBody::new("unknown_product_codes", "unknown").with_details(["x", "y"]);
    assert_eq!(serde_json::to_value(detailed).expect("json")["details"], serde_json::json!(["x", "y"]));
}
