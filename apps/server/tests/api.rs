use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use ohub::domain::config::{ApiConfig, SslConfig};
use ohub_server::Server;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

async fn app() -> Router {
    Server::builder().database_url("mem://").build().await.expect("server").router()
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = response.into_body().collect().await.expect("body").to_bytes().to_vec();
    (status, body)
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("json body")
}

#[tokio::test]
async fn health_is_up_over_mem_store() {
    let app = app().await;
    let (status, body) =
        call(&app, Request::get("/health").body(Body::empty()).expect("request")).await;

    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn docs_are_served() {
    let app = app().await;
    let (status, body) = call(&app, Request::get("/api").body(Body::empty()).expect("request")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("Order Hub"));
}

#[tokio::test]
async fn order_lifecycle() {
    let app = app().await;
    let order_id = Uuid::new_v4();
    let order = json!({
        "orderId": order_id,
        "orderEntries": [
            { "productType": "photoBook", "quantity": 3 },
            { "productType": "mug", "quantity": 9 },
        ],
    });
    let post = || {
        Request::post("/orders")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(order.to_string()))
            .expect("request")
    };

    let (status, body) = call(&app, post()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_body(&body), json!({ "minBinWidth": "339" }));

    let (status, body) = call(&app, post()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json_body(&body)["code"], "order_already_exists");

    let get = Request::get(format!("/orders/{order_id}")).body(Body::empty()).expect("request");
    let (status, body) = call(&app, get).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["minBinWidth"], "339");
    assert_eq!(body["orderEntries"], order["orderEntries"]);
}

#[tokio::test]
async fn missing_tls_files_fail_the_build() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cfg = ApiConfig::default();
    cfg.server.ssl = Some(SslConfig { cert: dir.path().join("cert.pem"), key: dir.path().join("key.pem") });

    let err = Server::builder().config(cfg).build().await.unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"));
}
