use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::{Json, response::IntoResponse};
use ohub_database::Database;
use ohub_derive::{api_handler, api_model};
use ohub_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;

#[api_model]
/// Liveness and database reachability.
pub struct HealthResponse {
    /// `up`, or `degraded` when the database does not answer
    status: &'static str,
    version: &'static str,
    /// Uptime in seconds
    uptime: u64,
    /// `up` or `down`
    database: &'static str,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Service and database are up", body = HealthResponse),
        (status = SERVICE_UNAVAILABLE, description = "Database unreachable", body = HealthResponse),
    ),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(database): State<Database>) -> impl IntoResponse {
    let database_up = database.is_healthy().await;
    let (status, body) = if database_up {
        (StatusCode::OK, HealthResponse::new("up", "up"))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, HealthResponse::new("degraded", "down"))
    };

    (
        status,
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}

impl HealthResponse {
    fn new(status: &'static str, database: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime: START_TIME.elapsed().as_secs(),
            database,
        }
    }
}
