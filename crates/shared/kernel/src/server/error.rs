use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ohub_derive::api_model;

/// JSON body returned for every failed request.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `order_not_found`.
    pub code: String,
    pub message: String,
    /// Extra values such as the offending product codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into(), details: Vec::new() }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }

    /// Generic body for faults whose details must not reach the client.
    pub fn internal() -> Self {
        Self::new("internal_error", "Internal server error")
    }
}

pub fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}
