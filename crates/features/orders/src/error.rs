use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ohub_catalog::CatalogError;
use ohub_kernel::server::{ApiStateError, ErrorBody, error_response};
use std::borrow::Cow;
use uuid::Uuid;

#[ohub_derive::ohub_error]
pub enum OrdersError {
    #[error("Order has no entries{}", format_context(.context))]
    NoEntries { context: Option<Cow<'static, str>> },

    #[error("Order {order_id} already exists{}", format_context(.context))]
    AlreadyExists { order_id: Uuid, context: Option<Cow<'static, str>> },

    #[error("Unknown product codes{}: {}", format_context(.context), .codes.join(", "))]
    UnknownProductCodes { codes: Vec<String>, context: Option<Cow<'static, str>> },

    #[error("Order {order_id} not found{}", format_context(.context))]
    NotFound { order_id: Uuid, context: Option<Cow<'static, str>> },

    #[error("Catalog error{}: {source}", format_context(.context))]
    Catalog { source: CatalogError, context: Option<Cow<'static, str>> },

    #[error("Order store error{}: {source}", format_context(.context))]
    Query { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("API state error{}: {source}", format_context(.context))]
    State { source: ApiStateError, context: Option<Cow<'static, str>> },

    #[error("Internal orders error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl OrdersError {
    /// HTTP status and client-facing body; infrastructure details are not exposed.
    pub fn to_error_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            Self::NoEntries { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("order_has_no_entries", "Order must contain at least one entry"),
            ),
            Self::UnknownProductCodes { codes, .. } => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("unknown_product_codes", "Order references unknown product codes")
                    .with_details(codes.iter().cloned()),
            ),
            Self::AlreadyExists { order_id, .. } => (
                StatusCode::CONFLICT,
                ErrorBody::new("order_already_exists", format!("Order {order_id} already exists")),
            ),
            Self::NotFound { order_id, .. } => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("order_not_found", format!("Order {order_id} not found")),
            ),
            Self::Catalog { .. } | Self::Query { .. } | Self::State { .. } | Self::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        }
    }
}

impl IntoResponse for OrdersError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_body();
        if status.is_server_error() {
            tracing::error!(error = %self, "Order request failed");
        } else {
            tracing::debug!(error = %self, "Order request rejected");
        }
        error_response(status, body)
    }
}
