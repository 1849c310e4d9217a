use crate::Orders;
use crate::error::OrdersError;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ohub_derive::{api_handler, api_model};
use ohub_domain::constants::ORDERS_TAG;
use ohub_domain::models::{Order, OrderEntry};
use ohub_kernel::server::{ApiState, ErrorBody};
use rust_decimal::Decimal;
use std::num::NonZeroU32;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

#[api_model]
/// A new order.
pub struct CreateOrderRequest {
    /// Client-chosen id; must not be in use yet.
    pub order_id: Uuid,
    /// At least one entry is required.
    pub order_entries: Option<Vec<OrderEntryDto>>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct OrderEntryDto {
    /// Product type code, e.g. `photoBook`.
    pub product_type: String,
    #[schema(value_type = u32, minimum = 1)]
    pub quantity: NonZeroU32,
}

#[api_model]
pub struct OrderCreatedResponse {
    #[schema(value_type = String, example = "339")]
    pub min_bin_width: Decimal,
}

#[api_model]
pub struct OrderResponse {
    pub order_id: Uuid,
    #[schema(value_type = String, example = "339")]
    pub min_bin_width: Decimal,
    pub order_entries: Vec<OrderEntryDto>,
}

impl From<OrderEntryDto> for OrderEntry {
    fn from(dto: OrderEntryDto) -> Self {
        Self::new(dto.product_type, dto.quantity)
    }
}

impl From<OrderEntry> for OrderEntryDto {
    fn from(entry: OrderEntry) -> Self {
        Self { product_type: entry.product_code, quantity: entry.quantity }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            min_bin_width: order.min_bin_width,
            order_entries: order.entries.into_iter().map(Into::into).collect(),
        }
    }
}

#[api_handler(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = CREATED, description = "Order stored", body = OrderCreatedResponse),
        (status = BAD_REQUEST, description = "No entries or unknown product codes", body = ErrorBody),
        (status = CONFLICT, description = "Order id already in use", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure", body = ErrorBody),
    ),
    tag = ORDERS_TAG,
)]
pub(crate) async fn create_order(
    State(state): State<ApiState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), OrdersError> {
    let orders = state.try_get_slice::<Orders>()?;
    let entries = request.order_entries.unwrap_or_default().into_iter().map(Into::into).collect();

    let min_bin_width = orders.service.create(request.order_id, entries).await?;

    Ok((StatusCode::CREATED, Json(OrderCreatedResponse { min_bin_width })))
}

#[api_handler(
    get,
    path = "/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order id")),
    responses(
        (status = OK, description = "Stored order", body = OrderResponse),
        (status = NOT_FOUND, description = "No order with this id", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure", body = ErrorBody),
    ),
    tag = ORDERS_TAG,
)]
pub(crate) async fn get_order(
    State(state): State<ApiState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, OrdersError> {
    let orders = state.try_get_slice::<Orders>()?;
    let order = orders.service.find_by_id(order_id).await?;

    Ok(Json(order.into()))
}

/// Order endpoints, to be merged into the application router.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(create_order)).routes(routes!(get_order))
}
