use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use uuid::Uuid;

/// A catalog entry describing how much bin width one packing group of a product occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: u32,
    pub code: String,
    pub unit_bin_width: Decimal,
    /// How many units stack into one group of `unit_bin_width`.
    pub max_group_size: NonZeroU32,
}

/// One line of an order as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    pub product_code: String,
    pub quantity: NonZeroU32,
}

impl OrderEntry {
    pub fn new(product_code: impl Into<String>, quantity: NonZeroU32) -> Self {
        Self { product_code: product_code.into(), quantity }
    }
}

/// A stored order with its derived minimum bin width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: Uuid,
    pub min_bin_width: Decimal,
    pub entries: Vec<OrderEntry>,
}
