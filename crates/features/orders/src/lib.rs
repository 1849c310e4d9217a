//! Orders feature slice.
//!
//! Accepts orders made of product codes and quantities, computes the minimum bin width
//! needed to ship them, stores them atomically and serves them back by id.

pub mod api;
mod error;
pub mod packing;
pub mod repository;
pub mod service;

pub use error::{OrdersError, OrdersErrorExt};
pub use repository::{OrderRepository, SurrealOrderRepository};
pub use service::OrderService;

use ohub_catalog::SurrealCatalog;
use ohub_database::{Database, Migration};
use ohub_domain::constants::ORDERS_SLICE;
use ohub_kernel::domain::registry::InitializedSlice;

/// Schema for the `orders` and `order_entry` tables.
pub const MIGRATIONS: &[Migration] =
    &[Migration::new(ORDERS_SLICE, "0001", include_str!("../migrations/0001_orders.surql"))];

#[ohub_derive::ohub_slice]
pub struct Orders {
    pub service: OrderService<SurrealOrderRepository, SurrealCatalog>,
}

/// Initializes the orders slice over a migrated database and the catalog it validates against.
#[must_use]
pub fn init(database: &Database, catalog: SurrealCatalog) -> InitializedSlice {
    let repository = SurrealOrderRepository::new(database.clone());
    let service = OrderService::new(repository, catalog);
    tracing::info!("Orders slice initialized");

    InitializedSlice::new(ORDERS_SLICE, Orders::new(OrdersInner { service }))
}
