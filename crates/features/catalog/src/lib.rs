//! Product type catalog slice.
//!
//! Product types are reference data: the `0001` migration seeds them and nothing in the
//! service writes to them afterwards.

mod error;
mod store;

pub use error::{CatalogError, CatalogErrorExt};
pub use store::{CatalogStore, MemoryCatalog, SurrealCatalog};

use ohub_database::{Database, Migration};
use ohub_domain::constants::CATALOG_SLICE;
use ohub_domain::models::ProductType;
use ohub_kernel::domain::registry::InitializedSlice;
use rust_decimal::Decimal;
use std::num::NonZeroU32;

/// Schema and seed data for the `product_type` table.
pub const MIGRATIONS: &[Migration] = &[Migration::new(
    CATALOG_SLICE,
    "0001",
    include_str!("../migrations/0001_product_types.surql"),
)];

#[ohub_derive::ohub_slice]
pub struct Catalog {
    pub store: SurrealCatalog,
}

/// Initializes the catalog slice over an already migrated database.
///
/// # Errors
/// Returns [`CatalogError::Corrupt`] if the catalog is empty, or a query error if it cannot
/// be read.
pub async fn init(database: &Database) -> Result<InitializedSlice, CatalogError> {
    let store = SurrealCatalog::new(database.clone());
    let product_types = store.count().await?;
    if product_types == 0 {
        return Err(CatalogError::Corrupt {
            message: "no product types found".into(),
            context: Some("Was the catalog migration applied?".into()),
        });
    }
    tracing::info!(product_types, "Catalog slice initialized");

    Ok(InitializedSlice::new(CATALOG_SLICE, Catalog::new(CatalogInner { store })))
}

/// The product types seeded by [`MIGRATIONS`].
pub fn standard_product_types() -> Vec<ProductType> {
    [
        (1, "photoBook", Decimal::from(19), 1),
        (2, "calendar", Decimal::from(10), 1),
        (3, "canvas", Decimal::from(16), 1),
        (4, "cards", Decimal::new(47, 1), 1),
        (5, "mug", Decimal::from(94), 4),
    ]
    .into_iter()
    .filter_map(|(id, code, unit_bin_width, group)| {
        Some(ProductType {
            id,
            code: code.to_owned(),
            unit_bin_width,
            max_group_size: NonZeroU32::new(group)?,
        })
    })
    .collect()
}
