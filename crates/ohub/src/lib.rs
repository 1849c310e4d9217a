//! Facade crate for the Order Hub feature slices and shared modules.
//! Re-exports domain/kernel primitives and aggregates slice migrations, initialization and
//! routes. Keep this crate thin: it composes other crates and implements no business logic.

pub use ohub_domain as domain;
pub use ohub_kernel as kernel;

use ohub_catalog::SurrealCatalog;
use ohub_database::{Database, Migration};
use ohub_domain::registry::InitializedSlice;
use ohub_kernel::server::{ApiState, system_router};
use utoipa_axum::router::OpenApiRouter;

/// Feature slices for runtime introspection.
pub mod features {
    pub use ohub_catalog as catalog;
    pub use ohub_orders as orders;

    /// Slice names in initialization order.
    pub const ENABLED: &[&str] =
        &[super::domain::constants::CATALOG_SLICE, super::domain::constants::ORDERS_SLICE];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Every slice migration, in the order they must be applied. Orders validate against the
/// catalog, so the catalog schema comes first.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    features::catalog::MIGRATIONS.iter().chain(features::orders::MIGRATIONS).copied().collect()
}

/// Initializes all feature slices over a database migrated with [`migrations`].
///
/// # Errors
/// Returns an error if any slice fails to initialize.
pub async fn init(database: &Database) -> Result<Vec<InitializedSlice>, Box<dyn std::error::Error>> {
    let mut slices = Vec::with_capacity(features::ENABLED.len());

    // Catalog
    slices.push(features::catalog::init(database).await?);

    // Orders
    slices.push(features::orders::init(database, SurrealCatalog::new(database.clone())));

    Ok(slices)
}

/// System and feature routes, ready to be merged under an OpenAPI document.
#[must_use]
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().merge(system_router::<ApiState>()).merge(features::orders::api::router())
}
