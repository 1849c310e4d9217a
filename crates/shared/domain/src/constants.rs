//! Names shared between slices, the router and the `OpenAPI` document.

/// `OpenAPI` tag for operational endpoints.
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for order endpoints.
pub const ORDERS_TAG: &str = "Orders";

pub const CATALOG_SLICE: &str = "catalog";
pub const ORDERS_SLICE: &str = "orders";

/// Default configuration file stem, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "server";
/// Prefix for environment overrides, e.g. `OHUB__SERVER__PORT`.
pub const ENV_PREFIX: &str = "OHUB";
