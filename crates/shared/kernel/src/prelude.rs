//! Glob-importable items most slice crates need.

pub use crate::config::{ConfigError, load_config};
pub use crate::domain::config::ApiConfig;
pub use crate::domain::constants::*;
pub use crate::domain::registry::{FeatureSlice, InitializedSlice};
pub use crate::safe_nanoid;

#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateError, ErrorBody, error_response};
