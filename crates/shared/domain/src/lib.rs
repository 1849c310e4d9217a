//! # Domain Models
//!
//! Plain data shared by every Order Hub crate: configuration sections, catalog and order
//! models, and the feature slice registry. No I/O and no business rules live here.

pub mod config;
pub mod constants;
pub mod models;
pub mod registry;
