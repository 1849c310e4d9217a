#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros used across the Order Hub workspace to keep error types, feature
//! slices and HTTP models uniform.
//!
//! * [`macro@ohub_error`] turns an enum into a `thiserror` error with context support.
//! * [`macro@ohub_slice`] wraps a feature state struct into a cheap-to-clone slice handle.
//! * [`macro@api_model`] and [`macro@api_handler`] bridge DTOs and Axum handlers with `OpenAPI`.
//!
//! The examples below are `ignore`d because they need the consuming crates' dependencies.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Defines a standard API data model (DTO).
///
/// * Adds `Debug`, `Serialize` and `Deserialize` when missing.
/// * Adds `utoipa::ToSchema` when missing.
/// * Applies `#[serde(rename_all = "camelCase")]` unless overridden.
/// * Applies `#[serde(deny_unknown_fields)]` unless disabled.
///
/// # Arguments
///
/// * `rename_all = "..."` - Overrides the default Serde rename policy.
/// * `deny_unknown_fields = false` - Disables strict field checking.
///
/// # Example
///
/// ```rust,ignore
/// use ohub_derive::api_model;
///
/// #[api_model]
/// pub struct OrderCreatedResponse {
///     pub min_bin_width: rust_decimal::Decimal,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Declares an Axum handler together with its `OpenAPI` operation.
///
/// Accepts the regular `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = ...`) and forwards them verbatim.
///
/// # Example
///
/// ```rust,ignore
/// use ohub_derive::api_handler;
///
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = SYSTEM_TAG,
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into a crate error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant carrying a source error.
/// * `From<Source>` for every variant with a `source` field (or a `#[source]`/`#[from]` field).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper rendering ` (context)` for messages.
///
/// # Requirements
///
/// Variants must use named fields. Variants wrapping a source error must also declare
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[ohub_derive::ohub_error]
/// pub enum DatabaseError {
///     #[error("SurrealDB error{}: {source}", format_context(.context))]
///     Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal database error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// let rows = db.query("SELECT * FROM orders").await.context("Listing orders")?;
/// ```
#[proc_macro_attribute]
pub fn ohub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_error(input).into()
}

/// Defines a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is generated as an `Arc` wrapper
/// with `new`, `Deref` to the inner state and a `FeatureSlice` implementation so it can be
/// registered in the kernel's `ApiState`.
///
/// # Example
/// ```rust,ignore
/// #[ohub_derive::ohub_slice]
/// pub struct Catalog {
///     pub store: SurrealCatalog,
/// }
///
/// let slice = Catalog::new(CatalogInner { store });
/// ```
#[proc_macro_attribute]
pub fn ohub_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
