use std::borrow::Cow;

#[ohub_derive::ohub_error]
pub enum CatalogError {
    #[error("Catalog query failed{}: {source}", format_context(.context))]
    Query { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    /// A stored product type violates the catalog invariants.
    #[error("Corrupt product type{}: {message}", format_context(.context))]
    Corrupt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
