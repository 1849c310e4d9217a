pub(crate) mod api;
pub(crate) mod error;
pub(crate) mod slice;

use fxhash::FxHashSet;
use syn::Attribute;

/// Collects the last path segment of every trait listed in `#[derive(...)]` attributes.
pub(crate) fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}
