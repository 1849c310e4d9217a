use super::derived_traits;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token};

/// Arguments accepted by `#[api_model(...)]`.
#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

/// Serde settings already present on the struct.
#[derive(Default)]
struct ExistingSerde {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match api_model_attrs(args, &input) {
        Ok(attrs) => quote! {
            #attrs
            #input
        },
        Err(err) => err.to_compile_error(),
    }
}

pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[::utoipa::path(#args)]
        #vis #sig #block
    }
}

fn api_model_attrs(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let args = parse_model_args(args)?;
    let existing = existing_serde(&input.attrs)?;
    let derives = derived_traits(&input.attrs);

    let mut missing = Vec::new();
    for (name, path) in [
        ("Debug", quote! { Debug }),
        ("Serialize", quote! { ::serde::Serialize }),
        ("Deserialize", quote! { ::serde::Deserialize }),
        ("ToSchema", quote! { ::utoipa::ToSchema }),
    ] {
        if !derives.contains(name) {
            missing.push(path);
        }
    }
    let derive_attr = if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };

    let rename_all =
        args.rename_all.unwrap_or_else(|| LitStr::new("camelCase", Span::call_site()));
    let rename_attr = match &existing.rename_all {
        Some(current) if current.value() != rename_all.value() => {
            return Err(syn::Error::new_spanned(
                current,
                "Conflicting serde rename_all; remove it or pass the same value to api_model",
            ));
        }
        Some(_) => quote! {},
        None => quote! { #[serde(rename_all = #rename_all)] },
    };

    let deny_unknown = args.deny_unknown_fields.unwrap_or(true);
    let deny_attr = match (existing.deny_unknown_fields, deny_unknown) {
        (true, false) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            ));
        }
        (false, true) => quote! { #[serde(deny_unknown_fields)] },
        _ => quote! {},
    };

    Ok(quote! {
        #derive_attr
        #rename_attr
        #deny_attr
    })
}

fn parse_model_args(args: TokenStream) -> syn::Result<ModelArgs> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
    let mut parsed = ModelArgs::default();

    for meta in metas {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "Expected name-value arguments like `rename_all = \"...\"`",
            ));
        };

        if pair.path.is_ident("rename_all") {
            let value = string_literal(&pair)?;
            set_once(&mut parsed.rename_all, &pair, value)?;
        } else if pair.path.is_ident("deny_unknown_fields") {
            let value = bool_literal(&pair)?;
            set_once(&mut parsed.deny_unknown_fields, &pair, value)?;
        } else {
            return Err(syn::Error::new_spanned(
                pair.path,
                "Unsupported argument; expected rename_all or deny_unknown_fields",
            ));
        }
    }

    Ok(parsed)
}

fn literal(pair: &MetaNameValue) -> Option<&Lit> {
    match &pair.value {
        Expr::Lit(expr) => Some(&expr.lit),
        _ => None,
    }
}

fn string_literal(pair: &MetaNameValue) -> syn::Result<LitStr> {
    match literal(pair) {
        Some(Lit::Str(lit)) => Ok(lit.clone()),
        _ => Err(syn::Error::new_spanned(&pair.value, "expected a string literal")),
    }
}

fn bool_literal(pair: &MetaNameValue) -> syn::Result<bool> {
    match literal(pair) {
        Some(Lit::Bool(lit)) => Ok(lit.value),
        _ => Err(syn::Error::new_spanned(&pair.value, "expected a boolean literal")),
    }
}

fn set_once<T>(slot: &mut Option<T>, pair: &MetaNameValue, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(pair, "Duplicate argument"));
    }
    *slot = Some(value);
    Ok(())
}

fn existing_serde(attrs: &[Attribute]) -> syn::Result<ExistingSerde> {
    let mut existing = ExistingSerde::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                existing.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                existing.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                // Skip values of unrelated serde options (e.g. `tag = "..."`).
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(args: TokenStream, input: ItemStruct) -> String {
        expand_api_model(args, input).to_string()
    }

    #[test]
    fn adds_defaults_to_plain_struct() {
        let output = expand(quote! {}, parse_quote! { pub struct Dto { pub order_id: u32 } });
        assert!(output.contains(":: utoipa :: ToSchema"));
        assert!(output.contains(":: serde :: Serialize"));
        assert!(output.contains("rename_all = \"camelCase\""));
        assert!(output.contains("deny_unknown_fields"));
    }

    #[test]
    fn respects_overrides() {
        let output = expand(
            quote! { rename_all = "snake_case", deny_unknown_fields = false },
            parse_quote! {
                #[derive(Debug, Clone)]
                pub struct Dto { pub order_id: u32 }
            },
        );
        assert!(output.contains("rename_all = \"snake_case\""));
        assert!(!output.contains("deny_unknown_fields"));
        assert_eq!(output.matches("Debug").count(), 1);
    }

    #[test]
    fn rejects_conflicting_rename() {
        let output = expand(
            quote! {},
            parse_quote! {
                #[serde(rename_all = "snake_case")]
                pub struct Dto { pub order_id: u32 }
            },
        );
        assert!(output.contains("Conflicting serde rename_all"));
    }

    #[test]
    fn rejects_unknown_arguments() {
        let output = expand(quote! { tag = "x" }, parse_quote! { pub struct Dto {} });
        assert!(output.contains("Unsupported argument"));
    }

    #[test]
    fn handler_forwards_path_arguments() {
        let input: ItemFn = parse_quote! { pub async fn health() -> u16 { 200 } };
        let output = expand_api_handler(quote! { get, path = "/health" }, input).to_string();
        assert!(output.contains(":: utoipa :: path (get , path = \"/health\")"));
        assert!(output.contains("clippy :: unused_async"));
    }
}
