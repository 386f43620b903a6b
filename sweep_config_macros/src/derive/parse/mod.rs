//! Attribute parsing for the `SweepModel` derive macro.
//!
//! `#[sweep(...)]` keys are parsed strictly: an unknown key is a compile
//! error. `#[serde(...)]` attributes are read leniently, picking out only the
//! keys that change which JSON keys and shapes deserialization accepts.

use syn::meta::ParseNestedMeta;
use syn::parenthesized;
use syn::{Attribute, Token};

mod literals;
mod serde_attrs;
#[cfg(test)]
mod tests;
mod type_utils;

use literals::{lit_bool, lit_str};
pub(crate) use serde_attrs::{SerdeContainer, SerdeField, Tagging, serde_container, serde_field};
pub(crate) use type_utils::option_inner;

/// Container-level `#[sweep(...)]` attributes.
#[derive(Default, Clone)]
pub(crate) struct ContainerAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    pub crate_path: Option<syn::Path>,
    /// `None` keeps the default of re-validating assignments.
    pub validate_assignment: Option<bool>,
    pub exactly_one: bool,
}

/// Field-level `#[sweep(...)]` attributes.
#[derive(Default, Clone, Copy)]
pub(crate) struct FieldAttrs {
    /// Describe the field as an opaque leaf instead of asking its type.
    pub leaf: bool,
}

/// Iterate all `#[sweep(...)]` attributes once and apply a callback.
fn parse_sweep<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("sweep")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
///
/// Values are parsed as a single expression so the keys following them in
/// the same attribute are still visited.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Accept both `key` and `key = <bool>`.
fn flag(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        lit_bool(meta, key)
    } else {
        Ok(true)
    }
}

fn meta_key(meta: &ParseNestedMeta) -> String {
    meta.path
        .get_ident()
        .map_or_else(|| "<path>".to_owned(), ToString::to_string)
}

/// Extracts `#[sweep(...)]` metadata applied to a struct or enum.
pub(crate) fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    parse_sweep(attrs, |meta| {
        let key = meta_key(meta);
        match key.as_str() {
            "crate" => {
                let s = lit_str(meta, "crate")?;
                let path: syn::Path =
                    syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
                out.crate_path = Some(path);
            }
            "validate_assignment" => out.validate_assignment = Some(flag(meta, &key)?),
            "exactly_one" => out.exactly_one = flag(meta, &key)?,
            _ => return Err(meta.error(format!("unknown sweep attribute `{key}`"))),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Extracts `#[sweep(...)]` metadata applied to a field.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_sweep(attrs, |meta| {
        let key = meta_key(meta);
        match key.as_str() {
            "leaf" => out.leaf = flag(meta, &key)?,
            _ => return Err(meta.error(format!("unknown sweep field attribute `{key}`"))),
        }
        Ok(())
    })?;
    Ok(out)
}
