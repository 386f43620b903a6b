//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[sweep(crate = "...")]` attribute value into a
//! `TokenStream` that prefixes every runtime path in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed container attribute.
///
/// Defaults to `::sweep_config` when no override is present.
///
/// # Examples
///
/// ```rust,ignore
/// let default = resolve(None);
/// assert_eq!(default.to_string(), ":: sweep_config");
///
/// let path: syn::Path = syn::parse_str("sweeps").unwrap();
/// assert_eq!(resolve(Some(&path)).to_string(), "sweeps");
/// ```
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::sweep_config }, |path| quote! { #path })
}
