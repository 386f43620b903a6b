//! Token generation for `SweepField` and `SweepModel` implementations.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Generics, LitStr, Type, WherePredicate, parse_quote};

use super::parse::{ContainerAttrs, FieldAttrs, SerdeContainer, SerdeField};

mod model;
mod union;

pub(crate) use model::generate_model;
pub(crate) use union::generate_enum;

/// Everything the generators need about the deriving type.
pub(crate) struct Target<'a> {
    pub input: &'a DeriveInput,
    pub sweep: &'a ContainerAttrs,
    pub serde: &'a SerdeContainer,
    pub krate: &'a TokenStream,
}

impl Target<'_> {
    /// Expression naming the type in schemas and diagnostics.
    ///
    /// Generic types use their full type name so each instantiation is
    /// audited on its own.
    fn name(&self) -> TokenStream {
        if self.input.generics.params.is_empty() {
            let name = LitStr::new(&self.input.ident.unraw().to_string(), self.input.ident.span());
            quote! { #name }
        } else {
            quote! { ::core::any::type_name::<Self>() }
        }
    }

    /// Generics extended with `bounds`; bounds are only needed, and only
    /// added, when the type has parameters.
    fn bounded(&self, bounds: Vec<WherePredicate>) -> Generics {
        let mut generics = self.input.generics.clone();
        if !generics.params.is_empty() {
            generics.make_where_clause().predicates.extend(bounds);
        }
        generics
    }
}

/// Describe one field type, returning the `FieldKind` expression and the
/// bound its type must satisfy, if any.
fn field_kind(
    ty: &Type,
    serde: &SerdeField,
    attrs: FieldAttrs,
    krate: &TokenStream,
) -> (TokenStream, Option<WherePredicate>) {
    if serde.custom {
        let kind = quote! {
            #krate::schema::FieldKind::Leaf(
                #krate::schema::LeafSchema::opaque(::core::stringify!(#ty))
            )
        };
        return (kind, None);
    }
    if attrs.leaf {
        let kind = quote! {
            #krate::schema::FieldKind::Leaf(#krate::schema::LeafSchema::of::<#ty>())
        };
        return (kind, Some(parse_quote!(#ty: #krate::serde::de::DeserializeOwned)));
    }
    (
        quote! { <#ty as #krate::SweepField>::field_kind() },
        Some(parse_quote!(#ty: #krate::SweepField)),
    )
}
