//! `SweepField` generation for enums.
//!
//! Unit-only enums are leaves checked by deserialization. Enums whose
//! variants each wrap one type are unions over those types.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, Fields, Variant, WherePredicate, parse_quote};

use super::super::parse::{Tagging, parse_field_attrs, serde_field};
use super::{Target, field_kind};

/// Generate `SweepField` for an enum.
pub(crate) fn generate_enum(target: &Target<'_>, data: &DataEnum) -> syn::Result<TokenStream> {
    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !serde_field(&variant.attrs)?.skip {
            variants.push(variant);
        }
    }
    if variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &target.input.ident,
            "SweepModel requires at least one deserializable variant",
        ));
    }
    if variants.iter().all(|variant| matches!(variant.fields, Fields::Unit)) {
        if target.sweep.exactly_one {
            return Err(syn::Error::new_spanned(
                &target.input.ident,
                "`exactly_one` only applies to enums with single-field variants",
            ));
        }
        return Ok(leaf_enum(target));
    }
    if variants.iter().copied().all(is_newtype) {
        return union_enum(target, &variants);
    }
    Err(syn::Error::new_spanned(
        &target.input.ident,
        "SweepModel supports enums whose variants are all unit variants or all \
         single-field tuple variants",
    ))
}

fn is_newtype(variant: &Variant) -> bool {
    matches!(&variant.fields, Fields::Unnamed(fields) if fields.unnamed.len() == 1)
}

fn leaf_enum(target: &Target<'_>) -> TokenStream {
    let krate = target.krate;
    let ident = &target.input.ident;
    let generics = target.bounded(vec![parse_quote! {
        Self: #krate::serde::de::DeserializeOwned
    }]);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    quote! {
        impl #impl_generics #krate::SweepField for #ident #ty_generics #where_clause {
            fn field_kind() -> #krate::schema::FieldKind {
                #krate::schema::FieldKind::Leaf(#krate::schema::LeafSchema::of::<Self>())
            }
        }
    }
}

fn union_enum(target: &Target<'_>, variants: &[&Variant]) -> syn::Result<TokenStream> {
    let krate = target.krate;
    let layout = quote! { #krate::schema::TagLayout };
    let disambiguation = match (&target.serde.tagging, target.sweep.exactly_one) {
        (Tagging::Untagged, true) => quote! { ExactlyOne },
        (Tagging::Untagged, false) => quote! { FirstMatch },
        (_, true) => {
            return Err(syn::Error::new_spanned(
                &target.input.ident,
                "`exactly_one` only applies to `#[serde(untagged)]` enums",
            ));
        }
        (Tagging::External, false) => quote! { Tagged(#layout::External) },
        (Tagging::Internal { tag }, false) => quote! { Tagged(#layout::Internal { tag: #tag }) },
        (Tagging::Adjacent { tag, content }, false) => quote! {
            Tagged(#layout::Adjacent { tag: #tag, content: #content })
        },
    };

    let mut alternatives = Vec::with_capacity(variants.len());
    let mut bounds: Vec<WherePredicate> = Vec::new();
    for variant in variants {
        let Fields::Unnamed(fields) = &variant.fields else {
            continue;
        };
        let Some(inner) = fields.unnamed.first() else {
            continue;
        };
        let mut serde = serde_field(&variant.attrs)?;
        serde.custom |= serde_field(&inner.attrs)?.custom;
        let attrs = parse_field_attrs(&inner.attrs)?;
        let name = serde.key(&variant.ident, target.serde.rename_all);
        let (kind, bound) = field_kind(&inner.ty, &serde, attrs, krate);
        alternatives.push(quote! {
            #krate::schema::Alternative { name: #name, kind: #kind }
        });
        bounds.extend(bound);
    }

    let union_name = target.name();
    let ident = &target.input.ident;
    let generics = target.bounded(bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #krate::SweepField for #ident #ty_generics #where_clause {
            fn field_kind() -> #krate::schema::FieldKind {
                #krate::schema::FieldKind::Union(#krate::schema::UnionSchema {
                    name: #union_name,
                    alternatives: ::std::vec![#(#alternatives),*],
                    disambiguation: #krate::schema::Disambiguation::#disambiguation,
                })
            }
        }
    })
}
