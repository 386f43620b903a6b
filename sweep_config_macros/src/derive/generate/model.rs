//! `SweepModel` generation for structs with named fields.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{FieldsNamed, WherePredicate, parse_quote};

use super::super::parse::{option_inner, parse_field_attrs, serde_field};
use super::{Target, field_kind};

/// Generate `SweepField` and `SweepModel` for a struct.
pub(crate) fn generate_model(
    target: &Target<'_>,
    fields: &FieldsNamed,
) -> syn::Result<TokenStream> {
    let krate = target.krate;
    let mut schemas = Vec::with_capacity(fields.named.len());
    let mut bounds: Vec<WherePredicate> = vec![parse_quote! {
        Self: #krate::serde::Serialize + #krate::serde::de::DeserializeOwned
    }];
    for field in &fields.named {
        let serde = serde_field(&field.attrs)?;
        let attrs = parse_field_attrs(&field.attrs)?;
        if serde.flatten {
            return Err(syn::Error::new_spanned(
                field,
                "`#[serde(flatten)]` fields cannot be swept by path; nest the model instead",
            ));
        }
        if serde.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "unnamed fields are not supported"));
        };
        let key = serde.key(ident, target.serde.rename_all);
        let (kind, bound) = field_kind(&field.ty, &serde, attrs, krate);
        // `serde` fills a missing `Option` with `None` unless a custom
        // deserializer takes over.
        let optional = !serde.custom && option_inner(&field.ty).is_some();
        let constructor = if serde.default || target.serde.default || optional {
            quote! { defaulted }
        } else {
            quote! { required }
        };
        schemas.push(quote! {
            .field(#krate::schema::FieldSchema::#constructor(#key, #kind))
        });
        bounds.extend(bound);
    }

    let extra = target.serde.deny_unknown_fields.then(|| {
        quote! { .extra(#krate::schema::ExtraFields::Forbid) }
    });
    let validate = target.sweep.validate_assignment.unwrap_or(true);
    let name = target.name();
    let ident = &target.input.ident;
    let generics = target.bounded(bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::SweepField for #ident #ty_generics #where_clause {
            fn field_kind() -> #krate::schema::FieldKind {
                #krate::schema::FieldKind::Model(<Self as #krate::SweepModel>::model_schema)
            }
        }

        impl #impl_generics #krate::SweepModel for #ident #ty_generics #where_clause {
            fn model_schema() -> #krate::schema::ModelSchema {
                #krate::schema::ModelSchema::new(#name)
                    .keyed(::core::any::type_name::<Self>())
                    #extra
                    .validate_assignment(#validate)
                    #(#schemas)*
            }
        }
    })
}
