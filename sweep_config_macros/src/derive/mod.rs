//! Expansion of `#[derive(SweepModel)]`.

use proc_macro2::TokenStream;
use syn::{Data, DeriveInput, Fields};

mod crate_path;
mod generate;
mod parse;

/// Expand the derive for `input`, failing on shapes the schema cannot
/// describe.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let sweep = parse::parse_container_attrs(&input.attrs)?;
    let serde = parse::serde_container(&input.attrs)?;
    let krate = crate_path::resolve(sweep.crate_path.as_ref());
    let target = generate::Target {
        input,
        sweep: &sweep,
        serde: &serde,
        krate: &krate,
    };
    match &input.data {
        Data::Struct(data) => {
            if sweep.exactly_one {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "`exactly_one` only applies to untagged enums",
                ));
            }
            let Fields::Named(fields) = &data.fields else {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "SweepModel requires named fields",
                ));
            };
            generate::generate_model(&target, fields)
        }
        Data::Enum(data) => {
            if sweep.validate_assignment.is_some() {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "`validate_assignment` only applies to structs",
                ));
            }
            generate::generate_enum(&target, data)
        }
        Data::Union(data) => Err(syn::Error::new_spanned(
            data.union_token,
            "SweepModel cannot be derived for unions",
        )),
    }
}
