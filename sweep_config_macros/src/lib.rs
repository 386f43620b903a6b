//! Procedural macros for `sweep_config`.
//!
//! `#[derive(SweepModel)]` reads a type's `serde` attributes and emits the
//! schema descriptor the sweep gate validates against, so the strict checks
//! agree with what `serde` will actually deserialize.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive `SweepModel` and `SweepField` for a `serde` type.
///
/// Structs with named fields become models. Each field is described by its
/// deserialized key (honouring `rename` and `rename_all`), its kind, and
/// whether it may be omitted (`#[serde(default)]` on the field or container,
/// or an `Option` type). `#[serde(deny_unknown_fields)]` maps to a schema
/// that forbids unknown keys; models without it fail the sweep audit.
///
/// Enums only implement `SweepField`, so they can appear as model fields:
///
/// - enums of unit variants are leaves validated by deserialization;
/// - enums of single-field tuple variants are unions. Tagged representations
///   (external, `tag`, `tag` + `content`) are validated against the variant
///   their tag names; `#[serde(untagged)]` enums resolve to the
///   first match unless marked `#[sweep(exactly_one)]`.
///
/// Recognised `#[sweep(...)]` keys:
///
/// - `crate = "path"` on the container overrides the path of the runtime
///   crate for renamed dependencies;
/// - `validate_assignment = false` on a struct disables re-validation on
///   assignment (the audit then rejects the model);
/// - `exactly_one` on an untagged enum rejects ambiguous values;
/// - `leaf` on a field describes its type as an opaque leaf checked by
///   deserialization, for types that do not implement `SweepField`.
///
/// # Examples
///
/// ```rust,ignore
/// use serde::{Deserialize, Serialize};
/// use sweep_config::SweepModel;
///
/// #[derive(Serialize, Deserialize, SweepModel)]
/// #[serde(deny_unknown_fields, rename_all = "kebab-case")]
/// struct Training {
///     learning_rate: f64,
///     #[serde(default)]
///     warmup_steps: u32,
///     schedule: Option<String>,
/// }
/// ```
#[proc_macro_derive(SweepModel, attributes(sweep))]
pub fn derive_sweep_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
