//! Serde attribute parsing helpers.
//!
//! The generated schema must accept exactly the keys `serde` deserializes,
//! so the lookup key respects `#[serde(rename = "...")]` and
//! `#[serde(rename_all = "...")]` (taking the `deserialize` form when the two
//! directions differ) and fields `serde` never reads are left out.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Ident, LitStr, Token};

/// Supported `#[serde(rename_all = "...")]` rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SerdeRenameAll {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl SerdeRenameAll {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            other => Err(syn::Error::new(
                value.span(),
                format!(
                    "unsupported serde rename_all value '{other}'; expected one of \
\"lowercase\", \"UPPERCASE\", \"PascalCase\", \"camelCase\", \"snake_case\", \
\"SCREAMING_SNAKE_CASE\", \"kebab-case\", or \"SCREAMING-KEBAB-CASE\""
                ),
            )),
        }
    }

    pub(crate) fn apply(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_ascii_lowercase(),
            Self::Upper => name.to_ascii_uppercase(),
            Self::Pascal => name.to_upper_camel_case(),
            Self::Camel => name.to_lower_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::ScreamingSnake => name.to_shouty_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::ScreamingKebab => name.to_shouty_kebab_case(),
        }
    }
}

/// How an enum is represented in serialized data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Tagging {
    #[default]
    External,
    Internal { tag: String },
    Adjacent { tag: String, content: String },
    Untagged,
}

/// Container-level `#[serde(...)]` settings relevant to the schema.
#[derive(Clone, Debug, Default)]
pub(crate) struct SerdeContainer {
    pub rename_all: Option<SerdeRenameAll>,
    pub deny_unknown_fields: bool,
    pub default: bool,
    pub tagging: Tagging,
}

/// Field- or variant-level `#[serde(...)]` settings relevant to the schema.
#[derive(Clone, Debug, Default)]
pub(crate) struct SerdeField {
    pub rename: Option<String>,
    pub default: bool,
    /// `skip` or `skip_deserializing`.
    pub skip: bool,
    pub flatten: bool,
    /// `with` or `deserialize_with`.
    pub custom: bool,
}

impl SerdeField {
    /// Key `serde` reads this field or variant from.
    pub(crate) fn key(&self, ident: &Ident, rename_all: Option<SerdeRenameAll>) -> String {
        if let Some(rename) = &self.rename {
            return rename.clone();
        }
        let name = ident.unraw().to_string();
        rename_all.map_or_else(|| name.clone(), |rule| rule.apply(&name))
    }
}

/// Iterate all `#[serde(...)]` attributes once and apply a callback.
fn parse_serde<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta, &str) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            meta.path
                .get_ident()
                .map(ToString::to_string)
                .map_or_else(|| super::discard_unknown(&meta), |key| f(&meta, &key))
        })?;
    }
    Ok(())
}

/// Read `key = "..."` or the `deserialize` half of `key(serialize = "...",
/// deserialize = "...")`.
fn deserialize_literal(meta: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return meta.value()?.parse::<LitStr>().map(Some);
    }
    let mut out = None;
    if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| {
            if nested.path.is_ident("deserialize") {
                out = Some(nested.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                super::discard_unknown(&nested)
            }
        })?;
    }
    Ok(out)
}

/// Parse the container-level `#[serde(...)]` attributes.
pub(crate) fn serde_container(attrs: &[Attribute]) -> syn::Result<SerdeContainer> {
    let mut out = SerdeContainer::default();
    let mut tag = None;
    let mut content = None;
    let mut untagged = false;
    parse_serde(attrs, |meta, key| {
        match key {
            "rename_all" => {
                if let Some(value) = deserialize_literal(meta)? {
                    out.rename_all = Some(SerdeRenameAll::parse(&value)?);
                }
            }
            "deny_unknown_fields" => out.deny_unknown_fields = true,
            "default" => {
                out.default = true;
                super::discard_unknown(meta)?;
            }
            "tag" => tag = Some(meta.value()?.parse::<LitStr>()?.value()),
            "content" => content = Some(meta.value()?.parse::<LitStr>()?.value()),
            "untagged" => untagged = true,
            "transparent" | "from" | "try_from" => {
                return Err(meta.error(format!(
                    "`#[serde({key})]` is not supported by SweepModel: the schema would not \
                     describe the deserialized form"
                )));
            }
            _ => super::discard_unknown(meta)?,
        }
        Ok(())
    })?;
    out.tagging = match (untagged, tag, content) {
        (true, _, _) => Tagging::Untagged,
        (false, Some(tag), Some(content)) => Tagging::Adjacent { tag, content },
        (false, Some(tag), None) => Tagging::Internal { tag },
        (false, None, _) => Tagging::External,
    };
    Ok(out)
}

/// Parse the `#[serde(...)]` attributes of a field or variant.
pub(crate) fn serde_field(attrs: &[Attribute]) -> syn::Result<SerdeField> {
    let mut out = SerdeField::default();
    parse_serde(attrs, |meta, key| {
        match key {
            "rename" => {
                if let Some(value) = deserialize_literal(meta)? {
                    out.rename = Some(value.value());
                }
            }
            "default" => {
                out.default = true;
                super::discard_unknown(meta)?;
            }
            "skip" | "skip_deserializing" => out.skip = true,
            "flatten" => out.flatten = true,
            "with" | "deserialize_with" => {
                out.custom = true;
                super::discard_unknown(meta)?;
            }
            "alias" => {
                return Err(meta.error(
                    "`#[serde(alias)]` is not supported by SweepModel: sweeps must address a \
                     field by a single name",
                ));
            }
            _ => super::discard_unknown(meta)?,
        }
        Ok(())
    })?;
    Ok(out)
}
