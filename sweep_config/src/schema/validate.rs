//! Strict structural validation of JSON values against model schemas.

use serde_json::Value;

use super::{
    Alternative, Disambiguation, ExtraFields, FieldKind, ModelSchema, TagLayout, UnionSchema,
    Violation,
};
use crate::FieldPath;

/// Validate `value` against `schema`, returning every violation found.
///
/// Unknown keys (when the model forbids them), missing required fields,
/// rejected leaves and ambiguous exactly-one unions are all reported, each
/// with the path of the offending field. Values inside tagged unions are
/// checked against the alternative their tag names.
///
/// ```
/// use serde_json::json;
/// use sweep_config::schema::{ExtraFields, FieldKind, FieldSchema, LeafSchema, ModelSchema};
/// use sweep_config::validate_value;
///
/// let schema = ModelSchema::new("Point")
///     .extra(ExtraFields::Forbid)
///     .field(FieldSchema::required("x", FieldKind::Leaf(LeafSchema::of::<i64>())));
/// assert!(validate_value(&schema, &json!({"x": 1})).is_empty());
/// assert_eq!(validate_value(&schema, &json!({"x": 1, "y": 2})).len(), 1);
/// ```
#[must_use]
pub fn validate_value(schema: &ModelSchema, value: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_model(schema, value, None, &mut violations);
    violations
}

fn check_model(
    schema: &ModelSchema,
    value: &Value,
    at: Option<&FieldPath>,
    out: &mut Vec<Violation>,
) {
    let Value::Object(map) = value else {
        out.push(Violation::new(
            at.cloned(),
            format!("expected an object for model `{}`, got {value}", schema.name),
        ));
        return;
    };
    if schema.extra == ExtraFields::Forbid {
        for key in map.keys() {
            if schema.field_named(key).is_none() {
                out.push(Violation::new(
                    Some(FieldPath::nested(at, key)),
                    format!("unknown field for model `{}`", schema.name),
                ));
            }
        }
    }
    for field in &schema.fields {
        let path = FieldPath::nested(at, field.name);
        match map.get(field.name) {
            Some(item) => check_kind(&field.kind, item, &path, out),
            None if field.required => {
                out.push(Violation::new(Some(path), "missing required field"));
            }
            None => {}
        }
    }
}

fn check_kind(kind: &FieldKind, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
    match kind {
        FieldKind::Leaf(leaf) => {
            if let Err(message) = (leaf.check)(value) {
                out.push(Violation::new(
                    Some(path.clone()),
                    format!("invalid `{}`: {message}", leaf.type_name),
                ));
            }
        }
        FieldKind::Model(schema) => check_model(&schema(), value, Some(path), out),
        FieldKind::Optional(inner) => {
            if !value.is_null() {
                check_kind(inner, value, path, out);
            }
        }
        FieldKind::Union(union) => check_union(union, value, path, out),
    }
}

fn check_union(union: &UnionSchema, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
    match union.disambiguation {
        Disambiguation::Tagged(layout) => check_tagged(union, layout, value, path, out),
        Disambiguation::ExactlyOne => check_exactly_one(union, value, path, out),
        Disambiguation::FirstMatch => {}
    }
}

fn check_tagged(
    union: &UnionSchema,
    layout: TagLayout,
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) {
    let Value::Object(map) = value else {
        out.push(Violation::new(
            Some(path.clone()),
            format!("expected an object for tagged enum `{}`, got {value}", union.name),
        ));
        return;
    };
    match layout {
        TagLayout::External => {
            let mut keys = map.iter();
            let (Some((tag, inner)), None) = (keys.next(), keys.next()) else {
                out.push(Violation::new(
                    Some(path.clone()),
                    format!("`{}` expects exactly one variant key", union.name),
                ));
                return;
            };
            if let Some(alternative) = variant(union, tag, path, out) {
                check_kind(&alternative.kind, inner, &FieldPath::nested(Some(path), tag), out);
            }
        }
        TagLayout::Internal { tag } => {
            let Some(alternative) = tagged_variant(union, map, tag, path, out) else {
                return;
            };
            let mut fields = map.clone();
            fields.remove(tag);
            check_kind(&alternative.kind, &Value::Object(fields), path, out);
        }
        TagLayout::Adjacent { tag, content } => {
            let Some(alternative) = tagged_variant(union, map, tag, path, out) else {
                return;
            };
            for key in map.keys().filter(|key| *key != tag && *key != content) {
                out.push(Violation::new(
                    Some(FieldPath::nested(Some(path), key)),
                    format!("unknown key for tagged enum `{}`", union.name),
                ));
            }
            let content_path = FieldPath::nested(Some(path), content);
            match map.get(content) {
                Some(inner) => check_kind(&alternative.kind, inner, &content_path, out),
                None => out.push(Violation::new(Some(content_path), "missing variant content")),
            }
        }
    }
}

fn tagged_variant<'a>(
    union: &'a UnionSchema,
    map: &serde_json::Map<String, Value>,
    tag: &str,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<&'a Alternative> {
    let tag_path = FieldPath::nested(Some(path), tag);
    match map.get(tag) {
        Some(Value::String(name)) => variant(union, name, &tag_path, out),
        Some(other) => {
            out.push(Violation::new(
                Some(tag_path),
                format!("expected a variant name, got {other}"),
            ));
            None
        }
        None => {
            out.push(Violation::new(Some(tag_path), "missing required field"));
            None
        }
    }
}

fn variant<'a>(
    union: &'a UnionSchema,
    name: &str,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<&'a Alternative> {
    let found = union.alternatives.iter().find(|alternative| alternative.name == name);
    if found.is_none() {
        let known: Vec<&str> = union
            .alternatives
            .iter()
            .map(|alternative| alternative.name)
            .collect();
        out.push(Violation::new(
            Some(path.clone()),
            format!(
                "unknown variant `{name}` of `{}`, expected one of {}",
                union.name,
                known.join(", ")
            ),
        ));
    }
    found
}

fn check_exactly_one(
    union: &UnionSchema,
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) {
    let matches: Vec<&str> = union
        .alternatives
        .iter()
        .filter(|alternative| accepts(&alternative.kind, value, path))
        .map(|alternative| alternative.name)
        .collect();
    match matches.as_slice() {
        [_] => {}
        [] => out.push(Violation::new(
            Some(path.clone()),
            format!("value matches no alternative of `{}`", union.name),
        )),
        several => out.push(Violation::new(
            Some(path.clone()),
            format!(
                "value is ambiguous for `{}`: alternatives {} all match; build the nested model \
                 explicitly or use a tagged enum",
                union.name,
                several.join(", ")
            ),
        )),
    }
}

fn accepts(kind: &FieldKind, value: &Value, path: &FieldPath) -> bool {
    let mut scratch = Vec::new();
    check_kind(kind, value, path, &mut scratch);
    scratch.is_empty()
}
