//! Schema descriptors consumed by the validation gate.
//!
//! A [`ModelSchema`] describes the fields of a model type: their names,
//! whether they are required, and what kind of value each accepts. The
//! descriptors are usually generated by `#[derive(SweepModel)]`, but any
//! engine can build them by hand and implement [`SweepModel`] directly.

mod field;
mod model;
mod validate;

use std::any::type_name;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::FieldPath;

pub use model::{SweepField, SweepModel};
pub(crate) use model::violation_errors;
pub use validate::validate_value;

/// Produces the schema of a nested model on demand.
///
/// Models refer to each other through function pointers, so recursive types
/// describe themselves without infinite descriptors.
pub type SchemaFn = fn() -> ModelSchema;

/// Checks that a JSON value is acceptable for a leaf type.
pub type CheckFn = fn(&Value) -> Result<(), String>;

/// How a model treats keys that name none of its fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtraFields {
    /// Unknown keys are silently dropped.
    #[default]
    Ignore,
    /// Unknown keys are a validation error.
    Forbid,
}

/// Field layout and safety properties of a model type.
#[derive(Clone, Debug)]
pub struct ModelSchema {
    /// Type name shown in diagnostics.
    pub name: &'static str,
    /// Identity of the model type; the audit visits each key once. Distinct
    /// types must not share a key, even when their names coincide.
    pub key: &'static str,
    /// Treatment of unknown keys.
    pub extra: ExtraFields,
    /// Whether [`SweepModel::assign`] re-validates the whole instance.
    pub validate_assignment: bool,
    /// Fields in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl ModelSchema {
    /// Start a schema that ignores unknown keys and skips validation on
    /// assignment. Use the builder methods to tighten it.
    ///
    /// The audit key defaults to `name`; set it with [`Self::keyed`] when
    /// several types share a name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            key: name,
            extra: ExtraFields::Ignore,
            validate_assignment: false,
            fields: Vec::new(),
        }
    }

    /// Set the audit key, usually `core::any::type_name::<Self>()`.
    #[must_use]
    pub fn keyed(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Set the treatment of unknown keys.
    #[must_use]
    pub fn extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Set whether assignments are re-validated.
    #[must_use]
    pub fn validate_assignment(mut self, enabled: bool) -> Self {
        self.validate_assignment = enabled;
        self
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by its serialized name.
    #[must_use]
    pub fn field_named(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// One field of a [`ModelSchema`].
#[derive(Clone, Debug)]
pub struct FieldSchema {
    /// Serialized name of the field.
    pub name: &'static str,
    /// Accepted values.
    pub kind: FieldKind,
    /// `false` when the model supplies a default for a missing field.
    pub required: bool,
}

impl FieldSchema {
    /// A field that must be present.
    #[must_use]
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// A field the model can default.
    #[must_use]
    pub const fn defaulted(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// What a field accepts.
#[derive(Clone, Debug)]
pub enum FieldKind {
    /// A value validated as a whole.
    Leaf(LeafSchema),
    /// A nested model.
    Model(SchemaFn),
    /// `null` or the inner kind.
    Optional(Box<FieldKind>),
    /// One of several alternatives.
    Union(UnionSchema),
}

/// Validation and audit data for a leaf type.
#[derive(Clone, Copy)]
pub struct LeafSchema {
    /// Rust type name for diagnostics.
    pub type_name: &'static str,
    /// `false` for types whose serialized form is not stable, such as hash
    /// maps, whose key order is unspecified.
    pub hashable: bool,
    /// Value check.
    pub check: CheckFn,
}

impl LeafSchema {
    /// Leaf accepting whatever `T` deserializes from.
    #[must_use]
    pub fn of<T: DeserializeOwned>() -> Self {
        Self {
            type_name: type_name::<T>(),
            hashable: true,
            check: accepts::<T>,
        }
    }

    /// Leaf accepting any value; its deserializer is custom and runs only
    /// when the model itself is built.
    #[must_use]
    pub const fn opaque(type_name: &'static str) -> Self {
        Self {
            type_name,
            hashable: true,
            check: accept_any,
        }
    }

    /// Mark the leaf as unhashable.
    #[must_use]
    pub const fn unhashable(mut self) -> Self {
        self.hashable = false;
        self
    }
}

impl fmt::Debug for LeafSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafSchema")
            .field("type_name", &self.type_name)
            .field("hashable", &self.hashable)
            .finish_non_exhaustive()
    }
}

fn accepts<T: DeserializeOwned>(value: &Value) -> Result<(), String> {
    T::deserialize(value)
        .map(drop)
        .map_err(|err| err.to_string())
}

const fn accept_any(_: &Value) -> Result<(), String> {
    Ok(())
}

/// An enum whose variants each wrap one field type.
#[derive(Clone, Debug)]
pub struct UnionSchema {
    /// Type name of the enum.
    pub name: &'static str,
    /// Variants in declaration order.
    pub alternatives: Vec<Alternative>,
    /// How the engine picks the alternative for a value.
    pub disambiguation: Disambiguation,
}

/// One variant of a [`UnionSchema`].
#[derive(Clone, Debug)]
pub struct Alternative {
    /// Variant name.
    pub name: &'static str,
    /// Accepted values.
    pub kind: FieldKind,
}

/// Rule resolving which alternative of a union a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disambiguation {
    /// A tag in the data names the alternative.
    Tagged(TagLayout),
    /// Exactly one alternative may accept the data; zero or several matches
    /// are rejected.
    ExactlyOne,
    /// The first accepting alternative wins, silently.
    FirstMatch,
}

/// Where the tag of a [`Disambiguation::Tagged`] union sits in the data.
///
/// Mirrors the `serde` enum representations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagLayout {
    /// `{"Variant": value}`.
    #[default]
    External,
    /// `{"<tag>": "Variant", ...fields}`; the fields sit beside the tag.
    Internal {
        /// Key holding the variant name.
        tag: &'static str,
    },
    /// `{"<tag>": "Variant", "<content>": value}`.
    Adjacent {
        /// Key holding the variant name.
        tag: &'static str,
        /// Key holding the variant value.
        content: &'static str,
    },
}

/// A validation failure reported by the schema engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Offending field, relative to the validated model; `None` when the
    /// whole value was rejected.
    pub path: Option<FieldPath>,
    /// Human-readable explanation.
    pub message: String,
}

impl Violation {
    /// Create a violation.
    #[must_use]
    pub fn new(path: Option<FieldPath>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "`{path}`: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
