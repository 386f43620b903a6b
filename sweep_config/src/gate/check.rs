//! Structural safety audit of model schemas.

use std::collections::HashSet;
use std::sync::Arc;

use crate::schema::{Disambiguation, ExtraFields, FieldKind, ModelSchema};
use crate::{FieldPath, SweepError, SweepModel, SweepResult};

/// What to do with leaf fields whose type is not hashable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnhashableAction {
    /// Emit a `tracing` warning and continue.
    #[default]
    Warn,
    /// Accept the field silently.
    Ignore,
    /// Fail the audit with [`SweepError::UnsafeModel`].
    Raise,
}

/// Options for [`check_model_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Treatment of unhashable leaf types.
    pub unhashable: UnhashableAction,
}

impl CheckOptions {
    /// Options with every setting at its default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unhashable: UnhashableAction::Warn,
        }
    }

    /// Set the treatment of unhashable leaf types.
    #[must_use]
    pub const fn unhashable(mut self, action: UnhashableAction) -> Self {
        self.unhashable = action;
        self
    }
}

/// Audit `M` and every model reachable from it with default options.
///
/// # Errors
///
/// See [`check_schema`].
pub fn check_model<M: SweepModel>() -> SweepResult<()> {
    check_model_with::<M>(&CheckOptions::default())
}

/// Audit `M` and every model reachable from it.
///
/// # Errors
///
/// See [`check_schema`].
pub fn check_model_with<M: SweepModel>(options: &CheckOptions) -> SweepResult<()> {
    check_schema(&M::model_schema(), options)
}

/// Audit a schema and every model reachable from it, depth first in field
/// declaration order.
///
/// Each model must forbid unknown fields and re-validate on assignment; each
/// union with several alternatives must be tagged or use the exactly-one
/// matcher. Models are audited once per [`ModelSchema::key`], so recursive
/// schemas terminate.
///
/// # Errors
///
/// Returns [`SweepError::UnsafeModel`] naming the first offending model, the
/// field path from the audited root and the missing property.
pub fn check_schema(schema: &ModelSchema, options: &CheckOptions) -> SweepResult<()> {
    let mut audited = HashSet::new();
    audit_model(schema, None, options, &mut audited)?;
    tracing::debug!(model = schema.name, models = audited.len(), "model passed safety audit");
    Ok(())
}

fn audit_model(
    schema: &ModelSchema,
    at: Option<&FieldPath>,
    options: &CheckOptions,
    audited: &mut HashSet<&'static str>,
) -> SweepResult<()> {
    if !audited.insert(schema.key) {
        return Ok(());
    }
    if schema.extra != ExtraFields::Forbid {
        return Err(unsafe_model(
            schema.name,
            at,
            "unknown fields must be forbidden, otherwise misspelled field names are silently \
             ignored",
        ));
    }
    if !schema.validate_assignment {
        return Err(unsafe_model(
            schema.name,
            at,
            "assignments must be validated, otherwise instances can be mutated into invalid \
             states",
        ));
    }
    for field in &schema.fields {
        let path = FieldPath::nested(at, field.name);
        audit_kind(schema.name, &field.kind, &path, options, audited)?;
    }
    Ok(())
}

fn audit_kind(
    owner: &'static str,
    kind: &FieldKind,
    path: &FieldPath,
    options: &CheckOptions,
    audited: &mut HashSet<&'static str>,
) -> SweepResult<()> {
    match kind {
        FieldKind::Leaf(leaf) if !leaf.hashable => match options.unhashable {
            UnhashableAction::Warn => {
                tracing::warn!(
                    model = owner,
                    field = %path,
                    type_name = leaf.type_name,
                    "non-hashable field type; its serialized form is unstable and \
                     configurations holding it cannot be deduplicated reliably"
                );
                Ok(())
            }
            UnhashableAction::Ignore => Ok(()),
            UnhashableAction::Raise => Err(unsafe_model(
                owner,
                Some(path),
                &format!("field type `{}` is not hashable", leaf.type_name),
            )),
        },
        FieldKind::Leaf(_) => Ok(()),
        FieldKind::Model(schema) => audit_model(&schema(), Some(path), options, audited),
        FieldKind::Optional(inner) => audit_kind(owner, inner, path, options, audited),
        FieldKind::Union(union) => {
            if union.disambiguation == Disambiguation::FirstMatch && union.alternatives.len() > 1 {
                return Err(unsafe_model(
                    owner,
                    Some(path),
                    &format!(
                        "union `{}` resolves to its first matching alternative; tag it or mark \
                         it `#[sweep(exactly_one)]`",
                        union.name
                    ),
                ));
            }
            for alternative in &union.alternatives {
                audit_kind(owner, &alternative.kind, path, options, audited)?;
            }
            Ok(())
        }
    }
}

fn unsafe_model(model: &str, at: Option<&FieldPath>, reason: &str) -> Arc<SweepError> {
    Arc::new(SweepError::UnsafeModel {
        model: model.to_owned(),
        path: at.cloned(),
        reason: reason.to_owned(),
    })
}
