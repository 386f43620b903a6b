//! Traits connecting Rust types to their schema descriptors.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{FieldKind, ModelSchema, Violation, validate};
use crate::{FieldPath, FieldValue, SweepError, SweepResult, SweepResultExt, nested};

/// A type that can appear as a field of a sweepable model.
///
/// Leaf types are implemented by this crate; models and enums get an
/// implementation from `#[derive(SweepModel)]`.
pub trait SweepField {
    /// Describe the values this type accepts.
    fn field_kind() -> FieldKind;
}

/// A model that sweeps can be materialized into.
///
/// The default methods form a strict schema engine over `serde`: values are
/// validated against [`SweepModel::model_schema`] before deserialization,
/// so unknown fields, missing fields and ambiguous unions are reported with
/// their paths instead of being resolved silently.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
/// use sweep_config::{FieldPath, SweepModel};
///
/// #[derive(Debug, Serialize, Deserialize, SweepModel)]
/// #[serde(deny_unknown_fields)]
/// struct Optimizer {
///     lr: f64,
///     #[serde(default)]
///     momentum: f64,
/// }
///
/// let mut optimizer = Optimizer::construct(json!({"lr": 0.1})).expect("valid");
/// optimizer.assign(&FieldPath::parse("momentum")?, 0.9.into())?;
/// assert!(optimizer.assign(&FieldPath::parse("lr")?, "fast".into()).is_err());
/// assert!((optimizer.lr - 0.1).abs() < f64::EPSILON);
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
pub trait SweepModel: SweepField + Serialize + DeserializeOwned {
    /// Schema of this model.
    fn model_schema() -> ModelSchema;

    /// Validate `value` strictly and build an instance from it.
    ///
    /// # Errors
    ///
    /// Returns every [`Violation`] found; a deserialization failure after a
    /// clean schema pass is reported as a single violation without a path.
    fn construct(value: Value) -> Result<Self, Vec<Violation>> {
        let violations = validate::validate_value(&Self::model_schema(), &value);
        if !violations.is_empty() {
            return Err(violations);
        }
        serde_json::from_value(value).map_err(|err| vec![Violation::new(None, err.to_string())])
    }

    /// Assign `value` at `path` after construction.
    ///
    /// The updated instance is re-validated as a whole when the schema asks
    /// for validation on assignment; on failure `self` is left unchanged.
    /// Assigning [`FieldValue::Default`] restores the field's default.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Validation`] for every violation of the updated
    /// instance, aggregated when there are several, and
    /// [`SweepError::InvalidArgument`] when the instance does not serialize to
    /// a JSON object.
    fn assign(&mut self, path: &FieldPath, value: FieldValue) -> SweepResult<()> {
        let mut current = serde_json::to_value(&*self).into_sweep()?;
        let Value::Object(map) = &mut current else {
            return Err(Arc::new(SweepError::InvalidArgument {
                name: "self",
                message: format!(
                    "model `{}` does not serialize to an object; `{path}` cannot be assigned",
                    Self::model_schema().name
                ),
            }));
        };
        match value {
            FieldValue::Value(leaf) => nested::insert(map, path.segments(), leaf),
            FieldValue::Default => {
                let _removed = nested::remove(&mut current, path.segments());
            }
        }
        let updated = if Self::model_schema().validate_assignment {
            Self::construct(current)
        } else {
            serde_json::from_value(current)
                .map_err(|err| vec![Violation::new(Some(path.clone()), err.to_string())])
        };
        *self = updated.map_err(|violations| {
            SweepError::try_aggregate(violation_errors(None, None, violations)).map_or_else(
                || SweepError::validation(None, Some(path.clone()), "assignment rejected"),
                Arc::new,
            )
        })?;
        tracing::debug!(model = Self::model_schema().name, field = %path, "assigned field");
        Ok(())
    }
}

/// Convert violations into validation errors for configuration `index`,
/// re-rooting their paths below `prefix`.
pub(crate) fn violation_errors(
    index: Option<usize>,
    prefix: Option<&FieldPath>,
    violations: Vec<Violation>,
) -> Vec<Arc<SweepError>> {
    if violations.is_empty() {
        return vec![SweepError::validation(
            index,
            prefix.cloned(),
            "rejected by the schema engine",
        )];
    }
    violations
        .into_iter()
        .map(|violation| {
            let path = match (prefix, violation.path) {
                (Some(prefix), Some(path)) => Some(prefix.concat(&path)),
                (Some(prefix), None) => Some(prefix.clone()),
                (None, path) => path,
            };
            SweepError::validation(index, path, violation.message)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::schema::LeafSchema;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Level(u8);

    impl SweepField for Level {
        fn field_kind() -> FieldKind {
            FieldKind::Leaf(LeafSchema::of::<Self>())
        }
    }

    impl SweepModel for Level {
        fn model_schema() -> ModelSchema {
            ModelSchema::new("Level").validate_assignment(true)
        }
    }

    #[test]
    fn assign_rejects_models_that_are_not_objects() {
        let mut level = Level(3);
        let path = FieldPath::parse("value").expect("path");
        let err = level
            .assign(&path, FieldValue::from(4))
            .expect_err("a bare number has no fields");
        assert!(
            matches!(&*err, SweepError::InvalidArgument { name: "self", .. }),
            "{err}"
        );
        assert_eq!(level, Level(3));
    }
}
