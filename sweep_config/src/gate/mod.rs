//! Materializing sweeps into validated model instances.
//!
//! [`initialize`] turns every configuration of a sweep into a fresh model;
//! [`Initializer`] adds constant and default assignments, nested
//! construction, and control over auditing and failure handling.

mod check;

use std::sync::Arc;

pub use check::{CheckOptions, UnhashableAction, check_model, check_model_with, check_schema};

use crate::schema::violation_errors;
use crate::{
    FieldPath, FieldValue, PartialConfig, PathSpec, Sweep, SweepError, SweepModel, SweepResult,
};

/// How batched construction reacts to rejected configurations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Validate every configuration and report all failures together.
    #[default]
    CollectAll,
    /// Stop at the first rejected configuration.
    FailFast,
}

/// Builder applying a sweep to a model type.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use sweep_config::{field, Initializer, PartialConfig, SweepModel};
///
/// #[derive(Debug, Serialize, Deserialize, SweepModel)]
/// #[serde(deny_unknown_fields)]
/// struct Run {
///     seed: u32,
///     lr: f64,
///     #[serde(default)]
///     tag: String,
/// }
///
/// let sweep = field("seed", [1, 2, 3])?;
/// let runs: Vec<Run> = Initializer::new(&sweep)
///     .constant(PartialConfig::new([("lr", 0.1)])?)
///     .build()?;
/// assert_eq!(runs.len(), 3);
/// assert_eq!(runs.last().map(|run| run.seed), Some(3));
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Initializer<'a> {
    sweep: &'a Sweep,
    constant: PartialConfig,
    defaults: PartialConfig,
    check: bool,
    check_options: CheckOptions,
    policy: FailurePolicy,
}

impl<'a> Initializer<'a> {
    /// Start from `sweep` with no constants or defaults, auditing enabled and
    /// [`FailurePolicy::CollectAll`].
    #[must_use]
    pub fn new(sweep: &'a Sweep) -> Self {
        Self {
            sweep,
            constant: PartialConfig::default(),
            defaults: PartialConfig::default(),
            check: true,
            check_options: CheckOptions::default(),
            policy: FailurePolicy::default(),
        }
    }

    /// Assignments merged into every configuration with conflict checking.
    #[must_use]
    pub fn constant(mut self, config: PartialConfig) -> Self {
        self.constant = config;
        self
    }

    /// Assignments applied beneath every configuration.
    ///
    /// Explicit assignments win over defaults without a conflict; sentinel
    /// entries among the defaults change nothing.
    #[must_use]
    pub fn defaults(mut self, config: PartialConfig) -> Self {
        self.defaults = config.without_defaults();
        self
    }

    /// Enable or disable the [`check_model`] audit before construction.
    #[must_use]
    pub fn check(mut self, enabled: bool) -> Self {
        self.check = enabled;
        self
    }

    /// Options for the audit.
    #[must_use]
    pub fn check_options(mut self, options: CheckOptions) -> Self {
        self.check_options = options;
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The exact assignments handed to the schema engine, one per
    /// configuration: constants merged, sentinels stripped, defaults laid
    /// beneath.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::ConfigConflict`] when a constant overlaps an
    /// assignment of any configuration, including a sentinel.
    pub fn assignments(&self) -> SweepResult<Vec<PartialConfig>> {
        self.sweep
            .iter()
            .map(|config| {
                let merged = config.merge(&self.constant)?;
                Ok(merged.without_defaults().overlay(&self.defaults))
            })
            .collect()
    }

    /// Construct one model per configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::UnsafeModel`] when the audit fails,
    /// [`SweepError::ConfigConflict`] for conflicting constants, and
    /// [`SweepError::Validation`] errors (aggregated when several) for
    /// rejected configurations. Use [`SweepError::failing_indices`] to find
    /// the rejected positions.
    pub fn build<M: SweepModel>(&self) -> SweepResult<Vec<M>> {
        self.audit::<M>()?;
        let assignments = self.assignments()?;
        construct_all(&assignments, None, self.policy)
    }

    /// Construct the models and assign each one, serialized, at `path`.
    ///
    /// # Errors
    ///
    /// As [`Initializer::build`], plus [`SweepError::InvalidPath`] for a
    /// malformed path and [`SweepError::Serialization`] if a model cannot be
    /// serialized.
    pub fn build_to<M: SweepModel>(&self, path: impl PathSpec) -> SweepResult<Sweep> {
        let target = path.to_field_path()?;
        let models = self.build::<M>()?;
        models
            .iter()
            .map(|model| {
                FieldValue::of(model).map(|value| PartialConfig::single(target.clone(), value))
            })
            .collect()
    }

    /// Construct the model nested at `path` and replace the assignments
    /// below `path` with it.
    ///
    /// Assignments outside `path` are kept as they are, so the result can be
    /// combined further or handed to the parent model.
    ///
    /// # Errors
    ///
    /// As [`Initializer::build`], with validation paths reported from the
    /// root. A configuration assigning a value at exactly `path` is rejected
    /// with [`SweepError::Validation`].
    pub fn build_at<M: SweepModel>(&self, path: impl PathSpec) -> SweepResult<Sweep> {
        let at = path.to_field_path()?;
        self.audit::<M>()?;
        let assignments = self.assignments()?;
        let mut inner = Vec::with_capacity(assignments.len());
        let mut outer = Vec::with_capacity(assignments.len());
        for (index, config) in assignments.iter().enumerate() {
            if config.get(&at).is_some() {
                return Err(SweepError::validation(
                    Some(index),
                    Some(at),
                    "a value is assigned where the nested model is built",
                ));
            }
            let (below, rest) = config.split_at(&at);
            inner.push(below);
            outer.push(rest);
        }
        let models: Vec<M> = construct_all(&inner, Some(&at), self.policy)?;
        outer
            .iter()
            .zip(&models)
            .map(|(rest, model)| {
                let value = FieldValue::of(model)?;
                rest.merge(&PartialConfig::single(at.clone(), value))
            })
            .collect()
    }

    fn audit<M: SweepModel>(&self) -> SweepResult<()> {
        if self.check {
            check_model_with::<M>(&self.check_options)?;
        }
        Ok(())
    }
}

/// Construct one `M` per configuration of `sweep`.
///
/// Shorthand for `Initializer::new(sweep).build()`.
///
/// # Errors
///
/// See [`Initializer::build`].
pub fn initialize<M: SweepModel>(sweep: &Sweep) -> SweepResult<Vec<M>> {
    Initializer::new(sweep).build()
}

fn construct_all<M: SweepModel>(
    configs: &[PartialConfig],
    prefix: Option<&FieldPath>,
    policy: FailurePolicy,
) -> SweepResult<Vec<M>> {
    let mut models = Vec::with_capacity(configs.len());
    let mut errors = Vec::new();
    for (index, config) in configs.iter().enumerate() {
        match M::construct(config.to_value()) {
            Ok(model) => models.push(model),
            Err(violations) => {
                errors.extend(violation_errors(Some(index), prefix, violations));
                if policy == FailurePolicy::FailFast {
                    break;
                }
            }
        }
    }
    let model = M::model_schema().name;
    SweepError::try_aggregate(errors).map_or_else(
        || {
            tracing::debug!(model, count = models.len(), "initialized sweep");
            Ok(models)
        },
        |err| {
            tracing::debug!(model, failing = ?err.failing_indices(), "sweep initialization failed");
            Err(Arc::new(err))
        },
    )
}

#[cfg(test)]
mod tests;
