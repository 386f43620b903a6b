//! Primary error enum for sweep construction and model validation.

use thiserror::Error;

use super::aggregate::AggregatedErrors;
use crate::FieldPath;

/// Errors raised by combinators, the schema gate, and the sweep utilities.
///
/// Every failure is reported by the call that detects it. Combinators never
/// hand back a partially built sweep alongside an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SweepError {
    /// A path specification was empty or contained an invalid segment.
    #[error("invalid path '{spec}': {message}")]
    InvalidPath {
        /// The specification as supplied by the caller.
        spec: String,
        /// Why the specification was rejected.
        message: String,
    },

    /// An operation received no sweeps, or a sweep without elements.
    #[error("`{operation}` requires at least one non-empty sweep")]
    EmptyValues {
        /// Name of the operation that rejected its input.
        operation: &'static str,
    },

    /// Two assignments address the same field, or one addresses a parent of
    /// the other.
    #[error("conflicting assignments for `{first}` and `{second}`: merging would overwrite a field")]
    ConfigConflict {
        /// Path already present in the configuration.
        first: FieldPath,
        /// Incoming path that overlaps `first`.
        second: FieldPath,
    },

    /// Sweeps paired index-wise have different lengths.
    #[error("sweep at position {position} has {found} elements, expected {expected}")]
    LengthMismatch {
        /// Length of the first sweep.
        expected: usize,
        /// Length of the offending sweep.
        found: usize,
        /// Argument position of the offending sweep.
        position: usize,
    },

    /// The schema rejected a concrete set of assignments.
    #[error("validation failed{}: {message}", location(.index, .path))]
    Validation {
        /// Position of the configuration within its sweep, when known.
        index: Option<usize>,
        /// Offending field, or `None` when the whole configuration failed.
        path: Option<FieldPath>,
        /// Explanation supplied by the schema engine.
        message: String,
    },

    /// A model type failed the structural safety audit.
    #[error("model `{model}`{} is unsafe to sweep: {reason}", field_suffix(.path))]
    UnsafeModel {
        /// Name of the model that owns the offending field.
        model: String,
        /// Path of the offending field from the audited root model.
        path: Option<FieldPath>,
        /// The missing safety property.
        reason: String,
    },

    /// The same configuration or model appears twice.
    #[error("item {duplicate} duplicates item {first}")]
    Duplicate {
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        duplicate: usize,
    },

    /// A helper received an argument outside its domain.
    #[error("invalid argument `{name}`: {message}")]
    InvalidArgument {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// A value could not be represented as JSON.
    #[error("failed to serialize value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Several errors were collected during a single call.
    #[error("sweep failed with {0}")]
    Aggregate(Box<AggregatedErrors>),
}

fn location(index: &Option<usize>, path: &Option<FieldPath>) -> String {
    match (index, path) {
        (Some(index), Some(path)) => format!(" for configuration {index} at `{path}`"),
        (Some(index), None) => format!(" for configuration {index}"),
        (None, Some(path)) => format!(" at `{path}`"),
        (None, None) => String::new(),
    }
}

fn field_suffix(path: &Option<FieldPath>) -> String {
    path.as_ref()
        .map(|path| format!(" (field `{path}`)"))
        .unwrap_or_default()
}
