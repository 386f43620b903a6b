//! Constructors and inspection helpers for `SweepError`.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{AggregatedErrors, SweepError};
use crate::FieldPath;

impl SweepError {
    /// Tries to build a [`SweepError`] from an iterator of errors.
    ///
    /// The iterator is consumed eagerly. It returns:
    /// * `None` when no errors are supplied;
    /// * the inner error when a single [`Arc`] is uniquely owned;
    /// * [`Self::Aggregate`] containing that single [`Arc`] when the error is already shared; and
    /// * [`Self::Aggregate`] combining every error for two or more inputs.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Build a [`SweepError`] from at least one error.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty. Use [`SweepError::try_aggregate`] when the
    /// list may be empty.
    #[must_use]
    #[track_caller]
    pub fn aggregate<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        Self::try_aggregate(errors).map_or_else(
            || panic!("aggregate requires at least one error"),
            |err| err,
        )
    }

    /// Construct a conflict between two overlapping paths.
    #[must_use]
    pub fn conflict(first: &FieldPath, second: &FieldPath) -> Arc<Self> {
        Arc::new(Self::ConfigConflict {
            first: first.clone(),
            second: second.clone(),
        })
    }

    /// Construct an [`SweepError::EmptyValues`] for `operation`.
    #[must_use]
    pub fn empty(operation: &'static str) -> Arc<Self> {
        Arc::new(Self::EmptyValues { operation })
    }

    /// Construct a validation error for one configuration of a sweep.
    #[must_use]
    pub fn validation(
        index: Option<usize>,
        path: Option<FieldPath>,
        message: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self::Validation {
            index,
            path,
            message: message.into(),
        })
    }

    /// Indices of the sweep elements that failed validation.
    ///
    /// Looks through aggregates, so batched initialization failures report
    /// every rejected configuration. The result is sorted and deduplicated.
    ///
    /// # Examples
    ///
    /// ```
    /// use sweep_config::SweepError;
    /// let err = SweepError::aggregate(vec![
    ///     SweepError::Validation { index: Some(4), path: None, message: "x".into() },
    ///     SweepError::Validation { index: Some(1), path: None, message: "y".into() },
    ///     SweepError::Validation { index: Some(4), path: None, message: "z".into() },
    /// ]);
    /// assert_eq!(err.failing_indices(), vec![1, 4]);
    /// ```
    #[must_use]
    pub fn failing_indices(&self) -> Vec<usize> {
        let mut indices = BTreeSet::new();
        self.collect_indices(&mut indices);
        indices.into_iter().collect()
    }

    /// Index of the configuration this error belongs to, when it is tied to
    /// exactly one.
    #[must_use]
    pub const fn configuration_index(&self) -> Option<usize> {
        match self {
            Self::Validation { index, .. } => *index,
            _ => None,
        }
    }

    pub(super) fn collect_indices(&self, out: &mut BTreeSet<usize>) {
        match self {
            Self::Aggregate(errors) => errors.collect_indices(out),
            other => out.extend(other.configuration_index()),
        }
    }
}
