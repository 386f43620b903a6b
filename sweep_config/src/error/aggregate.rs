//! Errors collected across the configurations of one sweep.

use std::collections::BTreeSet;
use std::{error::Error, fmt, sync::Arc};

use super::SweepError;

/// Every error a batched call produced, keyed by the configuration that
/// raised it.
///
/// Initialization under [`FailurePolicy::CollectAll`](crate::FailurePolicy)
/// keeps going after a rejected configuration, so one run reports every bad
/// element of a sweep. Display lists the errors by configuration index;
/// errors not tied to a configuration come last.
///
/// # Examples
///
/// ```
/// use sweep_config::SweepError;
/// let e = SweepError::aggregate(vec![
///     SweepError::Validation { index: Some(3), path: None, message: "worse".into() },
///     SweepError::Validation { index: Some(0), path: None, message: "bad".into() },
/// ]);
/// if let SweepError::Aggregate(agg) = e {
///     assert_eq!(agg.failing_indices(), vec![0, 3]);
///     assert_eq!(agg.for_configuration(3).count(), 1);
/// }
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<Arc<SweepError>>);

impl AggregatedErrors {
    /// Create a new aggregation from a vector of errors.
    #[must_use]
    pub const fn new(errors: Vec<Arc<SweepError>>) -> Self {
        Self(errors)
    }

    /// Iterate over the contained errors in the order they were collected.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &SweepError> {
        self.0.iter().map(Arc::as_ref)
    }

    /// Number of errors in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the aggregation holds no errors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted, deduplicated indices of the rejected configurations, looking
    /// through nested aggregates.
    #[must_use]
    pub fn failing_indices(&self) -> Vec<usize> {
        let mut indices = BTreeSet::new();
        self.collect_indices(&mut indices);
        indices.into_iter().collect()
    }

    pub(super) fn collect_indices(&self, out: &mut BTreeSet<usize>) {
        for error in self {
            error.collect_indices(out);
        }
    }

    /// Errors raised by configuration `index`, including those inside nested
    /// aggregates.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn for_configuration(&self, index: usize) -> impl Iterator<Item = &SweepError> {
        let mut found = Vec::new();
        self.collect_for(index, &mut found);
        found.into_iter()
    }

    fn collect_for<'a>(&'a self, index: usize, out: &mut Vec<&'a SweepError>) {
        for error in self {
            match error {
                SweepError::Aggregate(nested) => nested.collect_for(index, out),
                other if other.configuration_index() == Some(index) => out.push(other),
                _ => {}
            }
        }
    }

    /// Errors ordered by configuration index; unindexed errors keep their
    /// relative order at the end.
    fn by_configuration(&self) -> Vec<&SweepError> {
        let mut ordered: Vec<&SweepError> = self.iter().collect();
        ordered.sort_by_key(|error| {
            error
                .configuration_index()
                .map_or((1, 0), |index| (0, index))
        });
        ordered
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.len() == 1 { "error" } else { "errors" };
        write!(f, "{} {noun}", self.len())?;
        let indices = self.failing_indices();
        if !indices.is_empty() {
            let listed: Vec<String> = indices.iter().map(ToString::to_string).collect();
            write!(f, " across configurations {}", listed.join(", "))?;
        }
        for error in self.by_configuration() {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}

impl<'a> IntoIterator for &'a AggregatedErrors {
    type Item = &'a SweepError;
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, Arc<SweepError>>,
        fn(&'a Arc<SweepError>) -> &'a SweepError,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(Arc::as_ref)
    }
}

impl IntoIterator for AggregatedErrors {
    type Item = Arc<SweepError>;
    type IntoIter = std::vec::IntoIter<Arc<SweepError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
