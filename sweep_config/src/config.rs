//! Immutable, conflict-checked sets of path assignments.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::nested;
use crate::{FieldPath, FieldValue, PathSpec, SweepError, SweepResult};

/// Ordered mapping from [`FieldPath`] to [`FieldValue`].
///
/// No two assignments of a configuration overlap: a path never appears twice
/// and never alongside one of its own prefixes. Equality is sensitive to
/// assignment order.
///
/// ```
/// use sweep_config::PartialConfig;
///
/// let left = PartialConfig::new([("optimizer.lr", 0.1)])?;
/// let right = PartialConfig::new([("seed", 3)])?;
/// let merged = left.merge(&right)?;
/// assert_eq!(merged.len(), 2);
///
/// let clash = PartialConfig::new([("optimizer", "adam")])?;
/// assert!(left.merge(&clash).is_err());
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PartialConfig {
    entries: Arc<[(FieldPath, FieldValue)]>,
}

impl PartialConfig {
    /// Build a configuration from `(path, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidPath`] for malformed paths and
    /// [`SweepError::ConfigConflict`] when two paths overlap.
    pub fn new<I, P, V>(assignments: I) -> SweepResult<Self>
    where
        I: IntoIterator<Item = (P, V)>,
        P: PathSpec,
        V: Into<FieldValue>,
    {
        let mut entries: Vec<(FieldPath, FieldValue)> = Vec::new();
        for (spec, value) in assignments {
            let path = spec.to_field_path()?;
            push_checked(&mut entries, path, value.into())?;
        }
        Ok(Self::from_entries(entries))
    }

    /// A configuration holding exactly one assignment.
    #[must_use]
    pub fn single(path: FieldPath, value: FieldValue) -> Self {
        Self::from_entries(vec![(path, value)])
    }

    /// Flatten a nested JSON object into leaf assignments.
    ///
    /// Nested objects become dotted paths; arrays, scalars and empty objects
    /// are assigned whole. Keys are visited in sorted order at every level,
    /// not in the order the document lists them.
    ///
    /// ```
    /// use serde_json::json;
    /// use sweep_config::{FieldPath, FieldValue, PartialConfig};
    ///
    /// let config = PartialConfig::from_nested(&json!({"sub": {"x": 1}, "seed": 2}))?;
    /// assert_eq!(
    ///     config.get(&FieldPath::parse("sub.x")?),
    ///     Some(&FieldValue::from(1))
    /// );
    /// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidArgument`] when `value` is not an object
    /// and [`SweepError::InvalidPath`] when a key is not a valid segment.
    pub fn from_nested(value: &Value) -> SweepResult<Self> {
        let Value::Object(map) = value else {
            return Err(Arc::new(SweepError::InvalidArgument {
                name: "value",
                message: format!("expected a JSON object, got {value}"),
            }));
        };
        let mut entries = Vec::new();
        for (segments, leaf) in nested::flatten(map) {
            entries.push((FieldPath::from_segments(segments)?, FieldValue::Value(leaf)));
        }
        Ok(Self::from_entries(entries))
    }

    pub(crate) fn from_entries(entries: Vec<(FieldPath, FieldValue)>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Combine two configurations, `self` first.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::ConfigConflict`] when any path of `self`
    /// overlaps any path of `other`, whatever the values involved.
    pub fn merge(&self, other: &Self) -> SweepResult<Self> {
        Self::merge_all([self, other])
    }

    /// Merge several configurations in argument order.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::ConfigConflict`] on the first overlapping pair.
    pub fn merge_all<'a, I>(configs: I) -> SweepResult<Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut entries: Vec<(FieldPath, FieldValue)> = Vec::new();
        for config in configs {
            for (path, value) in config.iter() {
                push_checked(&mut entries, path.clone(), value.clone())?;
            }
        }
        Ok(Self::from_entries(entries))
    }

    /// The value assigned at exactly `path`.
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&FieldValue> {
        self.iter()
            .find_map(|(candidate, value)| (candidate == path).then_some(value))
    }

    /// Iterate over the assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldValue)> {
        self.entries.iter().map(|(path, value)| (path, value))
    }

    /// Iterate over the assigned paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.entries.iter().map(|(path, _)| path)
    }

    /// Number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if any path of `self` overlaps any path of `other`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        first_overlap(self, other).is_some()
    }

    /// Drop every [`DefaultValue`](crate::DefaultValue) assignment.
    #[must_use]
    pub fn without_defaults(&self) -> Self {
        Self::from_entries(
            self.entries
                .iter()
                .filter(|(_, value)| !value.is_default())
                .cloned()
                .collect(),
        )
    }

    /// Layer `self` over `base` without conflict checking.
    ///
    /// Entries of `base` that overlap any assignment of `self` are dropped, so
    /// explicit assignments always win. `self`'s entries come first.
    #[must_use]
    pub fn overlay(&self, base: &Self) -> Self {
        let mut entries = self.entries.to_vec();
        entries.extend(
            base.entries
                .iter()
                .filter(|(path, _)| !self.paths().any(|own| own.overlaps(path)))
                .cloned(),
        );
        Self::from_entries(entries)
    }

    /// Split into the assignments strictly below `prefix` (re-rooted at
    /// `prefix`) and all remaining assignments.
    pub(crate) fn split_at(&self, prefix: &FieldPath) -> (Self, Self) {
        let mut inner = Vec::new();
        let mut outer = Vec::new();
        for (path, value) in self {
            match path
                .strip_prefix(prefix)
                .and_then(|rest| FieldPath::from_trusted(rest.to_vec()))
            {
                Some(relative) => inner.push((relative, value.clone())),
                None => outer.push((path.clone(), value.clone())),
            }
        }
        (Self::from_entries(inner), Self::from_entries(outer))
    }

    /// Nest the assignments into a JSON object, skipping sentinels.
    ///
    /// ```
    /// use serde_json::json;
    /// use sweep_config::{DefaultValue, FieldValue, PartialConfig};
    ///
    /// let config = PartialConfig::new([
    ///     ("sub.x", FieldValue::from(1)),
    ///     ("seed", DefaultValue.into()),
    /// ])?;
    /// assert_eq!(config.to_value(), json!({"sub": {"x": 1}}));
    /// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
    /// ```
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (path, value) in self.iter() {
            if let Some(leaf) = value.as_value() {
                nested::insert(&mut map, path.segments(), leaf.clone());
            }
        }
        Value::Object(map)
    }
}

fn push_checked(
    entries: &mut Vec<(FieldPath, FieldValue)>,
    path: FieldPath,
    value: FieldValue,
) -> SweepResult<()> {
    if let Some((existing, _)) = entries.iter().find(|(existing, _)| existing.overlaps(&path)) {
        return Err(SweepError::conflict(existing, &path));
    }
    entries.push((path, value));
    Ok(())
}

fn first_overlap<'a>(
    left: &'a PartialConfig,
    right: &'a PartialConfig,
) -> Option<(&'a FieldPath, &'a FieldPath)> {
    left.paths()
        .find_map(|a| right.paths().find(|b| a.overlaps(b)).map(|b| (a, b)))
}

impl fmt::Display for PartialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (path, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{path}={value}")?;
        }
        f.write_str("}")
    }
}

impl<'a> IntoIterator for &'a PartialConfig {
    type Item = (&'a FieldPath, &'a FieldValue);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (FieldPath, FieldValue)>,
        fn(&'a (FieldPath, FieldValue)) -> (&'a FieldPath, &'a FieldValue),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(|(path, value)| (path, value))
    }
}
