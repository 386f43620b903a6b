//! Dotted field paths addressing (possibly nested) model fields.
//!
//! A [`FieldPath`] is the key of every assignment in a
//! [`PartialConfig`](crate::PartialConfig). Paths are built once, validated
//! eagerly, and never mutated afterwards; cloning shares the segment storage.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::{SweepError, SweepResult};

/// Ordered, non-empty sequence of field-name segments.
///
/// Segments are identifiers (`[A-Za-z_][A-Za-z0-9_-]*`) or all-digit keys for
/// addressing into mappings. Dotted strings and explicit segment lists
/// normalize to the same value:
///
/// ```
/// use sweep_config::FieldPath;
///
/// let dotted = FieldPath::parse("optimizer.lr")?;
/// let segments = FieldPath::from_segments(["optimizer", "lr"])?;
/// assert_eq!(dotted, segments);
/// assert_eq!(dotted.to_string(), "optimizer.lr");
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Arc<[String]>,
}

impl FieldPath {
    /// Parse a dot-separated path such as `"model.encoder.depth"`.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidPath`] when `spec` is empty or any segment
    /// is not a valid field name.
    pub fn parse(spec: &str) -> SweepResult<Self> {
        if spec.is_empty() {
            return Err(invalid(spec, "path must not be empty"));
        }
        Self::validated(spec, spec.split('.').map(str::to_owned).collect())
    }

    /// Build a path from explicit segments.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidPath`] when no segments are supplied or any
    /// segment is not a valid field name. Segments containing `.` are
    /// rejected so both spellings of a path stay unambiguous.
    pub fn from_segments<I, S>(parts: I) -> SweepResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = parts
            .into_iter()
            .map(|segment| segment.as_ref().to_owned())
            .collect();
        let spec = segments.join(".");
        if segments.is_empty() {
            return Err(invalid(&spec, "path must contain at least one segment"));
        }
        Self::validated(&spec, segments)
    }

    fn validated(spec: &str, segments: Vec<String>) -> SweepResult<Self> {
        if let Some(message) = segments.iter().find_map(|segment| segment_error(segment)) {
            return Err(invalid(spec, &message));
        }
        Ok(Self {
            segments: segments.into(),
        })
    }

    /// Wrap segments taken from an already validated structure.
    ///
    /// Keys of serialized models are trusted: they name real fields even
    /// when serde renames them into shapes [`FieldPath::parse`] rejects.
    pub(crate) fn from_trusted(segments: Vec<String>) -> Option<Self> {
        (!segments.is_empty()).then(|| Self {
            segments: segments.into(),
        })
    }

    /// The segments of this path, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The innermost segment, i.e. the name of the addressed field.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// The path without its innermost segment, if any remains.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.segments.split_last()?;
        Self::from_trusted(parent.to_vec())
    }

    /// Append a validated segment.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidPath`] if `segment` is not a valid field
    /// name.
    pub fn join(&self, segment: &str) -> SweepResult<Self> {
        if let Some(message) = segment_error(segment) {
            return Err(invalid(&format!("{self}.{segment}"), &message));
        }
        Ok(self.child(segment))
    }

    /// Path of `key` below `parent`, or at the root when there is no parent.
    pub(crate) fn nested(parent: Option<&Self>, key: &str) -> Self {
        parent.map_or_else(
            || Self {
                segments: Arc::from([key.to_owned()]),
            },
            |path| path.child(key),
        )
    }

    /// Append a key taken from a serialized value without validating it.
    pub(crate) fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.to_vec();
        segments.push(key.to_owned());
        Self {
            segments: segments.into(),
        }
    }

    /// Concatenate `suffix` onto this path.
    #[must_use]
    pub fn concat(&self, suffix: &Self) -> Self {
        let mut segments = self.segments.to_vec();
        segments.extend(suffix.segments.iter().cloned());
        Self {
            segments: segments.into(),
        }
    }

    /// Returns `true` if `prefix` equals this path or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Returns `true` if one path is a prefix of (or equal to) the other.
    ///
    /// Overlapping paths cannot both be assigned in one configuration: the
    /// value written at the shorter path would replace the nested one.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }

    /// The segments below `prefix`, or `None` if `prefix` does not contain
    /// this path. The slice is empty when both paths are equal.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<&[String]> {
        self.segments.strip_prefix(prefix.segments.as_ref())
    }
}

fn segment_error(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return Some("segments must not be empty".to_owned());
    }
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut chars = segment.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    (!(head_ok && tail_ok)).then(|| {
        format!("segment '{segment}' must be an identifier or a numeric key")
    })
}

fn invalid(spec: &str, message: &str) -> Arc<SweepError> {
    Arc::new(SweepError::InvalidPath {
        spec: spec.to_owned(),
        message: message.to_owned(),
    })
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldPath").field(&self.to_string()).finish()
    }
}

impl FromStr for FieldPath {
    type Err = Arc<SweepError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Anything accepted where a [`FieldPath`] is required.
///
/// Implemented for dotted strings (`&str`, `String`), segment collections
/// (`[S; N]`, `[S]`, `Vec<S>` with `S: AsRef<str>`) and paths themselves.
pub trait PathSpec {
    /// Normalize the specification into a [`FieldPath`].
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidPath`] for empty or malformed input.
    fn to_field_path(&self) -> SweepResult<FieldPath>;
}

impl PathSpec for str {
    fn to_field_path(&self) -> SweepResult<FieldPath> {
        FieldPath::parse(self)
    }
}

impl PathSpec for String {
    fn to_field_path(&self) -> SweepResult<FieldPath> {
        FieldPath::parse(self)
    }
}

impl PathSpec for FieldPath {
    fn to_field_path(&self) -> SweepResult<FieldPath> {
        Ok(self.clone())
    }
}

impl<S: AsRef<str>> PathSpec for [S] {
    fn to_field_path(&self) -> SweepResult<FieldPath> {
        FieldPath::from_segments(self)
    }
}

impl<S: AsRef<str>, const N: usize> PathSpec for [S; N] {
    fn to_field_path(&self) -> SweepResult<FieldPath> {
        FieldPath::from_segments(self)
    }
}

impl<S: AsRef<str>> PathSpec for Vec<S> {
    fn to_field_path(&self) -> SweepResult<FieldPath> {
        FieldPath::from_segments(self)
    }
}

impl<T: PathSpec + ?Sized> PathSpec for &T {
    fn to_field_path(&self) -> SweepResult<FieldPath> {
        (**self).to_field_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn path(spec: &str) -> FieldPath {
        FieldPath::parse(spec).expect("valid path")
    }

    #[test]
    fn dotted_and_segment_forms_are_equal() {
        assert_eq!(path("a.b"), FieldPath::from_segments(["a", "b"]).expect("segments"));
        assert_eq!(path("a.b"), vec!["a".to_owned(), "b".to_owned()].to_field_path().expect("vec"));
        assert_ne!(path("a.b"), path("a.c"));
    }

    #[rstest]
    #[case::empty("")]
    #[case::dash_separated("a-b.-c")]
    #[case::leading_digit("1a")]
    #[case::double_dot("a..b")]
    #[case::trailing_dot("a.")]
    #[case::whitespace("a b")]
    fn rejects_malformed_specs(#[case] spec: &str) {
        let err = FieldPath::parse(spec).expect_err("spec should be rejected");
        assert!(matches!(&*err, SweepError::InvalidPath { .. }), "{err:?}");
    }

    #[rstest]
    #[case::identifier("seed")]
    #[case::nested("model.encoder.depth")]
    #[case::numeric_key("layers.0.width")]
    #[case::kebab("learning-rate")]
    #[case::underscore("_private.x_1")]
    fn accepts_well_formed_specs(#[case] spec: &str) {
        assert_eq!(path(spec).to_string(), spec);
    }

    #[test]
    fn segments_may_not_smuggle_dots() {
        let err = FieldPath::from_segments(["a.b"]).expect_err("dot inside segment");
        assert!(matches!(&*err, SweepError::InvalidPath { .. }));
        assert!(FieldPath::from_segments(Vec::<String>::new()).is_err());
    }

    #[rstest]
    #[case("a", "a.b", true)]
    #[case("a.b", "a", true)]
    #[case("a.b", "a.b", true)]
    #[case("a.b", "a.c", false)]
    #[case("ab", "a", false)]
    fn overlap_is_prefix_containment(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(path(left).overlaps(&path(right)), expected);
    }

    #[test]
    fn strip_prefix_returns_remaining_segments() {
        let full = path("sub.inner.x");
        assert_eq!(
            full.strip_prefix(&path("sub")),
            Some(&["inner".to_owned(), "x".to_owned()][..])
        );
        assert_eq!(full.strip_prefix(&path("other")), None);
        assert_eq!(full.strip_prefix(&full).map(<[String]>::len), Some(0));
    }

    #[test]
    fn parent_and_leaf() {
        let full = path("sub.x");
        assert_eq!(full.leaf(), "x");
        assert_eq!(full.parent(), Some(path("sub")));
        assert_eq!(path("x").parent(), None);
        assert_eq!(path("sub").concat(&path("x")), full);
        assert_eq!(path("sub").join("x").expect("valid segment"), full);
        assert!(path("sub").join("not valid").is_err());
    }
}
