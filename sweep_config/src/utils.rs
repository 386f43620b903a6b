//! Helpers around sweeps: uniqueness checks, seed sampling and model diffs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::value::HashedJson;
use crate::{FieldPath, SweepError, SweepResult, SweepResultExt};

/// Exclusive upper bound commonly used with [`random_seeds`].
pub const DEFAULT_SEED_BOUND: usize = 1000;

/// Fail if two items serialize to the same value.
///
/// Works for model instances and any other serializable item. Use
/// [`Sweep::check_unique`](crate::Sweep::check_unique) for the configurations
/// of a sweep.
///
/// ```
/// use sweep_config::check_unique;
///
/// assert!(check_unique([1, 2, 3]).is_ok());
/// assert!(check_unique(["a", "b", "a"]).is_err());
/// ```
///
/// # Errors
///
/// Returns [`SweepError::Duplicate`] naming the first repeated pair and
/// [`SweepError::Serialization`] if an item cannot be serialized.
pub fn check_unique<I>(items: I) -> SweepResult<()>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let values = serialize_all(items)?;
    first_duplicate(values.iter().map(HashedJson)).map_or(Ok(()), |(first, duplicate)| {
        Err(Arc::new(SweepError::Duplicate { first, duplicate }))
    })
}

/// Returns `true` if no two items serialize to the same value.
///
/// # Errors
///
/// Returns [`SweepError::Serialization`] if an item cannot be serialized.
pub fn is_unique<I>(items: I) -> SweepResult<bool>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let values = serialize_all(items)?;
    Ok(first_duplicate(values.iter().map(HashedJson)).is_none())
}

fn serialize_all<I>(items: I) -> SweepResult<Vec<Value>>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    items
        .into_iter()
        .map(|item| serde_json::to_value(&item))
        .collect::<Result<Vec<_>, _>>()
        .into_sweep()
}

/// Positions of the first item equal to an earlier one.
pub(crate) fn first_duplicate<I>(items: I) -> Option<(usize, usize)>
where
    I: IntoIterator,
    I::Item: Hash + Eq,
{
    let mut seen = HashMap::new();
    for (index, item) in items.into_iter().enumerate() {
        match seen.entry(item) {
            Entry::Occupied(first) => return Some((*first.get(), index)),
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
    }
    None
}

/// Draw `num` distinct seeds from `0..upper` using the thread-local RNG.
///
/// Sampling seeds keeps runs reproducible (the drawn seeds are part of each
/// configuration) without hard-coding them.
///
/// # Errors
///
/// Returns [`SweepError::InvalidArgument`] when `upper` is zero or smaller
/// than `num`.
pub fn random_seeds(num: usize, upper: usize) -> SweepResult<Vec<usize>> {
    random_seeds_with(&mut rand::rng(), num, upper)
}

/// Draw `num` distinct seeds from `0..upper` using `rng`.
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use sweep_config::random_seeds_with;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let seeds = random_seeds_with(&mut rng, 5, 10)?;
/// assert_eq!(seeds.len(), 5);
/// assert!(seeds.iter().all(|&seed| seed < 10));
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
///
/// # Errors
///
/// Returns [`SweepError::InvalidArgument`] when `upper` is zero or smaller
/// than `num`.
pub fn random_seeds_with<R: Rng + ?Sized>(
    rng: &mut R,
    num: usize,
    upper: usize,
) -> SweepResult<Vec<usize>> {
    if upper == 0 {
        return Err(Arc::new(SweepError::InvalidArgument {
            name: "upper",
            message: "upper bound must be positive".to_owned(),
        }));
    }
    if num > upper {
        return Err(Arc::new(SweepError::InvalidArgument {
            name: "num",
            message: format!("cannot draw {num} distinct seeds below {upper}"),
        }));
    }
    Ok(rand::seq::index::sample(rng, upper, num).into_vec())
}

/// One differing field between two models.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDiff {
    /// Path of the differing field.
    pub path: FieldPath,
    /// Value in the left model, `null` when absent.
    pub left: Value,
    /// Value in the right model, `null` when absent.
    pub right: Value,
}

/// List the fields whose serialized values differ between two models.
///
/// Nested objects are compared field by field; any other value is compared
/// whole. Equal models produce an empty list.
///
/// ```
/// use serde::Serialize;
/// use sweep_config::model_diff;
///
/// #[derive(Serialize)]
/// struct Sub { x: i32 }
/// #[derive(Serialize)]
/// struct Model { s: Sub, y: i32 }
///
/// let diff = model_diff(&Model { s: Sub { x: 1 }, y: 2 }, &Model { s: Sub { x: 2 }, y: 2 })?;
/// assert_eq!(diff.len(), 1);
/// assert_eq!(diff[0].path.to_string(), "s.x");
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
///
/// # Errors
///
/// Returns [`SweepError::Serialization`] if a model cannot be serialized and
/// [`SweepError::InvalidArgument`] if either does not serialize to an object.
pub fn model_diff<M: Serialize>(left: &M, right: &M) -> SweepResult<Vec<FieldDiff>> {
    let left_value = serde_json::to_value(left).into_sweep()?;
    let right_value = serde_json::to_value(right).into_sweep()?;
    let (Value::Object(_), Value::Object(_)) = (&left_value, &right_value) else {
        return Err(Arc::new(SweepError::InvalidArgument {
            name: "model",
            message: "models must serialize to JSON objects".to_owned(),
        }));
    };
    let mut diffs = Vec::new();
    diff_objects(None, &left_value, &right_value, &mut diffs);
    Ok(diffs)
}

fn diff_objects(at: Option<&FieldPath>, left: &Value, right: &Value, out: &mut Vec<FieldDiff>) {
    let (Value::Object(left_map), Value::Object(right_map)) = (left, right) else {
        return;
    };
    let keys = left_map
        .keys()
        .chain(right_map.keys().filter(|key| !left_map.contains_key(*key)));
    for key in keys {
        let path = FieldPath::nested(at, key);
        let left_item = left_map.get(key).unwrap_or(&Value::Null);
        let right_item = right_map.get(key).unwrap_or(&Value::Null);
        if left_item.is_object() && right_item.is_object() {
            diff_objects(Some(&path), left_item, right_item, out);
        } else if left_item != right_item {
            out.push(FieldDiff {
                path,
                left: left_item.clone(),
                right: right_item.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(vec![json!({"a": 1}), json!({"a": 2})], true)]
    #[case(vec![json!({"a": 1, "b": 2}), json!({"b": 2, "a": 1})], false)]
    #[case(vec![json!([1, 2]), json!([2, 1])], true)]
    fn uniqueness_compares_serialized_values(#[case] items: Vec<Value>, #[case] unique: bool) {
        assert_eq!(is_unique(&items).expect("serializable"), unique);
        assert_eq!(check_unique(&items).is_ok(), unique);
    }

    #[test]
    fn check_unique_names_positions() {
        let err = check_unique([3, 1, 4, 1, 5]).expect_err("duplicate");
        assert!(matches!(&*err, SweepError::Duplicate { first: 1, duplicate: 3 }));
    }

    #[test]
    fn seeds_are_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let seeds = random_seeds_with(&mut rng, 100, 100).expect("full range");
        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
        assert_eq!(random_seeds(3, DEFAULT_SEED_BOUND).expect("seeds").len(), 3);
    }

    #[rstest]
    #[case(3, 0, "upper")]
    #[case(11, 10, "num")]
    fn seeds_reject_impossible_requests(
        #[case] num: usize,
        #[case] upper: usize,
        #[case] argument: &str,
    ) {
        let err = random_seeds(num, upper).expect_err("invalid request");
        assert!(
            matches!(&*err, SweepError::InvalidArgument { name, .. } if *name == argument),
            "{err}"
        );
    }

    #[test]
    fn diff_descends_into_nested_objects() {
        let left = json!({"s": {"x": 1, "y": 2}, "z": [1], "only_left": true});
        let right = json!({"s": {"x": 3, "y": 2}, "z": [2], "only_right": 0});
        let diff = model_diff(&left, &right).expect("objects");
        let paths: Vec<String> = diff.iter().map(|d| d.path.to_string()).collect();
        assert_eq!(paths, ["only_left", "s.x", "z", "only_right"]);
        assert!(model_diff(&left, &left).expect("objects").is_empty());
        assert!(model_diff(&json!(1), &json!(2)).is_err());
    }
}
