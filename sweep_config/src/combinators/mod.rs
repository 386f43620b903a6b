//! Combinators building sweeps from smaller sweeps.
//!
//! Every combinator materializes its whole output before returning and
//! either succeeds completely or returns an error: a conflicting combination
//! never yields a truncated sweep.
//!
//! ```
//! use sweep_config::{chain, field, product, zip};
//!
//! let seeds = field("seed", [1, 2])?;
//! let grid = product([field("x", [1, 2])?, field("y", ["a", "b"])?])?;
//! assert_eq!(grid.len(), 4);
//!
//! let paired = zip([&seeds, &field("lr", [0.1, 0.01])?])?;
//! assert_eq!(paired.len(), 2);
//!
//! let both = chain([&grid, &paired])?;
//! assert_eq!(both.len(), 6);
//! # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
//! ```

mod cartesian;
mod permute;

use std::borrow::Borrow;
use std::sync::Arc;

use cartesian::Odometer;

use crate::{
    FieldPath, FieldValue, PartialConfig, PathSpec, Sweep, SweepError, SweepResult,
};

/// Assign each of `values` to `path`, one configuration per value.
///
/// # Errors
///
/// Returns [`SweepError::InvalidPath`] for a malformed path and
/// [`SweepError::EmptyValues`] when `values` is empty.
pub fn field<P, I>(spec: P, values: I) -> SweepResult<Sweep>
where
    P: PathSpec,
    I: IntoIterator,
    I::Item: Into<FieldValue>,
{
    let path = spec.to_field_path()?;
    let configs: Vec<PartialConfig> = values
        .into_iter()
        .map(|value| PartialConfig::single(path.clone(), value.into()))
        .collect();
    if configs.is_empty() {
        return Err(SweepError::empty("field"));
    }
    tracing::debug!(path = %path, count = configs.len(), "built field sweep");
    Ok(Sweep::new(configs))
}

/// Concatenate sweeps in argument order without merging.
///
/// # Errors
///
/// Returns [`SweepError::EmptyValues`] when no sweeps are given or all of
/// them are empty.
pub fn chain<I>(sweeps: I) -> SweepResult<Sweep>
where
    I: IntoIterator,
    I::Item: Borrow<Sweep>,
{
    let inputs = collect_inputs("chain", sweeps)?;
    let configs: Vec<PartialConfig> = inputs
        .iter()
        .flat_map(|sweep| sweep.borrow().iter().cloned())
        .collect();
    finish("chain", inputs.len(), configs)
}

/// Interleave sweeps, taking one configuration from each in turn.
///
/// Exhausted sweeps are skipped, so the output holds every input
/// configuration exactly once:
///
/// ```
/// use sweep_config::{field, roundrobin};
///
/// let mixed = roundrobin([field("a", [1, 2, 3])?, field("b", [3, 4])?])?;
/// assert_eq!(mixed.to_string(), "[{a=1}, {b=3}, {a=2}, {b=4}, {a=3}]");
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
///
/// # Errors
///
/// Returns [`SweepError::EmptyValues`] when no sweeps are given or all of
/// them are empty.
pub fn roundrobin<I>(sweeps: I) -> SweepResult<Sweep>
where
    I: IntoIterator,
    I::Item: Borrow<Sweep>,
{
    let inputs = collect_inputs("roundrobin", sweeps)?;
    let longest = inputs
        .iter()
        .map(|sweep| sweep.borrow().len())
        .max()
        .unwrap_or_default();
    let mut configs = Vec::new();
    for position in 0..longest {
        for sweep in &inputs {
            if let Some(config) = sweep.borrow().get(position) {
                configs.push(config.clone());
            }
        }
    }
    finish("roundrobin", inputs.len(), configs)
}

/// Cross product of sweeps, merging one configuration from each.
///
/// The output is ordered lexicographically with the last sweep varying
/// fastest and holds the product of the input lengths, so it grows
/// multiplicatively with every argument.
///
/// ```
/// use sweep_config::{field, product};
///
/// let grid = product([field("a", [1, 2])?, field("b", [3, 4])?])?;
/// assert_eq!(grid.to_string(), "[{a=1, b=3}, {a=1, b=4}, {a=2, b=3}, {a=2, b=4}]");
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
///
/// # Errors
///
/// Returns [`SweepError::EmptyValues`] when no sweeps are given or any is
/// empty, and [`SweepError::ConfigConflict`] if any combination assigns
/// overlapping paths.
pub fn product<I>(sweeps: I) -> SweepResult<Sweep>
where
    I: IntoIterator,
    I::Item: Borrow<Sweep>,
{
    let inputs = non_empty_inputs("product", sweeps)?;
    let ordered: Vec<&Sweep> = inputs.iter().map(Borrow::borrow).collect();
    let configs = cross(&ordered)?;
    finish("product", inputs.len(), configs)
}

/// Pair sweeps index-wise, merging the `i`-th configuration of each.
///
/// # Errors
///
/// Returns [`SweepError::EmptyValues`] when no sweeps are given or any is
/// empty (checked before lengths), [`SweepError::LengthMismatch`] when the
/// lengths differ, and [`SweepError::ConfigConflict`] if paired
/// configurations assign overlapping paths.
pub fn zip<I>(sweeps: I) -> SweepResult<Sweep>
where
    I: IntoIterator,
    I::Item: Borrow<Sweep>,
{
    let inputs = non_empty_inputs("zip", sweeps)?;
    let expected = inputs.first().map_or(0, |sweep| sweep.borrow().len());
    if let Some((position, found)) = inputs
        .iter()
        .map(|sweep| sweep.borrow().len())
        .enumerate()
        .find(|&(_, len)| len != expected)
    {
        return Err(Arc::new(SweepError::LengthMismatch {
            expected,
            found,
            position,
        }));
    }
    let configs = (0..expected)
        .map(|index| {
            PartialConfig::merge_all(inputs.iter().filter_map(|sweep| sweep.borrow().get(index)))
        })
        .collect::<SweepResult<Vec<_>>>()?;
    finish("zip", inputs.len(), configs)
}

/// Every ordering of a set of assignment groups.
///
/// For each permutation of the groups, in lexicographic order starting from
/// declaration order, the product of the groups (taken in that order) is
/// emitted with assignments merged in that order. The output holds
/// `n! × Π len(group)` configurations, so keep the number of groups small.
///
/// ```
/// use sweep_config::{field, permutations};
///
/// let orders = permutations([field("a", [1])?, field("b", [2])?])?;
/// assert_eq!(orders.to_string(), "[{a=1, b=2}, {b=2, a=1}]");
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
///
/// # Errors
///
/// Returns [`SweepError::EmptyValues`] when no groups are given or any is
/// empty, and [`SweepError::ConfigConflict`] when two groups assign
/// overlapping paths.
pub fn permutations<I>(groups: I) -> SweepResult<Sweep>
where
    I: IntoIterator,
    I::Item: Borrow<Sweep>,
{
    let inputs = non_empty_inputs("permutations", groups)?;
    let sweeps: Vec<&Sweep> = inputs.iter().map(Borrow::borrow).collect();
    for (i, left) in sweeps.iter().enumerate() {
        for right in sweeps.iter().skip(i + 1) {
            if let Some((first, second)) = group_overlap(left, right) {
                return Err(SweepError::conflict(first, second));
            }
        }
    }

    let mut order: Vec<usize> = (0..sweeps.len()).collect();
    let mut configs = Vec::new();
    loop {
        let ordered: Vec<&Sweep> = order
            .iter()
            .filter_map(|&index| sweeps.get(index).copied())
            .collect();
        configs.extend(cross(&ordered)?);
        if !permute::next_permutation(&mut order) {
            break;
        }
    }
    finish("permutations", inputs.len(), configs)
}

fn cross(sweeps: &[&Sweep]) -> SweepResult<Vec<PartialConfig>> {
    let lengths: Vec<usize> = sweeps.iter().map(|sweep| sweep.len()).collect();
    Odometer::new(&lengths)
        .map(|indices| {
            PartialConfig::merge_all(
                indices
                    .iter()
                    .zip(sweeps)
                    .filter_map(|(&index, sweep)| sweep.get(index)),
            )
        })
        .collect()
}

fn group_overlap<'a>(left: &'a Sweep, right: &'a Sweep) -> Option<(&'a FieldPath, &'a FieldPath)> {
    let right_paths: Vec<&FieldPath> = right.iter().flat_map(PartialConfig::paths).collect();
    left.iter().flat_map(PartialConfig::paths).find_map(|a| {
        right_paths
            .iter()
            .find(|b| a.overlaps(b))
            .map(|b| (a, *b))
    })
}

fn collect_inputs<I>(operation: &'static str, sweeps: I) -> SweepResult<Vec<I::Item>>
where
    I: IntoIterator,
    I::Item: Borrow<Sweep>,
{
    let inputs: Vec<I::Item> = sweeps.into_iter().collect();
    if inputs.is_empty() {
        return Err(SweepError::empty(operation));
    }
    Ok(inputs)
}

fn non_empty_inputs<I>(operation: &'static str, sweeps: I) -> SweepResult<Vec<I::Item>>
where
    I: IntoIterator,
    I::Item: Borrow<Sweep>,
{
    let inputs = collect_inputs(operation, sweeps)?;
    if inputs.iter().any(|sweep| sweep.borrow().is_empty()) {
        return Err(SweepError::empty(operation));
    }
    Ok(inputs)
}

fn finish(
    operation: &'static str,
    inputs: usize,
    configs: Vec<PartialConfig>,
) -> SweepResult<Sweep> {
    if configs.is_empty() {
        return Err(SweepError::empty(operation));
    }
    tracing::debug!(operation, inputs, output = configs.len(), "combined sweeps");
    Ok(Sweep::new(configs))
}
