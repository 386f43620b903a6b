//! Lexicographic permutation stepping.

/// Rearrange `items` into the next lexicographically greater permutation.
///
/// Returns `false`, leaving `items` untouched, once the last permutation
/// (descending order) has been reached.
pub(crate) fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    let Some(pivot) = items
        .windows(2)
        .rposition(|pair| matches!(pair, [a, b] if a < b))
    else {
        return false;
    };
    let (head, tail) = items.split_at_mut(pivot + 1);
    let Some(pivot_value) = head.last_mut() else {
        return false;
    };
    let Some(successor) = tail.iter_mut().rev().find(|candidate| **candidate > *pivot_value)
    else {
        return false;
    };
    std::mem::swap(pivot_value, successor);
    tail.reverse();
    true
}
