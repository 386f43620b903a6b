//! Shared text normalization helpers for behavioural test suites.

use anyhow::{Context, Result};
use serde_json::Value;

/// Placeholder spelling of the default sentinel in value lists.
pub const DEFAULT_TOKEN: &str = "default";

/// Strips one layer of matching single or double quotes from a value.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        return stripped;
    }
    if let Some(stripped) = trimmed
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
    {
        return stripped;
    }
    trimmed
}

/// Normalizes a scalar placeholder by trimming and unquoting one outer layer.
#[must_use]
pub fn normalize_scalar(value: &str) -> String {
    unquote(value).trim().to_owned()
}

/// Parses a comma-separated list of JSON scalars.
///
/// Each item is read as JSON, falling back to a string for bare words.
/// [`DEFAULT_TOKEN`] yields `None` so callers can substitute their sentinel.
///
/// # Errors
///
/// Returns an error when the list is empty.
pub fn parse_values(value: &str) -> Result<Vec<Option<Value>>> {
    let items: Vec<Option<Value>> = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            (item != DEFAULT_TOKEN).then(|| {
                serde_json::from_str(item).unwrap_or_else(|_| Value::String(normalize_scalar(item)))
            })
        })
        .collect();
    if items.is_empty() {
        return Err(anyhow::anyhow!("no values in '{value}'"));
    }
    Ok(items)
}

/// Parses a comma-separated list of indices.
///
/// # Errors
///
/// Returns an error when an item is not a non-negative integer.
pub fn parse_indices(value: &str) -> Result<Vec<usize>> {
    unquote(value)
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<usize>()
                .with_context(|| format!("'{item}' is not an index"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize_scalar, parse_indices, parse_values, unquote};
    use serde_json::json;

    #[test]
    fn unquote_removes_single_outer_quotes() {
        assert_eq!(unquote("'value'"), "value");
        assert_eq!(unquote("\"value\""), "value");
    }

    #[test]
    fn normalize_scalar_trims_whitespace() {
        assert_eq!(normalize_scalar("  'value'  "), "value");
    }

    #[test]
    fn values_parse_as_json_with_sentinels() {
        let parsed = parse_values("10, default, \"p\", adam, -2.5").expect("values");
        assert_eq!(
            parsed,
            vec![
                Some(json!(10)),
                None,
                Some(json!("p")),
                Some(json!("adam")),
                Some(json!(-2.5)),
            ]
        );
        assert!(parse_values(" , ").is_err());
    }

    #[test]
    fn indices_parse_from_lists() {
        assert_eq!(parse_indices("1, 3").expect("indices"), vec![1, 3]);
        assert!(parse_indices("one").is_err());
    }
}
