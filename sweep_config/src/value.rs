//! Leaf values assigned by partial configurations, plus the default sentinel.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::Value;

use crate::{SweepResult, SweepResultExt};

/// Marker requesting the schema default for a field.
///
/// Assigning `DefaultValue` keeps a sweep aligned (for example inside a
/// [`zip`](crate::zip)) without choosing a concrete value: the entry is
/// stripped before the model is constructed, so the field falls back to its
/// declared default.
///
/// ```
/// use sweep_config::{field, DefaultValue, FieldValue};
///
/// let sweep = field("lr", [FieldValue::from(0.1), DefaultValue.into()])?;
/// assert_eq!(sweep.len(), 2);
/// # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefaultValue;

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultValue")
    }
}

/// A value assigned at a [`FieldPath`](crate::FieldPath).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// A concrete JSON value handed to the schema engine.
    Value(Value),
    /// The [`DefaultValue`] sentinel.
    Default,
}

impl FieldValue {
    /// Serialize any value into a [`FieldValue`].
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Serialization`](crate::SweepError::Serialization)
    /// if `value` cannot be represented as JSON.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> SweepResult<Self> {
        serde_json::to_value(value).into_sweep().map(Self::Value)
    }

    /// Returns `true` for the [`DefaultValue`] sentinel.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// The concrete value, or `None` for the sentinel.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Default => None,
        }
    }
}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Value(value) => {
                state.write_u8(0);
                hash_json(value, state);
            }
            Self::Default => state.write_u8(1),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Default => write!(f, "{DefaultValue}"),
        }
    }
}

impl From<DefaultValue> for FieldValue {
    fn from(_: DefaultValue) -> Self {
        Self::Default
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, &str,
);

/// Borrowed JSON value hashed and compared structurally.
///
/// Object keys are visited in sorted order, so the hash agrees with
/// `Value`'s equality whichever map backend `serde_json` was built with.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct HashedJson<'a>(pub(crate) &'a Value);

impl Hash for HashedJson<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_json(self.0, state);
    }
}

fn hash_json<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => state.write_u8(0),
        Value::Bool(flag) => {
            state.write_u8(1);
            flag.hash(state);
        }
        Value::Number(number) => {
            state.write_u8(2);
            number.to_string().hash(state);
        }
        Value::String(text) => {
            state.write_u8(3);
            text.hash(state);
        }
        Value::Array(items) => {
            state.write_u8(4);
            state.write_usize(items.len());
            for item in items {
                hash_json(item, state);
            }
        }
        Value::Object(map) => {
            state.write_u8(5);
            state.write_usize(map.len());
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            for (key, item) in entries {
                key.hash(state);
                hash_json(item, state);
            }
        }
    }
}
