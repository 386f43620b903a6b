//! `SweepField` implementations for standard library and `serde_json` types.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{FieldKind, LeafSchema, SweepField};

macro_rules! leaf_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SweepField for $ty {
                fn field_kind() -> FieldKind {
                    FieldKind::Leaf(LeafSchema::of::<Self>())
                }
            }
        )*
    };
}

leaf_field!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, PathBuf, Value,
);

impl<T: DeserializeOwned> SweepField for Vec<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Leaf(LeafSchema::of::<Self>())
    }
}

impl<T: DeserializeOwned> SweepField for VecDeque<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Leaf(LeafSchema::of::<Self>())
    }
}

impl<T: DeserializeOwned + Ord> SweepField for BTreeSet<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Leaf(LeafSchema::of::<Self>())
    }
}

impl<K: DeserializeOwned + Ord, V: DeserializeOwned> SweepField for BTreeMap<K, V> {
    fn field_kind() -> FieldKind {
        FieldKind::Leaf(LeafSchema::of::<Self>())
    }
}

impl<T, S> SweepField for HashSet<T, S>
where
    T: DeserializeOwned + Eq + std::hash::Hash,
    S: std::hash::BuildHasher + Default,
{
    fn field_kind() -> FieldKind {
        FieldKind::Leaf(LeafSchema::of::<Self>().unhashable())
    }
}

impl<K, V, S> SweepField for HashMap<K, V, S>
where
    K: DeserializeOwned + Eq + std::hash::Hash,
    V: DeserializeOwned,
    S: std::hash::BuildHasher + Default,
{
    fn field_kind() -> FieldKind {
        FieldKind::Leaf(LeafSchema::of::<Self>().unhashable())
    }
}

impl<T: SweepField> SweepField for Option<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Optional(Box::new(T::field_kind()))
    }
}

impl<T: SweepField> SweepField for Box<T> {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }
}
