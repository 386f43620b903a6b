//! Composable, conflict-checked parameter sweeps over strictly validated
//! configuration models.
//!
//! Sweeps are built from single-field assignments with [`field`] and combined
//! with [`chain`], [`product`], [`zip`], [`permutations`] and
//! [`roundrobin`]. Merges never overwrite an assignment silently; every
//! combination that would is rejected with [`SweepError::ConfigConflict`].
//! The resulting [`Sweep`] is handed to [`initialize`] (or an
//! [`Initializer`]), which validates each configuration strictly against a
//! model deriving [`SweepModel`] and builds one instance per configuration.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use sweep_config::{field, initialize, product, zip, DefaultValue, FieldValue, SweepModel};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize, SweepModel)]
//! #[serde(deny_unknown_fields)]
//! struct Sub {
//!     #[serde(default = "five")]
//!     x: i64,
//!     #[serde(default = "six")]
//!     y: i64,
//! }
//!
//! #[derive(Debug, Serialize, Deserialize, SweepModel)]
//! #[serde(deny_unknown_fields)]
//! struct Model {
//!     seed: u32,
//!     sub: Sub,
//! }
//!
//! fn five() -> i64 { 5 }
//! fn six() -> i64 { 6 }
//!
//! let sweep = product([
//!     field("seed", [1, 2])?,
//!     zip([
//!         field("sub.x", [FieldValue::from(10), DefaultValue.into()])?,
//!         field("sub.y", [7, 8])?,
//!     ])?,
//! ])?;
//! let models: Vec<Model> = initialize(&sweep)?;
//! assert_eq!(models.len(), 4);
//! assert_eq!(models[1].sub, Sub { x: 5, y: 8 });
//! # Ok::<_, std::sync::Arc<sweep_config::SweepError>>(())
//! ```

use std::sync::Arc;

pub use sweep_config_macros::SweepModel;

mod combinators;
mod config;
mod error;
mod gate;
mod nested;
mod path;
mod result_ext;
pub mod schema;
mod sweep;
mod utils;
mod value;

pub use combinators::{chain, field, permutations, product, roundrobin, zip};
pub use config::PartialConfig;
pub use error::{AggregatedErrors, SweepError};
pub use gate::{
    CheckOptions, FailurePolicy, Initializer, UnhashableAction, check_model, check_model_with,
    check_schema, initialize,
};
pub use path::{FieldPath, PathSpec};
pub use result_ext::SweepResultExt;
pub use schema::{SweepField, SweepModel, validate_value};
pub use sweep::Sweep;
pub use utils::{
    DEFAULT_SEED_BOUND, FieldDiff, check_unique, is_unique, model_diff, random_seeds,
    random_seeds_with,
};
pub use value::{DefaultValue, FieldValue};

#[doc(hidden)]
pub use serde;
#[doc(hidden)]
pub use serde_json;

/// Result alias shared by every fallible operation of this crate.
///
/// Errors are reference counted so they can be cloned cheaply and aggregated
/// without copying.
pub type SweepResult<T> = Result<T, Arc<SweepError>>;
