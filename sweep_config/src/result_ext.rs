//! Extensions for mapping errors to `SweepResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(SweepError::from(e)))`
//! patterns when converting external error types into the crate's
//! `SweepResult<T>` alias (`Result<T, Arc<SweepError>>`).
//!
//! # Examples
//!
//! ```
//! use sweep_config::{SweepResult, SweepResultExt};
//!
//! fn serialize() -> SweepResult<serde_json::Value> {
//!     // serde_json::Error implements Into<SweepError>
//!     serde_json::to_value(42).into_sweep()
//! }
//! ```

use std::sync::Arc;

use crate::{SweepError, SweepResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<SweepError>`
/// into a `SweepResult<T>`.
pub trait SweepResultExt<T, E> {
    /// Convert `Result<T, E>` into `SweepResult<T>` using `Into<SweepError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<SweepError>`.
    fn into_sweep(self) -> SweepResult<T>;
}

impl<T, E> SweepResultExt<T, E> for Result<T, E>
where
    E: Into<SweepError>,
{
    fn into_sweep(self) -> SweepResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
