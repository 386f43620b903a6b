//! Test helpers shared across crates.
//!
//! The behavioural suites describe sweeps in plain text; [`text`] turns their
//! placeholders into values.

pub mod text;
