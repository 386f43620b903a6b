//! Error types produced while building and materializing sweeps.

mod aggregate;
mod constructors;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::SweepError;
