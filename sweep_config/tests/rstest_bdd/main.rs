//! Behavioural test harness for `sweep_config` using `rstest-bdd`.
//!
//! Step implementations live in [`steps`]; the feature files under
//! `tests/features` are bound to the shared fixtures here.

mod fixtures;
mod steps;

use fixtures::{SweepWorld, sweep_world};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/sweep.feature",
    fixtures = [sweep_world: SweepWorld]
);
