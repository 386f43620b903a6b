//! Shared fixtures for the `rstest-bdd` behavioural suite.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde::{Deserialize, Serialize};
use sweep_config::{Sweep, SweepError, SweepModel};

/// Nested model whose fields fall back to schema defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, SweepModel)]
#[serde(deny_unknown_fields)]
pub struct Sub {
    #[serde(default = "five")]
    pub x: i64,
    #[serde(default = "six")]
    pub y: i64,
}

/// Top-level model materialized by the scenarios.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, SweepModel)]
#[serde(deny_unknown_fields)]
pub struct Model {
    pub seed: u32,
    pub sub: Sub,
}

const fn five() -> i64 {
    5
}

const fn six() -> i64 {
    6
}

/// Scenario state shared between steps.
#[derive(Debug, Default, ScenarioState)]
pub struct SweepWorld {
    /// Sweeps declared so far, in order.
    pub sweeps: Slot<Vec<Sweep>>,
    /// The first failure of a combination or initialization step.
    pub failure: Slot<Arc<SweepError>>,
    /// Models built by the last initialization.
    pub models: Slot<Vec<Model>>,
}

/// Creates an empty world for each scenario.
#[fixture]
pub fn sweep_world() -> SweepWorld {
    SweepWorld::default()
}
