//! Uniqueness checks, seed sampling and model diffs on derived models.

use anyhow::{Result, anyhow, ensure};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use sweep_config::{
    DEFAULT_SEED_BOUND, SweepError, SweepModel, check_unique, field, initialize, is_unique,
    model_diff, product, random_seeds_with,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, SweepModel)]
#[serde(deny_unknown_fields)]
struct Optim {
    lr: f64,
    #[serde(default)]
    decay: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, SweepModel)]
#[serde(deny_unknown_fields)]
struct Run {
    seed: usize,
    optim: Optim,
}

#[fixture]
fn rng() -> StdRng {
    StdRng::seed_from_u64(17)
}

#[rstest]
fn sampled_seeds_feed_a_sweep(mut rng: StdRng) -> Result<()> {
    let seeds = random_seeds_with(&mut rng, 4, DEFAULT_SEED_BOUND)?;
    let sweep = product([field("seed", seeds.clone())?, field("optim.lr", [0.1, 0.01])?])?;
    sweep.check_unique()?;
    let runs: Vec<Run> = initialize(&sweep)?;
    ensure!(runs.len() == 8);
    let drawn: Vec<usize> = runs.iter().step_by(2).map(|run| run.seed).collect();
    ensure!(drawn == seeds, "seeds reordered: {drawn:?} vs {seeds:?}");
    ensure!(check_unique(&runs).is_ok());
    Ok(())
}

#[rstest]
fn the_same_rng_state_draws_the_same_seeds() -> Result<()> {
    let first = random_seeds_with(&mut rng(), 10, 50)?;
    let second = random_seeds_with(&mut rng(), 10, 50)?;
    ensure!(first == second);
    Ok(())
}

#[rstest]
fn duplicate_models_are_detected() -> Result<()> {
    let run = Run {
        seed: 1,
        optim: Optim { lr: 0.1, decay: 0.0 },
    };
    let runs = vec![run.clone(), Run { seed: 2, ..run.clone() }, run];
    ensure!(!is_unique(&runs)?);
    let err = check_unique(&runs)
        .err()
        .ok_or_else(|| anyhow!("first and last runs are equal"))?;
    ensure!(
        matches!(&*err, SweepError::Duplicate { first: 0, duplicate: 2 }),
        "{err}"
    );
    Ok(())
}

#[rstest]
fn diffs_name_nested_fields() -> Result<()> {
    let left = Run {
        seed: 1,
        optim: Optim { lr: 0.1, decay: 0.0 },
    };
    let right = Run {
        seed: 1,
        optim: Optim { lr: 0.2, decay: 0.0 },
    };
    let diff = model_diff(&left, &right)?;
    let paths: Vec<String> = diff.iter().map(|entry| entry.path.to_string()).collect();
    ensure!(paths == ["optim.lr"], "{paths:?}");
    ensure!(model_diff(&left, &left)?.is_empty());
    Ok(())
}
