//! Step definitions for the sweep scenarios.

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use sweep_config::{
    DefaultValue, FieldValue, Sweep, SweepError, SweepResult, field, initialize, product, zip,
};
use test_helpers::text::{normalize_scalar, parse_indices, parse_values};

use super::fixtures::SweepWorld;

fn sweeps(world: &SweepWorld) -> Vec<Sweep> {
    world.sweeps.take().unwrap_or_default()
}

/// Store the outcome of a combination, keeping the sweeps intact on success.
fn record(world: &SweepWorld, mut rest: Vec<Sweep>, combined: SweepResult<Sweep>) {
    match combined {
        Ok(sweep) => {
            rest.push(sweep);
            world.sweeps.set(rest);
        }
        Err(err) => world.failure.set(err),
    }
}

fn failure(world: &SweepWorld) -> Result<std::sync::Arc<SweepError>> {
    world
        .failure
        .take()
        .ok_or_else(|| anyhow!("expected a failure to have been recorded"))
}

#[given("field {path} takes {values}")]
fn declare_field(sweep_world: &SweepWorld, path: String, values: String) -> Result<()> {
    let parsed: Vec<FieldValue> = parse_values(&values)?
        .into_iter()
        .map(|value| value.map_or_else(|| DefaultValue.into(), FieldValue::from))
        .collect();
    let sweep = field(normalize_scalar(&path).as_str(), parsed)?;
    let mut declared = sweeps(sweep_world);
    declared.push(sweep);
    sweep_world.sweeps.set(declared);
    Ok(())
}

#[when("the last two sweeps are zipped")]
fn zip_last_two(sweep_world: &SweepWorld) -> Result<()> {
    let mut declared = sweeps(sweep_world);
    ensure!(declared.len() >= 2, "need two sweeps to zip");
    let tail = declared.split_off(declared.len() - 2);
    record(sweep_world, declared, zip(&tail));
    Ok(())
}

#[when("the sweeps are zipped")]
fn zip_all(sweep_world: &SweepWorld) {
    let declared = sweeps(sweep_world);
    record(sweep_world, Vec::new(), zip(&declared));
}

#[when("the sweeps are crossed")]
fn cross_all(sweep_world: &SweepWorld) {
    let declared = sweeps(sweep_world);
    record(sweep_world, Vec::new(), product(&declared));
}

#[when("the sweep is initialized")]
fn initialize_models(sweep_world: &SweepWorld) -> Result<()> {
    let declared = sweeps(sweep_world);
    let [sweep] = declared.as_slice() else {
        return Err(anyhow!("expected exactly one sweep, found {}", declared.len()));
    };
    match initialize(sweep) {
        Ok(models) => sweep_world.models.set(models),
        Err(err) => sweep_world.failure.set(err),
    }
    Ok(())
}

#[then("{count:usize} models are initialized")]
fn count_models(sweep_world: &SweepWorld, count: usize) -> Result<()> {
    let found = sweep_world
        .models
        .with_ref(Vec::len)
        .ok_or_else(|| anyhow!("no models were initialized"))?;
    ensure!(found == count, "expected {count} models, found {found}");
    Ok(())
}

#[then("model {index:usize} has seed {seed:u32}, x {x:i64} and y {y:i64}")]
fn model_fields(sweep_world: &SweepWorld, index: usize, seed: u32, x: i64, y: i64) -> Result<()> {
    let model = sweep_world
        .models
        .with_ref(|models| models.get(index).cloned())
        .flatten()
        .ok_or_else(|| anyhow!("no model at index {index}"))?;
    ensure!(model.seed == seed, "seed {} != {seed}", model.seed);
    ensure!(
        (model.sub.x, model.sub.y) == (x, y),
        "sub is {:?}, expected x {x} and y {y}",
        model.sub
    );
    Ok(())
}

#[then("combining fails with a conflict between {first} and {second}")]
fn conflict(sweep_world: &SweepWorld, first: String, second: String) -> Result<()> {
    let err = failure(sweep_world)?;
    let SweepError::ConfigConflict {
        first: existing,
        second: incoming,
    } = &*err
    else {
        return Err(anyhow!("expected a conflict, got {err}"));
    };
    ensure!(existing.to_string() == normalize_scalar(&first), "{err}");
    ensure!(incoming.to_string() == normalize_scalar(&second), "{err}");
    Ok(())
}

#[then("combining fails with a length mismatch at position {position:usize}")]
fn length_mismatch(sweep_world: &SweepWorld, position: usize) -> Result<()> {
    let err = failure(sweep_world)?;
    ensure!(
        matches!(&*err, SweepError::LengthMismatch { position: found, .. } if *found == position),
        "{err}"
    );
    Ok(())
}

#[then("initialization fails at configurations {indices}")]
fn failing_configurations(sweep_world: &SweepWorld, indices: String) -> Result<()> {
    let err = failure(sweep_world)?;
    let expected = parse_indices(&indices)?;
    ensure!(err.failing_indices() == expected, "{err}");
    Ok(())
}
