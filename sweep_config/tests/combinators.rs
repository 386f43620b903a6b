//! Public behaviour of the sweep combinators.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use sweep_config::{
    DefaultValue, FieldValue, PartialConfig, Sweep, SweepError, chain, field, permutations,
    product, roundrobin, zip,
};

fn rendered(sweep: &Sweep) -> Vec<String> {
    sweep.iter().map(ToString::to_string).collect()
}

fn error_of(result: sweep_config::SweepResult<Sweep>) -> Result<std::sync::Arc<SweepError>> {
    result.err().ok_or_else(|| anyhow!("expected the combination to fail"))
}

#[rstest]
#[case::dotted("model.encoder.depth")]
#[case::hyphen("learning-rate")]
#[case::index("layers.0")]
fn valid_paths_are_accepted(#[case] spec: &str) -> Result<()> {
    let sweep = field(spec, [1])?;
    ensure!(rendered(&sweep) == vec![format!("{{{spec}=1}}")]);
    Ok(())
}

#[rstest]
#[case::empty("")]
#[case::empty_segment("a..b")]
#[case::leading_digit("0abc.x")]
#[case::space("a b")]
fn invalid_paths_are_rejected(#[case] spec: &str) -> Result<()> {
    let err = error_of(field(spec, [1]))?;
    ensure!(matches!(&*err, SweepError::InvalidPath { .. }), "{err}");
    Ok(())
}

#[rstest]
fn segment_lists_match_dotted_paths() -> Result<()> {
    let listed = field(["sub", "x"], [1, 2])?;
    let dotted = field("sub.x", [1, 2])?;
    ensure!(listed == dotted);
    Ok(())
}

#[rstest]
fn empty_inputs_are_errors() -> Result<()> {
    let no_values: [i32; 0] = [];
    let cases = [
        error_of(field("x", no_values))?,
        error_of(chain(Vec::<Sweep>::new()))?,
        error_of(product([field("x", [1])?, Sweep::default()]))?,
        error_of(zip(Vec::<Sweep>::new()))?,
    ];
    for err in cases {
        ensure!(matches!(&*err, SweepError::EmptyValues { .. }), "{err}");
    }
    Ok(())
}

#[rstest]
fn chain_keeps_argument_order_without_merging() -> Result<()> {
    let joined = chain([field("a", [1, 2])?, field("a", [3])?])?;
    ensure!(rendered(&joined) == ["{a=1}", "{a=2}", "{a=3}"]);
    let err = joined.check_unique();
    ensure!(err.is_ok(), "distinct values are unique");
    let repeated = chain([field("a", [1])?, field("a", [1])?])?;
    ensure!(repeated.check_unique().is_err(), "repeated configuration not detected");
    Ok(())
}

#[rstest]
fn roundrobin_skips_exhausted_sweeps() -> Result<()> {
    let mixed = roundrobin([field("a", [1])?, field("b", [1, 2, 3])?, field("c", [1, 2])?])?;
    ensure!(rendered(&mixed) == ["{a=1}", "{b=1}", "{c=1}", "{b=2}", "{c=2}", "{b=3}"]);
    Ok(())
}

#[rstest]
#[case::same_path("lr", "lr")]
#[case::parent("optimizer", "optimizer.lr")]
#[case::child("optimizer.lr", "optimizer")]
fn product_rejects_overlapping_paths(#[case] left: &str, #[case] right: &str) -> Result<()> {
    let err = error_of(product([field(left, [1])?, field(right, [2])?]))?;
    let SweepError::ConfigConflict { first, second } = &*err else {
        return Err(anyhow!("expected a conflict, got {err}"));
    };
    ensure!(first.to_string() == left && second.to_string() == right, "{err}");
    Ok(())
}

#[rstest]
fn sentinels_still_conflict() -> Result<()> {
    let err = error_of(product([field("x", [DefaultValue])?, field("x", [1])?]))?;
    ensure!(matches!(&*err, SweepError::ConfigConflict { .. }), "{err}");
    Ok(())
}

#[rstest]
fn product_of_one_sweep_is_itself() -> Result<()> {
    let single = field("a", [1, 2, 3])?;
    ensure!(product([&single])? == single);
    Ok(())
}

#[rstest]
fn zip_reports_the_mismatching_position() -> Result<()> {
    let err = error_of(zip([field("a", [1, 2])?, field("b", [1, 2])?, field("c", [1])?]))?;
    ensure!(
        matches!(
            &*err,
            SweepError::LengthMismatch {
                expected: 2,
                found: 1,
                position: 2
            }
        ),
        "{err}"
    );
    Ok(())
}

#[rstest]
fn zip_merges_pairwise() -> Result<()> {
    let paired = zip([
        field("x", [FieldValue::from(1), DefaultValue.into()])?,
        field("y", ["p", "q"])?,
    ])?;
    ensure!(rendered(&paired) == [r#"{x=1, y="p"}"#, r#"{x=DefaultValue, y="q"}"#]);
    Ok(())
}

#[rstest]
fn permutations_cover_every_order() -> Result<()> {
    let orders = permutations([field("a", [1])?, field("b", [2])?, field("c", [3, 4])?])?;
    ensure!(orders.len() == 12, "3! orders of 2 configurations each");
    let first_keys: Vec<String> = orders
        .iter()
        .step_by(2)
        .filter_map(|config| config.paths().next().map(ToString::to_string))
        .collect();
    ensure!(first_keys == ["a", "a", "b", "b", "c", "c"], "{first_keys:?}");
    Ok(())
}

#[rstest]
fn permutations_reject_overlapping_groups_up_front() -> Result<()> {
    let err = error_of(permutations([field("a", [1])?, field("a.b", [2])?]))?;
    ensure!(matches!(&*err, SweepError::ConfigConflict { .. }), "{err}");
    Ok(())
}

#[rstest]
fn partial_configs_merge_without_overwriting() -> Result<()> {
    let left = PartialConfig::new([("a.x", 1)])?;
    let right = PartialConfig::new([("a.y", 2)])?;
    let merged = left.merge(&right)?;
    ensure!(merged.to_string() == "{a.x=1, a.y=2}");
    ensure!(merged.to_value() == serde_json::json!({"a": {"x": 1, "y": 2}}));
    ensure!(left.merge(&PartialConfig::new([("a", 0)])?).is_err());
    ensure!(PartialConfig::new([("a", 0), ("a", 1)]).is_err());
    Ok(())
}
