//! Unit tests for the gate using hand-written schemas.

use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::*;
use crate::schema::{ExtraFields, FieldKind, FieldSchema, LeafSchema, ModelSchema, SweepField};
use crate::{DefaultValue, field, product, zip};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Sub {
    #[serde(default = "five")]
    x: i64,
    #[serde(default)]
    y: i64,
}

const fn five() -> i64 {
    5
}

impl SweepField for Sub {
    fn field_kind() -> FieldKind {
        FieldKind::Model(Self::model_schema)
    }
}

impl SweepModel for Sub {
    fn model_schema() -> ModelSchema {
        ModelSchema::new("Sub")
            .extra(ExtraFields::Forbid)
            .validate_assignment(true)
            .field(FieldSchema::defaulted("x", i64::field_kind()))
            .field(FieldSchema::defaulted("y", i64::field_kind()))
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Top {
    seed: u32,
    #[serde(default = "default_sub")]
    sub: Sub,
}

const fn default_sub() -> Sub {
    Sub { x: 5, y: 0 }
}

impl SweepField for Top {
    fn field_kind() -> FieldKind {
        FieldKind::Model(Self::model_schema)
    }
}

impl SweepModel for Top {
    fn model_schema() -> ModelSchema {
        ModelSchema::new("Top")
            .extra(ExtraFields::Forbid)
            .validate_assignment(true)
            .field(FieldSchema::required("seed", u32::field_kind()))
            .field(FieldSchema::defaulted("sub", Sub::field_kind()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Lax {
    value: i64,
}

impl SweepField for Lax {
    fn field_kind() -> FieldKind {
        FieldKind::Model(Self::model_schema)
    }
}

impl SweepModel for Lax {
    fn model_schema() -> ModelSchema {
        ModelSchema::new("Lax")
            .validate_assignment(true)
            .field(FieldSchema::required("value", FieldKind::Leaf(LeafSchema::of::<i64>())))
    }
}

fn top(seed: u32, x: i64, y: i64) -> Top {
    Top {
        seed,
        sub: Sub { x, y },
    }
}

#[rstest]
fn initialize_builds_one_model_per_configuration() {
    let sweep = product([
        field("seed", [1, 2]).expect("seed"),
        field("sub.x", [10, 20]).expect("sub.x"),
    ])
    .expect("product");
    let models: Vec<Top> = initialize(&sweep).expect("valid sweep");
    assert_eq!(
        models,
        vec![top(1, 10, 0), top(1, 20, 0), top(2, 10, 0), top(2, 20, 0)]
    );
}

#[rstest]
fn sentinel_falls_back_to_schema_default() {
    let sweep = zip([
        field("seed", [1, 2]).expect("seed"),
        field("sub.x", [FieldValue::from(7), DefaultValue.into()]).expect("sub.x"),
    ])
    .expect("zip");
    let models: Vec<Top> = initialize(&sweep).expect("valid sweep");
    assert_eq!(models, vec![top(1, 7, 0), top(2, 5, 0)]);
}

#[rstest]
fn empty_sweep_initializes_nothing() {
    let models: Vec<Top> = initialize(&Sweep::default()).expect("empty sweep");
    assert!(models.is_empty());
}

#[rstest]
fn collect_all_reports_every_failing_index() {
    let sweep = field("seed", [json!(1), json!("two"), json!(3), json!(-4)]).expect("seed");
    let err = initialize::<Top>(&sweep).expect_err("invalid seeds");
    assert_eq!(err.failing_indices(), vec![1, 3]);
}

#[rstest]
fn fail_fast_stops_at_first_failure() {
    let sweep = field("seed", [json!(1), json!("two"), json!(3), json!(-4)]).expect("seed");
    let err = Initializer::new(&sweep)
        .policy(FailurePolicy::FailFast)
        .build::<Top>()
        .expect_err("invalid seeds");
    assert_eq!(err.failing_indices(), vec![1]);
}

#[rstest]
fn unknown_paths_are_rejected_with_location() {
    let sweep = field("sub.z", [1]).expect("sub.z");
    let err = Initializer::new(&sweep)
        .constant(PartialConfig::new([("seed", 1)]).expect("constant"))
        .build::<Top>()
        .expect_err("unknown field");
    let SweepError::Validation { index, path, .. } = &*err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(*index, Some(0));
    assert_eq!(path.as_ref().map(ToString::to_string).as_deref(), Some("sub.z"));
}

#[rstest]
fn constant_conflicts_with_sentinel_at_same_path() {
    let sweep = field("seed", [DefaultValue]).expect("seed");
    let err = Initializer::new(&sweep)
        .constant(PartialConfig::new([("seed", 1)]).expect("constant"))
        .assignments()
        .expect_err("constant overlaps");
    assert!(matches!(&*err, SweepError::ConfigConflict { .. }));
}

#[rstest]
fn defaults_lose_to_explicit_assignments() {
    let sweep = field("sub.x", [FieldValue::from(1), DefaultValue.into()]).expect("sub.x");
    let initializer = Initializer::new(&sweep).defaults(
        PartialConfig::new([
            ("sub.x", FieldValue::from(9)),
            ("seed", FieldValue::from(3)),
            ("sub.y", DefaultValue.into()),
        ])
        .expect("defaults"),
    );
    let assignments = initializer.assignments().expect("assignments");
    let rendered: Vec<String> = assignments.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["{sub.x=1, seed=3}", "{sub.x=9, seed=3}"]);
    let models: Vec<Top> = initializer.build().expect("models");
    assert_eq!(models, vec![top(3, 1, 0), top(3, 9, 0)]);
}

#[rstest]
fn audit_runs_before_construction() {
    let sweep = field("value", [1]).expect("value");
    let err = initialize::<Lax>(&sweep).expect_err("lax model");
    assert!(matches!(&*err, SweepError::UnsafeModel { .. }), "{err}");
    let models: Vec<Lax> = Initializer::new(&sweep).check(false).build().expect("unchecked");
    assert_eq!(models.len(), 1);
}

#[rstest]
fn build_to_assigns_serialized_models() {
    let sweep = field("x", [1, 2]).expect("x");
    let nested = Initializer::new(&sweep).build_to::<Sub>("sub").expect("build_to");
    let rendered: Vec<String> = nested.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, [r#"{sub={"x":1,"y":0}}"#, r#"{sub={"x":2,"y":0}}"#]);
    let full = product([nested, field("seed", [7]).expect("seed")]).expect("product");
    let models: Vec<Top> = initialize(&full).expect("parents");
    assert_eq!(models, vec![top(7, 1, 0), top(7, 2, 0)]);
}

#[rstest]
fn build_at_replaces_nested_assignments() {
    let sweep = product([
        field("seed", [4]).expect("seed"),
        field("sub.y", [1, 2]).expect("sub.y"),
    ])
    .expect("product");
    let nested = Initializer::new(&sweep).build_at::<Sub>("sub").expect("build_at");
    let models: Vec<Top> = initialize(&nested).expect("parents");
    assert_eq!(models, vec![top(4, 5, 1), top(4, 5, 2)]);
}

#[rstest]
fn build_at_reports_paths_from_the_root() {
    let sweep = field("sub.x", [json!("wide")]).expect("sub.x");
    let err = Initializer::new(&sweep)
        .build_at::<Sub>("sub")
        .expect_err("invalid leaf");
    let SweepError::Validation { path, .. } = &*err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(path.as_ref().map(ToString::to_string).as_deref(), Some("sub.x"));
}

#[rstest]
fn build_at_rejects_direct_assignment() {
    let sweep = field("sub", [json!({"x": 1})]).expect("sub");
    let err = Initializer::new(&sweep)
        .build_at::<Sub>("sub")
        .expect_err("value at model path");
    assert_eq!(err.failing_indices(), vec![0]);
}

#[rstest]
fn assign_revalidates_and_keeps_instance_on_failure() {
    let mut model = top(1, 2, 3);
    let x = FieldPath::parse("sub.x").expect("path");
    model.assign(&x, FieldValue::from(8)).expect("valid assignment");
    assert_eq!(model, top(1, 8, 3));
    assert!(model.assign(&x, FieldValue::from("eight")).is_err());
    assert!(model.assign(&FieldPath::parse("sub.typo").expect("path"), 1.into()).is_err());
    assert_eq!(model, top(1, 8, 3));
    model.assign(&x, DefaultValue.into()).expect("default restores");
    assert_eq!(model, top(1, 5, 3));
}

fn lax_config() -> ModelSchema {
    ModelSchema::new("Config")
        .keyed("lax::Config")
        .validate_assignment(true)
        .field(FieldSchema::required("value", i64::field_kind()))
}

fn strict_config() -> ModelSchema {
    ModelSchema::new("Config")
        .keyed("strict::Config")
        .extra(ExtraFields::Forbid)
        .validate_assignment(true)
        .field(FieldSchema::required("inner", FieldKind::Model(lax_config)))
}

#[rstest]
fn audit_distinguishes_models_by_key_not_name() {
    let err = check_schema(&strict_config(), &CheckOptions::new()).expect_err("lax inner model");
    let SweepError::UnsafeModel { model, path, .. } = &*err else {
        panic!("expected UnsafeModel, got {err:?}");
    };
    assert_eq!(model, "Config");
    assert_eq!(path.as_ref().map(ToString::to_string).as_deref(), Some("inner"));
}
