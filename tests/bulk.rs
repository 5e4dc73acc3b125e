use kisoku::{
    ColumnType, CompileOptions, DecisionInput, DecisionTable, EvaluationError, LoadOptions,
    LoadedRuleset, Schema, Value,
};

fn ruleset() -> LoadedRuleset {
    let table = DecisionTable::new(
        ["RULE_ID", "COUNTRY", "AGE", "RATE"],
        ["RULE_ID", "EQ", "GTE", "SET"],
        [
            ["US_ADULT", "USA", "18", "0.05"],
            ["UK_ADULT", "UK", "18", "0.07"],
            ["UK_ANY", "UK", "", "0.02"],
        ],
    );
    let schema = Schema::default()
        .column("COUNTRY", ColumnType::String)
        .column("AGE", ColumnType::Integer)
        .column("RATE", ColumnType::Decimal);
    LoadedRuleset::from_table(&table, &CompileOptions::production(schema), &LoadOptions::default())
        .unwrap()
}

#[test]
fn variants_override_base_in_request_order() {
    let rs = ruleset();
    let base = DecisionInput::new().set("COUNTRY", "UK").set("AGE", 30_i64);
    let variants = [
        DecisionInput::new(),
        DecisionInput::new().set("AGE", 12_i64),
        DecisionInput::new().set("COUNTRY", "USA"),
        DecisionInput::new().set("COUNTRY", "USA").set("AGE", 12_i64),
    ];

    let bulk = rs.evaluate_bulk(&base, &variants);
    assert_eq!(bulk.len(), 4);
    assert_eq!(bulk.matched(), 3);

    let ids: Vec<Result<&str, &EvaluationError>> = bulk
        .results()
        .iter()
        .map(|r| r.as_ref().map(kisoku::DecisionOutput::rule_id))
        .collect();
    assert_eq!(ids[0], Ok("UK_ADULT"));
    assert_eq!(ids[1], Ok("UK_ANY"));
    assert_eq!(ids[2], Ok("US_ADULT"));
    assert_eq!(ids[3], Err(&EvaluationError::NoMatch));
}

#[test]
fn bulk_agrees_with_single_evaluation() {
    let rs = ruleset();
    let base = DecisionInput::new().set("COUNTRY", "UK");
    let variants: Vec<DecisionInput> = (0..40_i64)
        .map(|age| DecisionInput::new().set("AGE", age))
        .collect();

    let bulk = rs.evaluate_bulk(&base, &variants);
    for (variant, result) in variants.iter().zip(bulk.results()) {
        assert_eq!(result, &rs.evaluate(&base.merged(variant)));
    }
}

#[test]
fn failing_variant_does_not_stop_the_rest() {
    let rs = ruleset();
    let base = DecisionInput::new().set("COUNTRY", "USA");
    let variants = [
        DecisionInput::new().set("AGE", "not a number"),
        DecisionInput::new().set("AGE", 40_i64),
    ];

    let results = rs.evaluate_bulk(&base, &variants).into_results();
    assert!(matches!(results[0], Err(EvaluationError::TypeCoercion { .. })));
    let out = results[1].as_ref().unwrap();
    assert_eq!(out.get("RATE"), Some(&Value::from("0.05")));
}

#[test]
fn empty_variant_list() {
    let rs = ruleset();
    let bulk = rs.evaluate_bulk(&DecisionInput::new(), &[]);
    assert!(bulk.is_empty());
    assert_eq!(bulk.into_outputs().unwrap(), Vec::new());
}

#[test]
fn into_outputs_surfaces_first_error() {
    let rs = ruleset();
    let base = DecisionInput::new().set("COUNTRY", "UK");
    let variants = [
        DecisionInput::new(),
        DecisionInput::new().set("COUNTRY", "FR"),
        DecisionInput::new().set("AGE", true),
    ];
    assert_eq!(
        rs.evaluate_bulk(&base, &variants).into_outputs(),
        Err(EvaluationError::NoMatch)
    );
}
