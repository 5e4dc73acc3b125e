use kisoku::{
    ColumnType, CompileOptions, DecisionInput, DecisionTable, LoadOptions, LoadedRuleset,
    RuleSelectionPolicy, Schema,
};

fn main() {
    // Deny-before-allow using the PRIORITY column.
    // Higher priority values are evaluated first.
    let table = DecisionTable::new(
        ["RULE_ID", "PRIORITY", "BANNED", "AGE", "STATUS", "DECISION"],
        ["RULE_ID", "PRIORITY", "EQ", "GTE", "EQ", "SET"],
        [
            ["ALLOWED", "10", "", "18", "active", "allow"],
            ["BANNED", "100", "true", "", "", "deny"],
        ],
    );
    let schema = Schema::default()
        .column("BANNED", ColumnType::Boolean)
        .column("AGE", ColumnType::Integer)
        .column("STATUS", ColumnType::String)
        .column("DECISION", ColumnType::String);
    let ruleset = LoadedRuleset::from_table(
        &table,
        &CompileOptions::production(schema.clone()),
        &LoadOptions::default(),
    )
    .expect("failed to build ruleset");

    let banned = DecisionInput::new()
        .set("BANNED", true)
        .set("AGE", 30_i64)
        .set("STATUS", "active");
    let normal = DecisionInput::new()
        .set("BANNED", false)
        .set("AGE", 25_i64)
        .set("STATUS", "active");
    let underage = DecisionInput::new()
        .set("BANNED", false)
        .set("AGE", 15_i64)
        .set("STATUS", "active");

    for (label, input) in [("Banned", &banned), ("Normal", &normal), ("Underage", &underage)] {
        match ruleset.evaluate(input) {
            Ok(output) => println!("{label} user: {output}"),
            Err(err) => println!("{label} user: {err}"),
        }
    }

    // First-match ignores the priorities: ALLOWED is listed first
    let first_match = LoadedRuleset::from_table(
        &table,
        &CompileOptions {
            rule_selection: RuleSelectionPolicy::FirstMatch,
            ..CompileOptions::production(schema)
        },
        &LoadOptions::default(),
    )
    .expect("failed to build ruleset");
    match first_match.evaluate(&banned) {
        Ok(output) => println!("Banned user, first match: {output}"),
        Err(err) => println!("Banned user, first match: {err}"),
    }
}
