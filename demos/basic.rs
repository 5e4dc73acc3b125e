use kisoku::{
    compile, ColumnType, CompileOptions, DecisionInput, DecisionTable, LoadOptions, Schema,
};

fn main() {
    // Define the table: header, operator row, then one row per rule
    let table = DecisionTable::new(
        ["RULE_ID", "COUNTRY", "AGE", "CATEGORY", "RATE"],
        ["RULE_ID", "EQ", "BETWEEN", "IN", "SET"],
        [
            ["US_YOUNG", "USA", "(18,29)", "", "0.08"],
            ["US_ELECTRONICS", "USA", "", "(ELECTRONICS, APPLIANCES)", "0.05"],
            ["UK_ANY", "UK", "", "", "0.07"],
        ],
    );
    let schema = Schema::default()
        .column("COUNTRY", ColumnType::String)
        .column("AGE", ColumnType::Integer)
        .column("CATEGORY", ColumnType::String)
        .column("RATE", ColumnType::Decimal);

    let compiled =
        compile(&table, &CompileOptions::production(schema)).expect("failed to compile table");
    println!(
        "Compiled {} rules into {} bytes",
        compiled.metadata().row_count(),
        compiled.bytes().len()
    );

    let ruleset = compiled
        .load(&LoadOptions::default())
        .expect("failed to load artifact");

    let input = DecisionInput::new()
        .set("COUNTRY", "USA")
        .set("AGE", 42_i64)
        .set("CATEGORY", "ELECTRONICS");

    match ruleset.evaluate(&input) {
        Ok(output) => println!("Result: {output}"),
        Err(err) => println!("No decision: {err}"),
    }

    // Diagnostics for the same input
    println!("{}", ruleset.evaluate_detailed(&input));
}
