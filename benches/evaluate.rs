use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kisoku::{
    compile, ColumnType, CompileOptions, CompiledRuleset, DecisionInput, DecisionTable,
    LoadOptions, LoadedRuleset, Schema,
};

const COUNTRIES: &[&str] = &["USA", "UK", "DE", "FR", "JP", "BR", "IN", "CA"];

/// Build a table with `n` rules spread over countries and age thresholds.
/// The only rule matching the returned input is the last one.
fn build_table(n: usize) -> (DecisionTable, Schema, DecisionInput) {
    let mut rows: Vec<Vec<String>> = (0..n - 1)
        .map(|i| {
            vec![
                format!("R{i}"),
                COUNTRIES[i % COUNTRIES.len()].to_owned(),
                format!("{}", 20 + i % 50),
                format!("({},{})", i % 1000, i % 1000 + 10),
                format!("0.{:02}", i % 100),
            ]
        })
        .collect();
    rows.push(vec![
        "FALLBACK".to_owned(),
        String::new(),
        String::new(),
        String::new(),
        "0.00".to_owned(),
    ]);

    let table = DecisionTable::new(
        ["RULE_ID", "COUNTRY", "AGE", "SCORE", "RATE"],
        ["RULE_ID", "EQ", "LT", "BETWEEN", "SET"],
        rows,
    );
    let schema = Schema::default()
        .column("COUNTRY", ColumnType::String)
        .column("AGE", ColumnType::Integer)
        .column("SCORE", ColumnType::Integer)
        .column("RATE", ColumnType::Decimal);
    let input = DecisionInput::new()
        .set("COUNTRY", "ZZ")
        .set("AGE", 90_i64)
        .set("SCORE", 5000_i64);
    (table, schema, input)
}

fn build_ruleset(n: usize) -> (CompiledRuleset, LoadedRuleset, DecisionInput) {
    let (table, schema, input) = build_table(n);
    let compiled = compile(&table, &CompileOptions::production(schema)).unwrap();
    let loaded = compiled.load(&LoadOptions::default()).unwrap();
    (compiled, loaded, input)
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_eval");

    for &n in &[100, 10_000, 100_000] {
        let (_, ruleset, input) = build_ruleset(n);
        group.bench_function(&format!("{n}_rows_indexed"), |b| {
            b.iter(|| ruleset.evaluate(black_box(&input)));
        });
        group.bench_function(&format!("{n}_rows_linear"), |b| {
            b.iter(|| ruleset.evaluate_linear(black_box(&input)));
        });
    }

    group.finish();
}

fn bench_compile_and_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    for &n in &[1_000, 50_000] {
        let (table, schema, _) = build_table(n);
        let options = CompileOptions::production(schema);
        group.bench_function(&format!("{n}_rows_compile"), |b| {
            b.iter(|| compile(black_box(&table), &options));
        });

        let compiled = compile(&table, &options).unwrap();
        group.bench_function(&format!("{n}_rows_load_heap"), |b| {
            b.iter(|| LoadedRuleset::load(black_box(compiled.bytes()), &LoadOptions::on_heap()));
        });
        group.bench_function(&format!("{n}_rows_load_off_heap"), |b| {
            b.iter(|| LoadedRuleset::load(black_box(compiled.bytes()), &LoadOptions::off_heap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_compile_and_load);
criterion_main!(benches);
