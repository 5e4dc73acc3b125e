#![allow(dead_code)]

use kisoku::{
    ColumnCodec, ColumnType, CompileOptions, DecisionInput, DecisionTable, LoadOptions,
    LoadedRuleset, Operator, RangeOp, ScalarOp, Schema, SetOp,
};
use proptest::prelude::*;
use std::ops::RangeInclusive;

// --- Fixed table shape ---
// PRIORITY : PRIORITY, 0..=3 or blank
// AGE      : INTEGER, any condition operator, values 0..=100
// SCORE    : INTEGER, any condition operator, values 0..=100
// REGION   : STRING, EQ / NE / IN / NOT_IN over REGIONS
// TIER     : STRING, always EQ over TIERS
// OUT      : SET, the rule id

pub const REGIONS: &[&str] = &["EMEA", "APAC", "NA", "LATAM"];

pub const TIERS: &[&str] = &["GOLD", "SILVER", "BRONZE"];

const INTEGER_OPERATORS: &[&str] = &[
    "EQ",
    "NE",
    "GT",
    "GTE",
    "LT",
    "LTE",
    "BETWEEN_INCLUSIVE",
    "BETWEEN_EXCLUSIVE",
    "NOT_BETWEEN_INCLUSIVE",
    "NOT_BETWEEN_EXCLUSIVE",
    "IN",
    "NOT_IN",
];

const STRING_OPERATORS: &[&str] = &["EQ", "NE", "IN", "NOT_IN"];

/// One condition cell, kept in parsed form for the reference evaluator.
#[derive(Debug, Clone)]
pub enum Cell {
    Blank,
    Int(i64),
    Range(i64, i64),
    IntSet(Vec<i64>),
    Str(&'static str),
    StrSet(Vec<&'static str>),
}

impl Cell {
    fn render(&self) -> String {
        match self {
            Cell::Blank => String::new(),
            Cell::Int(v) => v.to_string(),
            Cell::Range(lo, hi) => format!("({lo},{hi})"),
            Cell::IntSet(vs) => format!(
                "({})",
                vs.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
            ),
            Cell::Str(s) => (*s).to_owned(),
            Cell::StrSet(ss) => format!("({})", ss.join(", ")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenRow {
    pub priority: Option<i64>,
    pub age: Cell,
    pub score: Cell,
    pub region: Cell,
    pub tier: Cell,
}

/// A generated decision table plus everything needed to evaluate it by hand.
#[derive(Debug, Clone)]
pub struct GenTable {
    pub age_op: Operator,
    pub score_op: Operator,
    pub region_op: Operator,
    pub rows: Vec<GenRow>,
}

impl GenTable {
    #[must_use]
    pub fn table(&self) -> DecisionTable {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                vec![
                    format!("R{i}"),
                    row.priority.map(|p| p.to_string()).unwrap_or_default(),
                    row.age.render(),
                    row.score.render(),
                    row.region.render(),
                    row.tier.render(),
                    format!("R{i}"),
                ]
            })
            .collect();
        DecisionTable::new(
            ["RULE_ID", "PRIORITY", "AGE", "SCORE", "REGION", "TIER", "OUT"],
            [
                "RULE_ID".to_owned(),
                "PRIORITY".to_owned(),
                self.age_op.to_string(),
                self.score_op.to_string(),
                self.region_op.to_string(),
                "EQ".to_owned(),
                "SET".to_owned(),
            ],
            rows,
        )
    }

    #[must_use]
    pub fn schema() -> Schema {
        Schema::default()
            .column("AGE", ColumnType::Integer)
            .column("SCORE", ColumnType::Integer)
            .column("REGION", ColumnType::String)
            .column("TIER", ColumnType::String)
            .column("OUT", ColumnType::String)
    }

    /// Compile and load.
    ///
    /// # Panics
    ///
    /// Panics if the generated table fails to compile (should not happen
    /// with valid generators).
    #[must_use]
    pub fn load(&self, options: &LoadOptions) -> LoadedRuleset {
        LoadedRuleset::from_table(
            &self.table(),
            &CompileOptions::production(Self::schema()),
            options,
        )
        .expect("generated table should compile and load")
    }

    /// Reference evaluation: the winning rule id, computed directly from the
    /// generated cells.
    #[must_use]
    pub fn expected(&self, input: &GenInput) -> Option<String> {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.rows[i].priority.unwrap_or(0)));
        order
            .into_iter()
            .find(|&i| {
                let row = &self.rows[i];
                int_matches(self.age_op, &row.age, input.age.unwrap_or(0))
                    && int_matches(self.score_op, &row.score, input.score.unwrap_or(0))
                    && str_matches(self.region_op, &row.region, input.region)
                    && str_matches(Operator::Eq, &row.tier, input.tier)
            })
            .map(|i| format!("R{i}"))
    }
}

fn int_matches(op: Operator, cell: &Cell, input: i64) -> bool {
    match (op.codec(), cell) {
        (_, Cell::Blank) => true,
        (ColumnCodec::Scalar(op), Cell::Int(v)) => match op {
            ScalarOp::Eq => input == *v,
            ScalarOp::Ne => input != *v,
            ScalarOp::Gt => input > *v,
            ScalarOp::Gte => input >= *v,
            ScalarOp::Lt => input < *v,
            ScalarOp::Lte => input <= *v,
        },
        (ColumnCodec::Range(op), Cell::Range(lo, hi)) => match op {
            RangeOp::BetweenInclusive => *lo <= input && input <= *hi,
            RangeOp::BetweenExclusive => *lo < input && input < *hi,
            RangeOp::NotBetweenInclusive => input < *lo || input > *hi,
            RangeOp::NotBetweenExclusive => input <= *lo || input >= *hi,
        },
        (ColumnCodec::Set(op), Cell::IntSet(vs)) => match op {
            SetOp::In => vs.contains(&input),
            SetOp::NotIn => !vs.contains(&input),
        },
        _ => unreachable!("cell shape does not match operator"),
    }
}

/// Strings outside the table never equal a stored value.
fn str_matches(op: Operator, cell: &Cell, input: Option<&str>) -> bool {
    match (op.codec(), cell) {
        (_, Cell::Blank) => true,
        (ColumnCodec::Scalar(ScalarOp::Eq), Cell::Str(s)) => input == Some(*s),
        (ColumnCodec::Scalar(ScalarOp::Ne), Cell::Str(s)) => input != Some(*s),
        (ColumnCodec::Set(op), Cell::StrSet(ss)) => {
            let found = input.is_some_and(|i| ss.contains(&i));
            match op {
                SetOp::In => found,
                SetOp::NotIn => !found,
            }
        }
        _ => unreachable!("cell shape does not match operator"),
    }
}

/// A generated input; `None` fields are left out of the decision input.
#[derive(Debug, Clone)]
pub struct GenInput {
    pub age: Option<i64>,
    pub score: Option<i64>,
    pub region: Option<&'static str>,
    pub tier: Option<&'static str>,
}

impl GenInput {
    #[must_use]
    pub fn to_input(&self) -> DecisionInput {
        let mut input = DecisionInput::new();
        if let Some(age) = self.age {
            input.insert("AGE", age);
        }
        if let Some(score) = self.score {
            input.insert("SCORE", score);
        }
        if let Some(region) = self.region {
            input.insert("REGION", region);
        }
        if let Some(tier) = self.tier {
            input.insert("TIER", tier);
        }
        input
    }
}

fn arb_integer_cell(op: Operator) -> BoxedStrategy<Cell> {
    let condition = match op.codec() {
        ColumnCodec::Scalar(_) => (0_i64..=100).prop_map(Cell::Int).boxed(),
        ColumnCodec::Range(_) => (0_i64..=100, 0_i64..=100)
            .prop_map(|(a, b)| Cell::Range(a.min(b), a.max(b)))
            .boxed(),
        ColumnCodec::Set(_) => prop::collection::vec(0_i64..=100, 1..4)
            .prop_map(Cell::IntSet)
            .boxed(),
    };
    prop_oneof![1 => Just(Cell::Blank), 2 => condition].boxed()
}

fn arb_region_cell(op: Operator) -> BoxedStrategy<Cell> {
    let condition = match op.codec() {
        ColumnCodec::Set(_) => prop::sample::subsequence(REGIONS, 1..=3)
            .prop_map(Cell::StrSet)
            .boxed(),
        _ => prop::sample::select(REGIONS).prop_map(Cell::Str).boxed(),
    };
    prop_oneof![1 => Just(Cell::Blank), 2 => condition].boxed()
}

fn arb_tier_cell() -> BoxedStrategy<Cell> {
    prop_oneof![
        1 => Just(Cell::Blank),
        2 => prop::sample::select(TIERS).prop_map(Cell::Str),
    ]
    .boxed()
}

fn arb_operator(tokens: &'static [&'static str]) -> impl Strategy<Value = Operator> {
    prop::sample::select(tokens).prop_map(|t| Operator::from_token(t).expect("known operator"))
}

/// Generate a table of 1..=12 rows with random operators and cells.
pub fn arb_table() -> impl Strategy<Value = GenTable> {
    arb_table_with_rows(1..=12)
}

/// Tables of 60..=160 rows, so candidate bitmaps span several words and
/// every column repeats its values many times over.
pub fn arb_wide_table() -> impl Strategy<Value = GenTable> {
    arb_table_with_rows(60..=160)
}

fn arb_table_with_rows(row_count: RangeInclusive<usize>) -> impl Strategy<Value = GenTable> {
    (
        arb_operator(INTEGER_OPERATORS),
        arb_operator(INTEGER_OPERATORS),
        arb_operator(STRING_OPERATORS),
    )
        .prop_flat_map(move |(age_op, score_op, region_op)| {
            let row = (
                prop::option::of(0_i64..=3),
                arb_integer_cell(age_op),
                arb_integer_cell(score_op),
                arb_region_cell(region_op),
                arb_tier_cell(),
            )
                .prop_map(|(priority, age, score, region, tier)| GenRow {
                    priority,
                    age,
                    score,
                    region,
                    tier,
                });
            prop::collection::vec(row, row_count.clone()).prop_map(move |rows| GenTable {
                age_op,
                score_op,
                region_op,
                rows,
            })
        })
}

/// Generate an input over the same columns, sometimes leaving fields out or
/// using a region no table mentions.
pub fn arb_input() -> impl Strategy<Value = GenInput> {
    (
        prop::option::of(0_i64..=100),
        prop::option::of(0_i64..=100),
        prop::option::of(prop_oneof![
            4 => prop::sample::select(REGIONS),
            1 => Just("OCEANIA"),
        ]),
        prop::option::of(prop::sample::select(TIERS)),
    )
        .prop_map(|(age, score, region, tier)| GenInput {
            age,
            score,
            region,
            tier,
        })
}
