use std::collections::HashMap;
use std::time::Instant;

use tracing::trace;

use crate::codec::decode_value;
use crate::coerce;
use crate::index::{CandidateBitmap, ColumnIndex};
use crate::types::{
    BulkResult, DecisionInput, DecisionOutput, EvaluationError, EvaluationReport, LoadedRuleset,
    Value,
};

/// Outcome of scanning the rule order for one coerced input.
pub(crate) struct Probe {
    pub(crate) row: Option<usize>,
    pub(crate) candidates: Option<usize>,
    pub(crate) verified: usize,
}

/// Coerce every active input column once, before any row is examined, so
/// both scan strategies fail identically on bad input.
fn coerce_inputs(rs: &LoadedRuleset, input: &DecisionInput) -> Result<Vec<i32>, EvaluationError> {
    rs.input_columns
        .iter()
        .map(|&c| {
            let def = &rs.columns[c];
            coerce::to_stored(
                input.get(&def.name),
                def.column_type,
                &rs.dictionary,
                &def.name,
            )
        })
        .collect()
}

/// Full verification of one row against every active input column.
fn matches_row(rs: &LoadedRuleset, row: usize, coerced: &[i32]) -> bool {
    rs.input_columns
        .iter()
        .zip(coerced)
        .all(|(&c, &v)| rs.blocks[c].matches(row, v))
}

fn probe_linear(rs: &LoadedRuleset, coerced: &[i32]) -> Probe {
    let mut verified = 0;
    for &row in &rs.rule_order {
        verified += 1;
        if matches_row(rs, row, coerced) {
            return Probe {
                row: Some(row),
                candidates: None,
                verified,
            };
        }
    }
    Probe {
        row: None,
        candidates: None,
        verified,
    }
}

fn probe_indexed(rs: &LoadedRuleset, indexes: &[Option<ColumnIndex>], coerced: &[i32]) -> Probe {
    let mut candidates = CandidateBitmap::all_ones(rs.row_count());
    for (&c, &v) in rs.input_columns.iter().zip(coerced) {
        let Some(index) = &indexes[c] else {
            continue;
        };
        candidates.and_in_place(&index.candidates(v));
        if candidates.is_empty() {
            trace!(column = %rs.columns[c].name, "index intersection left no candidates");
            return Probe {
                row: None,
                candidates: Some(0),
                verified: 0,
            };
        }
    }

    let surviving = candidates.cardinality();
    let mut verified = 0;
    for &row in &rs.rule_order {
        if !candidates.is_set(row) {
            continue;
        }
        verified += 1;
        if matches_row(rs, row, coerced) {
            return Probe {
                row: Some(row),
                candidates: Some(surviving),
                verified,
            };
        }
    }
    Probe {
        row: None,
        candidates: Some(surviving),
        verified,
    }
}

fn probe(rs: &LoadedRuleset, coerced: &[i32], use_indexes: bool) -> Probe {
    match &rs.indexes {
        Some(indexes) if use_indexes => probe_indexed(rs, indexes, coerced),
        _ => probe_linear(rs, coerced),
    }
}

fn build_output(rs: &LoadedRuleset, row: usize) -> Result<DecisionOutput, EvaluationError> {
    let rule_id_def = &rs.columns[rs.rule_id_column];
    let rule_id = rs.blocks[rs.rule_id_column]
        .value(row)
        .and_then(|stored| decode_value(rule_id_def.column_type, stored, &rs.dictionary))
        .map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .ok_or(EvaluationError::MissingRuleId { row })?;

    let outputs: HashMap<String, Option<Value>> = rs
        .output_columns
        .iter()
        .map(|&c| {
            let def = &rs.columns[c];
            let value = rs.blocks[c]
                .value(row)
                .and_then(|stored| decode_value(def.column_type, stored, &rs.dictionary));
            (def.name.clone(), value)
        })
        .collect();
    Ok(DecisionOutput::new(rule_id, outputs))
}

pub(crate) fn evaluate(
    rs: &LoadedRuleset,
    input: &DecisionInput,
    use_indexes: bool,
) -> Result<DecisionOutput, EvaluationError> {
    let coerced = coerce_inputs(rs, input)?;
    match probe(rs, &coerced, use_indexes).row {
        Some(row) => build_output(rs, row),
        None => {
            trace!("no rule matched");
            Err(EvaluationError::NoMatch)
        }
    }
}

pub(crate) fn evaluate_detailed(rs: &LoadedRuleset, input: &DecisionInput) -> EvaluationReport {
    let start = Instant::now();
    let coerced = match coerce_inputs(rs, input) {
        Ok(coerced) => coerced,
        Err(err) => {
            return EvaluationReport::new(Err(err), Vec::new(), false, None, 0, start.elapsed())
        }
    };

    let probe = probe(rs, &coerced, true);
    let (result, matched) = match probe.row {
        Some(row) => {
            let matched = rs
                .input_columns
                .iter()
                .filter(|&&c| rs.blocks[c].is_present(row))
                .map(|&c| rs.columns[c].name.clone())
                .collect();
            (build_output(rs, row), matched)
        }
        None => (Err(EvaluationError::NoMatch), Vec::new()),
    };
    EvaluationReport::new(
        result,
        matched,
        rs.indexes.is_some(),
        probe.candidates,
        probe.verified,
        start.elapsed(),
    )
}

pub(crate) fn evaluate_bulk(
    rs: &LoadedRuleset,
    base: &DecisionInput,
    variants: &[DecisionInput],
) -> BulkResult {
    BulkResult::new(
        variants
            .iter()
            .map(|variant| evaluate(rs, &base.merged(variant), true))
            .collect(),
    )
}
