use std::fmt;
use std::time::Duration;

use super::error::EvaluationError;
use super::output::DecisionOutput;

/// Detailed evaluation report returned by
/// [`LoadedRuleset::evaluate_detailed()`](super::ruleset::LoadedRuleset::evaluate_detailed).
///
/// Carries the result together with which conditions the winning row
/// satisfied, how much of the table was examined, and the wall-clock
/// duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    result: Result<DecisionOutput, EvaluationError>,
    matched_conditions: Vec<String>,
    indexed: bool,
    candidates: Option<usize>,
    rows_verified: usize,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        result: Result<DecisionOutput, EvaluationError>,
        matched_conditions: Vec<String>,
        indexed: bool,
        candidates: Option<usize>,
        rows_verified: usize,
        duration: Duration,
    ) -> Self {
        Self {
            result,
            matched_conditions,
            indexed,
            candidates,
            rows_verified,
            duration,
        }
    }

    /// The evaluation result, same as [`LoadedRuleset::evaluate()`](super::ruleset::LoadedRuleset::evaluate).
    pub fn result(&self) -> Result<&DecisionOutput, &EvaluationError> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn into_result(self) -> Result<DecisionOutput, EvaluationError> {
        self.result
    }

    /// Input columns with a non-blank condition in the winning row, in column order.
    #[must_use]
    pub fn matched_conditions(&self) -> &[String] {
        &self.matched_conditions
    }

    /// Whether index intersection narrowed the rows before verification.
    #[must_use]
    pub fn indexed(&self) -> bool {
        self.indexed
    }

    /// Rows surviving index intersection, when indexes were used.
    #[must_use]
    pub fn candidates(&self) -> Option<usize> {
        self.candidates
    }

    /// Rows fully verified before the result was decided.
    #[must_use]
    pub fn rows_verified(&self) -> usize {
        self.rows_verified
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(out) => write!(f, "matched: {}", out.rule_id())?,
            Err(e) => write!(f, "error: {e}")?,
        }
        write!(f, ", conditions: [{}]", self.matched_conditions.join(", "))?;
        if let Some(c) = self.candidates {
            write!(f, ", candidates: {c}")?;
        }
        write!(f, ", verified: {}", self.rows_verified)?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
