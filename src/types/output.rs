use std::collections::HashMap;
use std::fmt;

use super::error::EvaluationError;
use super::value::Value;

/// The winning rule and its output values.
///
/// Output columns that are blank in the winning row map to `None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionOutput {
    rule_id: String,
    outputs: HashMap<String, Option<Value>>,
}

impl DecisionOutput {
    pub(crate) fn new(rule_id: String, outputs: HashMap<String, Option<Value>>) -> Self {
        Self { rule_id, outputs }
    }

    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    #[must_use]
    pub fn outputs(&self) -> &HashMap<String, Option<Value>> {
        &self.outputs
    }

    /// The value of an output column, or `None` when the column is unknown or blank.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.outputs.get(name).and_then(Option::as_ref)
    }
}

impl fmt::Display for DecisionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rule_id)?;
        let mut names: Vec<&String> = self.outputs.keys().collect();
        names.sort();
        for name in names {
            match self.outputs.get(name).and_then(Option::as_ref) {
                Some(v) => write!(f, " {name}={v}")?,
                None => write!(f, " {name}=<blank>")?,
            }
        }
        Ok(())
    }
}

/// Results of a bulk evaluation, one per variant in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkResult {
    results: Vec<Result<DecisionOutput, EvaluationError>>,
}

impl BulkResult {
    pub(crate) fn new(results: Vec<Result<DecisionOutput, EvaluationError>>) -> Self {
        Self { results }
    }

    #[must_use]
    pub fn results(&self) -> &[Result<DecisionOutput, EvaluationError>] {
        &self.results
    }

    #[must_use]
    pub fn into_results(self) -> Vec<Result<DecisionOutput, EvaluationError>> {
        self.results
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of variants that produced a match.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    /// Every output, or the first error in request order.
    ///
    /// # Errors
    ///
    /// Returns the first variant's [`EvaluationError`].
    pub fn into_outputs(self) -> Result<Vec<DecisionOutput>, EvaluationError> {
        self.results.into_iter().collect()
    }
}
