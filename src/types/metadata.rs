use super::column::{ColumnDefinition, ColumnRole};
use super::options::{ArtifactKind, RuleSelectionPolicy};

/// Summary of a compiled or loaded ruleset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RulesetMetadata {
    row_count: usize,
    input_columns: Vec<String>,
    output_columns: Vec<String>,
    test_columns: Vec<String>,
    priority_column: Option<String>,
    artifact_kind: ArtifactKind,
    rule_selection: RuleSelectionPolicy,
}

impl RulesetMetadata {
    pub(crate) fn from_columns(
        columns: &[ColumnDefinition],
        row_count: usize,
        artifact_kind: ArtifactKind,
        rule_selection: RuleSelectionPolicy,
        priority_column: Option<String>,
    ) -> Self {
        let names = |role: ColumnRole| {
            columns
                .iter()
                .filter(|c| c.role == role && !c.is_test_only())
                .map(|c| c.name.clone())
                .collect()
        };
        Self {
            row_count,
            input_columns: names(ColumnRole::Input),
            output_columns: names(ColumnRole::Output),
            test_columns: columns
                .iter()
                .filter(|c| c.is_test_only())
                .map(|c| c.name.clone())
                .collect(),
            priority_column,
            artifact_kind,
            rule_selection,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Input columns that take part in matching.
    #[must_use]
    pub fn input_columns(&self) -> &[String] {
        &self.input_columns
    }

    /// Output columns returned on a match.
    #[must_use]
    pub fn output_columns(&self) -> &[String] {
        &self.output_columns
    }

    /// `TEST_` columns retained in the artifact but excluded from evaluation.
    #[must_use]
    pub fn test_columns(&self) -> &[String] {
        &self.test_columns
    }

    /// The column rows were ordered by, if priority ordering was applied.
    #[must_use]
    pub fn priority_column(&self) -> Option<&str> {
        self.priority_column.as_deref()
    }

    #[must_use]
    pub fn artifact_kind(&self) -> ArtifactKind {
        self.artifact_kind
    }

    #[must_use]
    pub fn rule_selection(&self) -> RuleSelectionPolicy {
        self.rule_selection
    }
}
