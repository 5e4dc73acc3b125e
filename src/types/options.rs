use super::error::FormatError;
use super::schema::Schema;

/// Intended use recorded in the artifact header.
///
/// Both kinds keep `TEST_` columns in the artifact; those columns never take
/// part in matching or output regardless of kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArtifactKind {
    #[default]
    Production,
    TestInclusive,
}

impl ArtifactKind {
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// # Errors
    ///
    /// Returns [`FormatError::UnknownOrdinal`] for values other than 0 and 1.
    pub fn from_ordinal(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(ArtifactKind::Production),
            1 => Ok(ArtifactKind::TestInclusive),
            _ => Err(FormatError::UnknownOrdinal {
                field: "artifact kind",
                value,
            }),
        }
    }
}

/// How the winning rule is chosen when several rows match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleSelectionPolicy {
    /// Priority order when a priority column exists, insertion order otherwise.
    #[default]
    Auto,
    /// Priority order; falls back to insertion order with a warning.
    Priority,
    /// Always insertion order.
    FirstMatch,
}

impl RuleSelectionPolicy {
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// # Errors
    ///
    /// Returns [`FormatError::UnknownOrdinal`] for values outside `0..=2`.
    pub fn from_ordinal(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(RuleSelectionPolicy::Auto),
            1 => Ok(RuleSelectionPolicy::Priority),
            2 => Ok(RuleSelectionPolicy::FirstMatch),
            _ => Err(FormatError::UnknownOrdinal {
                field: "rule selection",
                value,
            }),
        }
    }
}

/// Where a loaded artifact's bytes live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Residency {
    /// An owned heap buffer.
    #[default]
    Heap,
    /// A read-only anonymous memory map outside the allocator.
    OffHeap,
}

/// Options for [`compile`](crate::compile()).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompileOptions {
    pub artifact_kind: ArtifactKind,
    pub rule_selection: RuleSelectionPolicy,
    /// Name of the column consulted for priority ordering.
    pub priority_column: String,
    pub schema: Schema,
}

impl CompileOptions {
    pub const DEFAULT_PRIORITY_COLUMN: &'static str = "PRIORITY";

    #[must_use]
    pub fn production(schema: Schema) -> Self {
        Self {
            artifact_kind: ArtifactKind::Production,
            rule_selection: RuleSelectionPolicy::Auto,
            priority_column: Self::DEFAULT_PRIORITY_COLUMN.to_owned(),
            schema,
        }
    }

    #[must_use]
    pub fn test_inclusive(schema: Schema) -> Self {
        Self {
            artifact_kind: ArtifactKind::TestInclusive,
            ..Self::production(schema)
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::production(Schema::default())
    }
}

/// Options for loading an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadOptions {
    pub residency: Residency,
    /// Build equality and comparison indexes at load time.
    pub build_indexes: bool,
}

impl LoadOptions {
    #[must_use]
    pub fn on_heap() -> Self {
        Self {
            residency: Residency::Heap,
            build_indexes: true,
        }
    }

    #[must_use]
    pub fn off_heap() -> Self {
        Self {
            residency: Residency::OffHeap,
            build_indexes: true,
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::on_heap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = CompileOptions::default();
        assert_eq!(opts.artifact_kind, ArtifactKind::Production);
        assert_eq!(opts.rule_selection, RuleSelectionPolicy::Auto);
        assert_eq!(opts.priority_column, "PRIORITY");

        let load = LoadOptions::default();
        assert_eq!(load.residency, Residency::Heap);
        assert!(load.build_indexes);
    }

    #[test]
    fn test_inclusive_keeps_everything_else() {
        let opts = CompileOptions::test_inclusive(Schema::default());
        assert_eq!(opts.artifact_kind, ArtifactKind::TestInclusive);
        assert_eq!(opts.priority_column, "PRIORITY");
    }

    #[test]
    fn ordinals() {
        assert_eq!(ArtifactKind::from_ordinal(1).unwrap(), ArtifactKind::TestInclusive);
        assert!(ArtifactKind::from_ordinal(2).is_err());
        assert_eq!(
            RuleSelectionPolicy::from_ordinal(2).unwrap(),
            RuleSelectionPolicy::FirstMatch
        );
        assert!(RuleSelectionPolicy::from_ordinal(3).is_err());
    }
}
