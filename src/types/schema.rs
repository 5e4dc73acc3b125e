use super::column::ColumnType;

/// Declared type of one decision-table column.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
}

impl ColumnSchema {
    /// A nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }

    #[must_use]
    pub fn required(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
        }
    }
}

/// Column types for every non-reserved column of a decision table.
///
/// `RULE_ID` and `PRIORITY` columns carry implicit types and need not be declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    pub columns: Vec<ColumnSchema>,
}

impl Schema {
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = ColumnSchema>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push(ColumnSchema::new(name, column_type));
        self
    }

    /// Look up a column by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
