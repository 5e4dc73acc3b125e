use std::fmt;

use super::error::FormatError;
use super::operator::Operator;

/// Logical type of the values stored in a column.
///
/// The discriminant is the ordinal written into the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    Timestamp,
}

impl ColumnType {
    pub(crate) const ALL: [ColumnType; 6] = [
        ColumnType::String,
        ColumnType::Integer,
        ColumnType::Decimal,
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::Timestamp,
    ];

    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// # Errors
    ///
    /// Returns [`FormatError::UnknownOrdinal`] for values outside `0..=5`.
    pub fn from_ordinal(value: u8) -> Result<Self, FormatError> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(FormatError::UnknownOrdinal {
                field: "column type",
                value,
            })
    }

    /// Whether values of this type are stored as dictionary ids.
    #[must_use]
    pub fn is_dictionary_encoded(self) -> bool {
        matches!(
            self,
            ColumnType::String | ColumnType::Decimal | ColumnType::Timestamp
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::String => "STRING",
            ColumnType::Integer => "INTEGER",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
        };
        f.write_str(name)
    }
}

/// What a column contributes to evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnRole {
    /// Matched against the decision input.
    Input,
    /// Returned when the rule matches.
    Output,
    /// Rule id and priority.
    Metadata,
}

impl ColumnRole {
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// # Errors
    ///
    /// Returns [`FormatError::UnknownOrdinal`] for values outside `0..=2`.
    pub fn from_ordinal(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(ColumnRole::Input),
            1 => Ok(ColumnRole::Output),
            2 => Ok(ColumnRole::Metadata),
            _ => Err(FormatError::UnknownOrdinal {
                field: "column role",
                value,
            }),
        }
    }
}

/// Column definition as recorded in an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub(crate) name: String,
    pub(crate) name_id: i32,
    pub(crate) operator: Operator,
    pub(crate) column_type: ColumnType,
    pub(crate) role: ColumnRole,
    pub(crate) flags: u8,
    pub(crate) data_offset: u32,
}

impl ColumnDefinition {
    pub const FLAG_NULLABLE: u8 = 0x01;
    pub const FLAG_TEST_ONLY: u8 = 0x02;
    /// Set on the `PRIORITY` column the rows were ordered by.
    pub const FLAG_ORDER_KEY: u8 = 0x04;

    /// Columns whose name starts with this prefix are test-only.
    pub const TEST_PREFIX: &'static str = "TEST_";

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    #[must_use]
    pub fn role(&self) -> ColumnRole {
        self.role
    }

    #[must_use]
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Byte offset of this column's block, relative to the data section.
    #[must_use]
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.flags & Self::FLAG_NULLABLE != 0
    }

    #[must_use]
    pub fn is_test_only(&self) -> bool {
        self.flags & Self::FLAG_TEST_ONLY != 0
    }

    #[must_use]
    pub fn is_order_key(&self) -> bool {
        self.flags & Self::FLAG_ORDER_KEY != 0
    }

    #[must_use]
    pub fn is_input(&self) -> bool {
        self.role == ColumnRole::Input
    }

    #[must_use]
    pub fn is_output(&self) -> bool {
        self.role == ColumnRole::Output
    }
}
