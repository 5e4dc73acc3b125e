use thiserror::Error;

use super::column::{ColumnRole, ColumnType};
use super::operator::Operator;

/// Errors raised while encoding or decoding an artifact.
///
/// Every structural problem in a byte stream surfaces as one of these
/// variants; a corrupted artifact never panics the reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("not a kisoku artifact: bad magic 0x{found:08X}")]
    BadMagic { found: u32 },

    #[error("unsupported artifact version {major}.{minor}; this engine reads major version {supported}")]
    UnsupportedVersion { major: u16, minor: u16, supported: u16 },

    #[error("artifact truncated at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unknown {field} ordinal {value}")]
    UnknownOrdinal { field: &'static str, value: u8 },

    #[error("dictionary entry of {len} bytes exceeds the 65535 byte limit")]
    DictionaryEntryTooLong { len: usize },

    #[error("dictionary entry {id} is not valid UTF-8")]
    InvalidUtf8 { id: i32 },

    #[error("dictionary id {id} is not defined")]
    UnknownDictionaryId { id: i32 },

    #[error("malformed cell '{value}' at data row {row}, column '{column}': {reason}")]
    MalformedCell {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("invalid integer '{value}'")]
    InvalidInteger { value: String },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("set at row {row} has {len} members; at most 65535 are supported")]
    SetTooLarge { row: usize, len: usize },

    #[error("column '{column}' is recorded with role {role:?}, which operator {operator} does not take")]
    RoleMismatch {
        column: String,
        operator: Operator,
        role: ColumnRole,
    },

    #[error("{section} section offset {offset} lies outside the {len} byte artifact")]
    SectionOffset {
        section: &'static str,
        offset: u32,
        len: usize,
    },

    #[error("rule order position {position} names row {index} but the artifact has {row_count} rows")]
    RuleOrderIndexOutOfRange {
        position: usize,
        index: u32,
        row_count: u32,
    },

    #[error("artifact must contain exactly one RULE_ID column, found {count}")]
    RuleIdColumnCount { count: usize },

    #[error("{count} unexpected bytes after the rule order section")]
    TrailingBytes { count: usize },

    #[error("{what} count {count} does not fit a 32-bit artifact field")]
    Overflow { what: &'static str, count: usize },
}

/// Errors that can occur while compiling a decision table.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("decision table has no header row")]
    MissingHeader,

    #[error("decision table has no operator row")]
    MissingOperatorRow,

    #[error("decision table has no data rows")]
    NoDataRows,

    #[error("column {position} has an empty name")]
    EmptyColumnName { position: usize },

    #[error("header has {header} columns but the operator row has {operators}")]
    ColumnCountMismatch { header: usize, operators: usize },

    #[error("data row {row} has {actual} cells but the header declares {expected} columns")]
    RowTooWide {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unknown operator '{token}' for column '{column}'")]
    UnknownOperator { column: String, token: String },

    #[error("no RULE_ID column defined; exactly one is required")]
    MissingRuleId,

    #[error("duplicate RULE_ID columns '{first}' and '{second}'")]
    DuplicateRuleId { first: String, second: String },

    #[error("column '{column}' is not declared in the schema")]
    ColumnNotInSchema { column: String },

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Errors returned when a loaded ruleset is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("no matching rule found for input")]
    NoMatch,

    #[error("rule at row {row} has no RULE_ID")]
    MissingRuleId { row: usize },

    #[error("column '{column}' expects {expected}, got {found}")]
    TypeCoercion {
        column: String,
        expected: ColumnType,
        found: &'static str,
    },
}

/// Errors returned while loading an artifact into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("I/O error while loading artifact: {0}")]
    Io(#[from] std::io::Error),
}
