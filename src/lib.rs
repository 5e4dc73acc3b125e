//! Compiles tabular decision rules into a compact columnar artifact and
//! evaluates inputs against it.
//!
//! A [`DecisionTable`] is compiled with [`compile()`] into a
//! [`CompiledRuleset`], whose bytes can be stored or shipped. Loading them
//! yields a [`LoadedRuleset`] that answers [`evaluate`](LoadedRuleset::evaluate)
//! calls with the first matching rule in evaluation order.

mod artifact;
pub mod codec;
mod coerce;
mod compile;
mod dictionary;
mod error;
mod evaluate;
pub mod index;
mod load;
mod storage;
mod types;

pub use dictionary::ValueDictionary;
pub use error::Error;
pub use types::{
    ArtifactKind, BulkResult, ColumnCodec, ColumnDefinition, ColumnRole, ColumnSchema, ColumnType,
    CompileError, CompileOptions, CompiledRuleset, DecisionInput, DecisionOutput, DecisionTable,
    EvaluationError, EvaluationReport, FormatError, LoadError, LoadOptions, LoadedRuleset,
    Operator, RangeOp, Residency, RuleSelectionPolicy, RulesetMetadata, ScalarOp, Schema, SetOp,
    Value,
};

/// Compile a decision table into artifact bytes.
///
/// Rows are stored in evaluation order: descending priority when a priority
/// column is present and the selection policy allows it, source order
/// otherwise.
///
/// # Errors
///
/// Returns [`CompileError`] when the table is malformed, a column is missing
/// from the schema, or a cell cannot be encoded for its column type.
pub fn compile(
    table: &DecisionTable,
    options: &CompileOptions,
) -> Result<CompiledRuleset, CompileError> {
    compile::compile(table, options)
}
