mod column;
mod error;
mod evaluation_report;
mod input;
mod metadata;
mod operator;
mod options;
mod output;
mod ruleset;
mod schema;
mod table;
mod value;

pub use column::{ColumnDefinition, ColumnRole, ColumnType};
pub use error::{CompileError, EvaluationError, FormatError, LoadError};
pub use evaluation_report::EvaluationReport;
pub use input::DecisionInput;
pub use metadata::RulesetMetadata;
pub use operator::{ColumnCodec, Operator, RangeOp, ScalarOp, SetOp};
pub use options::{ArtifactKind, CompileOptions, LoadOptions, Residency, RuleSelectionPolicy};
pub use output::{BulkResult, DecisionOutput};
pub use ruleset::{CompiledRuleset, LoadedRuleset};
pub use schema::{ColumnSchema, Schema};
pub use table::DecisionTable;
pub use value::Value;
