use std::fmt;
use std::path::Path;

use super::column::ColumnDefinition;
use super::error::{EvaluationError, FormatError, LoadError};
use super::evaluation_report::EvaluationReport;
use super::input::DecisionInput;
use super::metadata::RulesetMetadata;
use super::options::{CompileOptions, LoadOptions, Residency};
use super::output::{BulkResult, DecisionOutput};
use super::table::DecisionTable;
use crate::codec::ColumnBlock;
use crate::dictionary::ValueDictionary;
use crate::index::ColumnIndex;
use crate::storage::Storage;

/// Artifact bytes produced by [`compile`](crate::compile()).
#[derive(Clone)]
pub struct CompiledRuleset {
    bytes: Vec<u8>,
    metadata: RulesetMetadata,
    fingerprint: [u8; 32],
}

impl CompiledRuleset {
    pub(crate) fn new(bytes: Vec<u8>, metadata: RulesetMetadata) -> Self {
        let fingerprint = *blake3::hash(&bytes).as_bytes();
        Self {
            bytes,
            metadata,
            fingerprint,
        }
    }

    /// Wrap artifact bytes obtained elsewhere, recovering metadata from them.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the bytes are not a valid artifact.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FormatError> {
        let decoded = crate::artifact::read(&bytes)?;
        let metadata = crate::load::metadata(&decoded);
        Ok(Self::new(bytes, metadata))
    }

    /// Read an artifact file written by [`write_to_file`](Self::write_to_file).
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] on I/O failure or an invalid artifact.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(bytes)?)
    }

    /// # Errors
    ///
    /// Returns any I/O error from writing the file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn metadata(&self) -> &RulesetMetadata {
        &self.metadata
    }

    /// BLAKE3 digest of the artifact bytes.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        self.fingerprint
    }

    /// Load these bytes for evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the artifact is invalid or storage cannot be mapped.
    pub fn load(&self, options: &LoadOptions) -> Result<LoadedRuleset, LoadError> {
        LoadedRuleset::load(&self.bytes, options)
    }
}

impl fmt::Debug for CompiledRuleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRuleset")
            .field("bytes", &self.bytes.len())
            .field("metadata", &self.metadata)
            .field("fingerprint", &blake3::Hash::from(self.fingerprint).to_hex())
            .finish()
    }
}

/// An artifact decoded and ready for evaluation.
///
/// Immutable after load and safe to share across threads behind `Arc`.
///
/// # Example
///
/// ```
/// use kisoku::{
///     compile, ColumnType, CompileOptions, DecisionInput, DecisionTable, LoadOptions,
///     LoadedRuleset, Schema,
/// };
///
/// let table = DecisionTable::new(
///     ["RULE_ID", "AGE", "DISCOUNT"],
///     ["RULE_ID", "GTE", "SET"],
///     [["ADULT", "18", "0.10"], ["DEFAULT", "", "0.00"]],
/// );
/// let schema = Schema::default()
///     .column("AGE", ColumnType::Integer)
///     .column("DISCOUNT", ColumnType::Decimal);
/// let compiled = compile(&table, &CompileOptions::production(schema)).unwrap();
/// let ruleset = LoadedRuleset::load(compiled.bytes(), &LoadOptions::on_heap()).unwrap();
///
/// let out = ruleset.evaluate(&DecisionInput::new().set("AGE", 30_i64)).unwrap();
/// assert_eq!(out.rule_id(), "ADULT");
/// ```
pub struct LoadedRuleset {
    pub(crate) storage: Storage,
    pub(crate) metadata: RulesetMetadata,
    pub(crate) fingerprint: [u8; 32],
    pub(crate) dictionary: ValueDictionary,
    pub(crate) columns: Vec<ColumnDefinition>,
    pub(crate) blocks: Vec<ColumnBlock>,
    /// Physical row indices in evaluation order.
    pub(crate) rule_order: Vec<usize>,
    /// One slot per column; `None` when indexes were not built or none apply.
    pub(crate) indexes: Option<Vec<Option<ColumnIndex>>>,
    /// Input columns that take part in matching.
    pub(crate) input_columns: Vec<usize>,
    /// Output columns returned on a match.
    pub(crate) output_columns: Vec<usize>,
    pub(crate) rule_id_column: usize,
}

impl LoadedRuleset {
    /// Decode and validate `bytes`, copying them into storage of the requested residency.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Format`] for an invalid artifact, or
    /// [`LoadError::Io`] if off-heap storage cannot be mapped.
    pub fn load(bytes: &[u8], options: &LoadOptions) -> Result<Self, LoadError> {
        crate::load::load(bytes, options)
    }

    /// # Errors
    ///
    /// Returns [`LoadError`] on I/O failure or an invalid artifact.
    pub fn load_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes, options)
    }

    /// Compile a table and load the result in one step.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error`] from either stage.
    pub fn from_table(
        table: &DecisionTable,
        compile_options: &CompileOptions,
        load_options: &LoadOptions,
    ) -> Result<Self, crate::Error> {
        let compiled = crate::compile::compile(table, compile_options)?;
        Ok(Self::load(compiled.bytes(), load_options)?)
    }

    /// Find the first rule, in evaluation order, matching `input`.
    ///
    /// Uses index intersection when indexes were built.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::NoMatch`] when no rule matches, or
    /// [`EvaluationError::TypeCoercion`] when an input value has the wrong type.
    pub fn evaluate(&self, input: &DecisionInput) -> Result<DecisionOutput, EvaluationError> {
        crate::evaluate::evaluate(self, input, true)
    }

    /// Like [`evaluate`](Self::evaluate) but always scans every row in order.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate).
    pub fn evaluate_linear(&self, input: &DecisionInput) -> Result<DecisionOutput, EvaluationError> {
        crate::evaluate::evaluate(self, input, false)
    }

    /// Evaluate with diagnostics.
    pub fn evaluate_detailed(&self, input: &DecisionInput) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(self, input)
    }

    /// Evaluate `base` merged with each variant, in request order.
    ///
    /// Variant values override base values. A failing variant does not stop
    /// the others.
    #[must_use]
    pub fn evaluate_bulk(&self, base: &DecisionInput, variants: &[DecisionInput]) -> BulkResult {
        crate::evaluate::evaluate_bulk(self, base, variants)
    }

    #[must_use]
    pub fn metadata(&self) -> &RulesetMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rule_order.len()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    #[must_use]
    pub fn dictionary(&self) -> &ValueDictionary {
        &self.dictionary
    }

    /// BLAKE3 digest of the artifact bytes.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        self.fingerprint
    }

    #[must_use]
    pub fn residency(&self) -> Residency {
        self.storage.residency()
    }

    /// The artifact bytes as held in storage.
    #[must_use]
    pub fn artifact(&self) -> &[u8] {
        &self.storage
    }

    /// An owned copy of the artifact bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.storage.to_vec()
    }

    /// Number of columns with an index.
    #[must_use]
    pub fn indexed_columns(&self) -> usize {
        self.indexes
            .as_ref()
            .map_or(0, |indexes| indexes.iter().flatten().count())
    }

    /// Approximate heap bytes held by column indexes.
    #[must_use]
    pub fn index_memory_bytes(&self) -> usize {
        self.indexes.as_ref().map_or(0, |indexes| {
            indexes
                .iter()
                .flatten()
                .map(ColumnIndex::memory_size_bytes)
                .sum()
        })
    }
}

impl fmt::Debug for LoadedRuleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedRuleset")
            .field("residency", &self.residency())
            .field("metadata", &self.metadata)
            .field("indexed_columns", &self.indexed_columns())
            .finish_non_exhaustive()
    }
}
