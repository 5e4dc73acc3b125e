use tracing::debug;

use crate::artifact::{self, DecodedArtifact, OrderType};
use crate::index::ColumnIndex;
use crate::storage::Storage;
use crate::types::{
    ColumnDefinition, FormatError, LoadError, LoadOptions, LoadedRuleset, Operator,
    RulesetMetadata,
};

pub(crate) fn metadata(decoded: &DecodedArtifact) -> RulesetMetadata {
    let priority_column = match decoded.order_type {
        OrderType::Priority => decoded
            .columns
            .iter()
            .find(|c| c.operator == Operator::Priority && c.is_order_key())
            .map(|c| c.name.clone()),
        OrderType::Insertion => None,
    };
    RulesetMetadata::from_columns(
        &decoded.columns,
        decoded.header.row_count as usize,
        decoded.header.artifact_kind,
        decoded.header.rule_selection,
        priority_column,
    )
}

fn positions(columns: &[ColumnDefinition], keep: impl Fn(&ColumnDefinition) -> bool) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| keep(c))
        .map(|(i, _)| i)
        .collect()
}

pub(crate) fn load(bytes: &[u8], options: &LoadOptions) -> Result<LoadedRuleset, LoadError> {
    let decoded = artifact::read(bytes)?;
    let storage = Storage::copy_from(bytes, options.residency)?;
    let metadata = metadata(&decoded);
    let DecodedArtifact {
        dictionary,
        columns,
        blocks,
        rule_order,
        ..
    } = decoded;

    let rule_id_column = columns
        .iter()
        .position(|c| c.operator == Operator::RuleId)
        .ok_or(FormatError::RuleIdColumnCount { count: 0 })?;
    let input_columns = positions(&columns, |c| c.is_input() && !c.is_test_only());
    let output_columns = positions(&columns, |c| c.is_output() && !c.is_test_only());

    let indexes = if options.build_indexes {
        let built: Vec<Option<ColumnIndex>> = columns
            .iter()
            .zip(&blocks)
            .map(|(def, block)| ColumnIndex::build(def, block))
            .collect();
        built.iter().any(Option::is_some).then_some(built)
    } else {
        None
    };

    debug!(
        residency = ?storage.residency(),
        rows = metadata.row_count(),
        columns = columns.len(),
        indexed_columns = indexes.as_ref().map_or(0, |i| i.iter().flatten().count()),
        "loaded ruleset"
    );

    Ok(LoadedRuleset {
        fingerprint: *blake3::hash(bytes).as_bytes(),
        storage,
        metadata,
        dictionary,
        columns,
        blocks,
        rule_order: rule_order.into_iter().map(|r| r as usize).collect(),
        indexes,
        input_columns,
        output_columns,
        rule_id_column,
    })
}
