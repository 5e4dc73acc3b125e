use super::{Header, OrderType, COLUMN_DEFINITION_SIZE, HEADER_SIZE, VERSION_MINOR};
use crate::codec::ColumnBlock;
use crate::dictionary::ValueDictionary;
use crate::types::{ArtifactKind, ColumnDefinition, FormatError, RuleSelectionPolicy};

/// Everything needed to lay out one artifact.
///
/// `columns` and `blocks` run in parallel; each definition's `data_offset`
/// is ignored and recomputed from the encoded blocks.
pub(crate) struct ArtifactParts<'a> {
    pub(crate) artifact_kind: ArtifactKind,
    pub(crate) rule_selection: RuleSelectionPolicy,
    pub(crate) row_count: usize,
    pub(crate) dictionary: &'a ValueDictionary,
    pub(crate) columns: &'a [ColumnDefinition],
    pub(crate) blocks: &'a [ColumnBlock],
    pub(crate) order_type: OrderType,
    pub(crate) rule_order: &'a [u32],
}

fn to_u32(what: &'static str, count: usize) -> Result<u32, FormatError> {
    u32::try_from(count).map_err(|_| FormatError::Overflow { what, count })
}

pub(crate) fn write(parts: &ArtifactParts<'_>) -> Result<Vec<u8>, FormatError> {
    let mut dictionary = Vec::new();
    parts.dictionary.write_to(&mut dictionary)?;

    let mut data = Vec::new();
    let mut data_offsets = Vec::with_capacity(parts.blocks.len());
    for block in parts.blocks {
        data_offsets.push(to_u32("data byte", data.len())?);
        block.encode(&mut data);
    }

    let columns_offset = HEADER_SIZE + dictionary.len();
    let data_offset = columns_offset + parts.columns.len() * COLUMN_DEFINITION_SIZE;
    let header = Header {
        version_minor: VERSION_MINOR,
        artifact_kind: parts.artifact_kind,
        rule_selection: parts.rule_selection,
        column_count: to_u32("column", parts.columns.len())?,
        row_count: to_u32("row", parts.row_count)?,
        dictionary_offset: to_u32("artifact byte", HEADER_SIZE)?,
        columns_offset: to_u32("artifact byte", columns_offset)?,
        data_offset: to_u32("artifact byte", data_offset)?,
    };

    let order_len = 1 + parts.rule_order.len() * 4;
    let mut out = Vec::with_capacity(data_offset + data.len() + order_len);
    header.write(&mut out);
    out.extend_from_slice(&dictionary);
    for (def, offset) in parts.columns.iter().zip(&data_offsets) {
        out.extend_from_slice(&def.name_id.to_be_bytes());
        out.push(def.operator.ordinal());
        out.push(def.column_type.ordinal());
        out.push(def.role.ordinal());
        out.push(def.flags);
        out.extend_from_slice(&offset.to_be_bytes());
    }
    out.extend_from_slice(&data);
    out.push(parts.order_type.ordinal());
    for index in parts.rule_order {
        out.extend_from_slice(&index.to_be_bytes());
    }
    Ok(out)
}
