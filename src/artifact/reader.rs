use tracing::trace;

use super::{Header, OrderType, COLUMN_DEFINITION_SIZE};
use crate::codec::{ByteReader, ColumnBlock};
use crate::dictionary::ValueDictionary;
use crate::types::{ColumnDefinition, ColumnRole, ColumnType, FormatError, Operator};

/// A fully decoded artifact.
#[derive(Debug, Clone)]
pub(crate) struct DecodedArtifact {
    pub(crate) header: Header,
    pub(crate) dictionary: ValueDictionary,
    pub(crate) columns: Vec<ColumnDefinition>,
    pub(crate) blocks: Vec<ColumnBlock>,
    pub(crate) order_type: OrderType,
    pub(crate) rule_order: Vec<u32>,
}

fn seek_section(
    reader: &mut ByteReader<'_>,
    section: &'static str,
    offset: u32,
) -> Result<(), FormatError> {
    reader
        .seek(offset as usize)
        .map_err(|_| FormatError::SectionOffset {
            section,
            offset,
            len: reader.len(),
        })
}

fn read_definition(
    reader: &mut ByteReader<'_>,
    dictionary: &ValueDictionary,
) -> Result<ColumnDefinition, FormatError> {
    let name_id = reader.read_i32()?;
    let operator = Operator::from_ordinal(reader.read_u8()?)?;
    let column_type = ColumnType::from_ordinal(reader.read_u8()?)?;
    let role = ColumnRole::from_ordinal(reader.read_u8()?)?;
    let flags = reader.read_u8()?;
    let data_offset = reader.read_u32()?;
    let name = dictionary
        .resolve(name_id)
        .ok_or(FormatError::UnknownDictionaryId { id: name_id })?
        .to_owned();
    if role != operator.role() {
        return Err(FormatError::RoleMismatch {
            column: name,
            operator,
            role,
        });
    }
    Ok(ColumnDefinition {
        name,
        name_id,
        operator,
        column_type,
        role,
        flags,
        data_offset,
    })
}

/// Decode and validate an artifact.
///
/// The data section is walked sequentially in column order. Recorded column
/// offsets are advisory: a writer may leave them as zero placeholders.
#[allow(clippy::cast_possible_truncation)] // offsets were bounds-checked against a u32 header field
pub(crate) fn read(bytes: &[u8]) -> Result<DecodedArtifact, FormatError> {
    let mut reader = ByteReader::new(bytes);
    let header = Header::read(&mut reader)?;

    seek_section(&mut reader, "dictionary", header.dictionary_offset)?;
    let dictionary = ValueDictionary::read_from(&mut reader)?;

    seek_section(&mut reader, "column", header.columns_offset)?;
    let column_count = header.column_count as usize;
    reader.ensure(column_count.saturating_mul(COLUMN_DEFINITION_SIZE))?;
    let columns = (0..column_count)
        .map(|_| read_definition(&mut reader, &dictionary))
        .collect::<Result<Vec<_>, _>>()?;

    let rule_ids = columns
        .iter()
        .filter(|c| c.operator == Operator::RuleId)
        .count();
    if rule_ids != 1 {
        return Err(FormatError::RuleIdColumnCount { count: rule_ids });
    }

    seek_section(&mut reader, "data", header.data_offset)?;
    let data_start = reader.position();
    let rows = header.row_count as usize;
    let mut blocks = Vec::with_capacity(columns.len());
    for def in &columns {
        let actual = (reader.position() - data_start) as u32;
        if def.data_offset != actual {
            trace!(
                column = %def.name,
                recorded = def.data_offset,
                actual,
                "ignoring recorded column offset"
            );
        }
        blocks.push(ColumnBlock::decode(def.operator.codec(), &mut reader, rows)?);
    }

    let order_type = OrderType::from_ordinal(reader.read_u8()?)?;
    reader.ensure(rows.saturating_mul(4))?;
    let rule_order = (0..rows)
        .map(|position| {
            let index = reader.read_u32()?;
            if index >= header.row_count {
                return Err(FormatError::RuleOrderIndexOutOfRange {
                    position,
                    index,
                    row_count: header.row_count,
                });
            }
            Ok(index)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if reader.remaining() != 0 {
        return Err(FormatError::TrailingBytes {
            count: reader.remaining(),
        });
    }

    Ok(DecodedArtifact {
        header,
        dictionary,
        columns,
        blocks,
        order_type,
        rule_order,
    })
}

#[cfg(test)]
mod tests {
    use super::super::{write, ArtifactParts, HEADER_SIZE};
    use super::*;
    use crate::codec::{ScalarColumn, SetColumn};
    use crate::types::{ArtifactKind, RuleSelectionPolicy, ScalarOp, SetOp};

    fn definition(dictionary: &mut ValueDictionary, name: &str, operator: Operator) -> ColumnDefinition {
        ColumnDefinition {
            name: name.into(),
            name_id: dictionary.add(name),
            operator,
            column_type: ColumnType::String,
            role: operator.role(),
            flags: 0,
            data_offset: 0,
        }
    }

    fn sample() -> Vec<u8> {
        let mut dictionary = ValueDictionary::new();
        let columns = vec![
            definition(&mut dictionary, "RULE_ID", Operator::RuleId),
            definition(&mut dictionary, "REGION", Operator::In),
        ];
        let r1 = dictionary.add("R1");
        let r2 = dictionary.add("R2");
        let emea = dictionary.add("EMEA");
        let blocks = vec![
            ColumnBlock::Scalar(ScalarOp::Eq, ScalarColumn::from_cells(&[Some(r1), Some(r2)])),
            ColumnBlock::Set(
                SetOp::In,
                SetColumn::from_cells(&[Some(vec![emea]), None]).unwrap(),
            ),
        ];
        write(&ArtifactParts {
            artifact_kind: ArtifactKind::Production,
            rule_selection: RuleSelectionPolicy::Auto,
            row_count: 2,
            dictionary: &dictionary,
            columns: &columns,
            blocks: &blocks,
            order_type: OrderType::Insertion,
            rule_order: &[0, 1],
        })
        .unwrap()
    }

    #[test]
    fn round_trip() {
        let bytes = sample();
        let artifact = read(&bytes).unwrap();
        assert_eq!(artifact.header.row_count, 2);
        assert_eq!(artifact.header.dictionary_offset as usize, HEADER_SIZE);
        assert_eq!(artifact.columns[1].name(), "REGION");
        assert_eq!(artifact.columns[1].role(), ColumnRole::Input);
        assert_eq!(artifact.columns[0].data_offset(), 0);
        assert_eq!(artifact.columns[1].data_offset(), 9);
        assert_eq!(artifact.rule_order, [0, 1]);
        assert!(artifact.blocks[1].matches(0, artifact.dictionary.get("EMEA")));
        assert!(!artifact.blocks[1].matches(0, artifact.dictionary.get("APAC")));
    }

    #[test]
    fn every_truncation_is_an_error() {
        let bytes = sample();
        for len in 0..bytes.len() {
            assert!(read(&bytes[..len]).is_err(), "prefix of {len} bytes decoded");
        }
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = sample();
        bytes.push(0);
        assert_eq!(read(&bytes).unwrap_err(), FormatError::TrailingBytes { count: 1 });
    }

    #[test]
    fn zeroed_column_offsets_still_decode() {
        let bytes = sample();
        let artifact = read(&bytes).unwrap();
        let mut zeroed = bytes.clone();
        for column in 0..artifact.columns.len() {
            let field =
                artifact.header.columns_offset as usize + column * COLUMN_DEFINITION_SIZE + 8;
            zeroed[field..field + 4].copy_from_slice(&[0; 4]);
        }
        let decoded = read(&zeroed).unwrap();
        assert_eq!(decoded.columns[1].data_offset(), 0);
        assert_eq!(decoded.blocks, artifact.blocks);
        assert_eq!(decoded.rule_order, artifact.rule_order);
    }

    #[test]
    fn role_must_follow_operator() {
        let bytes = sample();
        let artifact = read(&bytes).unwrap();
        let mut corrupted = bytes.clone();
        // role byte of the REGION definition
        let field = artifact.header.columns_offset as usize + COLUMN_DEFINITION_SIZE + 6;
        corrupted[field] = ColumnRole::Output.ordinal();
        assert_eq!(
            read(&corrupted).unwrap_err(),
            FormatError::RoleMismatch {
                column: "REGION".into(),
                operator: Operator::In,
                role: ColumnRole::Output,
            }
        );
    }

    #[test]
    fn rule_order_index_out_of_range() {
        let mut bytes = sample();
        let last = bytes.len() - 1;
        bytes[last] = 7;
        assert_eq!(
            read(&bytes).unwrap_err(),
            FormatError::RuleOrderIndexOutOfRange {
                position: 1,
                index: 7,
                row_count: 2
            }
        );
    }

    #[test]
    fn section_offset_past_end() {
        let mut bytes = sample();
        bytes[28..32].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            read(&bytes).unwrap_err(),
            FormatError::SectionOffset { section: "data", .. }
        ));
    }

    #[test]
    fn unknown_operator_ordinal() {
        let bytes = sample();
        let artifact = read(&bytes).unwrap();
        let mut corrupted = bytes.clone();
        corrupted[artifact.header.columns_offset as usize + 4] = 99;
        assert_eq!(
            read(&corrupted).unwrap_err(),
            FormatError::UnknownOrdinal {
                field: "operator",
                value: 99
            }
        );
    }
}
