use std::cmp::Reverse;

use tracing::{debug, warn};

use crate::artifact::{self, ArtifactParts, OrderType};
use crate::codec::cell::{self, CellError};
use crate::codec::{ColumnBlock, RangeColumn, ScalarColumn, SetColumn};
use crate::dictionary::ValueDictionary;
use crate::types::{
    ColumnCodec, ColumnDefinition, ColumnType, CompileError, CompileOptions, CompiledRuleset,
    DecisionTable, FormatError, Operator, RangeOp, RuleSelectionPolicy, RulesetMetadata,
    ScalarOp, SetOp,
};

/// Parsed cells of one column, in source row order.
enum PendingColumn {
    Scalar(ScalarOp, Vec<Option<i32>>),
    Range(RangeOp, Vec<Option<(i32, i32)>>),
    Set(SetOp, Vec<Option<Vec<i32>>>),
}

impl PendingColumn {
    fn new(codec: ColumnCodec, rows: usize) -> Self {
        match codec {
            ColumnCodec::Scalar(op) => PendingColumn::Scalar(op, Vec::with_capacity(rows)),
            ColumnCodec::Range(op) => PendingColumn::Range(op, Vec::with_capacity(rows)),
            ColumnCodec::Set(op) => PendingColumn::Set(op, Vec::with_capacity(rows)),
        }
    }

    fn push(
        &mut self,
        column_type: ColumnType,
        raw: &str,
        dictionary: &mut ValueDictionary,
    ) -> Result<(), CellError> {
        let blank = raw.is_empty();
        match self {
            PendingColumn::Scalar(_, cells) => cells.push(if blank {
                None
            } else {
                Some(cell::parse_scalar(column_type, raw, dictionary)?)
            }),
            PendingColumn::Range(_, cells) => cells.push(if blank {
                None
            } else {
                Some(cell::parse_range(column_type, raw, dictionary)?)
            }),
            PendingColumn::Set(_, cells) => cells.push(if blank {
                None
            } else {
                Some(cell::parse_set(column_type, raw, dictionary)?)
            }),
        }
        Ok(())
    }

    /// Priority of every row; blank cells sort as 0.
    fn priorities(&self) -> Option<Vec<i32>> {
        match self {
            PendingColumn::Scalar(_, cells) => Some(cells.iter().map(|c| c.unwrap_or(0)).collect()),
            PendingColumn::Range(..) | PendingColumn::Set(..) => None,
        }
    }

    /// Encode the cells with rows rearranged into `order`.
    fn into_block(self, order: &[usize]) -> Result<ColumnBlock, FormatError> {
        Ok(match self {
            PendingColumn::Scalar(op, cells) => {
                let cells: Vec<_> = order.iter().map(|&i| cells[i]).collect();
                ColumnBlock::Scalar(op, ScalarColumn::from_cells(&cells))
            }
            PendingColumn::Range(op, cells) => {
                let cells: Vec<_> = order.iter().map(|&i| cells[i]).collect();
                ColumnBlock::Range(op, RangeColumn::from_cells(&cells))
            }
            PendingColumn::Set(op, mut cells) => {
                let cells: Vec<_> = order.iter().map(|&i| cells[i].take()).collect();
                ColumnBlock::Set(op, SetColumn::from_cells(&cells)?)
            }
        })
    }
}

/// Resolve the header and operator row into column definitions, interning
/// every column name in `dictionary` first.
fn resolve_columns(
    table: &DecisionTable,
    options: &CompileOptions,
    dictionary: &mut ValueDictionary,
) -> Result<Vec<ColumnDefinition>, CompileError> {
    if table.header.len() != table.operators.len() {
        return Err(CompileError::ColumnCountMismatch {
            header: table.header.len(),
            operators: table.operators.len(),
        });
    }

    let mut columns = Vec::with_capacity(table.header.len());
    let mut rule_id: Option<&str> = None;
    for (position, (name, token)) in table.header.iter().zip(&table.operators).enumerate() {
        let name = name.trim();
        if name.is_empty() {
            return Err(CompileError::EmptyColumnName {
                position: position + 1,
            });
        }
        let operator =
            Operator::from_token(token).ok_or_else(|| CompileError::UnknownOperator {
                column: name.to_owned(),
                token: token.trim().to_owned(),
            })?;
        if operator == Operator::RuleId {
            if let Some(first) = rule_id {
                return Err(CompileError::DuplicateRuleId {
                    first: first.to_owned(),
                    second: name.to_owned(),
                });
            }
            rule_id = Some(name);
        }

        let (column_type, nullable) = match operator {
            Operator::RuleId => (ColumnType::String, false),
            Operator::Priority => (ColumnType::Integer, true),
            _ => {
                let declared = options.schema.get(name).ok_or_else(|| {
                    CompileError::ColumnNotInSchema {
                        column: name.to_owned(),
                    }
                })?;
                (declared.column_type, declared.nullable)
            }
        };
        let mut flags = 0;
        if nullable {
            flags |= ColumnDefinition::FLAG_NULLABLE;
        }
        if name.starts_with(ColumnDefinition::TEST_PREFIX) {
            flags |= ColumnDefinition::FLAG_TEST_ONLY;
        }

        columns.push(ColumnDefinition {
            name: name.to_owned(),
            name_id: dictionary.add(name),
            operator,
            column_type,
            role: operator.role(),
            flags,
            data_offset: 0,
        });
    }

    if rule_id.is_none() {
        return Err(CompileError::MissingRuleId);
    }
    Ok(columns)
}

/// Evaluation order of the source rows, and the priority column used if any.
fn rule_order(
    columns: &[ColumnDefinition],
    pending: &[PendingColumn],
    options: &CompileOptions,
    rows: usize,
) -> (Vec<usize>, Option<usize>) {
    let mut order: Vec<usize> = (0..rows).collect();
    let priority = columns
        .iter()
        .position(|c| c.name == options.priority_column && c.operator == Operator::Priority);

    match (options.rule_selection, priority) {
        (RuleSelectionPolicy::FirstMatch, _) | (_, None) => {
            if options.rule_selection == RuleSelectionPolicy::Priority {
                warn!(
                    column = %options.priority_column,
                    "priority selection requested but no priority column found; using insertion order"
                );
            }
            (order, None)
        }
        (RuleSelectionPolicy::Auto | RuleSelectionPolicy::Priority, Some(column)) => {
            match pending[column].priorities() {
                Some(priorities) => {
                    // stable, so equal priorities keep insertion order
                    order.sort_by_key(|&row| Reverse(priorities[row]));
                    (order, Some(column))
                }
                None => (order, None),
            }
        }
    }
}

pub(crate) fn compile(
    table: &DecisionTable,
    options: &CompileOptions,
) -> Result<CompiledRuleset, CompileError> {
    if table.header.is_empty() {
        return Err(CompileError::MissingHeader);
    }
    if table.operators.is_empty() {
        return Err(CompileError::MissingOperatorRow);
    }
    if table.rows.is_empty() {
        return Err(CompileError::NoDataRows);
    }

    let mut dictionary = ValueDictionary::new();
    let mut columns = resolve_columns(table, options, &mut dictionary)?;
    let rows = table.rows.len();

    let mut pending: Vec<PendingColumn> = columns
        .iter()
        .map(|c| PendingColumn::new(c.operator.codec(), rows))
        .collect();
    for (index, row) in table.rows.iter().enumerate() {
        if row.len() > columns.len() {
            return Err(CompileError::RowTooWide {
                row: index + 1,
                expected: columns.len(),
                actual: row.len(),
            });
        }
        for (c, column) in columns.iter().enumerate() {
            let raw = row.get(c).map_or("", |cell| cell.trim());
            pending[c]
                .push(column.column_type, raw, &mut dictionary)
                .map_err(|err| cell_error(err, index + 1, column, raw))?;
        }
    }

    let (order, priority) = rule_order(&columns, &pending, options, rows);
    let order_type = match priority {
        Some(column) => {
            columns[column].flags |= ColumnDefinition::FLAG_ORDER_KEY;
            OrderType::Priority
        }
        None => OrderType::Insertion,
    };
    let blocks = pending
        .into_iter()
        .map(|p| p.into_block(&order))
        .collect::<Result<Vec<_>, _>>()?;

    // rows are stored already sorted, so the order section is the identity
    let identity = (0..rows)
        .map(|row| u32::try_from(row).map_err(|_| FormatError::Overflow { what: "row", count: rows }))
        .collect::<Result<Vec<_>, _>>()?;

    let bytes = artifact::write(&ArtifactParts {
        artifact_kind: options.artifact_kind,
        rule_selection: options.rule_selection,
        row_count: rows,
        dictionary: &dictionary,
        columns: &columns,
        blocks: &blocks,
        order_type,
        rule_order: &identity,
    })?;

    debug!(
        rows,
        columns = columns.len(),
        dictionary_entries = dictionary.len(),
        order = ?order_type,
        bytes = bytes.len(),
        "compiled decision table"
    );

    let metadata = RulesetMetadata::from_columns(
        &columns,
        rows,
        options.artifact_kind,
        options.rule_selection,
        priority.map(|c| columns[c].name.clone()),
    );
    Ok(CompiledRuleset::new(bytes, metadata))
}

fn cell_error(err: CellError, row: usize, column: &ColumnDefinition, raw: &str) -> CompileError {
    match err {
        CellError::SetTooLarge { len } => FormatError::SetTooLarge { row, len }.into(),
        other => FormatError::MalformedCell {
            row,
            column: column.name.clone(),
            value: raw.to_owned(),
            reason: other.to_string(),
        }
        .into(),
    }
}
