//! Load-time column indexes that narrow the candidate rows before
//! exact verification.

mod bitmap;
mod comparison;
mod equality;

pub use bitmap::CandidateBitmap;
pub use comparison::ComparisonIndex;
pub use equality::EqualityIndex;

use crate::codec::ColumnBlock;
use crate::types::{ColumnDefinition, Operator};

/// Index over one scalar input column.
#[derive(Debug, Clone)]
pub enum ColumnIndex {
    Equality(EqualityIndex),
    Comparison(ComparisonIndex),
}

impl ColumnIndex {
    /// Index a column when it is an active input with an `EQ`, `GT`, `GTE`,
    /// `LT`, or `LTE` operator. Everything else is left to linear verification.
    #[must_use]
    pub fn build(definition: &ColumnDefinition, block: &ColumnBlock) -> Option<Self> {
        if !definition.is_input() || definition.is_test_only() {
            return None;
        }
        let ColumnBlock::Scalar(op, column) = block else {
            return None;
        };
        match definition.operator() {
            Operator::Eq => Some(ColumnIndex::Equality(EqualityIndex::build(column))),
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
                ComparisonIndex::build(column, *op).map(ColumnIndex::Comparison)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn candidates(&self, input: i32) -> CandidateBitmap {
        match self {
            ColumnIndex::Equality(index) => index.candidates(input),
            ColumnIndex::Comparison(index) => index.candidates(input),
        }
    }

    #[must_use]
    pub fn memory_size_bytes(&self) -> usize {
        match self {
            ColumnIndex::Equality(index) => index.memory_size_bytes(),
            ColumnIndex::Comparison(index) => index.memory_size_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{RangeColumn, ScalarColumn};
    use crate::types::{ColumnRole, ColumnType, RangeOp, ScalarOp};

    fn definition(name: &str, operator: Operator, flags: u8) -> ColumnDefinition {
        ColumnDefinition {
            name: name.into(),
            name_id: 1,
            operator,
            column_type: ColumnType::Integer,
            role: operator.role(),
            flags,
            data_offset: 0,
        }
    }

    fn scalar(op: ScalarOp) -> ColumnBlock {
        ColumnBlock::Scalar(op, ScalarColumn::from_cells(&[Some(1), None]))
    }

    #[test]
    fn indexes_eq_and_ordering_inputs() {
        let eq = ColumnIndex::build(&definition("A", Operator::Eq, 0), &scalar(ScalarOp::Eq));
        assert!(matches!(eq, Some(ColumnIndex::Equality(_))));
        let gte = ColumnIndex::build(&definition("A", Operator::Gte, 0), &scalar(ScalarOp::Gte));
        assert!(matches!(gte, Some(ColumnIndex::Comparison(_))));
    }

    #[test]
    fn skips_ne_outputs_metadata_and_test_columns() {
        assert!(ColumnIndex::build(&definition("A", Operator::Ne, 0), &scalar(ScalarOp::Ne)).is_none());
        assert!(ColumnIndex::build(&definition("OUT", Operator::Set, 0), &scalar(ScalarOp::Eq)).is_none());
        assert!(ColumnIndex::build(&definition("ID", Operator::RuleId, 0), &scalar(ScalarOp::Eq)).is_none());
        assert!(ColumnIndex::build(
            &definition("TEST_A", Operator::Eq, ColumnDefinition::FLAG_TEST_ONLY),
            &scalar(ScalarOp::Eq)
        )
        .is_none());
    }

    #[test]
    fn skips_range_columns() {
        let block = ColumnBlock::Range(
            RangeOp::BetweenInclusive,
            RangeColumn::from_cells(&[Some((1, 2))]),
        );
        assert!(ColumnIndex::build(&definition("A", Operator::BetweenInclusive, 0), &block).is_none());
    }

    #[test]
    fn candidates_include_blank_rows() {
        let index = ColumnIndex::build(&definition("A", Operator::Eq, 0), &scalar(ScalarOp::Eq)).unwrap();
        assert_eq!(index.candidates(1).iter().collect::<Vec<_>>(), [0, 1]);
        assert_eq!(index.candidates(2).iter().collect::<Vec<_>>(), [1]);
    }
}
