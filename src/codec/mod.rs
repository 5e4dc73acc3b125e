//! Column block codecs.
//!
//! Every column's data is stored as one self-describing block whose layout
//! follows from the column operator: scalar, range, or set. Blocks start
//! with a presence bitmap; a blank cell places no condition on its row.

mod bytes;
pub(crate) mod cell;
mod presence;
mod range;
mod scalar;
mod set;
mod value;

pub use bytes::ByteReader;
pub use presence::PresenceBitmap;
pub use range::RangeColumn;
pub use scalar::ScalarColumn;
pub use set::SetColumn;
pub use value::{decode_value, encode_value, epoch_days, from_epoch_days, parse_date};

use crate::types::{ColumnCodec, FormatError, RangeOp, ScalarOp, SetOp};

/// A decoded column block together with the comparison it performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnBlock {
    Scalar(ScalarOp, ScalarColumn),
    Range(RangeOp, RangeColumn),
    Set(SetOp, SetColumn),
}

impl ColumnBlock {
    /// Decode the block for a column using `codec`, spanning `rows` rows.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] if the block runs past the input.
    pub fn decode(
        codec: ColumnCodec,
        reader: &mut ByteReader<'_>,
        rows: usize,
    ) -> Result<Self, FormatError> {
        Ok(match codec {
            ColumnCodec::Scalar(op) => ColumnBlock::Scalar(op, ScalarColumn::decode(reader, rows)?),
            ColumnCodec::Range(op) => ColumnBlock::Range(op, RangeColumn::decode(reader, rows)?),
            ColumnCodec::Set(op) => ColumnBlock::Set(op, SetColumn::decode(reader, rows)?),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            ColumnBlock::Scalar(_, c) => c.encode(out),
            ColumnBlock::Range(_, c) => c.encode(out),
            ColumnBlock::Set(_, c) => c.encode(out),
        }
    }

    #[must_use]
    pub fn codec(&self) -> ColumnCodec {
        match self {
            ColumnBlock::Scalar(op, _) => ColumnCodec::Scalar(*op),
            ColumnBlock::Range(op, _) => ColumnCodec::Range(*op),
            ColumnBlock::Set(op, _) => ColumnCodec::Set(*op),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ColumnBlock::Scalar(_, c) => c.len(),
            ColumnBlock::Range(_, c) => c.len(),
            ColumnBlock::Set(_, c) => c.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_present(&self, row: usize) -> bool {
        match self {
            ColumnBlock::Scalar(_, c) => c.is_present(row),
            ColumnBlock::Range(_, c) => c.is_present(row),
            ColumnBlock::Set(_, c) => c.is_present(row),
        }
    }

    /// Whether the cell at `row` accepts `input`. Blank cells accept everything.
    #[must_use]
    pub fn matches(&self, row: usize, input: i32) -> bool {
        match self {
            ColumnBlock::Scalar(op, c) => c.matches(*op, row, input),
            ColumnBlock::Range(op, c) => c.matches(*op, row, input),
            ColumnBlock::Set(op, c) => c.matches(*op, row, input),
        }
    }

    /// Stored value of a scalar cell; range and set cells have no single value.
    #[must_use]
    pub fn value(&self, row: usize) -> Option<i32> {
        match self {
            ColumnBlock::Scalar(_, c) => c.get(row),
            ColumnBlock::Range(..) | ColumnBlock::Set(..) => None,
        }
    }
}
