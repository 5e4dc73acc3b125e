use super::bytes::ByteReader;
use super::presence::PresenceBitmap;
use crate::types::{FormatError, RangeOp};

/// An inclusive-or-exclusive `(min, max)` pair per row.
///
/// Layout: presence bitmap, `rows` minimums, then `rows` maximums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeColumn {
    presence: PresenceBitmap,
    mins: Vec<i32>,
    maxs: Vec<i32>,
}

impl RangeColumn {
    #[must_use]
    pub fn from_cells(cells: &[Option<(i32, i32)>]) -> Self {
        Self {
            presence: PresenceBitmap::from_flags(cells.iter().map(Option::is_some)),
            mins: cells.iter().map(|c| c.map_or(0, |(min, _)| min)).collect(),
            maxs: cells.iter().map(|c| c.map_or(0, |(_, max)| max)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mins.is_empty()
    }

    #[must_use]
    pub fn is_present(&self, row: usize) -> bool {
        self.presence.is_present(row)
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<(i32, i32)> {
        if !self.is_present(row) {
            return None;
        }
        Some((*self.mins.get(row)?, *self.maxs.get(row)?))
    }

    #[must_use]
    pub fn matches(&self, op: RangeOp, row: usize, input: i32) -> bool {
        self.get(row)
            .is_none_or(|(min, max)| op.test(min, max, input))
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        self.presence.encode(out);
        for v in self.mins.iter().chain(&self.maxs) {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>, rows: usize) -> Result<Self, FormatError> {
        reader.ensure(PresenceBitmap::byte_len(rows).saturating_add(rows.saturating_mul(8)))?;
        let presence = PresenceBitmap::decode(reader, rows)?;
        let mins = (0..rows)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>, _>>()?;
        let maxs = (0..rows)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            presence,
            mins,
            maxs,
        })
    }
}
