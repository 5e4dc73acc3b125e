use super::bytes::ByteReader;
use super::presence::PresenceBitmap;
use crate::types::{FormatError, ScalarOp};

/// One 4-byte value per row.
///
/// Layout: presence bitmap, then `rows` big-endian `i32` values. Blank rows
/// store 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarColumn {
    presence: PresenceBitmap,
    values: Vec<i32>,
}

impl ScalarColumn {
    #[must_use]
    pub fn from_cells(cells: &[Option<i32>]) -> Self {
        Self {
            presence: PresenceBitmap::from_flags(cells.iter().map(Option::is_some)),
            values: cells.iter().map(|c| c.unwrap_or(0)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn is_present(&self, row: usize) -> bool {
        self.presence.is_present(row)
    }

    /// The stored value, or `None` for a blank row.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<i32> {
        if self.is_present(row) {
            self.values.get(row).copied()
        } else {
            None
        }
    }

    /// Raw stored values, 0 for blank rows.
    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Blank rows match every input.
    #[must_use]
    pub fn matches(&self, op: ScalarOp, row: usize, input: i32) -> bool {
        self.get(row).is_none_or(|stored| op.test(stored, input))
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        self.presence.encode(out);
        for v in &self.values {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>, rows: usize) -> Result<Self, FormatError> {
        reader.ensure(PresenceBitmap::byte_len(rows).saturating_add(rows.saturating_mul(4)))?;
        let presence = PresenceBitmap::decode(reader, rows)?;
        let values = (0..rows)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { presence, values })
    }
}
