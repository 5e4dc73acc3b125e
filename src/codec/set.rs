use super::bytes::ByteReader;
use super::presence::PresenceBitmap;
use crate::types::{FormatError, SetOp};

/// A variable-length member list per row.
///
/// Layout: presence bitmap, `rows` u32 offsets into the member array, `rows`
/// u16 lengths, then every member as `i32`. Blank rows have length 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetColumn {
    presence: PresenceBitmap,
    offsets: Vec<u32>,
    lengths: Vec<u16>,
    members: Vec<i32>,
}

impl SetColumn {
    /// # Errors
    ///
    /// Returns [`FormatError::SetTooLarge`] when a row holds more than 65535
    /// members.
    pub fn from_cells<S: AsRef<[i32]>>(cells: &[Option<S>]) -> Result<Self, FormatError> {
        let mut offsets = Vec::with_capacity(cells.len());
        let mut lengths = Vec::with_capacity(cells.len());
        let mut members = Vec::new();
        for (row, cell) in cells.iter().enumerate() {
            let cell = cell.as_ref().map_or(&[][..], AsRef::as_ref);
            let offset = u32::try_from(members.len()).map_err(|_| FormatError::Overflow {
                what: "set member",
                count: members.len(),
            })?;
            let len = u16::try_from(cell.len()).map_err(|_| FormatError::SetTooLarge {
                row,
                len: cell.len(),
            })?;
            offsets.push(offset);
            lengths.push(len);
            members.extend_from_slice(cell);
        }
        Ok(Self {
            presence: PresenceBitmap::from_flags(cells.iter().map(Option::is_some)),
            offsets,
            lengths,
            members,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    #[must_use]
    pub fn is_present(&self, row: usize) -> bool {
        self.presence.is_present(row)
    }

    /// Members of a non-blank row. A present row may hold an empty set.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&[i32]> {
        if !self.is_present(row) {
            return None;
        }
        let start = *self.offsets.get(row)? as usize;
        let len = usize::from(*self.lengths.get(row)?);
        self.members.get(start..start + len)
    }

    #[must_use]
    pub fn matches(&self, op: SetOp, row: usize, input: i32) -> bool {
        self.get(row).is_none_or(|members| op.test(members, input))
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        self.presence.encode(out);
        for offset in &self.offsets {
            out.extend_from_slice(&offset.to_be_bytes());
        }
        for len in &self.lengths {
            out.extend_from_slice(&len.to_be_bytes());
        }
        for member in &self.members {
            out.extend_from_slice(&member.to_be_bytes());
        }
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>, rows: usize) -> Result<Self, FormatError> {
        reader.ensure(PresenceBitmap::byte_len(rows).saturating_add(rows.saturating_mul(6)))?;
        let presence = PresenceBitmap::decode(reader, rows)?;
        let offsets = (0..rows)
            .map(|_| reader.read_u32())
            .collect::<Result<Vec<_>, _>>()?;
        let lengths = (0..rows)
            .map(|_| reader.read_u16())
            .collect::<Result<Vec<_>, _>>()?;
        let total = offsets
            .iter()
            .zip(&lengths)
            .map(|(&o, &l)| o as usize + usize::from(l))
            .max()
            .unwrap_or(0);
        reader.ensure(total.saturating_mul(4))?;
        let members = (0..total)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            presence,
            offsets,
            lengths,
            members,
        })
    }
}
