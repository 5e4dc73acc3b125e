use super::bytes::ByteReader;
use crate::types::FormatError;

/// One bit per row, most significant bit first, marking non-blank cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceBitmap {
    bytes: Vec<u8>,
}

impl PresenceBitmap {
    #[must_use]
    pub fn byte_len(rows: usize) -> usize {
        rows.div_ceil(8)
    }

    pub fn from_flags(flags: impl ExactSizeIterator<Item = bool>) -> Self {
        let mut bytes = vec![0u8; Self::byte_len(flags.len())];
        for (row, present) in flags.enumerate() {
            if present {
                bytes[row / 8] |= 0x80 >> (row % 8);
            }
        }
        Self { bytes }
    }

    /// Rows past the end of the bitmap read as blank.
    #[must_use]
    pub fn is_present(&self, row: usize) -> bool {
        self.bytes
            .get(row / 8)
            .is_some_and(|b| b & (0x80 >> (row % 8)) != 0)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.bytes);
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>, rows: usize) -> Result<Self, FormatError> {
        let bytes = reader.take(Self::byte_len(rows))?.to_vec();
        Ok(Self { bytes })
    }
}
