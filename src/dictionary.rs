use std::collections::HashMap;

use crate::codec::ByteReader;
use crate::types::FormatError;

/// Bidirectional mapping between strings and compact integer ids.
///
/// Id 0 is reserved for blank or absent values and is never assigned; real
/// entries are numbered from 1 in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueDictionary {
    entries: Vec<String>,
    ids: HashMap<String, i32>,
}

impl ValueDictionary {
    pub const NULL_ID: i32 = 0;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `value`, returning its id. Empty strings map to [`Self::NULL_ID`].
    // Entry count is bounded by the u32 field in the artifact; an i32 id
    // overflow would need billions of distinct strings.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn add(&mut self, value: &str) -> i32 {
        if value.is_empty() {
            return Self::NULL_ID;
        }
        if let Some(&id) = self.ids.get(value) {
            return id;
        }
        self.entries.push(value.to_owned());
        let id = self.entries.len() as i32;
        self.ids.insert(value.to_owned(), id);
        id
    }

    /// Id of `value`, or [`Self::NULL_ID`] when it was never interned.
    #[must_use]
    pub fn get(&self, value: &str) -> i32 {
        self.ids.get(value).copied().unwrap_or(Self::NULL_ID)
    }

    /// The string behind `id`. Id 0 and unknown ids resolve to `None`.
    #[must_use]
    pub fn resolve(&self, id: i32) -> Option<&str> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.entries.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append the serialized dictionary: entry count, then `(len u16, utf-8)` per entry.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::DictionaryEntryTooLong`] for entries over 65535 bytes.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let count = u32::try_from(self.entries.len()).map_err(|_| FormatError::Overflow {
            what: "dictionary entry",
            count: self.entries.len(),
        })?;
        out.extend_from_slice(&count.to_be_bytes());
        for entry in &self.entries {
            let len = u16::try_from(entry.len())
                .map_err(|_| FormatError::DictionaryEntryTooLong { len: entry.len() })?;
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(entry.as_bytes());
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`FormatError::DictionaryEntryTooLong`] for entries over 65535 bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Read a dictionary written by [`write_to`](Self::write_to).
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] or [`FormatError::InvalidUtf8`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let count = reader.read_u32()? as usize;
        // every entry carries at least its two-byte length
        reader.ensure(count.saturating_mul(2))?;
        let mut dictionary = Self {
            entries: Vec::with_capacity(count),
            ids: HashMap::with_capacity(count),
        };
        for i in 0..count {
            let id = (i + 1) as i32;
            let len = usize::from(reader.read_u16()?);
            let bytes = reader.take(len)?;
            let entry = std::str::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8 { id })?;
            dictionary.ids.entry(entry.to_owned()).or_insert(id);
            dictionary.entries.push(entry.to_owned());
        }
        Ok(dictionary)
    }

    /// # Errors
    ///
    /// See [`read_from`](Self::read_from). Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        Self::read_from(&mut ByteReader::new(bytes))
    }
}
