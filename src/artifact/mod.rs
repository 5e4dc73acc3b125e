//! The KISS binary artifact.
//!
//! All integers are big-endian. The artifact is self-describing: a reader
//! needs nothing but the bytes.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic: 0x4B495353 ("KISS")
//! 4       2     Major version
//! 6       2     Minor version
//! 8       1     Artifact kind (0 production, 1 test-inclusive)
//! 9       1     Rule selection policy (0 auto, 1 priority, 2 first-match)
//! 10      2     Reserved
//! 12      4     Column count
//! 16      4     Row count
//! 20      4     Dictionary section offset
//! 24      4     Column section offset
//! 28      4     Data section offset
//! 32..    var   Dictionary: entry count u32, then (len u16, utf-8) per entry
//! ..      12n   Column definitions: name id u32, operator u8, type u8,
//!               role u8, flags u8, data offset u32
//! ..      var   One codec block per column, in column order
//! ..      var   Rule order: order type u8, then row count u32 row indices
//! ```
//!
//! ## Versioning
//!
//! Readers reject any major version other than their own before looking at
//! the rest of the header. Minor versions are additive.

mod reader;
mod writer;

pub(crate) use reader::{read, DecodedArtifact};
pub(crate) use writer::{write, ArtifactParts};

use crate::codec::ByteReader;
use crate::types::{ArtifactKind, FormatError, RuleSelectionPolicy};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAGIC: u32 = 0x4B49_5353;
pub const VERSION_MAJOR: u16 = 1;
pub const VERSION_MINOR: u16 = 0;
pub const HEADER_SIZE: usize = 32;
pub const COLUMN_DEFINITION_SIZE: usize = 12;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) version_minor: u16,
    pub(crate) artifact_kind: ArtifactKind,
    pub(crate) rule_selection: RuleSelectionPolicy,
    pub(crate) column_count: u32,
    pub(crate) row_count: u32,
    pub(crate) dictionary_offset: u32,
    pub(crate) columns_offset: u32,
    pub(crate) data_offset: u32,
}

impl Header {
    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC.to_be_bytes());
        out.extend_from_slice(&VERSION_MAJOR.to_be_bytes());
        out.extend_from_slice(&self.version_minor.to_be_bytes());
        out.push(self.artifact_kind.ordinal());
        out.push(self.rule_selection.ordinal());
        out.extend_from_slice(&0u16.to_be_bytes()); // reserved
        out.extend_from_slice(&self.column_count.to_be_bytes());
        out.extend_from_slice(&self.row_count.to_be_bytes());
        out.extend_from_slice(&self.dictionary_offset.to_be_bytes());
        out.extend_from_slice(&self.columns_offset.to_be_bytes());
        out.extend_from_slice(&self.data_offset.to_be_bytes());
    }

    /// Magic and version are checked before anything else is read.
    pub(crate) fn read(reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let found = reader.read_u32()?;
        if found != MAGIC {
            return Err(FormatError::BadMagic { found });
        }
        let major = reader.read_u16()?;
        let minor = reader.read_u16()?;
        if major != VERSION_MAJOR {
            return Err(FormatError::UnsupportedVersion {
                major,
                minor,
                supported: VERSION_MAJOR,
            });
        }
        let artifact_kind = ArtifactKind::from_ordinal(reader.read_u8()?)?;
        let rule_selection = RuleSelectionPolicy::from_ordinal(reader.read_u8()?)?;
        let _reserved = reader.read_u16()?;
        Ok(Self {
            version_minor: minor,
            artifact_kind,
            rule_selection,
            column_count: reader.read_u32()?,
            row_count: reader.read_u32()?,
            dictionary_offset: reader.read_u32()?,
            columns_offset: reader.read_u32()?,
            data_offset: reader.read_u32()?,
        })
    }
}

/// How the rows of an artifact were ordered at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OrderType {
    Insertion,
    Priority,
}

impl OrderType {
    pub(crate) fn ordinal(self) -> u8 {
        match self {
            OrderType::Insertion => 0,
            OrderType::Priority => 1,
        }
    }

    pub(crate) fn from_ordinal(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(OrderType::Insertion),
            1 => Ok(OrderType::Priority),
            _ => Err(FormatError::UnknownOrdinal {
                field: "order type",
                value,
            }),
        }
    }
}
