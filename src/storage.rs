use std::ops::Deref;

use memmap2::{Mmap, MmapMut};

use crate::types::Residency;

/// Immutable artifact bytes owned by a loaded ruleset.
///
/// Decoding only ever sees `&[u8]`, so it never depends on where the bytes live.
#[derive(Debug)]
pub(crate) enum Storage {
    Heap(Box<[u8]>),
    OffHeap(Mmap),
}

impl Storage {
    /// Copy `bytes` into storage of the requested residency.
    pub(crate) fn copy_from(bytes: &[u8], residency: Residency) -> std::io::Result<Self> {
        match residency {
            Residency::Heap => Ok(Storage::Heap(bytes.into())),
            // zero-length maps are rejected by the OS
            Residency::OffHeap if bytes.is_empty() => Ok(Storage::Heap(Box::default())),
            Residency::OffHeap => {
                let mut map = MmapMut::map_anon(bytes.len())?;
                map.copy_from_slice(bytes);
                Ok(Storage::OffHeap(map.make_read_only()?))
            }
        }
    }

    pub(crate) fn residency(&self) -> Residency {
        match self {
            Storage::Heap(_) => Residency::Heap,
            Storage::OffHeap(_) => Residency::OffHeap,
        }
    }
}

impl Deref for Storage {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Storage::Heap(bytes) => bytes,
            Storage::OffHeap(map) => map,
        }
    }
}
