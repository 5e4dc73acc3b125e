use crate::types::FormatError;

/// Big-endian cursor over an artifact.
///
/// Every read is bounds-checked and reports [`FormatError::Truncated`]
/// instead of panicking.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Move the cursor to an absolute offset.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] if `pos` lies past the end.
    pub fn seek(&mut self, pos: usize) -> Result<(), FormatError> {
        if pos > self.buf.len() {
            return Err(FormatError::Truncated {
                offset: pos,
                needed: 0,
                available: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Fail early unless `n` more bytes are available.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] when fewer than `n` bytes remain.
    pub fn ensure(&self, n: usize) -> Result<(), FormatError> {
        if self.remaining() < n {
            return Err(FormatError::Truncated {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] when fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        self.ensure(n)?;
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] at end of input.
    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.array::<1>()?[0])
    }

    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] at end of input.
    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        self.array().map(u16::from_be_bytes)
    }

    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] at end of input.
    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        self.array().map(u32::from_be_bytes)
    }

    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] at end of input.
    pub fn read_i32(&mut self) -> Result<i32, FormatError> {
        self.array().map(i32::from_be_bytes)
    }
}
