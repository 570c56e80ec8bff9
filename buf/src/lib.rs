//! Bounds-checked byte buffer holding one loaded certificate.
//!
//! Reads take an explicit offset and never move the cursor. The cursor is
//! only moved by the caller that walks the TLV stream, through
//! [`ByteBuffer::set_cursor`] and [`ByteBuffer::advance`].

#![forbid(unsafe_code)]

pub mod error;

use std::fs::File;
use std::io::Read;
use std::path::Path;

pub use error::Error;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Vec<u8>,
    cursor: usize,
}

impl ByteBuffer {
    /// Reads the whole file at `path` into a new buffer with the cursor at 0.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_error)?;
        let hint = file
            .metadata()
            .map(|m| usize::try_from(m.len()).unwrap_or(usize::MAX))
            .map_err(io_error)?;

        let mut data = Vec::new();
        data.try_reserve_exact(hint)
            .map_err(|source| Error::Allocation {
                path: path.to_path_buf(),
                requested: hint,
                source,
            })?;
        file.read_to_end(&mut data).map_err(io_error)?;

        debug!(path = %path.display(), length = data.len(), "loaded file");
        Ok(ByteBuffer { data, cursor: 0 })
    }

    pub fn from_vec(data: Vec<u8>) -> Self {
        ByteBuffer { data, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor to `offset`. The end of the buffer is a valid position.
    pub fn set_cursor(&mut self, offset: usize) -> Result<(), Error> {
        if offset > self.data.len() {
            return Err(self.out_of_bounds(offset, 0));
        }
        self.cursor = offset;
        Ok(())
    }

    /// Moves the cursor forward by `n` bytes.
    pub fn advance(&mut self, n: usize) -> Result<(), Error> {
        let target = self
            .cursor
            .checked_add(n)
            .ok_or_else(|| self.out_of_bounds(self.cursor, n))?;
        self.set_cursor(target)
    }

    /// Checks that `len` bytes starting at `offset` lie inside the buffer.
    pub fn ensure(&self, offset: usize, len: usize) -> Result<(), Error> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(self.out_of_bounds(offset, len)),
        }
    }

    /// Borrows `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&[u8], Error> {
        self.ensure(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    /// Borrows everything from `offset` to the end of the buffer.
    pub fn tail(&self, offset: usize) -> Result<&[u8], Error> {
        self.bytes(offset, self.remaining(offset))
    }

    /// Copies `dst.len()` bytes starting at `offset` into `dst`.
    pub fn read_bytes(&self, offset: usize, dst: &mut [u8]) -> Result<(), Error> {
        let src = self.bytes(offset, dst.len())?;
        dst.copy_from_slice(src);
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, Error> {
        let mut b = [0u8; 1];
        self.read_bytes(offset, &mut b)?;
        Ok(b[0])
    }

    pub fn read_u16_be(&self, offset: usize) -> Result<u16, Error> {
        let mut b = [0u8; 2];
        self.read_bytes(offset, &mut b)?;
        Ok(u16::from_be_bytes(b))
    }

    pub fn read_u32_be(&self, offset: usize) -> Result<u32, Error> {
        let mut b = [0u8; 4];
        self.read_bytes(offset, &mut b)?;
        Ok(u32::from_be_bytes(b))
    }

    /// Number of bytes from `offset` to the end; zero when `offset` is past the end.
    pub fn remaining(&self, offset: usize) -> usize {
        self.data.len().saturating_sub(offset)
    }

    fn out_of_bounds(&self, offset: usize, len: usize) -> Error {
        debug!(offset, len, length = self.data.len(), "out of bounds read");
        Error::OutOfBounds {
            offset,
            len,
            length: self.data.len(),
        }
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        ByteBuffer::from_vec(data)
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
