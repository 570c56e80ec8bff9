use std::collections::TryReserveError;
use std::path::PathBuf;

use certalize::ErrorKind;
use thiserror::Error;

/// Errors raised while loading or reading a [`crate::ByteBuffer`].
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Storage for the file contents could not be reserved.
    #[error("cannot reserve {requested} bytes for {}", path.display())]
    Allocation {
        path: PathBuf,
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// A read of `len` bytes at `offset` does not fit in a buffer of `length` bytes.
    #[error("read of {len} bytes at offset {offset} exceeds buffer length {length}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        length: usize,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            Error::Allocation { .. } => ErrorKind::Allocation,
            Error::OutOfBounds { .. } => ErrorKind::OutOfBounds,
        }
    }
}
