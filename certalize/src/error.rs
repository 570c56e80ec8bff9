//! Failure classification shared by every crate in the pipeline.

use std::fmt::{Display, Formatter};

/// Coarse category of a decode pipeline failure.
///
/// Each crate's `Error` exposes `kind()`; the command-line layer maps a kind
/// to a process exit code and a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input file could not be opened or read.
    Io,
    /// Storage for the buffer or decoded output could not be reserved.
    Allocation,
    /// Base64 length, alphabet or padding violation.
    InvalidEncoding,
    /// PEM begin/end markers or the payload start are missing.
    MalformedArmor,
    /// A read was requested past the end of a buffer.
    OutOfBounds,
    /// Header fields do not have the expected structural shape.
    MalformedAsn1,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => "I/O failure",
            ErrorKind::Allocation => "allocation failure",
            ErrorKind::InvalidEncoding => "invalid encoding",
            ErrorKind::MalformedArmor => "malformed armor",
            ErrorKind::OutOfBounds => "out of bounds",
            ErrorKind::MalformedAsn1 => "malformed ASN.1",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
