use std::collections::TryReserveError;

use certalize::ErrorKind;
use thiserror::Error;

/// Errors that can occur when stripping PEM armor or decoding Base64.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// `-----BEGIN CERTIFICATE` was not found within the lookahead window
    #[error("missing \"-----BEGIN CERTIFICATE\" marker")]
    MissingBeginMarker,

    /// The input is PEM armored but carries a different label
    #[error("expected CERTIFICATE armor, found {0}")]
    UnexpectedLabel(String),

    /// No line break follows the begin marker
    #[error("missing line break after the begin marker")]
    MissingPayloadStart,

    /// `-----END CERTIFICATE` was not found after the payload
    #[error("missing \"-----END CERTIFICATE\" marker")]
    MissingEndMarker,

    /// Base64 input must be non-empty and a multiple of 4 characters
    #[error("base64: length {0} is not a positive multiple of 4")]
    InvalidLength(usize),

    /// A character outside the Base64 alphabet
    #[error("base64: invalid character 0x{byte:02x} at position {position}")]
    InvalidCharacter { position: usize, byte: u8 },

    /// `=` outside the last two positions of the final group
    #[error("base64: misplaced padding at position {position}")]
    MisplacedPadding { position: usize },

    /// Output storage could not be reserved
    #[error("base64: cannot reserve {requested} bytes")]
    Allocation {
        requested: usize,
        source: TryReserveError,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingBeginMarker
            | Error::UnexpectedLabel(_)
            | Error::MissingPayloadStart
            | Error::MissingEndMarker => ErrorKind::MalformedArmor,
            Error::InvalidLength(_)
            | Error::InvalidCharacter { .. }
            | Error::MisplacedPadding { .. } => ErrorKind::InvalidEncoding,
            Error::Allocation { .. } => ErrorKind::Allocation,
        }
    }
}
