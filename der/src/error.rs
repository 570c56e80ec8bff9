use std::fmt::{Display, Formatter};
use std::num::ParseIntError;

use certalize::ErrorKind;
use thiserror::Error;

/// Header field being decoded when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Identifier,
    Length,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Identifier => write!(f, "identifier"),
            Field::Length => write!(f, "length"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("header at offset {offset}: {field} runs past the end of the buffer")]
    Truncated { field: Field, offset: usize },
    #[error("header at offset {offset}: {field} does not fit in 32 bits")]
    Overflow { field: Field, offset: usize },
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error(transparent)]
    Buffer(#[from] buf::Error),

    #[error("expected a constructed SEQUENCE at offset {offset}, found {found}")]
    NotSequence { offset: usize, found: String },
    #[error("TLV at offset {offset} needs {needed} bytes, only {available} available")]
    ValueOverrun {
        offset: usize,
        needed: usize,
        available: usize,
    },

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: component at byte {0} does not fit in 64 bits")]
    ObjectIdentifierComponentOverflow(usize),
    #[error("OBJECT IDENTIFIER: more than {0} components")]
    ObjectIdentifierTooManyComponents(usize),
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String, #[source] ParseIntError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Truncated { .. } => ErrorKind::OutOfBounds,
            Error::Buffer(e) => e.kind(),
            _ => ErrorKind::MalformedAsn1,
        }
    }
}
