use std::process::ExitCode;

use certalize::ErrorKind;

use crate::error::Error;

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Status {
    Success = 0,
    NotFound = 1,
    NoMatch = 2,
    Invalid = 4,
    #[allow(dead_code)]
    Duplicate = 6,
    #[allow(dead_code)]
    Timeout = 7,
    InitFailure = 8,
    Fatal = 255,
}

impl Status {
    pub(crate) fn code(self) -> u8 {
        self as u8
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status.code())
    }
}

impl From<&Error> for Status {
    fn from(error: &Error) -> Self {
        if is_not_found(error) {
            return Status::NotFound;
        }
        if let Error::SelectionOutOfRange { .. } = error {
            return Status::NoMatch;
        }
        match error.kind() {
            Some(ErrorKind::InvalidEncoding)
            | Some(ErrorKind::MalformedArmor)
            | Some(ErrorKind::OutOfBounds)
            | Some(ErrorKind::MalformedAsn1) => Status::Invalid,
            Some(ErrorKind::Io) | Some(ErrorKind::Allocation) | None => Status::Fatal,
        }
    }
}

fn is_not_found(error: &Error) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::NotFound {
                return true;
            }
        }
        current = e.source();
    }
    false
}
