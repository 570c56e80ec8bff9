use std::fmt::{Display, Formatter};

use certalize::ErrorKind;
use thiserror::Error;

/// Pipeline step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Armor,
    Base64,
    Structure,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Read => write!(f, "read"),
            Stage::Armor => write!(f, "armor"),
            Stage::Base64 => write!(f, "base64"),
            Stage::Structure => write!(f, "structure"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Buffer(#[from] buf::Error),
    #[error(transparent)]
    Pem(#[from] pem::Error),
    #[error(transparent)]
    Der(#[from] der::Error),
}

#[derive(Debug, Error)]
#[error("{stage} stage failed: {cause}")]
pub struct Error {
    stage: Stage,
    #[source]
    cause: Cause,
}

impl Error {
    pub fn new(stage: Stage, cause: impl Into<Cause>) -> Self {
        Error {
            stage,
            cause: cause.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.cause {
            Cause::Buffer(e) => e.kind(),
            Cause::Pem(e) => e.kind(),
            Cause::Der(e) => e.kind(),
        }
    }
}

pub(crate) trait StageExt<T> {
    fn stage(self, stage: Stage) -> Result<T, Error>;
}

impl<T, E: Into<Cause>> StageExt<T> for Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T, Error> {
        self.map_err(|e| Error::new(stage, e))
    }
}
