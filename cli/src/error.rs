use certalize::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("cannot read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Load(#[from] loader::Error),

    #[error(transparent)]
    Buffer(#[from] buf::Error),

    #[error("DER decode error: {0}")]
    Der(#[from] der::Error),

    #[error("PEM decode error: {0}")]
    Pem(#[from] pem::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("selection {offset}:{length} lies outside the {size} byte certificate")]
    SelectionOutOfRange {
        offset: usize,
        length: usize,
        size: usize,
    },
}

impl Error {
    /// Decode pipeline error kind, `None` for failures of the tool itself.
    pub(crate) fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Stdin(_) => Some(ErrorKind::Io),
            Error::Load(e) => Some(e.kind()),
            Error::Buffer(e) => Some(e.kind()),
            Error::Der(e) => Some(e.kind()),
            Error::Pem(e) => Some(e.kind()),
            Error::Io(_)
            | Error::Json(_)
            | Error::Yaml(_)
            | Error::SelectionOutOfRange { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
