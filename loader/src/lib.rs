//! Certificate loading.
//!
//! A [`CertificateLoader`] reads a file (or bytes already in memory), decides
//! whether it is PEM or raw DER, and hands back a [`Certificate`] whose
//! buffer always holds DER bytes with the cursor at 0.
//!
//! ```no_run
//! use loader::{Asn1Tree, CertificateLoader};
//!
//! let mut cert = CertificateLoader::default().load("ca.pem").unwrap();
//! let mut tree = Asn1Tree::outline(cert.buffer_mut()).unwrap();
//! let root = tree.roots()[0];
//! for child in tree.expand(cert.buffer_mut(), root).unwrap() {
//!     println!("{child:?}");
//! }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod hexdump;
pub mod tree;

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use buf::ByteBuffer;
use certalize::decoder::Decoder;
use pem::PemArmor;
use serde::Serialize;
use tracing::{debug, warn};

pub use error::{Cause, Error, Stage};
use error::StageExt;
pub use tree::{Asn1Tree, Node, NodeId};

/// Identifier octet of a universal constructed SEQUENCE, also ASCII `'0'`.
const SEQUENCE_OCTET: u8 = 0x30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Pem,
    Der,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Pem => write!(f, "PEM"),
            Format::Der => write!(f, "DER"),
        }
    }
}

/// A loaded certificate: DER bytes plus where they came from.
#[derive(Debug, Clone)]
pub struct Certificate {
    buffer: ByteBuffer,
    format: Format,
    source: Option<PathBuf>,
}

impl Certificate {
    pub fn buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut ByteBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> ByteBuffer {
        self.buffer
    }

    /// Encoding the input was in before normalization.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Path the certificate was read from, `None` for in-memory input.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateLoader {
    armor: PemArmor,
}

impl CertificateLoader {
    pub fn with_armor(armor: PemArmor) -> Self {
        CertificateLoader { armor }
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Certificate, Error> {
        let path = path.as_ref();
        let raw = ByteBuffer::load(path).stage(Stage::Read)?;
        let (buffer, format) = self.normalize(raw)?;
        Ok(Certificate {
            buffer,
            format,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn load_bytes(&self, bytes: Vec<u8>) -> Result<Certificate, Error> {
        let (buffer, format) = self.normalize(ByteBuffer::from_vec(bytes))?;
        Ok(Certificate {
            buffer,
            format,
            source: None,
        })
    }

    fn normalize(&self, raw: ByteBuffer) -> Result<(ByteBuffer, Format), Error> {
        let input = raw.as_slice();

        if PemArmor::is_armored(input) {
            let payload = self.armor.strip(input).stage(Stage::Armor)?;
            let der: Vec<u8> = payload.decode().stage(Stage::Base64)?;
            debug!(
                payload = payload.len(),
                der = der.len(),
                "decoded PEM certificate"
            );
            return Ok((ByteBuffer::from_vec(der), Format::Pem));
        }

        match input.first() {
            Some(&SEQUENCE_OCTET) => debug!(length = input.len(), "raw DER certificate"),
            first => warn!(
                first = ?first,
                "input is neither PEM nor a DER SEQUENCE, treating it as DER"
            ),
        }
        Ok((raw, Format::Der))
    }
}
