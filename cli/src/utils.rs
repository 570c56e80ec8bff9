use std::io::{self, Read};
use std::path::Path;

use buf::ByteBuffer;
use loader::{Certificate, CertificateLoader};

use crate::error::{Error, Result};

/// Read input from a file or stdin
///
/// If `file` is `Some`, reads from the specified file path.
/// If `file` is `None`, reads from stdin.
pub(crate) fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => Ok(ByteBuffer::load(path)?.into_vec()),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(Error::Stdin)?;
            Ok(buffer)
        }
    }
}

/// Loads a PEM or DER certificate from a file or stdin.
pub(crate) fn load_certificate(file: Option<&Path>) -> Result<Certificate> {
    let loader = CertificateLoader::default();
    let certificate = match file {
        Some(path) => loader.load(path)?,
        None => loader.load_bytes(read_input(None)?)?,
    };
    Ok(certificate)
}

/// Parses a decimal or `0x`-prefixed hexadecimal number.
pub(crate) fn parse_number(s: &str) -> std::result::Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}
