use std::path::PathBuf;

use clap::Args;
use pem::Pem;

use crate::error::Result;
use crate::utils::load_certificate;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate (PEM or DER). If not specified, reads from stdin
    file: Option<PathBuf>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let certificate = load_certificate(config.file.as_deref())?;
    let pem = Pem::from_der(certificate.buffer().as_slice());
    print!("{pem}");
    Ok(())
}
