use std::path::PathBuf;

use clap::Args;
use pem::PemArmor;

use crate::error::Result;
use crate::utils::read_input;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the PEM file. If not specified, reads from stdin
    file: Option<PathBuf>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = read_input(config.file.as_deref())?;
    let payload = PemArmor::default().strip(&input)?;
    println!("{payload}");
    Ok(())
}
