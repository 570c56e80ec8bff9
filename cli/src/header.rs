use std::path::PathBuf;

use clap::Args;
use der::{Header, parse_header};
use serde::Serialize;

use crate::error::Result;
use crate::output::{OutputFormat, write_structured};
use crate::utils::{load_certificate, parse_number};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate (PEM or DER). If not specified, reads from stdin
    file: Option<PathBuf>,

    /// Byte offset of the header (decimal or 0x hex)
    #[arg(long, default_value = "0", value_parser = parse_number)]
    offset: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

#[derive(Serialize)]
struct Report {
    offset: usize,
    #[serde(flatten)]
    header: Header,
    name: String,
    indefinite: bool,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let mut certificate = load_certificate(config.file.as_deref())?;
    let buffer = certificate.buffer_mut();
    buffer.set_cursor(config.offset)?;
    let (header, _) = parse_header(buffer)?;

    let report = Report {
        offset: config.offset,
        header,
        name: header.label(),
        indefinite: header.is_indefinite(),
    };
    if write_structured(&report, config.output)? {
        return Ok(());
    }

    println!("offset: {}", report.offset);
    println!("class: {}", header.class());
    println!("constructed: {}", header.constructed());
    println!("tag: {} ({})", header.tag(), report.name);
    if report.indefinite {
        println!("length: indefinite");
    } else {
        println!("length: {}", header.length());
    }
    println!("header length: {}", header.header_length());
    Ok(())
}
