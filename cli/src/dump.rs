use std::path::PathBuf;

use clap::Args;
use loader::hexdump::{Cell, HexDump, HexRow, highlight_cells};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{OutputFormat, write_structured};
use crate::utils::{load_certificate, parse_number};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate (PEM or DER). If not specified, reads from stdin
    file: Option<PathBuf>,

    /// Underline a byte range, given as OFFSET:LEN (decimal or 0x hex)
    #[arg(short, long, value_parser = parse_selection)]
    select: Option<Selection>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Selection {
    offset: usize,
    length: usize,
}

fn parse_selection(s: &str) -> std::result::Result<Selection, String> {
    let (offset, length) = s
        .split_once(':')
        .ok_or_else(|| format!("expected OFFSET:LEN, got '{s}'"))?;
    Ok(Selection {
        offset: parse_number(offset)?,
        length: parse_number(length)?,
    })
}

#[derive(Serialize)]
struct Dump {
    rows: Vec<HexRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<Selection>,
    highlighted: Vec<Cell>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let certificate = load_certificate(config.file.as_deref())?;
    let data = certificate.buffer().as_slice();
    let hexdump = HexDump::default();

    let highlighted = match config.select {
        Some(selection) => {
            let fits = selection
                .offset
                .checked_add(selection.length)
                .is_some_and(|end| end <= data.len());
            if !fits {
                return Err(Error::SelectionOutOfRange {
                    offset: selection.offset,
                    length: selection.length,
                    size: data.len(),
                });
            }
            highlight_cells(selection.offset, selection.length, hexdump.bytes_per_row())
        }
        None => Default::default(),
    };

    let rows = hexdump.render(data);
    let dump = Dump {
        rows,
        selection: config.select,
        highlighted: highlighted.iter().copied().collect(),
    };
    if write_structured(&dump, config.output)? {
        return Ok(());
    }

    for (index, row) in dump.rows.iter().enumerate() {
        println!("{row}");
        if let Some(marker) = hexdump.marker(index, &highlighted) {
            // offset column plus its two-space separator
            println!("{:10}{marker}", "");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Selection, parse_selection};

    #[rstest(input, expected,
        case("0:4", Some(Selection { offset: 0, length: 4 })),
        case("0x1da:12", Some(Selection { offset: 474, length: 12 })),
        case("8", None),
        case("8:", None),
        case(":8", None),
        case("a:b", None)
    )]
    fn test_parse_selection(input: &str, expected: Option<Selection>) {
        assert_eq!(expected, parse_selection(input).ok());
    }
}
