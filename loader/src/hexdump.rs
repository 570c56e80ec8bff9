//! Hex dump layout.
//!
//! Rows look like `xxd`: an 8-digit offset, `xx ` per byte with one extra
//! space after the first half of the row, then the printable ASCII column.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::Serialize;

pub const DEFAULT_BYTES_PER_ROW: usize = 16;

/// Character cell of a byte's first hex digit, relative to the start of the
/// hex column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

fn column(index: usize, bytes_per_row: usize) -> usize {
    let half = bytes_per_row / 2;
    let gap = usize::from(half > 0 && index >= half);
    3 * index + gap
}

/// Cells covered by the byte range `offset..offset + length`.
pub fn highlight_cells(offset: usize, length: usize, bytes_per_row: usize) -> BTreeSet<Cell> {
    if bytes_per_row == 0 {
        return BTreeSet::new();
    }
    (offset..offset.saturating_add(length))
        .map(|position| Cell {
            row: position / bytes_per_row,
            column: column(position % bytes_per_row, bytes_per_row),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HexRow {
    pub offset: usize,
    pub hex: String,
    pub ascii: String,
}

impl Display for HexRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}  {} |{}|", self.offset, self.hex, self.ascii)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexDump {
    bytes_per_row: usize,
}

impl Default for HexDump {
    fn default() -> Self {
        HexDump {
            bytes_per_row: DEFAULT_BYTES_PER_ROW,
        }
    }
}

impl HexDump {
    /// `bytes_per_row` is clamped to at least 1.
    pub fn new(bytes_per_row: usize) -> Self {
        HexDump {
            bytes_per_row: bytes_per_row.max(1),
        }
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    pub fn render(&self, data: &[u8]) -> Vec<HexRow> {
        data.chunks(self.bytes_per_row)
            .enumerate()
            .map(|(row, chunk)| HexRow {
                offset: row * self.bytes_per_row,
                hex: self.hex_column(chunk),
                ascii: chunk
                    .iter()
                    .map(|byte| {
                        if byte.is_ascii_graphic() || *byte == b' ' {
                            *byte as char
                        } else {
                            '.'
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    fn hex_column(&self, chunk: &[u8]) -> String {
        let half = self.bytes_per_row / 2;
        let mut hex = String::with_capacity(3 * self.bytes_per_row + 1);
        for i in 0..self.bytes_per_row {
            match chunk.get(i) {
                Some(byte) => hex.push_str(&format!("{byte:02x} ")),
                // pad short rows so the ASCII column lines up
                None => hex.push_str("   "),
            }
            if i + 1 == half {
                hex.push(' ');
            }
        }
        hex
    }

    /// Line with `^^` under each highlighted cell of `row`, aligned with the
    /// hex column. `None` when nothing on that row is highlighted.
    pub fn marker(&self, row: usize, cells: &BTreeSet<Cell>) -> Option<String> {
        let columns: Vec<usize> = cells
            .range(Cell { row, column: 0 }..Cell { row: row + 1, column: 0 })
            .map(|cell| cell.column)
            .collect();
        let last = *columns.last()?;

        let mut line = vec![b' '; last + 2];
        for column in columns {
            line[column] = b'^';
            line[column + 1] = b'^';
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}
