pub mod codec;
pub mod error;

use std::fmt::{Display, Formatter};

use certalize::decoder::{DecodableFrom, Decoder};
pub use error::Error;
use regex::bytes::Regex;
use tracing::debug;

pub const BEGIN_MARKER: &[u8] = b"-----BEGIN CERTIFICATE";
pub const END_MARKER: &[u8] = b"-----END CERTIFICATE";

/// Default number of leading bytes searched for [`BEGIN_MARKER`].
pub const DEFAULT_BEGIN_WINDOW: usize = 100;
/// Default number of bytes, from the start of the begin marker, searched for
/// the line break that precedes the payload.
pub const DEFAULT_LINE_WINDOW: usize = 30;

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-5.1
*/

/// Strips `-----BEGIN CERTIFICATE-----` / `-----END CERTIFICATE-----` armor.
///
/// The begin marker must lie within the first `begin_window` bytes, and the
/// line break ending the marker line within `line_window` bytes of the
/// marker start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PemArmor {
    begin_window: usize,
    line_window: usize,
}

impl Default for PemArmor {
    fn default() -> Self {
        PemArmor {
            begin_window: DEFAULT_BEGIN_WINDOW,
            line_window: DEFAULT_LINE_WINDOW,
        }
    }
}

impl PemArmor {
    pub fn new(begin_window: usize, line_window: usize) -> Self {
        PemArmor {
            begin_window,
            line_window,
        }
    }

    /// Returns true when `input` starts with the begin marker, ignoring
    /// leading ASCII whitespace.
    pub fn is_armored(input: &[u8]) -> bool {
        input.trim_ascii_start().starts_with(BEGIN_MARKER)
    }

    /// Recovers the Base64 payload between the markers, dropping CR and LF.
    pub fn strip(&self, input: &[u8]) -> Result<Base64Payload, Error> {
        let head = &input[..input.len().min(self.begin_window)];
        let begin = find(head, BEGIN_MARKER).ok_or_else(|| match armor_label(input) {
            Some(label) if label != "CERTIFICATE" => Error::UnexpectedLabel(label),
            _ => Error::MissingBeginMarker,
        })?;

        let line = &input[begin..input.len().min(begin.saturating_add(self.line_window))];
        let start = begin + find(line, b"\n").ok_or(Error::MissingPayloadStart)? + 1;
        let end = start + find(&input[start..], END_MARKER).ok_or(Error::MissingEndMarker)?;

        let payload: Vec<u8> = input[start..end]
            .iter()
            .copied()
            .filter(|b| *b != b'\r' && *b != b'\n')
            .collect();
        debug!(start, end, payload = payload.len(), "stripped PEM armor");

        Ok(Base64Payload(payload))
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Label of the first `-----BEGIN <label>-----` boundary anywhere in `input`.
fn armor_label(input: &[u8]) -> Option<String> {
    let re = Regex::new(r"-----BEGIN ([A-Z0-9 ]+)-----").ok()?;
    let captured = re.captures(input)?;
    let label = captured.get(1)?;
    Some(String::from_utf8_lossy(label.as_bytes()).into_owned())
}

/// Compact Base64 text recovered from PEM armor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Payload(Vec<u8>);

impl Base64Payload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Base64Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl DecodableFrom<Base64Payload> for Vec<u8> {}

impl Decoder<Base64Payload, Vec<u8>> for Base64Payload {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        codec::decode(&self.0)
    }
}

/// A DER certificate wrapped in CERTIFICATE armor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    base64_data: String,
}

impl Pem {
    pub fn from_der(der: &[u8]) -> Self {
        Pem {
            base64_data: codec::encode(der),
        }
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN CERTIFICATE-----")?;
        // RFC 7468: base64 text should be wrapped at 64 characters
        for chunk in self.base64_data.as_bytes().chunks(64) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "-----END CERTIFICATE-----")
    }
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        codec::decode(self.base64_data.as_bytes())
    }
}
