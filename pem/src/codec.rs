//! Strict Base64 (RFC 4648 standard alphabet) decoding.
//!
//! Decoding goes through a 256-entry lookup table. Input must be a positive
//! multiple of 4 characters with no whitespace; padding is only accepted at
//! the end of the final group.

use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::debug;

use crate::error::Error;

const INVALID: u8 = 0xff;
const PAD: u8 = 0xfe;

const DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 26 {
        table[b'A' as usize + i] = i as u8;
        table[b'a' as usize + i] = 26 + i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < 10 {
        table[b'0' as usize + i] = 52 + i as u8;
        i += 1;
    }
    table[b'+' as usize] = 62;
    table[b'/' as usize] = 63;
    table[b'=' as usize] = PAD;
    table
}

/// Decodes a Base64 string into raw bytes.
///
/// A `=` in the third position of the final group yields one byte for that
/// group and requires `=` in the fourth position as well; a `=` only in the
/// fourth position yields two bytes.
///
/// # Errors
///
/// [`Error::InvalidLength`], [`Error::InvalidCharacter`] and
/// [`Error::MisplacedPadding`] for malformed input,
/// [`Error::Allocation`] when the output cannot be reserved.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, Error> {
    if input.is_empty() || input.len() % 4 != 0 {
        return Err(Error::InvalidLength(input.len()));
    }
    if let Some(position) = input
        .iter()
        .position(|b| DECODE_TABLE[*b as usize] == INVALID)
    {
        return Err(Error::InvalidCharacter {
            position,
            byte: input[position],
        });
    }

    let capacity = input.len() / 4 * 3;
    let mut output = Vec::new();
    output
        .try_reserve_exact(capacity)
        .map_err(|source| Error::Allocation {
            requested: capacity,
            source,
        })?;

    let last_group = input.len() / 4 - 1;
    for (n, group) in input.chunks_exact(4).enumerate() {
        let sextets = [
            DECODE_TABLE[group[0] as usize],
            DECODE_TABLE[group[1] as usize],
            DECODE_TABLE[group[2] as usize],
            DECODE_TABLE[group[3] as usize],
        ];
        if let Some(i) = sextets.iter().position(|s| *s == PAD) {
            let allowed = n == last_group && (i == 3 || (i == 2 && sextets[3] == PAD));
            if !allowed {
                return Err(Error::MisplacedPadding {
                    position: n * 4 + i,
                });
            }
        }

        let [a, b, c, d] = sextets;
        output.push((a << 2) | (b >> 4));
        if c == PAD {
            break;
        }
        output.push(((b & 0x0f) << 4) | (c >> 2));
        if d == PAD {
            break;
        }
        output.push(((c & 0x03) << 6) | d);
    }

    debug!(input = input.len(), output = output.len(), "decoded base64");
    Ok(output)
}

/// Encodes bytes with the standard padded alphabet.
pub fn encode(input: &[u8]) -> String {
    STANDARD.encode(input)
}

#[cfg(test)]
mod tests {
    use certalize::ErrorKind;
    use rstest::rstest;

    use super::{decode, encode};
    use crate::error::Error;

    #[rstest(
        input,
        expected,
        case("TWFu", b"Man".to_vec()),
        case("TWE=", b"Ma".to_vec()),
        case("TQ==", b"M".to_vec()),
        case("Zm9vYmFy", b"foobar".to_vec()),
        case("Zm9vYmE=", b"fooba".to_vec()),
        case("Zm9vYg==", b"foob".to_vec()),
        case("AAAA", vec![0x00, 0x00, 0x00]),
        case("////", vec![0xff, 0xff, 0xff]),
        case("+/+/", vec![0xfb, 0xff, 0xbf])
    )]
    fn test_decode(input: &str, expected: Vec<u8>) {
        assert_eq!(expected, decode(input.as_bytes()).unwrap());
    }

    #[rstest(
        input,
        expected,
        case("", Error::InvalidLength(0)),
        case("TWF", Error::InvalidLength(3)),
        case("T W Fu", Error::InvalidLength(6)),
        case("T Fu", Error::InvalidCharacter { position: 1, byte: b' ' }),
        case("TWFu\nTWFu", Error::InvalidLength(9)),
        case("TW-u", Error::InvalidCharacter { position: 2, byte: b'-' }),
        case("TWF\u{e9}", Error::InvalidLength(5)),
        case("=WFu", Error::MisplacedPadding { position: 0 }),
        case("T=Fu", Error::MisplacedPadding { position: 1 }),
        case("TW=u", Error::MisplacedPadding { position: 2 }),
        case("TQ==TWFu", Error::MisplacedPadding { position: 2 }),
        case("TWE=TWFu", Error::MisplacedPadding { position: 3 })
    )]
    fn test_decode_invalid(input: &str, expected: Error) {
        let err = decode(input.as_bytes()).unwrap_err();
        assert_eq!(ErrorKind::InvalidEncoding, err.kind());
        assert_eq!(expected, err);
    }

    #[test]
    fn test_decode_non_ascii_byte() {
        let err = decode(&[b'T', b'W', 0xc3, b'u']).unwrap_err();
        assert_eq!(
            Error::InvalidCharacter {
                position: 2,
                byte: 0xc3
            },
            err
        );
    }

    #[rstest(
        input,
        case(vec![0x4d, 0x61, 0x6e]),
        case(vec![0x00, 0x00, 0x00, 0xff, 0xfe, 0xfd]),
        case((0..=255u8).collect::<Vec<u8>>()[..255].to_vec()),
        case(b"-----BEGIN CERTIFICATE-----".repeat(3))
    )]
    fn test_decode_encoded(input: Vec<u8>) {
        assert_eq!(0, input.len() % 3);
        let encoded = encode(&input);
        assert!(!encoded.contains('='));
        assert_eq!(input, decode(encoded.as_bytes()).unwrap());
    }

    #[test]
    fn test_decode_output_length_is_exact() {
        let decoded = decode(b"TWFuTWE=").unwrap();
        assert_eq!(5, decoded.len());
    }
}
