//! DER identifier and length decoding.
//!
//! [`parse_header`] decodes exactly one TLV header at the buffer cursor. It
//! never walks into constructed values; callers decode nested values by
//! moving the cursor and calling it again.

use buf::ByteBuffer;
use certalize::decoder::{DecodableFrom, Decoder};
use nom::{IResult, Parser, number::complete::be_u8};
use serde::Serialize;
use tracing::{trace, warn};

pub mod error;
pub mod oid;
pub mod tag;

pub use error::{Error, Field};
pub use oid::ObjectIdentifier;
pub use tag::{Class, UniversalTag};

use tag::{TAG_CONSTRUCTED, TAG_NUMBER_MASK};

const LENGTH_LONG_FORM: u8 = 0x80;
const CONTINUATION: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    class: Class,
    constructed: bool,
    tag: u32,
    length: u32,
    #[serde(skip)]
    length_byte: u8,
    header_length: usize,
}

impl Header {
    pub fn class(&self) -> Class {
        self.class
    }

    pub fn constructed(&self) -> bool {
        self.constructed
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Length of the value. Zero for the indefinite form.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Number of identifier and length octets.
    pub fn header_length(&self) -> usize {
        self.header_length
    }

    /// Header plus value length.
    pub fn total_length(&self) -> usize {
        self.header_length + self.length as usize
    }

    /// The length octet was `0x80`, the indefinite-length marker.
    pub fn is_indefinite(&self) -> bool {
        self.length_byte == LENGTH_LONG_FORM
    }

    pub fn universal_tag(&self) -> Option<UniversalTag> {
        match self.class {
            Class::Universal => UniversalTag::from_number(self.tag),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.constructed && self.tag == UniversalTag::Sequence.number()
    }

    /// Fails unless this is a constructed SEQUENCE, the shape required at the
    /// top of a certificate.
    pub fn expect_sequence(&self, offset: usize) -> Result<(), Error> {
        if self.is_sequence() {
            return Ok(());
        }
        Err(Error::NotSequence {
            offset,
            found: format!(
                "{} ({})",
                self.label(),
                if self.constructed {
                    "constructed"
                } else {
                    "primitive"
                }
            ),
        })
    }

    /// Human readable tag, e.g. `SEQUENCE`, `[0]` or `[APPLICATION 3]`.
    pub fn label(&self) -> String {
        match (self.class, self.universal_tag()) {
            (Class::Universal, Some(tag)) => tag.name().to_string(),
            (Class::Universal, None) => format!("[UNIVERSAL {}]", self.tag),
            (Class::ContextSpecific, _) => format!("[{}]", self.tag),
            (class, _) => format!("[{} {}]", class, self.tag),
        }
    }
}

/// Decodes the TLV header at `buffer.cursor()` without moving the cursor.
///
/// Returns the header and the number of bytes it occupies, so the caller can
/// advance to the start of the value.
///
/// # Errors
///
/// * [`Error::Truncated`] when an identifier or length octet lies past the
///   end of the buffer.
/// * [`Error::Overflow`] when a high tag number or long-form length does not
///   fit in 32 bits.
/// * [`Error::Buffer`] when the cursor itself is past the end.
pub fn parse_header(buffer: &ByteBuffer) -> Result<(Header, usize), Error> {
    let offset = buffer.cursor();
    let input = buffer.tail(offset)?;

    let (rest, (class, constructed, tag)) =
        parse_identifier(input).map_err(|e| map_parse_error(e, Field::Identifier, offset))?;
    let (rest, (length_byte, length)) =
        parse_length(rest).map_err(|e| map_parse_error(e, Field::Length, offset))?;
    let header_length = input.len() - rest.len();

    let header = Header {
        class,
        constructed,
        tag,
        length,
        length_byte,
        header_length,
    };
    if header.is_indefinite() {
        warn!(offset, "indefinite length is not supported, reporting length 0");
    }
    trace!(offset, ?class, constructed, tag, length, header_length, "parsed header");

    Ok((header, header_length))
}

impl DecodableFrom<ByteBuffer> for Header {}

impl Decoder<ByteBuffer, Header> for ByteBuffer {
    type Error = Error;

    fn decode(&self) -> Result<Header, Self::Error> {
        parse_header(self).map(|(header, _)| header)
    }
}

fn overflow(input: &[u8]) -> nom::Err<nom::error::Error<&[u8]>> {
    nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::TooLarge,
    ))
}

fn parse_identifier(input: &[u8]) -> IResult<&[u8], (Class, bool, u32)> {
    let (mut input, first) = be_u8(input)?;
    let class = Class::from(first >> 6);
    let constructed = first & TAG_CONSTRUCTED == TAG_CONSTRUCTED;

    if first & TAG_NUMBER_MASK != TAG_NUMBER_MASK {
        return Ok((input, (class, constructed, u32::from(first & TAG_NUMBER_MASK))));
    }

    // high tag number form: base-128, high bit set on all but the last octet
    let mut tag: u32 = 0;
    loop {
        let (rest, octet) = be_u8(input)?;
        input = rest;
        if tag > u32::MAX >> 7 {
            return Err(overflow(input));
        }
        tag = (tag << 7) | u32::from(octet & !CONTINUATION);
        if octet & CONTINUATION == 0 {
            break;
        }
    }
    Ok((input, (class, constructed, tag)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], (u8, u32)> {
    let (input, n) = be_u8(input)?;
    if n & LENGTH_LONG_FORM == 0 {
        // short form: 0-127
        return Ok((input, (n, u32::from(n))));
    }

    // long form
    // Low 7 bits give the number of length octets that follow.
    // 0x80 alone (indefinite form) reads no octets and yields 0.
    let count = usize::from(n & !LENGTH_LONG_FORM);
    let (input, octets) = nom::bytes::complete::take(count).parse(input)?;
    let mut length: u32 = 0;
    for octet in octets {
        if length > u32::MAX >> 8 {
            return Err(overflow(input));
        }
        length = (length << 8) | u32::from(*octet);
    }
    Ok((input, (n, length)))
}

fn map_parse_error(err: nom::Err<nom::error::Error<&[u8]>>, field: Field, offset: usize) -> Error {
    match err {
        nom::Err::Incomplete(_) => Error::Truncated { field, offset },
        nom::Err::Error(e) | nom::Err::Failure(e) => match e.code {
            nom::error::ErrorKind::Eof => Error::Truncated { field, offset },
            nom::error::ErrorKind::TooLarge => Error::Overflow { field, offset },
            code => Error::Parser(code),
        },
    }
}

#[cfg(test)]
mod tests {
    use buf::ByteBuffer;
    use certalize::ErrorKind;
    use certalize::decoder::Decoder;
    use rstest::rstest;

    use crate::{Class, Error, Field, Header, UniversalTag, parse_header, parse_identifier, parse_length};

    #[rstest(input, expected,
        case(vec![0x02], (Class::Universal, false, 0x02)),
        case(vec![0x30, 0x01], (Class::Universal, true, 0x10)),
        case(vec![0x31], (Class::Universal, true, 0x11)),
        case(vec![0xa0], (Class::ContextSpecific, true, 0x00)),
        case(vec![0x83], (Class::ContextSpecific, false, 0x03)),
        case(vec![0x61], (Class::Application, true, 0x01)),
        case(vec![0xc4], (Class::Private, false, 0x04)),
        case(vec![0x1f, 0x1f], (Class::Universal, false, 31)),
        case(vec![0x5f, 0x81, 0x00], (Class::Application, false, 128)),
        case(vec![0xbf, 0x87, 0x67], (Class::ContextSpecific, true, 999)),
        case(vec![0x1f, 0x8f, 0xff, 0xff, 0xff, 0x7f], (Class::Universal, false, u32::MAX))
    )]
    fn test_parse_identifier(input: Vec<u8>, expected: (Class, bool, u32)) {
        let (_, actual) = parse_identifier(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case(vec![0x02], 0x02),
        case(vec![0x7f], 0x7f),
        case(vec![0x81, 0x80], 0x80),
        case(vec![0x82, 0x02, 0x10], 256 * 0x02 + 0x10),
        case(vec![0x83, 0x01, 0x00, 0x00], 256 * 256),
        case(vec![0x82, 0xff, 0xff], 256 * 0xff + 0xff),
        case(vec![0x84, 0xff, 0xff, 0xff, 0xff], u32::MAX),
        case(vec![0x86, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00], 256),
        case(vec![0x80], 0)
    )]
    fn test_parse_length(input: Vec<u8>, expected: u32) {
        let (_, (_, actual)) = parse_length(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_parse_header_sequence() {
        let buffer = ByteBuffer::from_vec(vec![0x30, 0x03, 0x02, 0x01, 0x05]);
        let (header, consumed) = parse_header(&buffer).unwrap();

        assert_eq!(Class::Universal, header.class());
        assert!(header.constructed());
        assert_eq!(0x10, header.tag());
        assert_eq!(3, header.length());
        assert_eq!(2, consumed);
        assert_eq!(2, header.header_length());
        assert_eq!(5, header.total_length());
        assert!(header.is_sequence());
        assert_eq!(0, buffer.cursor());
    }

    #[test]
    fn test_parse_header_long_form_length() {
        let mut bytes = vec![0x02, 0x82, 0x01, 0x00];
        bytes.extend(vec![0x01; 256]);
        let buffer = ByteBuffer::from_vec(bytes);
        let (header, consumed) = parse_header(&buffer).unwrap();

        assert_eq!(0x02, header.tag());
        assert!(!header.constructed());
        assert_eq!(256, header.length());
        assert_eq!(4, consumed);
        assert_eq!(Some(UniversalTag::Integer), header.universal_tag());
    }

    #[test]
    fn test_parse_header_at_cursor() {
        let mut buffer = ByteBuffer::from_vec(vec![0x30, 0x03, 0x02, 0x01, 0x05]);
        buffer.set_cursor(2).unwrap();
        let (header, consumed) = parse_header(&buffer).unwrap();

        assert_eq!(0x02, header.tag());
        assert_eq!(1, header.length());
        assert_eq!(2, consumed);
        assert_eq!(2, buffer.cursor());
    }

    #[test]
    fn test_parse_header_high_tag_number() {
        let buffer = ByteBuffer::from_vec(vec![0xbf, 0x87, 0x67, 0x81, 0x90]);
        let (header, consumed) = parse_header(&buffer).unwrap();

        assert_eq!(Class::ContextSpecific, header.class());
        assert_eq!(999, header.tag());
        assert_eq!(0x90, header.length());
        assert_eq!(5, consumed);
        assert_eq!("[999]", header.label());
    }

    #[test]
    fn test_parse_header_indefinite_length() {
        let buffer = ByteBuffer::from_vec(vec![0x30, 0x80, 0x02, 0x01, 0x05, 0x00, 0x00]);
        let (header, consumed) = parse_header(&buffer).unwrap();

        assert!(header.is_indefinite());
        assert_eq!(0, header.length());
        assert_eq!(2, consumed);
    }

    #[test]
    fn test_header_decoder() {
        let buffer = ByteBuffer::from_vec(vec![0xa3, 0x02, 0x05, 0x00]);
        let header: Header = buffer.decode().unwrap();
        assert_eq!(Class::ContextSpecific, header.class());
        assert_eq!(3, header.tag());
        assert_eq!("[3]", header.label());
    }

    #[rstest(input, field,
        case(vec![], Field::Identifier),
        case(vec![0x30], Field::Length),
        case(vec![0x1f], Field::Identifier),
        case(vec![0x1f, 0x81, 0x82], Field::Identifier),
        case(vec![0x02, 0x82, 0x01], Field::Length),
        case(vec![0x02, 0x84], Field::Length)
    )]
    fn test_parse_header_truncated(input: Vec<u8>, field: Field) {
        let buffer = ByteBuffer::from_vec(input);
        let err = parse_header(&buffer).unwrap_err();
        assert_eq!(ErrorKind::OutOfBounds, err.kind());
        match err {
            Error::Truncated { field: actual, offset } => {
                assert_eq!(field, actual);
                assert_eq!(0, offset);
            }
            e => panic!("expected Error::Truncated, but got {e:?}"),
        }
    }

    #[rstest(input, field,
        case(vec![0x1f, 0x90, 0x80, 0x80, 0x80, 0x00, 0x00], Field::Identifier),
        case(vec![0x02, 0x85, 0x01, 0x00, 0x00, 0x00, 0x00], Field::Length),
        case(vec![0x02, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff], Field::Length)
    )]
    fn test_parse_header_overflow(input: Vec<u8>, field: Field) {
        let mut bytes = input;
        bytes.extend(vec![0x00; 200]);
        let buffer = ByteBuffer::from_vec(bytes);
        let err = parse_header(&buffer).unwrap_err();
        assert_eq!(ErrorKind::MalformedAsn1, err.kind());
        assert!(matches!(err, Error::Overflow { field: f, .. } if f == field));
    }

    #[test]
    fn test_parse_header_cursor_at_end() {
        let mut buffer = ByteBuffer::from_vec(vec![0x05, 0x00]);
        buffer.set_cursor(2).unwrap();
        let err = parse_header(&buffer).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                field: Field::Identifier,
                offset: 2
            }
        ));
    }

    #[rstest(input, expected,
        case(vec![0x30, 0x00], true),
        case(vec![0x10, 0x00], false),
        case(vec![0x31, 0x00], false),
        case(vec![0x02, 0x00], false)
    )]
    fn test_expect_sequence(input: Vec<u8>, expected: bool) {
        let header: Header = ByteBuffer::from_vec(input).decode().unwrap();
        let result = header.expect_sequence(0);
        assert_eq!(expected, result.is_ok());
        if let Err(e) = result {
            assert_eq!(ErrorKind::MalformedAsn1, e.kind());
        }
    }

    #[rstest(input, expected,
        case(vec![0x30, 0x00], "SEQUENCE"),
        case(vec![0x06, 0x00], "OBJECT IDENTIFIER"),
        case(vec![0x0e, 0x00], "[UNIVERSAL 14]"),
        case(vec![0x61, 0x00], "[APPLICATION 1]"),
        case(vec![0xc4, 0x00], "[PRIVATE 4]")
    )]
    fn test_header_label(input: Vec<u8>, expected: &str) {
        let header: Header = ByteBuffer::from_vec(input).decode().unwrap();
        assert_eq!(expected, header.label());
    }
}
