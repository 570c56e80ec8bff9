use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Identifier octet bit marking a constructed encoding.
pub const TAG_CONSTRUCTED: u8 = 0x20;
/// Low 5 bits of the identifier octet.
pub const TAG_NUMBER_MASK: u8 = 0x1f;

/// Tag class, the top two bits of the identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Class {
    Universal = 0,
    Application = 1,
    ContextSpecific = 2,
    Private = 3,
}

impl From<u8> for Class {
    /// Takes the class from the two low bits of `bits`.
    fn from(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Class::Universal => write!(f, "UNIVERSAL"),
            Class::Application => write!(f, "APPLICATION"),
            Class::ContextSpecific => write!(f, "CONTEXT"),
            Class::Private => write!(f, "PRIVATE"),
        }
    }
}

/// Tag numbers assigned in the universal class (X.680 §8.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum UniversalTag {
    EndOfContent = 0x00,
    Boolean = 0x01,
    Integer = 0x02,
    BitString = 0x03,
    OctetString = 0x04,
    Null = 0x05,
    ObjectIdentifier = 0x06,
    ObjectDescriptor = 0x07,
    External = 0x08,
    Real = 0x09,
    Enumerated = 0x0a,
    EmbeddedPdv = 0x0b,
    UTF8String = 0x0c,
    RelativeOid = 0x0d,
    Sequence = 0x10,
    Set = 0x11,
    NumericString = 0x12,
    PrintableString = 0x13,
    T61String = 0x14,
    VideotexString = 0x15,
    IA5String = 0x16,
    UTCTime = 0x17,
    GeneralizedTime = 0x18,
    GraphicString = 0x19,
    VisibleString = 0x1a,
    GeneralString = 0x1b,
    UniversalString = 0x1c,
    CharacterString = 0x1d,
    BMPString = 0x1e,
}

impl UniversalTag {
    pub fn from_number(number: u32) -> Option<Self> {
        let tag = match number {
            0x00 => Self::EndOfContent,
            0x01 => Self::Boolean,
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x07 => Self::ObjectDescriptor,
            0x08 => Self::External,
            0x09 => Self::Real,
            0x0a => Self::Enumerated,
            0x0b => Self::EmbeddedPdv,
            0x0c => Self::UTF8String,
            0x0d => Self::RelativeOid,
            0x10 => Self::Sequence,
            0x11 => Self::Set,
            0x12 => Self::NumericString,
            0x13 => Self::PrintableString,
            0x14 => Self::T61String,
            0x15 => Self::VideotexString,
            0x16 => Self::IA5String,
            0x17 => Self::UTCTime,
            0x18 => Self::GeneralizedTime,
            0x19 => Self::GraphicString,
            0x1a => Self::VisibleString,
            0x1b => Self::GeneralString,
            0x1c => Self::UniversalString,
            0x1d => Self::CharacterString,
            0x1e => Self::BMPString,
            _ => return None,
        };
        Some(tag)
    }

    pub fn number(&self) -> u32 {
        *self as u32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::EndOfContent => "END OF CONTENT",
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::BitString => "BIT STRING",
            Self::OctetString => "OCTET STRING",
            Self::Null => "NULL",
            Self::ObjectIdentifier => "OBJECT IDENTIFIER",
            Self::ObjectDescriptor => "ObjectDescriptor",
            Self::External => "EXTERNAL",
            Self::Real => "REAL",
            Self::Enumerated => "ENUMERATED",
            Self::EmbeddedPdv => "EMBEDDED PDV",
            Self::UTF8String => "UTF8String",
            Self::RelativeOid => "RELATIVE-OID",
            Self::Sequence => "SEQUENCE",
            Self::Set => "SET",
            Self::NumericString => "NumericString",
            Self::PrintableString => "PrintableString",
            Self::T61String => "T61String",
            Self::VideotexString => "VideotexString",
            Self::IA5String => "IA5String",
            Self::UTCTime => "UTCTime",
            Self::GeneralizedTime => "GeneralizedTime",
            Self::GraphicString => "GraphicString",
            Self::VisibleString => "VisibleString",
            Self::GeneralString => "GeneralString",
            Self::UniversalString => "UniversalString",
            Self::CharacterString => "CHARACTER STRING",
            Self::BMPString => "BMPString",
        }
    }
}

impl Display for UniversalTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Class, UniversalTag};

    #[rstest(
        bits,
        expected,
        case(0x30 >> 6, Class::Universal),
        case(0x61 >> 6, Class::Application),
        case(0xa0 >> 6, Class::ContextSpecific),
        case(0xdf >> 6, Class::Private)
    )]
    fn test_class_from_bits(bits: u8, expected: Class) {
        assert_eq!(expected, Class::from(bits));
    }

    #[rstest(
        number,
        expected,
        case(0x02, Some(UniversalTag::Integer)),
        case(0x10, Some(UniversalTag::Sequence)),
        case(0x1e, Some(UniversalTag::BMPString)),
        case(0x0e, None),
        case(0x1f, None),
        case(1000, None)
    )]
    fn test_universal_tag_from_number(number: u32, expected: Option<UniversalTag>) {
        let actual = UniversalTag::from_number(number);
        assert_eq!(expected, actual);
        if let Some(tag) = actual {
            assert_eq!(number, tag.number());
        }
    }
}
