use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::Error;

/// Maximum number of arcs kept for one identifier.
pub const MAX_COMPONENTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    components: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Decodes the value octets of an OBJECT IDENTIFIER TLV.
    ///
    /// Each sub-identifier is base-128 with the high bit as continuation
    /// flag. The first one packs the first two arcs as `40 * X + Y`.
    pub fn from_der_value(value: &[u8]) -> Result<Self, Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut components = Vec::new();
        let mut sub: u64 = 0;
        let mut pending = false;
        for (i, octet) in value.iter().enumerate() {
            if sub > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierComponentOverflow(i));
            }
            sub = (sub << 7) | u64::from(octet & 0x7f);
            pending = true;
            if octet & 0x80 != 0 {
                continue;
            }

            if components.is_empty() {
                let (first, second) = match sub {
                    0..40 => (0, sub),
                    40..80 => (1, sub - 40),
                    _ => (2, sub - 80),
                };
                components.push(first);
                components.push(second);
            } else {
                components.push(sub);
            }
            if components.len() > MAX_COMPONENTS {
                return Err(Error::ObjectIdentifierTooManyComponents(MAX_COMPONENTS));
            }
            sub = 0;
            pending = false;
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        Ok(ObjectIdentifier { components })
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_der_value(value)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let dotted = self
            .components
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", dotted)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|e| Error::ObjectIdentifierInvalidComponent(c.to_string(), e))
            })
            .collect::<Result<Vec<u64>, Error>>()?;
        if components.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        if components.len() > MAX_COMPONENTS {
            return Err(Error::ObjectIdentifierTooManyComponents(MAX_COMPONENTS));
        }
        Ok(ObjectIdentifier { components })
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
