//! Decoder trait for type-safe conversions.
//!
//! The `Decoder` trait converts a source representation `T` into a
//! destination `D`. The decode pipeline uses it for every hop:
//! Base64 payload to DER bytes, and byte buffer to TLV header.
//!
//! # Design Pattern
//!
//! 1. `Decoder<T, D>` - performs the conversion
//! 2. `DecodableFrom<T>` - marker trait constraining valid conversions
//!
//! Only pairs that opt in through `DecodableFrom` can be decoded, so a
//! mistaken conversion is a compile error rather than a runtime failure.
//!
//! # Implementation Guide
//!
//! ```no_run
//! use certalize::decoder::{Decoder, DecodableFrom};
//!
//! struct Armored(String);
//! struct Payload(Vec<u8>);
//!
//! #[derive(Debug)]
//! struct MyError;
//!
//! impl DecodableFrom<Armored> for Payload {}
//!
//! impl Decoder<Armored, Payload> for Armored {
//!     type Error = MyError;
//!
//!     fn decode(&self) -> Result<Payload, Self::Error> {
//!         Ok(Payload(self.0.as_bytes().to_vec()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type; the destination must implement
/// [`DecodableFrom<T>`].
///
/// # Examples
///
/// ```no_run
/// use certalize::decoder::{Decoder, DecodableFrom};
///
/// struct Octets(Vec<u8>);
///
/// #[derive(Debug)]
/// struct Empty;
///
/// impl DecodableFrom<Vec<u8>> for Octets {}
///
/// impl Decoder<Vec<u8>, Octets> for Vec<u8> {
///     type Error = Empty;
///
///     fn decode(&self) -> Result<Octets, Self::Error> {
///         if self.is_empty() {
///             return Err(Empty);
///         }
///         Ok(Octets(self.clone()))
///     }
/// }
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails. The conditions depend on
    /// the implementing type.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// Has no methods. Implement it for each destination type that a source
/// type may be decoded into.
pub trait DecodableFrom<T> {}

#[cfg(test)]
mod tests {
    use super::{DecodableFrom, Decoder};

    struct Text(&'static str);
    #[derive(Debug, PartialEq)]
    struct Upper(String);

    impl DecodableFrom<Text> for Upper {}

    impl Decoder<Text, Upper> for Text {
        type Error = ();

        fn decode(&self) -> Result<Upper, Self::Error> {
            if self.0.is_empty() {
                return Err(());
            }
            Ok(Upper(self.0.to_uppercase()))
        }
    }

    #[test]
    fn test_decode_through_marker() {
        let upper: Upper = Text("pem").decode().unwrap();
        assert_eq!(Upper("PEM".to_string()), upper);
    }

    #[test]
    fn test_decode_error() {
        let result: Result<Upper, ()> = Text("").decode();
        assert!(result.is_err());
    }
}
