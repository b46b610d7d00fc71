//! SEC1 public key encoding.
//!
//! Compressed format (33 bytes): [prefix][x-coordinate]
//! - prefix: 0x02 if y is even, 0x03 if y is odd
//!
//! Uncompressed format (65 bytes): [0x04][x-coordinate][y-coordinate]
//!
//! Coordinates are 32 bytes big-endian. No other length or prefix is accepted.

#![forbid(unsafe_code)]

use std::fmt;

use eckeys_core::{Error, Result, EC_COMPRESSED_SIZE, EC_UNCOMPRESSED_SIZE};

use super::field::FieldElement;
use super::point::Point;

const TAG_EVEN: u8 = 0x02;
const TAG_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

/// Decode a SEC1 encoding into a curve point.
/// Returns None for anything that is not a valid, finite point.
pub fn decode_point(bytes: &[u8]) -> Option<Point> {
    match (bytes.len(), bytes.first()) {
        (EC_COMPRESSED_SIZE, Some(&tag)) if tag == TAG_EVEN || tag == TAG_ODD => {
            let x = FieldElement::from_bytes(bytes[1..33].try_into().ok()?)?;
            Point::from_x(x, tag == TAG_ODD)
        }
        (EC_UNCOMPRESSED_SIZE, Some(&TAG_UNCOMPRESSED)) => {
            let x = FieldElement::from_bytes(bytes[1..33].try_into().ok()?)?;
            let y = FieldElement::from_bytes(bytes[33..65].try_into().ok()?)?;
            Point::from_affine_checked(x, y)
        }
        _ => None,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Repr {
    Compressed([u8; EC_COMPRESSED_SIZE]),
    Uncompressed([u8; EC_UNCOMPRESSED_SIZE]),
}

/// A validated public key in one of the two SEC1 encodings.
///
/// Only constructed from a finite point on the curve, so every value is
/// safe to feed back into arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    repr: Repr,
}

impl PublicKey {
    /// Encode a point. Returns None for the point at infinity.
    pub fn from_point(point: &Point, compressed: bool) -> Option<Self> {
        let (x, y) = point.to_affine()?;

        let repr = if compressed {
            let mut bytes = [0u8; EC_COMPRESSED_SIZE];
            bytes[0] = if y.is_odd() { TAG_ODD } else { TAG_EVEN };
            bytes[1..33].copy_from_slice(&x.to_bytes());
            Repr::Compressed(bytes)
        } else {
            let mut bytes = [0u8; EC_UNCOMPRESSED_SIZE];
            bytes[0] = TAG_UNCOMPRESSED;
            bytes[1..33].copy_from_slice(&x.to_bytes());
            bytes[33..65].copy_from_slice(&y.to_bytes());
            Repr::Uncompressed(bytes)
        };

        Some(Self { repr })
    }

    /// Parse and validate a SEC1 encoding, keeping its format.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let invalid = Error::InvalidPublicKey { len: bytes.len() };
        let point = decode_point(bytes).ok_or(invalid)?;
        Self::from_point(&point, bytes.len() == EC_COMPRESSED_SIZE).ok_or(invalid)
    }

    /// Decode back into a curve point.
    pub fn to_point(&self) -> Result<Point> {
        decode_point(self.as_bytes()).ok_or(Error::InvalidPublicKey { len: self.len() })
    }

    /// The same key re-encoded in the requested format.
    pub fn to_format(&self, compressed: bool) -> Result<Self> {
        let point = self.to_point()?;
        Self::from_point(&point, compressed).ok_or(Error::PointAtInfinity)
    }

    /// Raw encoded bytes (33 or 65).
    pub fn as_bytes(&self) -> &[u8] {
        match &self.repr {
            Repr::Compressed(bytes) => bytes,
            Repr::Uncompressed(bytes) => bytes,
        }
    }

    /// Copy of the encoded bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.repr, Repr::Compressed(_))
    }

    /// Encoded length: 33 or 65.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Always false; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PublicKey(")?;
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}
