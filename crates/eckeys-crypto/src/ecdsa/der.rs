//! DER signature encoding.
//!
//! SEQUENCE { INTEGER r, INTEGER s } with minimal, positive integers:
//!
//! ```text
//! 0x30 [total-len] 0x02 [r-len] [r] 0x02 [s-len] [s]
//! ```
//!
//! Parsing is strict: short-form lengths only, no trailing bytes, no
//! negative integers, no superfluous leading zeros.

#![forbid(unsafe_code)]

use std::fmt;

use eckeys_core::{Error, Result, MAX_SIGNATURE_SIZE};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// Smallest valid encoding: two one-byte integers.
const MIN_SIGNATURE_SIZE: usize = 8;

/// DER-encoded ECDSA signature, at most 72 bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Encode (r, s), each given as 32 big-endian bytes.
    pub fn from_components(r: &[u8; 32], s: &[u8; 32]) -> Self {
        let r = encode_integer(r);
        let s = encode_integer(s);

        let mut der = Vec::with_capacity(MAX_SIGNATURE_SIZE);
        der.push(TAG_SEQUENCE);
        der.push((r.len() + s.len() + 4) as u8);
        der.push(TAG_INTEGER);
        der.push(r.len() as u8);
        der.extend_from_slice(&r);
        der.push(TAG_INTEGER);
        der.push(s.len() as u8);
        der.extend_from_slice(&s);

        assert!(der.len() <= MAX_SIGNATURE_SIZE, "DER signature exceeds 72 bytes");
        Self(der)
    }

    /// Parse a DER signature, validating the encoding.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        parse(der)?;
        Ok(Self(der.to_vec()))
    }

    /// The (r, s) integers, left-padded to 32 bytes.
    pub fn components(&self) -> Result<([u8; 32], [u8; 32])> {
        parse(&self.0)
    }

    /// 64-byte compact form: r || s.
    pub fn compact(&self) -> Result<[u8; 64]> {
        let (r, s) = self.components()?;
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&r);
        out[32..].copy_from_slice(&s);
        Ok(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Signature(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}

/// Minimal positive DER integer for a 32-byte big-endian value.
fn encode_integer(value: &[u8; 32]) -> Vec<u8> {
    // keep at least one byte, so zero encodes as 0x00
    let start = value.iter().position(|&b| b != 0).unwrap_or(31);
    let trimmed = &value[start..];

    let mut out = Vec::with_capacity(33);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

fn parse(der: &[u8]) -> Result<([u8; 32], [u8; 32])> {
    if der.len() < MIN_SIGNATURE_SIZE || der.len() > MAX_SIGNATURE_SIZE {
        return Err(Error::InvalidSignature);
    }
    if der[0] != TAG_SEQUENCE || der[1] as usize != der.len() - 2 {
        return Err(Error::InvalidSignature);
    }

    let (r, rest) = parse_integer(&der[2..])?;
    let (s, rest) = parse_integer(rest)?;
    if !rest.is_empty() {
        return Err(Error::InvalidSignature);
    }

    Ok((r, s))
}

/// Parse one INTEGER, returning its value and the remaining input.
fn parse_integer(input: &[u8]) -> Result<([u8; 32], &[u8])> {
    let (header, body) = match input {
        [TAG_INTEGER, len, body @ ..] => (*len as usize, body),
        _ => return Err(Error::InvalidSignature),
    };
    if header == 0 || header > body.len() {
        return Err(Error::InvalidSignature);
    }

    let (bytes, rest) = body.split_at(header);

    // negative
    if bytes[0] & 0x80 != 0 {
        return Err(Error::InvalidSignature);
    }
    // superfluous leading zero
    if bytes.len() > 1 && bytes[0] == 0x00 && bytes[1] & 0x80 == 0 {
        return Err(Error::InvalidSignature);
    }

    let magnitude = if bytes[0] == 0x00 && bytes.len() > 1 {
        &bytes[1..]
    } else {
        bytes
    };
    if magnitude.len() > 32 {
        return Err(Error::InvalidSignature);
    }

    let mut value = [0u8; 32];
    value[32 - magnitude.len()..].copy_from_slice(magnitude);
    Ok((value, rest))
}
