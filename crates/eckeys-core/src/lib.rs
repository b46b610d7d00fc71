//! Core types, sizes, and error type for eckeys.

#![forbid(unsafe_code)]

mod error;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// 32-byte big-endian secret scalar (private key, nonce, or tweak).
pub type EcSecret = [u8; EC_SECRET_SIZE];

/// 32-byte message digest. Hashing happens outside this crate.
pub type HashDigest = [u8; HASH_DIGEST_SIZE];

/// Secret scalar size in bytes.
pub const EC_SECRET_SIZE: usize = 32;

/// Digest size in bytes.
pub const HASH_DIGEST_SIZE: usize = 32;

/// Compressed point size: parity prefix + x.
pub const EC_COMPRESSED_SIZE: usize = 33;

/// Uncompressed point size: 0x04 + x + y.
pub const EC_UNCOMPRESSED_SIZE: usize = 65;

/// Upper bound of a DER-encoded secp256k1 signature.
///
/// SEQUENCE header (2) + two INTEGERs of at most 33 bytes each with 2-byte headers.
pub const MAX_SIGNATURE_SIZE: usize = 72;
