//! secp256k1 key primitives.
//!
//! - Validation of private scalars and SEC1 public keys
//! - Public key derivation, compressed or uncompressed
//! - ECDSA signing with a caller-supplied nonce, DER output, low-S
//! - Signature verification
//! - Point addition and key tweaks
//!
//! All operations run on a [`Secp256k1`] context. The free functions below
//! use the process-wide context returned by [`ensure_initialized`].

#![forbid(unsafe_code)]

mod context;
mod keys;
mod sign;
mod tweak;

pub use context::{ensure_initialized, Secp256k1};
pub use eckeys_core::{
    EcSecret, Error, HashDigest, Result, EC_COMPRESSED_SIZE, EC_SECRET_SIZE,
    EC_UNCOMPRESSED_SIZE, HASH_DIGEST_SIZE, MAX_SIGNATURE_SIZE,
};
pub use eckeys_crypto::ecdsa::Signature;
pub use eckeys_crypto::secp256k1::pubkey::PublicKey;

/// True if 0 < `secret` < n.
pub fn is_valid_scalar(secret: &EcSecret) -> bool {
    ensure_initialized().is_valid_scalar(secret)
}

/// True if `point` is a valid compressed or uncompressed encoding.
pub fn is_valid_point(point: &[u8]) -> bool {
    ensure_initialized().is_valid_point(point)
}

pub fn derive_public_key(secret: &EcSecret, compressed: bool) -> Result<PublicKey> {
    ensure_initialized().derive_public_key(secret, compressed)
}

/// See [`Secp256k1::sign`].
pub fn sign(secret: &EcSecret, digest: &HashDigest, nonce: &EcSecret) -> Result<Signature> {
    ensure_initialized().sign(secret, digest, nonce)
}

pub fn verify_signature(point: &[u8], digest: &HashDigest, signature: &[u8]) -> bool {
    ensure_initialized().verify_signature(point, digest, signature)
}

pub fn add_points(a: &[u8], b: &[u8]) -> Result<PublicKey> {
    ensure_initialized().add_points(a, b)
}

pub fn add_point_assign(a: &mut PublicKey, b: &[u8]) -> Result<()> {
    ensure_initialized().add_point_assign(a, b)
}

pub fn public_tweak_add(point: &mut PublicKey, tweak: &EcSecret) -> Result<()> {
    ensure_initialized().public_tweak_add(point, tweak)
}

pub fn public_tweak_mul(point: &mut PublicKey, tweak: &EcSecret) -> Result<()> {
    ensure_initialized().public_tweak_mul(point, tweak)
}

pub fn secret_tweak_add(secret: &mut EcSecret, tweak: &EcSecret) -> Result<()> {
    ensure_initialized().secret_tweak_add(secret, tweak)
}

pub fn secret_tweak_mul(secret: &mut EcSecret, tweak: &EcSecret) -> Result<()> {
    ensure_initialized().secret_tweak_mul(secret, tweak)
}
