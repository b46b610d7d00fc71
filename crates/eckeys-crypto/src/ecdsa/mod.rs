//! ECDSA over secp256k1 with a caller-supplied nonce.
//!
//! Signing:
//! 1. R = k·G, r = x(R) mod n; r = 0 fails
//! 2. s = k⁻¹(z + r·d) mod n; s = 0 fails
//! 3. s is replaced by n - s when s > n/2 (low-S)
//!
//! Verification:
//! 1. r, s in [1, n-1]
//! 2. w = s⁻¹, u₁ = z·w, u₂ = r·w
//! 3. R = u₁·G + u₂·Q; identity fails
//! 4. accept iff x(R) mod n = r
//!
//! The digest z is the 32-byte message hash reduced mod n.

#![forbid(unsafe_code)]

pub mod der;

use eckeys_core::{Error, Result};
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::secp256k1::point::Point;
use crate::secp256k1::scalar::Scalar;
use crate::secp256k1::table::GeneratorTable;

pub use der::Signature;

/// Sign a digest. `d` and `k` must both be in [1, n-1].
///
/// Deterministic in (d, z, k): no randomness is drawn here.
pub fn sign_prehashed(
    table: &GeneratorTable,
    d: &Scalar,
    digest: &[u8; 32],
    k: &Scalar,
) -> Result<Signature> {
    if d.is_zero() {
        return Err(Error::InvalidSecretKey);
    }
    if k.is_zero() {
        return Err(Error::InvalidNonce);
    }

    let z = Scalar::from_bytes_reduced(digest);

    let (x, _) = table.mul(k).to_affine().ok_or(Error::SigningFailed)?;
    let r = Scalar::from_bytes_reduced(&x.to_bytes());
    if r.is_zero() {
        return Err(Error::SigningFailed);
    }

    let mut k_inv = k.inv().ok_or(Error::InvalidNonce)?;
    let mut rd = r.mul(d);
    let mut z_rd = z.add(&rd);
    let s = k_inv.mul(&z_rd);
    k_inv.zeroize();
    rd.zeroize();
    z_rd.zeroize();

    if s.is_zero() {
        return Err(Error::SigningFailed);
    }

    let s = Scalar::conditional_select(&s, &s.neg(), (s.is_high() as u8).into());
    Ok(Signature::from_components(&r.to_bytes(), &s.to_bytes()))
}

/// Verify (r, s) against a public point and digest.
///
/// High-S signatures are accepted; low-S is a signing policy.
pub fn verify_prehashed(
    table: &GeneratorTable,
    q: &Point,
    digest: &[u8; 32],
    signature: &Signature,
) -> bool {
    if q.is_infinity() {
        return false;
    }

    let Ok((r_bytes, s_bytes)) = signature.components() else {
        return false;
    };
    let (Some(r), Some(s)) = (
        Scalar::from_bytes_nonzero(&r_bytes),
        Scalar::from_bytes_nonzero(&s_bytes),
    ) else {
        return false;
    };

    let z = Scalar::from_bytes_reduced(digest);
    let Some(w) = s.inv() else {
        return false;
    };
    let u1 = z.mul(&w);
    let u2 = r.mul(&w);

    let Some((x, _)) = table.mul_add(&u1, q, &u2).to_affine() else {
        return false;
    };

    Scalar::from_bytes_reduced(&x.to_bytes()).ct_eq(&r).into()
}
