//! Point addition and additive/multiplicative key tweaks.
//!
//! Every in-place operator leaves its target untouched on error.

use eckeys_core::{EcSecret, Error, Result};
use eckeys_crypto::secp256k1::point::Point;
use eckeys_crypto::secp256k1::pubkey::{decode_point, PublicKey};
use eckeys_crypto::secp256k1::scalar::Scalar;
use log::debug;
use zeroize::Zeroizing;

use crate::context::Secp256k1;
use crate::keys::secret_scalar;

fn point(bytes: &[u8]) -> Result<Point> {
    decode_point(bytes).ok_or(Error::InvalidPublicKey { len: bytes.len() })
}

/// Tweak for addition: any value below n, zero included.
fn additive_tweak(tweak: &EcSecret) -> Result<Zeroizing<Scalar>> {
    Scalar::from_bytes(tweak)
        .map(Zeroizing::new)
        .ok_or(Error::InvalidTweak)
}

/// Tweak for multiplication: [1, n-1].
fn multiplicative_tweak(tweak: &EcSecret) -> Result<Zeroizing<Scalar>> {
    Scalar::from_bytes_nonzero(tweak)
        .map(Zeroizing::new)
        .ok_or(Error::InvalidTweak)
}

fn encode(point: &Point, compressed: bool) -> Result<PublicKey> {
    PublicKey::from_point(point, compressed).ok_or_else(|| {
        debug!("tweak: result is the point at infinity");
        Error::PointAtInfinity
    })
}

impl Secp256k1 {
    /// a + b, always returned compressed.
    pub fn add_points(&self, a: &[u8], b: &[u8]) -> Result<PublicKey> {
        let sum = point(a)?.add(&point(b)?);
        encode(&sum, true)
    }

    /// `a += b`. On success `a` holds the compressed sum.
    pub fn add_point_assign(&self, a: &mut PublicKey, b: &[u8]) -> Result<()> {
        *a = self.add_points(a.as_bytes(), b)?;
        Ok(())
    }

    /// `point += tweak * G`, keeping the point's encoding size.
    pub fn public_tweak_add(&self, point: &mut PublicKey, tweak: &EcSecret) -> Result<()> {
        let t = additive_tweak(tweak)?;
        let sum = point.to_point()?.add(&self.table().mul(&t));
        *point = encode(&sum, point.is_compressed())?;
        Ok(())
    }

    /// `point *= tweak`, keeping the point's encoding size.
    pub fn public_tweak_mul(&self, point: &mut PublicKey, tweak: &EcSecret) -> Result<()> {
        let t = multiplicative_tweak(tweak)?;
        let product = point.to_point()?.mul(&t);
        *point = encode(&product, point.is_compressed())?;
        Ok(())
    }

    /// `secret = (secret + tweak) mod n`.
    pub fn secret_tweak_add(&self, secret: &mut EcSecret, tweak: &EcSecret) -> Result<()> {
        let a = secret_scalar(secret)?;
        let t = additive_tweak(tweak)?;

        let sum = Zeroizing::new(a.add(&t));
        if sum.is_zero() {
            debug!("secret_tweak_add: tweak cancels the secret");
            return Err(Error::InvalidTweak);
        }

        *secret = sum.to_bytes();
        Ok(())
    }

    /// `secret = (secret * tweak) mod n`.
    pub fn secret_tweak_mul(&self, secret: &mut EcSecret, tweak: &EcSecret) -> Result<()> {
        let a = secret_scalar(secret)?;
        let t = multiplicative_tweak(tweak)?;

        // n is prime, so the product of two non-zero scalars is non-zero
        let product = Zeroizing::new(a.mul(&t));
        *secret = product.to_bytes();
        Ok(())
    }
}
