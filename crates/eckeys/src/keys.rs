//! Validation of raw keys and public key derivation.

use eckeys_core::{EcSecret, Error, Result};
use eckeys_crypto::secp256k1::pubkey::{decode_point, PublicKey};
use eckeys_crypto::secp256k1::scalar::Scalar;
use log::debug;
use zeroize::Zeroizing;

use crate::context::Secp256k1;

/// Parse a secret into a scalar in [1, n-1], wiped on drop.
pub(crate) fn secret_scalar(secret: &EcSecret) -> Result<Zeroizing<Scalar>> {
    Scalar::from_bytes_nonzero(secret)
        .map(Zeroizing::new)
        .ok_or(Error::InvalidSecretKey)
}

impl Secp256k1 {
    /// True if `secret` is a usable private key: 0 < secret < n.
    pub fn is_valid_scalar(&self, secret: &EcSecret) -> bool {
        Scalar::from_bytes_nonzero(secret).is_some()
    }

    /// True if `point` is a 33-byte compressed or 65-byte uncompressed
    /// encoding of a point on the curve.
    pub fn is_valid_point(&self, point: &[u8]) -> bool {
        decode_point(point).is_some()
    }

    /// secret * G, encoded in 33 bytes if `compressed`, 65 otherwise.
    pub fn derive_public_key(&self, secret: &EcSecret, compressed: bool) -> Result<PublicKey> {
        let d = secret_scalar(secret).map_err(|err| {
            debug!("derive_public_key: secret out of range");
            err
        })?;

        let point = self.table().mul(&d);
        let key = PublicKey::from_point(&point, compressed).ok_or(Error::PointAtInfinity)?;

        assert_eq!(key.is_compressed(), compressed, "public key encoding mismatch");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eckeys_core::{EC_COMPRESSED_SIZE, EC_UNCOMPRESSED_SIZE};

    const N: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";
    const N_MINUS_1: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140";

    fn secret(hex_str: &str) -> EcSecret {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_scalar_range() {
        let ctx = Secp256k1::shared();
        let mut one = [0u8; 32];
        one[31] = 1;

        assert!(!ctx.is_valid_scalar(&[0u8; 32]));
        assert!(ctx.is_valid_scalar(&one));
        assert!(ctx.is_valid_scalar(&secret(N_MINUS_1)));
        assert!(!ctx.is_valid_scalar(&secret(N)));
        assert!(!ctx.is_valid_scalar(&[0xFFu8; 32]));
    }

    #[test]
    fn test_point_validation() {
        let ctx = Secp256k1::shared();
        let g = ctx.derive_public_key(&secret(&format!("{:064x}", 1)), true).unwrap();

        assert!(ctx.is_valid_point(g.as_bytes()));
        assert!(!ctx.is_valid_point(&[]));
        assert!(!ctx.is_valid_point(&g.as_bytes()[..32]));

        let mut hybrid = g.to_format(false).unwrap().to_vec();
        hybrid[0] = 0x06;
        assert!(!ctx.is_valid_point(&hybrid));
    }

    #[test]
    fn test_derive_generator() {
        let ctx = Secp256k1::shared();
        let one = secret(&format!("{:064x}", 1));

        let compressed = ctx.derive_public_key(&one, true).unwrap();
        assert_eq!(
            hex::encode(compressed.as_bytes()),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(compressed.len(), EC_COMPRESSED_SIZE);

        let uncompressed = ctx.derive_public_key(&one, false).unwrap();
        assert_eq!(
            hex::encode(uncompressed.as_bytes()),
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
             483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
        assert_eq!(uncompressed.len(), EC_UNCOMPRESSED_SIZE);
    }

    #[test]
    fn test_derive_rejects_invalid_secret() {
        let ctx = Secp256k1::shared();
        for bad in [[0u8; 32], secret(N), [0xFFu8; 32]] {
            assert_eq!(
                ctx.derive_public_key(&bad, true).unwrap_err(),
                Error::InvalidSecretKey
            );
        }
    }

    #[test]
    fn test_derive_against_k256() {
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        use k256::SecretKey;

        let ctx = Secp256k1::new();
        let secrets = [
            "0000000000000000000000000000000000000000000000000000000000000003",
            "c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721",
            "deadbeefcafebabedeadbeefcafebabedeadbeefcafebabedeadbeefcafebabe",
            N_MINUS_1,
        ];

        for hex_secret in &secrets {
            let d = secret(hex_secret);
            let theirs = SecretKey::from_slice(&d).unwrap().public_key();

            for compressed in [true, false] {
                let ours = ctx.derive_public_key(&d, compressed).unwrap();
                assert_eq!(
                    ours.as_bytes(),
                    theirs.to_encoded_point(compressed).as_bytes(),
                    "mismatch for {hex_secret}, compressed = {compressed}"
                );
            }
        }
    }
}
