//! ECDSA signing with a caller-supplied nonce, and verification.

use eckeys_core::{EcSecret, Error, HashDigest, Result};
use eckeys_crypto::ecdsa::{self, Signature};
use eckeys_crypto::secp256k1::pubkey::decode_point;
use eckeys_crypto::secp256k1::scalar::Scalar;
use log::{debug, trace};
use zeroize::Zeroizing;

use crate::context::Secp256k1;
use crate::keys::secret_scalar;

impl Secp256k1 {
    /// Sign `digest` with `secret`, using `nonce` as k.
    ///
    /// The same (secret, digest, nonce) always yields the same DER bytes.
    /// The nonce is checked before any signing work is done.
    pub fn sign(
        &self,
        secret: &EcSecret,
        digest: &HashDigest,
        nonce: &EcSecret,
    ) -> Result<Signature> {
        let Some(k) = Scalar::from_bytes_nonzero(nonce).map(Zeroizing::new) else {
            debug!("sign: nonce out of range");
            return Err(Error::InvalidNonce);
        };
        let d = secret_scalar(secret).map_err(|err| {
            debug!("sign: secret out of range");
            err
        })?;

        ecdsa::sign_prehashed(self.table(), &d, digest, &k)
    }

    /// Check a DER `signature` over `digest` against an encoded public key.
    ///
    /// Malformed keys and signatures are reported as `false`.
    pub fn verify_signature(&self, point: &[u8], digest: &HashDigest, signature: &[u8]) -> bool {
        let Some(q) = decode_point(point) else {
            trace!("verify_signature: bad public key ({} bytes)", point.len());
            return false;
        };
        let Ok(sig) = Signature::from_der(signature) else {
            trace!("verify_signature: bad DER ({} bytes)", signature.len());
            return false;
        };

        ecdsa::verify_prehashed(self.table(), &q, digest, &sig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eckeys_core::MAX_SIGNATURE_SIZE;
    use sha2::{Digest, Sha256};

    const SECRET: &str = "c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721";
    const NONCE: &str = "a6e3c57dd01abe90086538398355dd4c3b17aa873382b0f24d6129493d8aad60";

    fn bytes32(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    fn digest(message: &[u8]) -> HashDigest {
        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(message));
        out
    }

    #[test]
    fn test_known_signature() {
        let ctx = Secp256k1::shared();
        let sig = ctx
            .sign(&bytes32(SECRET), &digest(b"sample"), &bytes32(NONCE))
            .unwrap();

        assert_eq!(
            hex::encode(sig.as_bytes()),
            "30440220432310e32cb80eb6503a26ce83cc165c783b870845fb8aad6d970889fcd7a6c8\
             0220530128b6b81c548874a6305d93ed071ca6e05074d85863d4056ce89b02bfab69"
        );
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let ctx = Secp256k1::shared();
        let secret = bytes32(SECRET);
        let hash = digest(b"round trip");
        let sig = ctx.sign(&secret, &hash, &bytes32(NONCE)).unwrap();
        assert!(sig.len() <= MAX_SIGNATURE_SIZE);

        for compressed in [true, false] {
            let key = ctx.derive_public_key(&secret, compressed).unwrap();
            assert!(ctx.verify_signature(key.as_bytes(), &hash, sig.as_bytes()));
            assert!(!ctx.verify_signature(key.as_bytes(), &digest(b"other"), sig.as_bytes()));
        }
    }

    #[test]
    fn test_sign_is_deterministic() {
        let ctx = Secp256k1::shared();
        let hash = digest(b"same inputs");
        let a = ctx.sign(&bytes32(SECRET), &hash, &bytes32(NONCE)).unwrap();
        let b = ctx.sign(&bytes32(SECRET), &hash, &bytes32(NONCE)).unwrap();
        assert_eq!(a, b);

        // a different nonce gives a different signature
        let mut other = bytes32(NONCE);
        other[31] ^= 1;
        let c = ctx.sign(&bytes32(SECRET), &hash, &other).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_nonce_rejected() {
        let ctx = Secp256k1::shared();
        let hash = digest(b"nonce");
        let n = bytes32("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

        for bad in [[0u8; 32], n, [0xFFu8; 32]] {
            assert_eq!(
                ctx.sign(&bytes32(SECRET), &hash, &bad).unwrap_err(),
                Error::InvalidNonce
            );
        }
        // nonce is checked first even when the secret is also bad
        assert_eq!(
            ctx.sign(&[0u8; 32], &hash, &[0u8; 32]).unwrap_err(),
            Error::InvalidNonce
        );
    }

    #[test]
    fn test_invalid_secret_rejected() {
        let ctx = Secp256k1::shared();
        assert_eq!(
            ctx.sign(&[0u8; 32], &digest(b"secret"), &bytes32(NONCE))
                .unwrap_err(),
            Error::InvalidSecretKey
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let ctx = Secp256k1::shared();
        let secret = bytes32(SECRET);
        let hash = digest(b"garbage");
        let key = ctx.derive_public_key(&secret, true).unwrap();
        let sig = ctx.sign(&secret, &hash, &bytes32(NONCE)).unwrap();

        assert!(!ctx.verify_signature(&[], &hash, sig.as_bytes()));
        assert!(!ctx.verify_signature(&[0u8; 33], &hash, sig.as_bytes()));
        assert!(!ctx.verify_signature(key.as_bytes(), &hash, &[]));
        assert!(!ctx.verify_signature(key.as_bytes(), &hash, &[0x30; 80]));

        let mut trailing = sig.clone().into_vec();
        trailing.push(0x00);
        assert!(!ctx.verify_signature(key.as_bytes(), &hash, &trailing));
    }

    #[test]
    fn test_verify_k256_signature() {
        use k256::ecdsa::signature::hazmat::PrehashSigner;
        use k256::ecdsa::{Signature as K256Signature, SigningKey};

        let ctx = Secp256k1::shared();
        let secret = bytes32(SECRET);
        let hash = digest(b"from k256");

        let signing_key = SigningKey::from_bytes(&secret.into()).unwrap();
        let theirs: K256Signature = signing_key.sign_prehash(&hash).unwrap();
        let key = ctx.derive_public_key(&secret, false).unwrap();

        assert!(ctx.verify_signature(key.as_bytes(), &hash, theirs.to_der().as_bytes()));
    }
}
