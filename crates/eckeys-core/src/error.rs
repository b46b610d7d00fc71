use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid secret key: must be in range [1, n-1]")]
    InvalidSecretKey,

    #[error("invalid nonce: must be in range [1, n-1]")]
    InvalidNonce,

    #[error("invalid tweak")]
    InvalidTweak,

    #[error("invalid public key encoding ({len} bytes)")]
    InvalidPublicKey { len: usize },

    #[error("invalid signature encoding")]
    InvalidSignature,

    #[error("point at infinity")]
    PointAtInfinity,

    #[error("signing failed: r or s is zero")]
    SigningFailed,
}
