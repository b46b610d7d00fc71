//! Cryptographic primitives for eckeys.
//!
//! The secp256k1 engine is implemented from scratch and is the only curve
//! arithmetic in the workspace. Reference crates (k256, sha2) are
//! dev-dependencies only.

#![forbid(unsafe_code)]

pub mod ecdsa;
pub mod secp256k1;
