//! secp256k1 elliptic curve implementation.

#![forbid(unsafe_code)]

pub mod field;
mod limb;
pub mod point;
pub mod pubkey;
pub mod scalar;
pub mod table;
