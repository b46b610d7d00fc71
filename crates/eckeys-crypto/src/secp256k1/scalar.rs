//! Scalar arithmetic modulo curve order n.
//!
//! n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
//! Used for private keys, nonces, tweaks, and the ECDSA equations.

#![forbid(unsafe_code)]

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::limb::{self, Limbs};

/// The secp256k1 curve order n.
/// Represented as 4 x 64-bit limbs in little-endian order.
const N: Limbs = [
    0xBFD25E8CD0364141,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// n - 2 for Fermat inversion.
const N_MINUS_2: Limbs = [
    0xBFD25E8CD036413F,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// floor(n / 2), the largest "low" s value.
const N_HALF: Limbs = [
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
];

/// 2^256 - n, a 129-bit value.
const NEG_N: [u64; 3] = [0x402DA1732FC9BEBF, 0x4551231950B75FC4, 0x1];

/// Number of 4-bit windows in a scalar.
pub const NIBBLES: usize = 64;

/// Scalar element in Z/nZ where n is the secp256k1 curve order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scalar {
    limbs: Limbs,
}

impl Scalar {
    /// Zero scalar.
    pub const ZERO: Self = Self {
        limbs: [0, 0, 0, 0],
    };

    /// One scalar.
    pub const ONE: Self = Self {
        limbs: [1, 0, 0, 0],
    };

    /// Create scalar from 4 limbs (little-endian).
    /// The caller guarantees the value is below n.
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self { limbs }
    }

    /// Create scalar from bytes (big-endian).
    /// Returns None if value >= n.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = limb::from_be_bytes(bytes);
        if bool::from(limb::lt(&limbs, &N)) {
            Some(Self { limbs })
        } else {
            None
        }
    }

    /// Create scalar from bytes (big-endian), reducing mod n.
    /// Any 256-bit value is below 2n, so one conditional subtraction suffices.
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        let limbs = limb::from_be_bytes(bytes);
        Self {
            limbs: limb::sub_if_ge(&limbs, 0, &N),
        }
    }

    /// Create a non-zero scalar from bytes: the range [1, n-1] valid for
    /// private keys and nonces.
    pub fn from_bytes_nonzero(bytes: &[u8; 32]) -> Option<Self> {
        Self::from_bytes(bytes).filter(|s| !s.is_zero())
    }

    /// Convert to bytes (big-endian).
    pub fn to_bytes(&self) -> [u8; 32] {
        limb::to_be_bytes(&self.limbs)
    }

    /// Check if zero.
    pub fn is_zero(&self) -> bool {
        limb::is_zero(&self.limbs).into()
    }

    /// True if self > n/2.
    pub fn is_high(&self) -> bool {
        limb::lt(&N_HALF, &self.limbs).into()
    }

    /// 4-bit window `i`, counted from the least significant end.
    pub fn nibble(&self, i: usize) -> u8 {
        ((self.limbs[i / 16] >> ((i % 16) * 4)) & 0xF) as u8
    }

    /// Addition: self + other (mod n).
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = limb::add(&self.limbs, &other.limbs);
        Self {
            limbs: limb::sub_if_ge(&sum, carry, &N),
        }
    }

    /// Subtraction: self - other (mod n).
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = limb::sub(&self.limbs, &other.limbs);
        let (wrapped, _) = limb::add(&diff, &N);
        Self {
            limbs: limb::select(&diff, &wrapped, Choice::from(borrow as u8)),
        }
    }

    /// Negation: -self (mod n).
    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Multiplication: self * other (mod n).
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce_wide(&limb::mul_wide(&self.limbs, &other.limbs))
    }

    /// Reduce a 512-bit number mod n.
    ///
    /// Uses 2^256 ≡ NEG_N (mod n): each fold replaces high * 2^256 with
    /// high * NEG_N. Bounds after each round: 2^386, 2^260, 2^256 + 2^133,
    /// so a final conditional subtraction lands in [0, n).
    fn reduce_wide(wide: &[u64; 8]) -> Self {
        let once = Self::fold(&wide[..4], &wide[4..]);
        let twice = Self::fold(&once[..4], &once[4..]);
        let thrice = Self::fold(&twice[..4], &twice[4..]);

        let low = [thrice[0], thrice[1], thrice[2], thrice[3]];
        Self {
            limbs: limb::sub_if_ge(&low, thrice[4], &N),
        }
    }

    /// low + high * NEG_N, with every carry propagated to the top limb.
    fn fold(low: &[u64], high: &[u64]) -> [u64; 8] {
        let mut acc = [0u64; 8];
        acc[..4].copy_from_slice(low);

        for (i, &h) in high.iter().enumerate() {
            let mut carry: u128 = 0;
            for (j, &c) in NEG_N.iter().enumerate() {
                let t = (acc[i + j] as u128) + (h as u128) * (c as u128) + carry;
                acc[i + j] = t as u64;
                carry = t >> 64;
            }
            for slot in acc.iter_mut().skip(i + NEG_N.len()) {
                let t = (*slot as u128) + carry;
                *slot = t as u64;
                carry = t >> 64;
            }
        }

        acc
    }

    /// Square: self^2 (mod n).
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Exponentiation with a public exponent.
    fn pow(&self, exp: &Limbs) -> Self {
        let mut result = Self::ONE;
        let mut base = *self;

        for &word in exp.iter() {
            for bit in 0..64 {
                if (word >> bit) & 1 == 1 {
                    result = result.mul(&base);
                }
                base = base.square();
            }
        }

        result
    }

    /// Multiplicative inverse: self^(-1) (mod n), via a^(n-2).
    /// Returns None for zero.
    pub fn inv(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(self.pow(&N_MINUS_2))
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            limbs: limb::select(&a.limbs, &b.limbs, choice),
        }
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.limbs[0].ct_eq(&other.limbs[0])
            & self.limbs[1].ct_eq(&other.limbs[1])
            & self.limbs[2].ct_eq(&other.limbs[2])
            & self.limbs[3].ct_eq(&other.limbs[3])
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
    }
}
