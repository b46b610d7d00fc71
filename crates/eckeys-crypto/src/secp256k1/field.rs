//! Prime field arithmetic for secp256k1.
//! p = 2^256 - 2^32 - 977 = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F
//!
//! Elements are always kept fully reduced, so limb equality is value equality.

#![forbid(unsafe_code)]

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::limb::{self, Limbs};

/// The secp256k1 field prime p = 2^256 - 2^32 - 977.
/// Represented as 4 x 64-bit limbs in little-endian order.
const P: Limbs = [
    0xFFFFFFFEFFFFFC2F,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
];

/// p - 2 for Fermat inversion.
const P_MINUS_2: Limbs = [
    0xFFFFFFFEFFFFFC2D,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
];

/// (p + 1) / 4. p = 3 (mod 4), so a^((p+1)/4) is a square root when one exists.
const P_PLUS_1_DIV_4: Limbs = [
    0xFFFFFFFFBFFFFF0C,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0x3FFFFFFFFFFFFFFF,
];

/// 2^256 mod p = 2^32 + 977.
const REDUCTION: u64 = 0x1_0000_03D1;

/// Field element in secp256k1's prime field GF(p).
/// Stored as 4 x 64-bit limbs in little-endian order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldElement {
    limbs: Limbs,
}

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self {
        limbs: [0, 0, 0, 0],
    };

    /// One element.
    pub const ONE: Self = Self {
        limbs: [1, 0, 0, 0],
    };

    /// Create field element from 4 limbs (little-endian).
    /// The caller guarantees the value is below p.
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self { limbs }
    }

    /// Small constant, used for the curve coefficients.
    pub const fn from_u64(value: u64) -> Self {
        Self {
            limbs: [value, 0, 0, 0],
        }
    }

    /// Create field element from bytes (big-endian).
    /// Returns None if value >= p.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = limb::from_be_bytes(bytes);
        if bool::from(limb::lt(&limbs, &P)) {
            Some(Self { limbs })
        } else {
            None
        }
    }

    /// Convert to bytes (big-endian).
    pub fn to_bytes(&self) -> [u8; 32] {
        limb::to_be_bytes(&self.limbs)
    }

    /// Check if zero.
    pub fn is_zero(&self) -> bool {
        limb::is_zero(&self.limbs).into()
    }

    /// Check if self is odd (least significant bit is 1).
    pub fn is_odd(&self) -> bool {
        self.limbs[0] & 1 == 1
    }

    /// Addition: self + other (mod p).
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = limb::add(&self.limbs, &other.limbs);
        Self {
            limbs: limb::sub_if_ge(&sum, carry, &P),
        }
    }

    /// Subtraction: self - other (mod p).
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = limb::sub(&self.limbs, &other.limbs);
        let (wrapped, _) = limb::add(&diff, &P);
        Self {
            limbs: limb::select(&diff, &wrapped, Choice::from(borrow as u8)),
        }
    }

    /// Negation: -self (mod p).
    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Doubling: 2 * self (mod p).
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Multiplication: self * other (mod p).
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce(&limb::mul_wide(&self.limbs, &other.limbs))
    }

    /// Square: self^2 (mod p).
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Reduce 512-bit number mod p.
    /// Uses: 2^256 ≡ 2^32 + 977 (mod p). Fixed number of rounds.
    fn reduce(wide: &[u64; 8]) -> Self {
        // Fold the high half: < 2^256 + 2^290
        let mut r = [0u64; 4];
        let mut carry: u128 = 0;
        for i in 0..4 {
            let t = (wide[i] as u128) + (wide[i + 4] as u128) * (REDUCTION as u128) + carry;
            r[i] = t as u64;
            carry = t >> 64;
        }

        // Fold the 34-bit overflow: leaves at most one carry bit
        let mut t = (r[0] as u128) + carry * (REDUCTION as u128);
        r[0] = t as u64;
        for limb in r.iter_mut().skip(1) {
            t = (*limb as u128) + (t >> 64);
            *limb = t as u64;
        }
        let overflow = (t >> 64) as u64;

        // Fold the last carry bit; the low part is small when it is set
        let mut t = (r[0] as u128) + (overflow as u128) * (REDUCTION as u128);
        r[0] = t as u64;
        for limb in r.iter_mut().skip(1) {
            t = (*limb as u128) + (t >> 64);
            *limb = t as u64;
        }

        Self {
            limbs: limb::sub_if_ge(&r, 0, &P),
        }
    }

    /// Exponentiation: self^exp (mod p).
    /// Square-and-multiply; `exp` is always a public constant.
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut result = Self::ONE;
        let mut base = *self;

        for &limb in exp.iter() {
            for bit in 0..64 {
                if (limb >> bit) & 1 == 1 {
                    result = result.mul(&base);
                }
                base = base.square();
            }
        }

        result
    }

    /// Multiplicative inverse: self^(-1) (mod p).
    /// Uses Fermat's little theorem: a^(-1) = a^(p-2) mod p.
    pub fn inv(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(self.pow(&P_MINUS_2))
    }

    /// Square root, if self is a quadratic residue.
    pub fn sqrt(&self) -> Option<Self> {
        let root = self.pow(&P_PLUS_1_DIV_4);
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            limbs: limb::select(&a.limbs, &b.limbs, choice),
        }
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.limbs[0].ct_eq(&other.limbs[0])
            & self.limbs[1].ct_eq(&other.limbs[1])
            & self.limbs[2].ct_eq(&other.limbs[2])
            & self.limbs[3].ct_eq(&other.limbs[3])
    }
}
