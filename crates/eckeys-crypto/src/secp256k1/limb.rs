//! 4 x 64-bit limb helpers shared by the field and scalar types.
//!
//! Limbs are little-endian. Carries and borrows are 0 or 1 and never
//! drive a branch, so callers can stay constant-time.

use subtle::{Choice, ConditionallySelectable};

pub(crate) type Limbs = [u64; 4];

/// Add with carry: returns (a + b + carry mod 2^64, carry out).
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

/// Subtract with borrow: returns (a - b - borrow mod 2^64, borrow out).
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub((b as u128) + (borrow as u128));
    (t as u64, ((t >> 64) as u64) & 1)
}

pub(crate) fn add(a: &Limbs, b: &Limbs) -> (Limbs, u64) {
    let (r0, c) = adc(a[0], b[0], 0);
    let (r1, c) = adc(a[1], b[1], c);
    let (r2, c) = adc(a[2], b[2], c);
    let (r3, c) = adc(a[3], b[3], c);
    ([r0, r1, r2, r3], c)
}

pub(crate) fn sub(a: &Limbs, b: &Limbs) -> (Limbs, u64) {
    let (r0, b0) = sbb(a[0], b[0], 0);
    let (r1, b1) = sbb(a[1], b[1], b0);
    let (r2, b2) = sbb(a[2], b[2], b1);
    let (r3, b3) = sbb(a[3], b[3], b2);
    ([r0, r1, r2, r3], b3)
}

/// Select `b` when `choice` is set, `a` otherwise.
pub(crate) fn select(a: &Limbs, b: &Limbs, choice: Choice) -> Limbs {
    [
        u64::conditional_select(&a[0], &b[0], choice),
        u64::conditional_select(&a[1], &b[1], choice),
        u64::conditional_select(&a[2], &b[2], choice),
        u64::conditional_select(&a[3], &b[3], choice),
    ]
}

/// Reduce a 257-bit value (`limbs` + `carry` * 2^256) known to be below 2 * `modulus`.
pub(crate) fn sub_if_ge(limbs: &Limbs, carry: u64, modulus: &Limbs) -> Limbs {
    let (diff, borrow) = sub(limbs, modulus);
    // keep the difference if the input overflowed 256 bits or did not borrow
    let use_diff = Choice::from(((carry | (borrow ^ 1)) & 1) as u8);
    select(limbs, &diff, use_diff)
}

/// Schoolbook 256 x 256 -> 512-bit product.
pub(crate) fn mul_wide(a: &Limbs, b: &Limbs) -> [u64; 8] {
    let mut wide = [0u64; 8];
    for i in 0..4 {
        let mut carry: u128 = 0;
        for j in 0..4 {
            let t = (wide[i + j] as u128) + (a[i] as u128) * (b[j] as u128) + carry;
            wide[i + j] = t as u64;
            carry = t >> 64;
        }
        wide[i + 4] = carry as u64;
    }
    wide
}

/// Big-endian bytes -> limbs.
pub(crate) fn from_be_bytes(bytes: &[u8; 32]) -> Limbs {
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = 24 - 8 * i;
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(&bytes[start..start + 8]);
        *limb = u64::from_be_bytes(chunk);
    }
    limbs
}

/// Limbs -> big-endian bytes.
pub(crate) fn to_be_bytes(limbs: &Limbs) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[0..8].copy_from_slice(&limbs[3].to_be_bytes());
    bytes[8..16].copy_from_slice(&limbs[2].to_be_bytes());
    bytes[16..24].copy_from_slice(&limbs[1].to_be_bytes());
    bytes[24..32].copy_from_slice(&limbs[0].to_be_bytes());
    bytes
}

/// Constant-time "a < b".
pub(crate) fn lt(a: &Limbs, b: &Limbs) -> Choice {
    let (_, borrow) = sub(a, b);
    Choice::from(borrow as u8)
}

/// Constant-time "all limbs zero".
pub(crate) fn is_zero(a: &Limbs) -> Choice {
    let folded = a[0] | a[1] | a[2] | a[3];
    // (x | -x) has its top bit set iff x != 0
    let nonzero = (folded | folded.wrapping_neg()) >> 63;
    Choice::from((nonzero ^ 1) as u8)
}
