//! Elliptic curve point operations in homogeneous projective coordinates.
//!
//! secp256k1 curve: y² = x³ + 7 over GF(p)
//! Projective: (X, Y, Z) represents affine (X/Z, Y/Z), identity is (0, 1, 0).
//!
//! Addition and doubling use the complete formulas of Renes, Costello and
//! Batina (2015) for a = 0 curves: no input, identity included, takes a
//! different code path.

#![forbid(unsafe_code)]

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::field::FieldElement;
use super::scalar::{Scalar, NIBBLES};

/// Generator point G (affine x-coordinate).
const GX: [u64; 4] = [
    0x59F2815B16F81798,
    0x029BFCDB2DCE28D9,
    0x55A06295CE870B07,
    0x79BE667EF9DCBBAC,
];

/// Generator point G (affine y-coordinate).
const GY: [u64; 4] = [
    0x9C47D08FFB10D4B8,
    0xFD17B448A6855419,
    0x5DA4FBFC0E1108A8,
    0x483ADA7726A3C465,
];

/// Curve coefficient b.
pub const CURVE_B: FieldElement = FieldElement::from_u64(7);

/// 3 * b, used by the complete formulas.
const CURVE_B3: FieldElement = FieldElement::from_u64(21);

const THREE: FieldElement = FieldElement::from_u64(3);

/// Entries in a 4-bit window table.
pub const WINDOW_SIZE: usize = 16;

/// Point on secp256k1 in homogeneous projective coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl Point {
    /// Point at infinity (identity element).
    pub const INFINITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Create point from affine coordinates (x, y).
    /// Does not validate that the point is on the curve.
    pub fn from_affine(x: FieldElement, y: FieldElement) -> Self {
        Self {
            x,
            y,
            z: FieldElement::ONE,
        }
    }

    /// Create point from affine coordinates, rejecting points off the curve.
    pub fn from_affine_checked(x: FieldElement, y: FieldElement) -> Option<Self> {
        if Self::is_on_curve(&x, &y) {
            Some(Self::from_affine(x, y))
        } else {
            None
        }
    }

    /// Create point from an x-coordinate and the parity of y.
    /// Returns None if x³ + 7 has no square root.
    pub fn from_x(x: FieldElement, y_is_odd: bool) -> Option<Self> {
        let rhs = Self::curve_rhs(&x);
        let y = rhs.sqrt()?;
        let y = if y.is_odd() == y_is_odd { y } else { y.neg() };
        Some(Self::from_affine(x, y))
    }

    /// Generator point G.
    pub fn generator() -> Self {
        Self::from_affine(FieldElement::from_limbs(GX), FieldElement::from_limbs(GY))
    }

    /// y² = x³ + 7
    pub fn is_on_curve(x: &FieldElement, y: &FieldElement) -> bool {
        y.square() == Self::curve_rhs(x)
    }

    fn curve_rhs(x: &FieldElement) -> FieldElement {
        x.square().mul(x).add(&CURVE_B)
    }

    /// Check if this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Convert to affine coordinates (x, y).
    /// Returns None for point at infinity.
    pub fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        let z_inv = self.z.inv()?;
        Some((self.x.mul(&z_inv), self.y.mul(&z_inv)))
    }

    /// Negation: -P.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
        }
    }

    /// Point doubling: 2P (RCB algorithm 9).
    pub fn double(&self) -> Self {
        let yy = self.y.square();
        let zz = self.z.square();
        let xy2 = self.x.mul(&self.y).double();

        // 3b·Z², 9b·Z²
        let bzz3 = zz.mul(&CURVE_B3);
        let bzz9 = bzz3.mul(&THREE);

        let yy_m_bzz9 = yy.sub(&bzz9);
        let yy_p_bzz3 = yy.add(&bzz3);

        // 24b·Y²·Z²
        let yy_zz8 = yy.mul(&zz).double().double().double();
        let t = yy_zz8.mul(&CURVE_B3);

        Self {
            x: xy2.mul(&yy_m_bzz9),
            y: yy_m_bzz9.mul(&yy_p_bzz3).add(&t),
            z: yy.mul(&self.y).mul(&self.z).double().double().double(),
        }
    }

    /// Point addition: P1 + P2 (RCB algorithm 7).
    pub fn add(&self, other: &Self) -> Self {
        let xx = self.x.mul(&other.x);
        let yy = self.y.mul(&other.y);
        let zz = self.z.mul(&other.z);

        // Cross terms X1·Y2 + X2·Y1 etc.
        let xy_pairs = self
            .x
            .add(&self.y)
            .mul(&other.x.add(&other.y))
            .sub(&xx.add(&yy));
        let yz_pairs = self
            .y
            .add(&self.z)
            .mul(&other.y.add(&other.z))
            .sub(&yy.add(&zz));
        let xz_pairs = self
            .x
            .add(&self.z)
            .mul(&other.x.add(&other.z))
            .sub(&xx.add(&zz));

        let bzz3 = zz.mul(&CURVE_B3);
        let yy_m_bzz3 = yy.sub(&bzz3);
        let yy_p_bzz3 = yy.add(&bzz3);

        let byz3 = yz_pairs.mul(&CURVE_B3);
        let xx3 = xx.mul(&THREE);
        let bxx9 = xx3.mul(&CURVE_B3);

        Self {
            x: xy_pairs.mul(&yy_m_bzz3).sub(&byz3.mul(&xz_pairs)),
            y: yy_p_bzz3.mul(&yy_m_bzz3).add(&bxx9.mul(&xz_pairs)),
            z: yz_pairs.mul(&yy_p_bzz3).add(&xx3.mul(&xy_pairs)),
        }
    }

    /// The 16 multiples 0·P .. 15·P.
    pub fn window_table(&self) -> [Self; WINDOW_SIZE] {
        let mut table = [Self::INFINITY; WINDOW_SIZE];
        for j in 1..WINDOW_SIZE {
            table[j] = table[j - 1].add(self);
        }
        table
    }

    /// Constant-time `table[index]`: every entry is touched.
    pub fn select(table: &[Self; WINDOW_SIZE], index: u8) -> Self {
        let mut result = Self::INFINITY;
        for (j, entry) in table.iter().enumerate() {
            result.conditional_assign(entry, (j as u8).ct_eq(&index));
        }
        result
    }

    /// Scalar multiplication: k * P.
    /// Fixed 4-bit windows, same sequence of operations for every k.
    pub fn mul(&self, k: &Scalar) -> Self {
        let table = self.window_table();
        let mut result = Self::INFINITY;

        for i in (0..NIBBLES).rev() {
            result = result.double().double().double().double();
            result = result.add(&Self::select(&table, k.nibble(i)));
        }

        result
    }
}

impl ConditionallySelectable for Point {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        // X1/Z1 = X2/Z2 and Y1/Z1 = Y2/Z2, cross-multiplied.
        // Holds for two identities as well: (0, Y1, 0) vs (0, Y2, 0).
        let x_eq = self.x.mul(&other.z).ct_eq(&other.x.mul(&self.z));
        let y_eq = self.y.mul(&other.z).ct_eq(&other.y.mul(&self.z));
        let inf_eq = self.is_infinity() == other.is_infinity();
        bool::from(x_eq & y_eq) && inf_eq
    }
}

impl Eq for Point {}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_from_hex(s: &str) -> Scalar {
        let bytes = hex::decode(s).unwrap();
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Scalar::from_bytes(&arr).unwrap()
    }

    fn assert_on_curve(p: &Point) {
        let (x, y) = p.to_affine().unwrap();
        assert!(Point::is_on_curve(&x, &y), "point not on curve");
    }

    #[test]
    fn test_generator_on_curve() {
        assert_on_curve(&Point::generator());
    }

    #[test]
    fn test_infinity_identity() {
        let g = Point::generator();
        let inf = Point::INFINITY;

        // G + O = G
        assert_eq!(g.add(&inf), g);

        // O + G = G
        assert_eq!(inf.add(&g), g);

        // O + O = O
        assert!(inf.add(&inf).is_infinity());
        assert!(inf.double().is_infinity());
    }

    #[test]
    fn test_inverse_sums_to_infinity() {
        let g = Point::generator();
        assert!(g.add(&g.neg()).is_infinity());
        assert!(g.neg().add(&g).is_infinity());
        assert_ne!(g, Point::INFINITY);
    }

    #[test]
    fn test_double() {
        let g = Point::generator();
        let g2 = g.double();
        assert_on_curve(&g2);

        // G + G = 2G, the complete formula handles equal inputs
        assert_eq!(g.add(&g), g2);
    }

    #[test]
    fn test_add_associative() {
        let g = Point::generator();
        let g2 = g.double();
        let g3 = g2.add(&g);
        assert_on_curve(&g3);
        assert_eq!(g.add(&g2), g2.add(&g));
        assert_eq!(g3.add(&g), g2.double());
    }

    #[test]
    fn test_from_x_recovers_both_parities() {
        let g = Point::generator();
        let (x, y) = g.to_affine().unwrap();

        let same = Point::from_x(x, y.is_odd()).unwrap();
        assert_eq!(same, g);

        let other = Point::from_x(x, !y.is_odd()).unwrap();
        assert_eq!(other, g.neg());
    }

    #[test]
    fn test_from_x_rejects_non_residue() {
        // x = 5: 125 + 7 = 132 is not a square mod p
        assert!(Point::from_x(FieldElement::from_u64(5), false).is_none());
    }

    #[test]
    fn test_from_affine_checked() {
        let (x, y) = Point::generator().to_affine().unwrap();
        assert!(Point::from_affine_checked(x, y).is_some());
        assert!(Point::from_affine_checked(x, y.add(&FieldElement::ONE)).is_none());
    }

    #[test]
    fn test_scalar_mul_small() {
        let g = Point::generator();
        assert_eq!(g.mul(&Scalar::ONE), g);
        assert!(g.mul(&Scalar::ZERO).is_infinity());

        let two =
            scalar_from_hex("0000000000000000000000000000000000000000000000000000000000000002");
        assert_eq!(g.mul(&two), g.double());

        let seventeen =
            scalar_from_hex("0000000000000000000000000000000000000000000000000000000000000011");
        let table = g.window_table();
        assert_eq!(g.mul(&seventeen), table[15].add(&table[2]));
    }

    #[test]
    fn test_scalar_mul_order_minus_one() {
        let g = Point::generator();
        let n_minus_1 = Scalar::ONE.neg();
        assert_eq!(g.mul(&n_minus_1), g.neg());
    }

    #[test]
    fn test_select() {
        let table = Point::generator().window_table();
        for (i, entry) in table.iter().enumerate() {
            assert_eq!(Point::select(&table, i as u8), *entry);
        }
        assert!(Point::select(&table, 0).is_infinity());
    }

    #[test]
    fn test_against_k256() {
        use k256::elliptic_curve::ff::PrimeField;
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        use k256::{FieldBytes, ProjectivePoint, Scalar as K256Scalar};

        fn k256_scalar_from_bytes(b: [u8; 32]) -> K256Scalar {
            Option::<K256Scalar>::from(K256Scalar::from_repr(FieldBytes::from(b))).unwrap()
        }

        let test_scalars = [
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000003",
            "deadbeefcafebabedeadbeefcafebabedeadbeefcafebabedeadbeefcafebabe",
            "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
        ];

        for hex_k in &test_scalars {
            let k = scalar_from_hex(hex_k);
            let (our_x, our_y) = Point::generator().mul(&k).to_affine().unwrap();

            let k256_k = k256_scalar_from_bytes(k.to_bytes());
            let k256_point = ProjectivePoint::GENERATOR * k256_k;
            let k256_encoded = k256_point.to_affine().to_encoded_point(false);

            #[allow(deprecated)]
            let k256_x: [u8; 32] = k256_encoded.x().unwrap().as_slice().try_into().unwrap();
            #[allow(deprecated)]
            let k256_y: [u8; 32] = k256_encoded.y().unwrap().as_slice().try_into().unwrap();

            assert_eq!(our_x.to_bytes(), k256_x, "x mismatch for k = {hex_k}");
            assert_eq!(our_y.to_bytes(), k256_y, "y mismatch for k = {hex_k}");
        }
    }
}
