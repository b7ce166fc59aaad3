//! Reference prime-field instantiation.
//!
//! Production B-SIDH deployments supply their own [`FiniteField`] implementation
//! tuned to a specific prime (see Design Notes: the field layer is an external
//! collaborator, not something this crate fixes). `PrimeField` is the
//! arbitrary-modulus instantiation used by this crate's own unit tests and by
//! [`crate::curve::MontgomeryCurveProvider`]'s doctests: the modulus lives in the
//! value itself rather than in a `Lazy<Integer>` const, so the same type works
//! across every test prime instead of one struct per prime family.

use crate::ff::FiniteField;
use crate::utils::conversion;
use rug::Integer;
use std::fmt::Debug;
use std::sync::Arc;

/// An element of `Z/pZ` for a modulus `p` fixed at construction time.
#[derive(Clone)]
pub struct PrimeField {
    val: Integer,
    modulus: Arc<Integer>,
}

impl PrimeField {
    /// Builds the element `val mod modulus`.
    pub fn new(val: Integer, modulus: Arc<Integer>) -> Self {
        let mut val = Integer::from(&val % &*modulus);
        if val < 0 {
            val += &*modulus;
        }
        Self { val, modulus }
    }

    /// Builds a zero-valued element carrying `modulus`, useful as a template
    /// to construct further elements sharing the same field.
    pub fn zero_with_modulus(modulus: Arc<Integer>) -> Self {
        Self {
            val: Integer::new(),
            modulus,
        }
    }

    /// Builds an element from a hexadecimal string, reducing modulo `modulus`.
    pub fn from_hex_str(s: &str, modulus: Arc<Integer>) -> Self {
        let val = conversion::str_to_integer(s);
        Self::new(val, modulus)
    }

    /// The modulus this element was constructed with.
    pub fn modulus(&self) -> &Integer {
        &self.modulus
    }

    fn same_field(&self, other: &Self) -> Self {
        debug_assert_eq!(*self.modulus, *other.modulus, "mismatched prime field moduli");
        Self::zero_with_modulus(self.modulus.clone())
    }
}

impl Debug for PrimeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.val)
    }
}

impl PartialEq for PrimeField {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl FiniteField for PrimeField {
    fn is_zero(&self) -> bool {
        self.val == 0
    }

    fn dimension() -> usize {
        1
    }

    fn order() -> Integer {
        // The modulus is per-instance, not per-type, so the type-level order
        // used for a `QuadraticExtension<PrimeField>` is meaningless in the
        // abstract; callers needing the concrete prime should read `modulus()`.
        Integer::new()
    }

    fn zero() -> Self {
        panic!("PrimeField::zero() requires a modulus; use zero_with_modulus")
    }

    fn one() -> Self {
        panic!("PrimeField::one() requires a modulus; use zero_with_modulus().one_like()")
    }

    fn neg(&self) -> Self {
        let mut out = self.same_field(self);
        out.val = (&*self.modulus - &self.val).into();
        out
    }

    fn inv(&self) -> Self {
        let mut out = self.same_field(self);
        out.val = self
            .val
            .clone()
            .invert(&self.modulus)
            .unwrap_or_else(|_| Integer::new());
        out
    }

    fn add(&self, other: &Self) -> Self {
        Self::new((&self.val + &other.val).into(), self.modulus.clone())
    }

    fn sub(&self, other: &Self) -> Self {
        Self::new((&self.val - &other.val).into(), self.modulus.clone())
    }

    fn mul(&self, other: &Self) -> Self {
        Self::new((&self.val * &other.val).into(), self.modulus.clone())
    }

    fn div(&self, other: &Self) -> Self {
        self.mul(&other.inv())
    }

    fn equals(&self, other: &Self) -> bool {
        self.val == other.val
    }

    fn to_bytes(self) -> Vec<u8> {
        let width = ((self.modulus.significant_bits() as usize) + 7) / 8;
        let hex = self.val.to_string_radix(16);
        let bytes = hex::decode(if hex.len() % 2 == 0 {
            hex.clone()
        } else {
            format!("0{}", hex)
        })
        .expect("rug hex output is always valid hex");
        let mut buf = vec![0u8; width.saturating_sub(bytes.len())];
        buf.extend(bytes);
        buf
    }

    fn from_bytes(_bytes: &[u8]) -> Self {
        panic!("PrimeField::from_bytes requires a modulus; construct via new() then reduce")
    }

    fn zero_like(&self) -> Self {
        Self::zero_with_modulus(self.modulus.clone())
    }

    fn one_like(&self) -> Self {
        Self::new(Integer::from(1), self.modulus.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m() -> Arc<Integer> {
        Arc::new(Integer::from(97))
    }

    fn f(v: i64) -> PrimeField {
        PrimeField::new(Integer::from(v), m())
    }

    #[test]
    fn new_reduces_modulo_p_and_lifts_negatives() {
        assert!(f(100).equals(&f(3)));
        assert!(f(-1).equals(&f(96)));
    }

    #[test]
    fn add_sub_mul_match_hand_computed_values() {
        assert!(f(50).add(&f(60)).equals(&f(13))); // 110 mod 97
        assert!(f(10).sub(&f(20)).equals(&f(87))); // -10 mod 97
        assert!(f(12).mul(&f(13)).equals(&f(59))); // 156 mod 97
    }

    #[test]
    fn neg_is_additive_inverse() {
        let a = f(41);
        let sum = a.add(&a.neg());
        assert!(sum.is_zero());
    }

    #[test]
    fn inv_is_multiplicative_inverse_for_nonzero_elements() {
        for v in 1..97 {
            let a = f(v);
            let product = a.mul(&a.inv());
            assert!(product.equals(&f(1)), "{} * inverse should be 1", v);
        }
    }

    #[test]
    fn zero_like_and_one_like_carry_the_instance_modulus() {
        let a = f(55);
        assert!(a.zero_like().is_zero());
        assert!(a.one_like().equals(&f(1)));
        assert_eq!(*a.zero_like().modulus(), *a.modulus());
    }

    #[test]
    fn to_bytes_round_trips_through_hex_decoding() {
        let a = f(0x1234);
        let bytes = a.clone().to_bytes();
        let hex_str = hex::encode(&bytes);
        let back = PrimeField::from_hex_str(&hex_str, m());
        assert!(back.equals(&a));
    }

    #[test]
    #[should_panic]
    fn zero_panics_without_an_instance() {
        let _ = PrimeField::zero();
    }
}
