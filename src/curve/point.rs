//! x-only points in projective coordinates.

use crate::ff::FiniteField;
use std::fmt::{Debug, Formatter, Result};

/// Point defined by (X : Z) in projective coordinates
#[derive(Clone)]
pub struct Point<K: FiniteField + Clone> {
    /// X coordinate in projective space
    pub x: K,
    /// Z coordinate in projective space
    pub z: K,
}

impl<K: FiniteField + Clone + Debug> Debug for Point<K> {
    /// A point is represented as (x : z)
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "({:?}:{:?})", self.x, self.z)
    }
}

impl<K: FiniteField + Clone> Point<K> {
    /// Returns the point (x : 1)
    pub fn from_x(x: K) -> Self {
        let z = x.one_like();
        Self { x, z }
    }

    /// Returns the point at infinity, (1 : 0), for a field whose identities
    /// need no instance to derive (e.g. a fixed-modulus field). Fields whose
    /// identity is instance-dependent (a runtime modulus) should use
    /// [`Point::infinity_like`] instead.
    pub fn infinity() -> Self {
        Self {
            x: K::one(),
            z: K::zero(),
        }
    }

    /// Returns the point at infinity for the same field as `sample`, without
    /// requiring a parameterless `K::one()`/`K::zero()` (ref
    /// [`FiniteField::one_like`]).
    pub fn infinity_like(sample: &K) -> Self {
        Self {
            x: sample.one_like(),
            z: sample.zero_like(),
        }
    }
}

impl<K: FiniteField + Clone> PartialEq<Self> for Point<K> {
    /// Two points are equal if (z != 0 and x/z) match, or if z = 0 for both
    fn eq(&self, other: &Self) -> bool {
        let other_zero = other.z.is_zero();
        if self.z.is_zero() {
            other_zero
        } else if other_zero {
            false
        } else {
            self.x.div(&self.z).equals(&other.x.div(&other.z))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ff::prime::PrimeField;
    use rug::Integer;
    use std::sync::Arc;

    fn modulus() -> Arc<Integer> {
        Arc::new(Integer::from(97))
    }

    fn f(v: i64) -> PrimeField {
        PrimeField::new(Integer::from(v), modulus())
    }

    #[test]
    fn from_x_sets_z_to_one() {
        let p = Point::from_x(f(11));
        assert!(p.z.equals(&f(1)));
    }

    #[test]
    fn infinity_like_is_one_over_zero() {
        let sample = f(11);
        let inf = Point::infinity_like(&sample);
        assert!(inf.x.equals(&f(1)));
        assert!(inf.z.is_zero());
    }

    #[test]
    fn two_infinities_are_equal_regardless_of_x() {
        let a = Point::infinity_like(&f(11));
        let b = Point { x: f(42), z: f(0) };
        assert_eq!(a, b);
    }

    #[test]
    fn an_infinity_and_a_finite_point_are_never_equal() {
        let inf = Point::infinity_like(&f(11));
        let finite = Point::from_x(f(11));
        assert_ne!(inf, finite);
        assert_ne!(finite, inf);
    }

    #[test]
    fn finite_points_compare_by_their_affine_ratio() {
        // (22:2) and (11:1) both represent affine x = 11 mod 97.
        let a = Point { x: f(22), z: f(2) };
        let b = Point::from_x(f(11));
        assert_eq!(a, b);

        let c = Point::from_x(f(12));
        assert_ne!(a, c);
    }
}
