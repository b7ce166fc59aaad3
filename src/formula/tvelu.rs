//! Traditional Vélu formulas for degree-3 and degree-4 isogenies.
//!
//! Ported from the SIKE reference formulas for x-only Montgomery isogenies
//! (Algorithms 13-16): degree 4 is handled as its own special case per the
//! evaluator's `L[pos] == 4` branch, degree 3 via the standard odd-prime
//! formula. Larger odd primes are out of scope for this bundled back-end —
//! [`FormulaProvider::xisog`]/[`FormulaProvider::xeval`] return
//! [`crate::error::Error::UnsupportedDegree`] for any position whose factor
//! isn't 3 or 4.

use crate::curve::{Curve, Point};
use crate::error::Error;
use crate::ff::FiniteField;
use crate::formula::{EvalArg, FormulaName, FormulaProvider};
use std::fmt::Debug;
use std::marker::PhantomData;

/// Per-step cached Vélu constants, produced by `kps` and consumed by
/// `xisog`/`xeval`.
pub enum TvituContext<K> {
    /// Degree-3 constants (ref Algorithm 15/16).
    Three { k1: K, k2: K, curve: Curve<K> },
    /// Degree-4 constants (ref Algorithm 13/14).
    Four { k1: K, k2: K, k3: K, curve: Curve<K> },
    /// The factor at this position isn't supported by this back-end.
    Unsupported(u64),
}

/// Traditional Vélu back-end covering degrees 3 and 4.
pub struct TvituFormula<K> {
    l: Vec<u64>,
    _field: PhantomData<K>,
}

impl<K> TvituFormula<K> {
    /// Builds a back-end over the ordered factor list `l`. Positions whose
    /// factor is neither 3 nor 4 are accepted at construction (the factor
    /// list is an external contract) but will error if actually isogenied.
    pub fn new(l: Vec<u64>) -> Self {
        Self {
            l,
            _field: PhantomData,
        }
    }

    #[inline]
    fn three_isogenous_curve<K: FiniteField + Clone>(p: &Point<K>) -> (Curve<K>, K, K) {
        let k1 = p.x.sub(&p.z);
        let t0 = k1.mul(&k1);
        let k2 = p.x.add(&p.z);
        let t1 = k2.mul(&k2);
        let t2 = t0.add(&t1);
        let t3 = k1.add(&k2);

        let t3 = t3.mul(&t3);
        let t3 = t3.sub(&t2);
        let t2 = t1.add(&t3);
        let t3 = t3.add(&t0);
        let t4 = t3.add(&t0);
        let t4 = t4.add(&t4);

        let t4 = t1.add(&t4);
        let c = t2.mul(&t4);
        let t4 = t1.add(&t2);
        let t4 = t4.add(&t4);
        let t4 = t0.add(&t4);
        let t4 = t3.mul(&t4);

        let t0 = t4.sub(&c);
        let a = c.add(&t0);

        (Curve::from_coeffs(a, c), k1, k2)
    }

    #[inline]
    fn three_isogeny_eval<K: FiniteField + Clone>(q: &Point<K>, k1: &K, k2: &K) -> Point<K> {
        let t0 = q.x.add(&q.z);
        let t1 = q.x.sub(&q.z);
        let t0 = k1.mul(&t0);
        let t1 = k2.mul(&t1);
        let t2 = t0.add(&t1);
        let t0 = t1.sub(&t0);
        let t2 = t2.mul(&t2);
        let t0 = t0.mul(&t0);
        let x = q.x.mul(&t2);
        let z = q.z.mul(&t0);

        Point { x, z }
    }

    #[inline]
    fn four_isogenous_curve<K: FiniteField + Clone>(p: &Point<K>) -> (Curve<K>, K, K, K) {
        let k2 = p.x.sub(&p.z);
        let k3 = p.x.add(&p.z);
        let k1 = p.z.mul(&p.z);
        let k1 = k1.add(&k1);
        let c = k1.mul(&k1);
        let k1 = k1.add(&k1);
        let a = p.x.mul(&p.x);
        let a = a.add(&a);
        let a = a.mul(&a);

        (Curve::from_coeffs(a, c), k1, k2, k3)
    }

    #[inline]
    fn four_isogeny_eval<K: FiniteField + Clone>(k1: &K, k2: &K, k3: &K, q: &Point<K>) -> Point<K> {
        let t0 = q.x.add(&q.z);
        let t1 = q.x.sub(&q.z);
        let x = t0.mul(k2);
        let z = t1.mul(k3);

        let t0 = t0.mul(&t1);
        let t0 = t0.mul(k1);
        let t1 = x.add(&z);
        let z = x.sub(&z);

        let t1 = t1.mul(&t1);
        let z = z.mul(&z);
        let x = t0.add(&t1);
        let t0 = z.sub(&t0);

        let x = x.mul(&t1);
        let z = z.mul(&t0);

        Point { x, z }
    }
}

impl<K: FiniteField + Clone + Debug> FormulaProvider for TvituFormula<K> {
    type Field = K;
    type Context = TvituContext<K>;

    fn name(&self) -> FormulaName {
        FormulaName::Tvelu
    }

    fn l(&self) -> &[u64] {
        &self.l
    }

    fn c_xisog(&self, pos: usize) -> Result<u64, Error> {
        match self.l[pos] {
            3 => Ok(4),
            4 => Ok(6),
            other => Err(Error::UnsupportedDegree(other)),
        }
    }

    fn c_xeval(&self, pos: usize) -> Result<u64, Error> {
        match self.l[pos] {
            3 => Ok(4),
            4 => Ok(6),
            other => Err(Error::UnsupportedDegree(other)),
        }
    }

    fn velu_params(&self, _pos: usize, _tuned: bool) -> (u64, u64) {
        // Degrees 3 and 4 need no (b, c) tuning; the special-cased formulas
        // above consume the kernel point directly.
        (0, 0)
    }

    fn kps(
        &self,
        point: &Point<K>,
        _curve: &Curve<K>,
        pos: usize,
        _params: (u64, u64),
    ) -> Self::Context {
        match self.l[pos] {
            3 => {
                let (curve, k1, k2) = Self::three_isogenous_curve(point);
                TvituContext::Three { k1, k2, curve }
            }
            4 => {
                let (curve, k1, k2, k3) = Self::four_isogenous_curve(point);
                TvituContext::Four { k1, k2, k3, curve }
            }
            other => TvituContext::Unsupported(other),
        }
    }

    fn xisog(&self, ctx: &Self::Context, _curve: &Curve<K>, _pos: usize) -> Result<Curve<K>, Error> {
        // The swap the evaluator performs around this call for L[pos] == 4
        // smuggles the kernel point into `curve`'s slot for back-ends whose
        // generic xisog needs the point rather than the current curve
        // coefficients; this back-end already captured everything it needs
        // in `ctx` during `kps` and ignores the (possibly swapped) argument.
        match ctx {
            TvituContext::Three { curve, .. } => Ok(curve.clone()),
            TvituContext::Four { curve, .. } => Ok(curve.clone()),
            TvituContext::Unsupported(degree) => Err(Error::UnsupportedDegree(*degree)),
        }
    }

    fn xeval(&self, ctx: &Self::Context, point: &Point<K>, _arg: EvalArg<K>, _pos: usize) -> Result<Point<K>, Error> {
        match ctx {
            TvituContext::Three { k1, k2, .. } => Ok(Self::three_isogeny_eval(point, k1, k2)),
            TvituContext::Four { k1, k2, k3, .. } => Ok(Self::four_isogeny_eval(k1, k2, k3, point)),
            TvituContext::Unsupported(degree) => Err(Error::UnsupportedDegree(*degree)),
        }
    }
}
