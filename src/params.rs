//! Public parameters: the ordered torsion factor lists and generator basis
//! for a chosen prime. Concrete prime-specific tables are an external
//! concern (ref §1 Non-goals: "prime-specific public-parameter tables");
//! this module only defines the shape such a table takes and how to load
//! one from disk.

use crate::curve::Point;
use crate::error::Error;
use crate::ff::FiniteField;
use crate::strategy::table::{self, GeneratorParams};
use rug::Integer;
use std::path::Path;

/// The ordered smooth-torsion factor lists for both parties, and the prime
/// they're drawn from. `lp` divides `p+1`, `lm` divides `p-1`.
#[derive(Clone)]
pub struct PublicParameters {
    /// The prime modulus.
    pub p: Integer,
    /// Party A's ordered factor list (divides `p+1`).
    pub lp: Vec<u64>,
    /// Party B's ordered factor list (divides `p-1`).
    pub lm: Vec<u64>,
}

impl PublicParameters {
    /// Builds a parameter set from an explicit prime and factor lists.
    pub fn new(p: Integer, lp: Vec<u64>, lm: Vec<u64>) -> Self {
        Self { p, lp, lm }
    }

    /// Party A's traversal order: `lp` reversed (ref §3: "the traversal
    /// order given to the evaluator is always the reverse of the storage
    /// order").
    pub fn sid_p(&self) -> Vec<u64> {
        self.lp.iter().rev().copied().collect()
    }

    /// Party B's traversal order: `lm` reversed.
    pub fn sid_m(&self) -> Vec<u64> {
        self.lm.iter().rev().copied().collect()
    }

    /// The product of `lp`, i.e. the order of the subgroup party A's secret
    /// scalar ranges over.
    pub fn order_p(&self) -> Integer {
        self.lp.iter().fold(Integer::from(1), |acc, &l| acc * l)
    }

    /// The product of `lm`.
    pub fn order_m(&self) -> Integer {
        self.lm.iter().fold(Integer::from(1), |acc, &l| acc * l)
    }
}

/// Loads the generator parameters for `prime_label` from `<base>/gen/<prime_label>`
/// and lifts each coordinate into the field via `lift`.
pub fn load_generator_basis<K, Lift>(
    base: &Path,
    prime_label: &str,
    lift: Lift,
) -> Result<((Point<K>, Point<K>, Point<K>), (Point<K>, Point<K>, Point<K>)), Error>
where
    K: FiniteField + Clone,
    Lift: Fn(&str, &str) -> K,
{
    let path = table::generator_path(base, prime_label);
    let GeneratorParams { p_basis, m_basis } = table::load_generators(&path)?;

    let party = |basis: &[String; 6]| {
        let xp = lift(&basis[0], &basis[1]);
        let xq = lift(&basis[2], &basis[3]);
        let xqmp = lift(&basis[4], &basis[5]);
        (Point::from_x(xp), Point::from_x(xq), Point::from_x(xqmp))
    };

    Ok((party(&p_basis), party(&m_basis)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ff::prime::PrimeField;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn scratch_dir() -> std::path::PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("bsidh-engine-test-params-{}-{}", std::process::id(), n))
    }

    #[test]
    fn order_p_and_order_m_are_the_product_of_their_factor_lists() {
        let params = PublicParameters::new(Integer::from(101), vec![2, 3, 5], vec![7, 11]);
        assert_eq!(params.order_p(), Integer::from(30));
        assert_eq!(params.order_m(), Integer::from(77));
    }

    #[test]
    fn sid_p_and_sid_m_are_reversed_factor_lists() {
        let params = PublicParameters::new(Integer::from(101), vec![2, 3, 5], vec![7, 11]);
        assert_eq!(params.sid_p(), vec![5, 3, 2]);
        assert_eq!(params.sid_m(), vec![11, 7]);
    }

    #[test]
    fn load_generator_basis_lifts_each_coordinate_through_the_field() {
        let base = scratch_dir();
        std::fs::create_dir_all(base.join("gen")).unwrap();
        std::fs::write(
            base.join("gen").join("toy"),
            "1 0 2 0 3 0\n4 0 5 0 6 0\n",
        )
        .unwrap();

        let modulus: Arc<Integer> = Arc::new(Integer::from(97));
        let lift = |re: &str, _im: &str| PrimeField::from_hex_str(re, modulus.clone());

        let (p_basis, m_basis) = load_generator_basis::<PrimeField, _>(&base, "toy", lift).unwrap();
        assert!(p_basis.0.x.equals(&PrimeField::from_hex_str("1", modulus.clone())));
        assert!(p_basis.1.x.equals(&PrimeField::from_hex_str("2", modulus.clone())));
        assert!(m_basis.2.x.equals(&PrimeField::from_hex_str("6", modulus.clone())));

        std::fs::remove_dir_all(&base).ok();
    }
}
