//! The session layer: `Strategy`, the public entry point combining a curve
//! provider, a formula provider, and a pair of precomputed (or cached)
//! optimal strategies into `keygen_A/B` and `derive_A/B` (ref §4.3, §6.4).

use crate::curve::{Curve, CurveProvider, Point};
use crate::error::Error;
use crate::ff::FiniteField;
use crate::formula::FormulaProvider;
use crate::strategy::evaluator::{evaluate_strategy, EvaluatorInput};
use crate::strategy::optimizer::{compute_strategy, CostModel};
use rand::RngCore;
use rug::Integer;
use std::fmt::Debug;
use tracing::{debug, instrument};

type ThreePoints<K> = (Point<K>, Point<K>, Point<K>);

/// A public key as produced by `keygen_A`/`keygen_B`: the codomain curve and
/// the opposite party's basis pushed through the walk.
///
/// `pushed_basis` is `None` only for a bundle reconstructed from an
/// incomplete wire encoding; `derive_A`/`derive_B` reject such a bundle with
/// [`Error::DeriveBeforeKeygen`] rather than silently treating it as absent.
pub struct PublicKeyBundle<K> {
    /// The codomain curve of the keygen walk.
    pub curve: Curve<K>,
    /// The peer's basis, pushed through this party's keygen walk exactly once.
    pub pushed_basis: Option<ThreePoints<K>>,
}

/// An ephemeral secret scalar, bounded by the party's own torsion order.
#[derive(Clone)]
pub struct SecretScalar(pub Integer);

/// The B-SIDH orchestration engine: an immutable configuration combining a
/// curve provider, a formula provider, and the two parties' optimal
/// strategies (ref Design Notes §9: Curve and Formula are immutable
/// configuration objects owned by the session).
pub struct Strategy<C, F> {
    curve_provider: C,
    formula: F,
    lp: Vec<u64>,
    lm: Vec<u64>,
    sp: Vec<usize>,
    sm: Vec<usize>,
    tuned: bool,
}

impl<C, F> Strategy<C, F>
where
    C: CurveProvider,
    F: FormulaProvider<Field = C::Field>,
    C::Field: FiniteField + Clone + Debug,
{
    /// Builds a session, computing both parties' optimal strategies.
    /// Prefer [`Strategy::with_cached_strategies`] when a previously
    /// computed `(Sp, Sm)` pair is available, to skip the O(n³) search.
    #[instrument(skip(curve_provider, formula))]
    pub fn new(curve_provider: C, formula: F, lp: Vec<u64>, lm: Vec<u64>, tuned: bool) -> Result<Self, Error> {
        let sid_p: Vec<u64> = lp.iter().rev().copied().collect();
        let sid_m: Vec<u64> = lm.iter().rev().copied().collect();

        let (sp, _cost_p) = Self::strategy_for(&curve_provider, &formula, &sid_p)?;
        let (sm, _cost_m) = Self::strategy_for(&curve_provider, &formula, &sid_m)?;

        debug!(cost_p = _cost_p, cost_m = _cost_m, "computed optimal strategies");

        Ok(Self {
            curve_provider,
            formula,
            lp,
            lm,
            sp,
            sm,
            tuned,
        })
    }

    /// Builds a session from a previously cached `(Sp, Sm)` pair (ref §6.3:
    /// the strategy file is a cache, not a fatal dependency — recompute with
    /// [`Strategy::new`] when it's missing and persist the result with
    /// [`crate::strategy::table::save_strategies`]).
    pub fn with_cached_strategies(
        curve_provider: C,
        formula: F,
        lp: Vec<u64>,
        lm: Vec<u64>,
        sp: Vec<usize>,
        sm: Vec<usize>,
        tuned: bool,
    ) -> Result<Self, Error> {
        if sp.len() + 1 != lp.len() || sm.len() + 1 != lm.len() {
            return Err(Error::StrategyLengthMismatch {
                expected: lp.len().saturating_sub(1),
                got: sp.len(),
            });
        }
        Ok(Self {
            curve_provider,
            formula,
            lp,
            lm,
            sp,
            sm,
            tuned,
        })
    }

    fn strategy_for(curve_provider: &C, formula: &F, sid: &[u64]) -> Result<(Vec<usize>, u64), Error> {
        let index_of = |value: u64| -> usize {
            curve_provider.l().iter().position(|&v| v == value).unwrap_or(0)
        };
        let c_xmul = |pos: usize| curve_provider.c_xmul(pos);
        let c_xeval = |pos: usize| formula.c_xeval(pos);
        let c_xisog = |pos: usize| formula.c_xisog(pos);
        let measure = |cost: u64| curve_provider.measure(cost);

        let model = CostModel {
            index_of: &index_of,
            c_xmul: &c_xmul,
            c_xeval: &c_xeval,
            c_xisog: &c_xisog,
            measure: &measure,
        };
        compute_strategy(sid, &model)
    }

    /// Cached strategies, exposed so the session's caller can persist them
    /// (ref §6.3 file format).
    pub fn strategies(&self) -> (&[usize], &[usize]) {
        (&self.sp, &self.sm)
    }

    /// Draws a secret scalar for party A, uniform (up to the modulo-bias
    /// documented on [`random_below`]) over `[0, order(Lp))`.
    pub fn random_scalar_a(&self, rng: &mut impl RngCore) -> SecretScalar {
        let order = self.lp.iter().fold(Integer::from(1), |acc, &l| acc * l);
        SecretScalar(random_below(rng, &order))
    }

    /// Draws a secret scalar for party B, uniform over `[0, order(Lm))`.
    pub fn random_scalar_b(&self, rng: &mut impl RngCore) -> SecretScalar {
        let order = self.lm.iter().fold(Integer::from(1), |acc, &l| acc * l);
        SecretScalar(random_below(rng, &order))
    }

    /// Party A's key generation: walks the `Lp`-isogeny of kernel
    /// `[sk]Q_B + P_B` (via the three-point ladder over A's own basis) and
    /// pushes party B's basis through it exactly once.
    #[instrument(skip(self, sk, own_basis, peer_basis))]
    pub fn keygen_a(
        &self,
        sk: &SecretScalar,
        own_basis: &ThreePoints<C::Field>,
        peer_basis: ThreePoints<C::Field>,
    ) -> Result<PublicKeyBundle<C::Field>, Error> {
        self.keygen(sk, own_basis, peer_basis, true)
    }

    /// Party B's key generation, symmetric to `keygen_a` over `Lm`.
    #[instrument(skip(self, sk, own_basis, peer_basis))]
    pub fn keygen_b(
        &self,
        sk: &SecretScalar,
        own_basis: &ThreePoints<C::Field>,
        peer_basis: ThreePoints<C::Field>,
    ) -> Result<PublicKeyBundle<C::Field>, Error> {
        self.keygen(sk, own_basis, peer_basis, false)
    }

    fn keygen(
        &self,
        sk: &SecretScalar,
        own_basis: &ThreePoints<C::Field>,
        peer_basis: ThreePoints<C::Field>,
        is_a: bool,
    ) -> Result<PublicKeyBundle<C::Field>, Error> {
        let curve = self.curve_provider.starting_curve();
        let (x_p, x_q, x_qmp) = (own_basis.0.x.clone(), own_basis.1.x.clone(), own_basis.2.x.clone());

        let bits = integer_bits(&sk.0);
        let kernel = self
            .curve_provider
            .ladder3pt(&bits, x_p, x_q, x_qmp, &curve);

        let l: &[u64] = if is_a { &self.lp } else { &self.lm };
        let sid: Vec<u64> = l.iter().rev().copied().collect();
        let strategy = if is_a { &self.sp } else { &self.sm };

        let output = evaluate_strategy(
            &self.curve_provider,
            &self.formula,
            EvaluatorInput {
                eval_aux: true,
                aux: Some(peer_basis),
                curve,
                kernel,
                l_trav: &sid,
                strategy,
                tuned: self.tuned,
            },
        )?;

        Ok(PublicKeyBundle {
            curve: output.curve,
            pushed_basis: output.aux,
        })
    }

    /// Party A's shared-secret derivation: checks `peer.curve` is
    /// supersingular before any secret-dependent work, then walks the
    /// `Lp`-isogeny of kernel `[sk]Q' + P'` where `(P', Q', Q'-P')` is the
    /// basis B pushed through during `keygen_b`.
    #[instrument(skip(self, sk, peer))]
    pub fn derive_a(&self, sk: &SecretScalar, peer: &PublicKeyBundle<C::Field>) -> Result<C::Field, Error> {
        self.derive(sk, peer, true)
    }

    /// Party B's shared-secret derivation, symmetric to `derive_a`.
    #[instrument(skip(self, sk, peer))]
    pub fn derive_b(&self, sk: &SecretScalar, peer: &PublicKeyBundle<C::Field>) -> Result<C::Field, Error> {
        self.derive(sk, peer, false)
    }

    fn derive(&self, sk: &SecretScalar, peer: &PublicKeyBundle<C::Field>, is_a: bool) -> Result<C::Field, Error> {
        if !self.curve_provider.issupersingular(&peer.curve) {
            return Err(Error::NonSupersingularCurve);
        }
        let (x_p, x_q, x_qmp) = peer
            .pushed_basis
            .as_ref()
            .ok_or(Error::DeriveBeforeKeygen)?
            .clone();

        let bits = integer_bits(&sk.0);
        let kernel = self
            .curve_provider
            .ladder3pt(&bits, x_p.x, x_q.x, x_qmp.x, &peer.curve);

        let l = if is_a { &self.lp } else { &self.lm };
        let sid: Vec<u64> = l.iter().rev().copied().collect();
        let strategy = if is_a { &self.sp } else { &self.sm };

        let output = evaluate_strategy(
            &self.curve_provider,
            &self.formula,
            EvaluatorInput {
                eval_aux: false,
                aux: None,
                curve: peer.curve.clone(),
                kernel,
                l_trav: &sid,
                strategy,
                tuned: self.tuned,
            },
        )?;

        Ok(output.curve.j_invariant())
    }
}

/// Draws a value uniform over `[0, bound)` from `rng`, with the modulo bias
/// of `bytes mod bound` where `bytes` has exactly `bound`'s bit length —
/// acceptable here since scalar-distribution uniformity is an external,
/// prime-specific concern (ref §1 Non-goals), not something this engine
/// certifies.
fn random_below(rng: &mut impl RngCore, bound: &Integer) -> Integer {
    let bits = bound.significant_bits().max(1);
    let bytes_len = ((bits + 7) / 8) as usize;
    let mut buf = vec![0u8; bytes_len];
    rng.fill_bytes(&mut buf);
    let val = Integer::from_str_radix(&hex::encode(&buf), 16).expect("hex::encode always yields valid hex");
    val % bound
}

fn integer_bits(value: &Integer) -> Vec<bool> {
    let n = value.significant_bits();
    (0..n).rev().map(|i| value.get_bit(i)).collect()
}
