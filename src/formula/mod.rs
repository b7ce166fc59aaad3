//! Isogeny formula back-ends: the `FormulaProvider` collaborator.
//!
//! Formula back-ends (tvelu/svelu/hvelu in the wider literature) are treated
//! as external collaborators parameterized by degree; this crate ships one
//! concrete back-end, [`tvelu::TvituFormula`], covering the degree-3 and
//! degree-4 isogenies needed to exercise the strategy evaluator end to end.
//! A production deployment supplies a formula provider covering its full
//! factor list.

pub mod tvelu;

use crate::curve::{Curve, Point};
use crate::error::Error;
use crate::ff::FiniteField;
use std::fmt::Debug;

/// Identifies which concrete formula family a provider implements. The
/// evaluator's site selector dispatches on this name (ref Design Notes §9:
/// "this selector applies uniformly").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaName {
    /// Traditional Vélu formulas: always evaluates by master-list position.
    Tvelu,
    /// Square-root Vélu: always evaluates by explicit curve (not used by
    /// the bundled back-end, included for completeness of the selector).
    Svelu,
    /// Hybrid: uses position below `hybrid_bound`, explicit curve above it.
    Hvelu,
}

/// The argument `xeval` receives: either the master-list position (tvelu, or
/// hvelu below its bound, or any degree-4 step) or the explicit curve
/// (svelu, or hvelu above its bound).
pub enum EvalArg<'a, K> {
    /// Evaluate using the cached per-position context.
    Pos(usize),
    /// Evaluate using the explicit current curve.
    Curve(&'a Curve<K>),
}

/// An external isogeny-formula collaborator.
pub trait FormulaProvider {
    /// Base field, shared with the curve collaborator.
    type Field: FiniteField + Clone + Debug;

    /// Per-step context produced by `kps` and consumed by `xisog`/`xeval`.
    /// Kept as an explicit value (ref Design Notes §9's recommended
    /// re-architecture) rather than hidden provider-internal mutable state.
    type Context;

    /// Which formula family this is.
    fn name(&self) -> FormulaName;

    /// The ordered factor list this provider covers.
    fn l(&self) -> &[u64];

    /// Cost of constructing the isogeny at master index `pos`. Fails if this
    /// back-end doesn't cover the factor at `pos`.
    fn c_xisog(&self, pos: usize) -> Result<u64, Error>;

    /// Cost of evaluating the isogeny at master index `pos`. Fails if this
    /// back-end doesn't cover the factor at `pos`.
    fn c_xeval(&self, pos: usize) -> Result<u64, Error>;

    /// Degree threshold below which hvelu uses the position-based signature.
    fn hybrid_bound(&self) -> u64 {
        0
    }

    /// Selects the velu parameters `(b, c)` (ref `set_parameters_velu`,
    /// sJ/sI list selection) used to tune `kps` for position `pos`. `tuned`
    /// picks between the "classical" and "suitable" (tuned) parameter set.
    fn velu_params(&self, pos: usize, tuned: bool) -> (u64, u64);

    /// Kernel-point precomputation (ref `kps`): builds the context `xisog`
    /// and `xeval` will use for this step.
    fn kps(
        &self,
        point: &Point<Self::Field>,
        curve: &Curve<Self::Field>,
        pos: usize,
        params: (u64, u64),
    ) -> Self::Context;

    /// Builds the isogenous curve at `pos` from a previously computed
    /// context. Fails if `ctx` was built over an unsupported factor.
    fn xisog(&self, ctx: &Self::Context, curve: &Curve<Self::Field>, pos: usize) -> Result<Curve<Self::Field>, Error>;

    /// Pushes a point through the isogeny at `pos`. Fails if `ctx` was built
    /// over an unsupported factor.
    fn xeval(
        &self,
        ctx: &Self::Context,
        point: &Point<Self::Field>,
        arg: EvalArg<Self::Field>,
        pos: usize,
    ) -> Result<Point<Self::Field>, Error>;
}
