//! This is documentation for the `bsidh-engine` crate.
//!
//! # Introduction
//! `bsidh-engine` is an orchestration engine for B-SIDH isogeny-based key
//! agreement: given a curve back-end and an isogeny-formula back-end for a
//! chosen prime, it computes the optimal isogeny-walk strategy for that
//! prime's smooth torsion and carries out key generation and shared-secret
//! derivation over it.
//!
//! The field, curve, and formula layers are external collaborators (see
//! [`curve`], [`formula`]); this crate owns the strategy search
//! ([`strategy::optimizer`]), the walk evaluator ([`strategy::evaluator`]),
//! and the session API tying them together ([`session`]).

#![warn(missing_docs)]

pub mod curve;
pub mod error;
pub mod ff;
pub mod formula;
pub mod params;
pub mod session;
pub mod strategy;
mod utils;

pub use crate::curve::{Curve, CurveProvider, Point};
pub use crate::error::{Error, Result};
pub use crate::ff::{FiniteField, QuadraticExtension};
pub use crate::formula::{EvalArg, FormulaName, FormulaProvider};
pub use crate::params::PublicParameters;
pub use crate::session::{PublicKeyBundle, SecretScalar, Strategy};
pub use crate::strategy::{compute_strategy, evaluate_strategy, EvaluatorInput, EvaluatorOutput};
