//! Error types for the B-SIDH orchestration engine.

use thiserror::Error;

/// Failure modes surfaced by the strategy search, the evaluator, and the
/// session layer (ref §7).
#[derive(Error, Debug)]
pub enum Error {
    /// A generator parameter file (`data/gen/<prime>`) is missing or
    /// unreadable. Unlike a missing strategy cache, this is fatal: there is
    /// no fallback torsion basis to fall back on.
    #[error("generator parameter file {0} not found or unreadable: {1}")]
    ParamFileNotFound(String, #[source] std::io::Error),

    /// A parameter or strategy file exists but doesn't match the expected
    /// format.
    #[error("malformed parameter file: {0}")]
    MalformedParamFile(String),

    /// Wraps any other I/O failure (e.g. writing a freshly computed
    /// strategy cache back to disk).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The optimizer was asked to strategize over an empty factor list.
    #[error("cannot compute a strategy over an empty factor list")]
    EmptyFactorList,

    /// A strategy array's length didn't match `n - 1` for a factor list of
    /// length `n`.
    #[error("strategy length mismatch: expected {expected}, got {got}")]
    StrategyLengthMismatch {
        /// The length the factor list requires.
        expected: usize,
        /// The length actually supplied.
        got: usize,
    },

    /// A strategy split value fell outside the window it was meant to split.
    #[error("invalid strategy: {0}")]
    InvalidStrategy(String),

    /// The evaluator encountered a factor value absent from the curve
    /// provider's master list.
    #[error("factor {0} is not present in the curve provider's master list")]
    UnknownFactor(u64),

    /// `eval_aux` was requested without supplying the auxiliary basis to push.
    #[error("auxiliary basis evaluation requested but no basis was supplied")]
    MissingAuxiliaryBasis,

    /// The bundled formula back-end doesn't implement isogenies of this degree.
    #[error("formula back-end does not support degree-{0} isogenies")]
    UnsupportedDegree(u64),

    /// `derive_A`/`derive_B` was called with a non-supersingular curve.
    #[error("curve failed the supersingularity check")]
    NonSupersingularCurve,

    /// `derive_A`/`derive_B` was called before the matching `keygen_A`/`keygen_B`.
    #[error("derive called before the matching keygen stored a basis to push")]
    DeriveBeforeKeygen,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
