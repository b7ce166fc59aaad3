//! Cost/strategy table and the on-disk parameter-file formats.
//!
//! Mirrors the original Python implementation's file layout verbatim: a
//! fixed-width hex generator file that is fatal if missing, and a decimal
//! strategy file that is merely a cache — missing or unreadable, the caller
//! recomputes it via [`crate::strategy::optimizer::compute_strategy`] and
//! writes it back.

use crate::error::Error;
use std::fs;
use std::path::Path;

/// One memoized window's best split and the strategy it produced.
#[derive(Clone, Debug)]
pub struct CostEntry {
    /// Total cost (scalar multiplications + isogeny evaluations) for this window.
    pub cost: u64,
    /// The split sequence for this window, right-subtree-first (ref §4.1).
    pub strategy: Vec<usize>,
}

/// Dense memoization table indexed `[length - 1][window_start]`, as
/// recommended in Design Notes §9 over a generic hash map: every window of
/// every contiguous sublist of the traversal-ordered factor list is computed
/// exactly once.
pub struct StrategyTable {
    rows: Vec<Vec<Option<CostEntry>>>,
}

impl StrategyTable {
    /// Allocates an empty table for a factor list of length `n`.
    pub fn new(n: usize) -> Self {
        let rows = (0..n).map(|i| vec![None; n - i]).collect();
        Self { rows }
    }

    /// Reads the memoized entry for the window of `length` starting at
    /// `start`, if computed.
    pub fn get(&self, length: usize, start: usize) -> Option<&CostEntry> {
        self.rows[length - 1][start].as_ref()
    }

    /// Records the entry for the window of `length` starting at `start`.
    pub fn set(&mut self, length: usize, start: usize, entry: CostEntry) {
        self.rows[length - 1][start] = Some(entry);
    }
}

/// The two three-point bases read from a `data/gen/<prime>` file: one line
/// of 6 hex integers per party (x_P, x_Q, x_(Q-P), each an 𝔽p(i) element
/// stored as two hex halves).
pub struct GeneratorParams {
    /// Party A's basis: `[Re(x_P), Im(x_P), Re(x_Q), Im(x_Q), Re(x_QmP), Im(x_QmP)]`
    pub p_basis: [String; 6],
    /// Party B's basis, same layout.
    pub m_basis: [String; 6],
}

fn parse_hex_line(line: &str) -> Result<[String; 6], Error> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 6 {
        return Err(Error::MalformedParamFile(format!(
            "expected 6 hex integers, found {}",
            parts.len()
        )));
    }
    let mut out: [String; 6] = Default::default();
    for (slot, part) in out.iter_mut().zip(parts.iter()) {
        *slot = (*part).to_string();
    }
    Ok(out)
}

/// Loads the fixed generator parameters for a prime. Missing or malformed
/// files are a fatal error: there is no fallback for a missing torsion basis.
pub fn load_generators(path: &Path) -> Result<GeneratorParams, Error> {
    let contents =
        fs::read_to_string(path).map_err(|e| Error::ParamFileNotFound(path.display().to_string(), e))?;
    let mut lines = contents.lines();
    let p_line = lines
        .next()
        .ok_or_else(|| Error::MalformedParamFile("missing party-A basis line".into()))?;
    let m_line = lines
        .next()
        .ok_or_else(|| Error::MalformedParamFile("missing party-B basis line".into()))?;

    Ok(GeneratorParams {
        p_basis: parse_hex_line(p_line)?,
        m_basis: parse_hex_line(m_line)?,
    })
}

/// Loads a previously cached `(Sp, Sm)` strategy pair, one line of decimal
/// integers each. Returns `Ok(None)` if the file simply doesn't exist yet
/// (recoverable: the caller recomputes and writes it back via
/// [`save_strategies`]); any other I/O or parse failure is propagated.
pub fn load_strategies(path: &Path) -> Result<Option<(Vec<usize>, Vec<usize>)>, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };
    let mut lines = contents.lines();
    let sp_line = lines
        .next()
        .ok_or_else(|| Error::MalformedParamFile("missing Sp line".into()))?;
    let sm_line = lines
        .next()
        .ok_or_else(|| Error::MalformedParamFile("missing Sm line".into()))?;

    let parse_line = |line: &str| -> Result<Vec<usize>, Error> {
        line.split_whitespace()
            .map(|tok| {
                tok.parse::<usize>()
                    .map_err(|_| Error::MalformedParamFile(format!("not an integer: {}", tok)))
            })
            .collect()
    };

    Ok(Some((parse_line(sp_line)?, parse_line(sm_line)?)))
}

/// Writes a freshly computed `(Sp, Sm)` strategy pair back to `path`,
/// creating parent directories as needed.
pub fn save_strategies(path: &Path, sp: &[usize], sm: &[usize]) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::Io)?;
    }
    let render = |s: &[usize]| s.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
    let contents = format!("{}\n{}\n", render(sp), render(sm));
    fs::write(path, contents).map_err(Error::Io)
}

/// The canonical strategy-file path for a given prime and formula name
/// (ref §6.3: `data/strategies/bsidh-<prime>-<formula>-{classical,suitable}`).
pub fn strategy_path(base: &Path, prime_label: &str, formula: &str, tuned: bool) -> std::path::PathBuf {
    let variant = if tuned { "suitable" } else { "classical" };
    base.join("strategies")
        .join(format!("bsidh-{}-{}-{}", prime_label, formula, variant))
}

/// The canonical generator-file path for a given prime (ref §6.3:
/// `data/gen/<prime>`).
pub fn generator_path(base: &Path, prime_label: &str) -> std::path::PathBuf {
    base.join("gen").join(prime_label)
}
