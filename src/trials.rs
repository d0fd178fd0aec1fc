//! ## Accuracy trials
//! Compares LogLog and HyperLogLog on identical random inputs.
//!
//! For every register count `m` and cardinality `n` the sweep draws `n` distinct values from
//! `[0, 100 * n)`, feeds the same values to a fresh sketch of each kind and records the
//! relative error `|estimate - n| / n`, averaged over `runs` independent samples.
//! The result is plain data; rendering it (tables, plots) is left to the caller.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::SketchConfig;
use crate::error::ConfigError;
use crate::hash::Sha256Hasher;
use crate::hyperloglog::{alpha, HyperLogLog};
use crate::loglog::LogLog;
use crate::sketch::CardinalitySketch;

/// Default number of samples averaged per point
pub const DEFAULT_RUNS: usize = 50;
/// Default seed of the sample generator
pub const DEFAULT_SEED: u64 = 12345;
/// Sampled values are drawn from `[0, UNIVERSE_FACTOR * n)`
const UNIVERSE_FACTOR: usize = 100;

/// Cardinalities evaluated for every register count, on top of the ones around `m * ln(m)`
const BASE_CARDINALITIES: [usize; 13] = [
    100, 500, 1000, 2000, 3000, 4000, 5000, 10_000, 20_000, 30_000, 40_000, 50_000, 100_000,
];

/// Parameters of an accuracy sweep
#[derive(Debug, Clone, PartialEq)]
pub struct TrialConfig {
    /// Register counts to evaluate
    pub registers: Vec<usize>,
    /// Cardinalities to evaluate, `default_cardinalities(m)` when `None`
    pub cardinalities: Option<Vec<usize>>,
    /// Number of independent samples averaged per point, at least 1
    pub runs: usize,
    pub seed: u64,
}

impl TrialConfig {
    pub fn new(registers: Vec<usize>) -> Self {
        Self {
            registers,
            cardinalities: None,
            runs: DEFAULT_RUNS,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_cardinalities(mut self, cardinalities: Vec<usize>) -> Self {
        self.cardinalities = Some(cardinalities);
        self
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Mean relative errors measured for one `(registers, cardinality)` pair
#[derive(Debug, Clone, PartialEq)]
pub struct TrialPoint {
    pub registers: usize,
    pub cardinality: usize,
    pub loglog_error: f64,
    pub hyperloglog_error: f64,
}

/// Fixed cardinalities plus multiples of `m * ln(m)`, sorted and deduplicated.
pub fn default_cardinalities(registers: usize) -> Vec<usize> {
    let m = registers as f64;
    let center = (m * m.ln()) as usize;
    let mut cardinalities: Vec<usize> = BASE_CARDINALITIES
        .iter()
        .copied()
        .chain([
            (center / 2).max(1),
            ((center as f64 * 0.75) as usize).max(1),
            center,
            (center as f64 * 1.5) as usize,
            center * 2,
        ])
        .filter(|&n| n > 0)
        .collect();
    cardinalities.sort_unstable();
    cardinalities.dedup();
    cardinalities
}

/// Relative error of `estimate` against the true cardinality, 0 for an empty input.
#[inline]
pub fn relative_error(estimate: f64, actual: usize) -> f64 {
    if actual == 0 {
        return 0.0;
    }
    (estimate - actual as f64).abs() / actual as f64
}

/// Run the accuracy sweep described by `config`.
///
/// Points are ordered by register count (in `config` order), then by cardinality.
/// Fails before sampling anything if `runs` is 0 or a register count is invalid.
pub fn run_trials(config: &TrialConfig) -> Result<Vec<TrialPoint>, ConfigError> {
    if config.runs == 0 {
        return Err(ConfigError::NoRuns);
    }
    for &m in &config.registers {
        SketchConfig::new(m, alpha)?;
    }

    let runs = config.runs;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut points = Vec::new();
    for &m in &config.registers {
        let cardinalities = match &config.cardinalities {
            Some(cardinalities) => cardinalities.clone(),
            None => default_cardinalities(m),
        };
        for n in cardinalities {
            let (mut loglog_error, mut hyperloglog_error) = (0.0, 0.0);
            for _ in 0..runs {
                let (ll, hll) = sample_errors(&mut rng, m, n)?;
                loglog_error += ll;
                hyperloglog_error += hll;
            }
            let point = TrialPoint {
                registers: m,
                cardinality: n,
                loglog_error: loglog_error / runs as f64,
                hyperloglog_error: hyperloglog_error / runs as f64,
            };
            debug!(?point, "trial point");
            points.push(point);
        }
        info!(registers = m, runs, "finished trial sweep");
    }
    Ok(points)
}

/// Relative errors of both sketches on one sample of `n` distinct values
fn sample_errors(rng: &mut StdRng, m: usize, n: usize) -> Result<(f64, f64), ConfigError> {
    let mut loglog = LogLog::<Sha256Hasher>::new(m)?;
    let mut hyperloglog = HyperLogLog::<Sha256Hasher>::new(m)?;
    if n > 0 {
        for value in index::sample(rng, n * UNIVERSE_FACTOR, n).into_iter() {
            loglog.add(&value);
            hyperloglog.add(&value);
        }
    }
    Ok((
        relative_error(loglog.estimate(), n),
        relative_error(hyperloglog.estimate(), n),
    ))
}
