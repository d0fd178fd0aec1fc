//! ## HyperLogLog sketch
//! Estimates cardinality from the harmonic mean of `2^-rank` over `M` registers:
//! `E = alpha(M) * M^2 / sum(2^-rank)`, corrected in three ranges.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
//!
//! - Small range: while `E <= 5/2 * M` and some registers are still zero, linear counting
//!   `M * ln(M / V)` over the `V` zero registers replaces the raw estimate.
//! - Large range: hash collisions saturate the raw estimate as it approaches the size of the
//!   hash space. Hashes are 64 bits wide, so the correction `-2^64 * ln(1 - E / 2^64)`
//!   applies above `2^64 / 30`.
//! - An empty sketch estimates exactly 0.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasherDefault, Hasher};
use std::mem::size_of;

use tracing::{debug, trace};

use crate::config::SketchConfig;
use crate::error::ConfigError;
use crate::hash::{CanonicalBytes, HashProjector, Sha256Hasher};
use crate::registers::Registers;
use crate::sketch::{CardinalitySketch, SketchKind};

/// Size of the 64-bit hash space
const HASH_SPACE: f64 = 18_446_744_073_709_551_616.0;
/// Raw estimates above this value get the large range correction
const LARGE_RANGE_THRESHOLD: f64 = HASH_SPACE / 30.0;

/// Estimator branch selected by `HyperLogLog::estimate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// No value inserted yet
    Empty,
    /// Linear counting over zero registers
    LinearCounting,
    /// Uncorrected harmonic mean estimate
    Raw,
    /// Hash collision correction
    LargeRange,
    /// Raw estimate beyond the hash space, returned uncorrected
    Saturated,
}

/// HyperLogLog sketch over `M` registers, hashing values with `H`
pub struct HyperLogLog<H: Hasher + Default = Sha256Hasher> {
    config: SketchConfig,
    registers: Registers,
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
}

impl<H: Hasher + Default> HyperLogLog<H> {
    /// Creates new HyperLogLog sketch with `registers` registers, which must be a power of two.
    pub fn new(registers: usize) -> Result<Self, ConfigError> {
        let config = SketchConfig::new(registers, alpha)?;
        debug!(
            registers,
            precision = config.precision(),
            alpha = config.alpha(),
            "created HyperLogLog sketch"
        );
        Ok(Self {
            registers: Registers::new(config.precision()),
            config,
            build_hasher: BuildHasherDefault::default(),
        })
    }

    /// Restore a sketch from explicit register ranks
    pub fn from_ranks(ranks: &[u8]) -> Result<Self, ConfigError> {
        let mut sketch = Self::new(ranks.len())?;
        sketch.registers = Registers::from_ranks(sketch.config.precision(), ranks)?;
        Ok(sketch)
    }

    /// Insert a hashable value
    #[inline]
    pub fn add<T: CanonicalBytes + ?Sized>(&mut self, value: &T) {
        let hash = self.build_hasher.project(value);
        self.insert_hash(hash);
    }

    /// Merge `rhs` into `self`, as if every value inserted into `rhs` had been inserted into `self`
    pub fn merge(&mut self, rhs: &Self) -> Result<(), ConfigError> {
        self.registers.merge(&rhs.registers)
    }

    /// Return estimator branch used by `estimate` for the current registers
    pub fn regime(&self) -> Regime {
        self.estimate_with_regime().1
    }

    fn estimate_with_regime(&self) -> (f64, Regime) {
        let zeros = self.registers.zeros();
        let count = self.registers.count();
        if zeros == count {
            return (0.0, Regime::Empty);
        }

        let m = count as f64;
        let raw = self.config.alpha() * m * m / self.registers.harmonic_sum();
        if raw <= 2.5 * m && zeros > 0 {
            (m * (m / zeros as f64).ln(), Regime::LinearCounting)
        } else if raw <= LARGE_RANGE_THRESHOLD {
            (raw, Regime::Raw)
        } else if raw < HASH_SPACE {
            (-HASH_SPACE * (-raw / HASH_SPACE).ln_1p(), Regime::LargeRange)
        } else {
            (raw, Regime::Saturated)
        }
    }
}

impl<H: Hasher + Default> CardinalitySketch for HyperLogLog<H> {
    fn kind(&self) -> SketchKind {
        SketchKind::HyperLogLog
    }

    fn config(&self) -> &SketchConfig {
        &self.config
    }

    fn registers(&self) -> &Registers {
        &self.registers
    }

    #[inline]
    fn insert_hash(&mut self, hash: u64) {
        self.registers.insert_hash(hash);
    }

    fn estimate(&self) -> f64 {
        let (estimate, regime) = self.estimate_with_regime();
        trace!(?regime, estimate, "HyperLogLog estimate");
        estimate
    }

    fn clear(&mut self) {
        self.registers.clear();
    }

    fn size_of(&self) -> usize {
        size_of::<Self>() - size_of::<Registers>() + self.registers.size_of()
    }
}

impl<H: Hasher + Default> Clone for HyperLogLog<H> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            registers: self.registers.clone(),
            build_hasher: BuildHasherDefault::default(),
        }
    }
}

impl<H: Hasher + Default> PartialEq for HyperLogLog<H> {
    fn eq(&self, rhs: &Self) -> bool {
        self.registers == rhs.registers
    }
}

impl<H: Hasher + Default> Debug for HyperLogLog<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Parameter for bias correction
#[inline]
pub fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}
