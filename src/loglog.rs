//! ## LogLog sketch
//! Estimates cardinality from the geometric mean of `M` register ranks:
//! `E = alpha * M * 2^(sum(rank) / M)` with the asymptotic constant `alpha = 0.39701`.
//!
//! [Original LogLog paper](https://algo.inria.fr/flajolet/Publications/DuFl03-LNCS.pdf)
//!
//! The estimator is asymptotic: it is biased while a large share of the registers is still
//! zero (an empty sketch estimates `alpha * M`), which is what `HyperLogLog` corrects.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasherDefault, Hasher};
use std::mem::size_of;

use tracing::debug;

use crate::config::SketchConfig;
use crate::error::ConfigError;
use crate::hash::{CanonicalBytes, HashProjector, Sha256Hasher};
use crate::registers::Registers;
use crate::sketch::{CardinalitySketch, SketchKind};

/// Bias correction constant of the LogLog estimator
pub const LOGLOG_ALPHA: f64 = 0.39701;

/// LogLog sketch over `M` registers, hashing values with `H`
pub struct LogLog<H: Hasher + Default = Sha256Hasher> {
    config: SketchConfig,
    registers: Registers,
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
}

impl<H: Hasher + Default> LogLog<H> {
    /// Creates new LogLog sketch with `registers` registers, which must be a power of two.
    pub fn new(registers: usize) -> Result<Self, ConfigError> {
        let config = SketchConfig::new(registers, |_| LOGLOG_ALPHA)?;
        debug!(
            registers,
            precision = config.precision(),
            alpha = config.alpha(),
            "created LogLog sketch"
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
}

impl<H: Hasher + Default> CardinalitySketch for LogLog<H> {
    fn kind(&self) -> SketchKind {
        SketchKind::LogLog
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
        let m = self.config.registers() as f64;
        let mean_rank = self.registers.rank_sum() as f64 / m;
        self.config.alpha() * m * mean_rank.exp2()
    }

    fn clear(&mut self) {
        self.registers.clear();
    }

    fn size_of(&self) -> usize {
        size_of::<Self>() - size_of::<Registers>() + self.registers.size_of()
    }
}

impl<H: Hasher + Default> Clone for LogLog<H> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            registers: self.registers.clone(),
            build_hasher: BuildHasherDefault::default(),
        }
    }
}

impl<H: Hasher + Default> PartialEq for LogLog<H> {
    fn eq(&self, rhs: &Self) -> bool {
        self.registers == rhs.registers
    }
}

impl<H: Hasher + Default> Debug for LogLog<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;
    use crate::hash::WyHash;

    #[test]
    fn test_estimate_formula() {
        let sketch = LogLog::<Sha256Hasher>::from_ranks(&[2; 16]).unwrap();
        let expected = LOGLOG_ALPHA * 16.0 * 4.0;
        assert!((sketch.estimate() - expected).abs() < 1e-9);

        let sketch = LogLog::<Sha256Hasher>::from_ranks(&[1, 3, 1, 3]).unwrap();
        let expected = LOGLOG_ALPHA * 4.0 * 4.0;
        assert!((sketch.estimate() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_estimate() {
        let sketch = LogLog::<Sha256Hasher>::new(64).unwrap();
        assert!((sketch.estimate() - LOGLOG_ALPHA * 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_insert() {
        let mut sketch = LogLog::<Sha256Hasher>::new(256).unwrap();
        sketch.add("test item 1");
        let estimate = sketch.estimate();
        let registers = sketch.registers().clone();

        // Re-insert the same item, registers and estimate stay the same.
        sketch.add("test item 1");
        assert_eq!(sketch.registers(), &registers);
        assert_eq!(sketch.estimate(), estimate);

        // Insert a new distinct item, estimate never decreases.
        sketch.add("test item 2");
        assert!(sketch.estimate() >= estimate);
    }

    #[test_case(1024, 100_000; "m1024 n100k")]
    #[test_case(2048, 200_000; "m2048 n200k")]
    #[test_case(256, 20_000; "m256 n20k")]
    fn test_large_cardinality_error(m: usize, n: usize) {
        let mut sketch = LogLog::<Sha256Hasher>::new(m).unwrap();
        for i in 0..n {
            sketch.add(&i);
        }
        let error = (sketch.estimate() - n as f64).abs() / n as f64;
        // standard error of LogLog is 1.30 / sqrt(m)
        assert!(error < 5.0 * 1.30 / (m as f64).sqrt(), "error = {error}");
    }

    #[test]
    fn test_custom_hasher() {
        let mut sketch = LogLog::<WyHash>::new(1024).unwrap();
        for i in 0..100_000 {
            sketch.add(&i);
        }
        let error = (sketch.estimate() - 100_000.0).abs() / 100_000.0;
        assert!(error < 0.25, "error = {error}");
    }

    #[test]
    fn test_merge() {
        let mut lhs = LogLog::<Sha256Hasher>::new(128).unwrap();
        let mut rhs = LogLog::<Sha256Hasher>::new(128).unwrap();
        let mut union = LogLog::<Sha256Hasher>::new(128).unwrap();
        for i in 0..1000 {
            lhs.add(&i);
            union.add(&i);
        }
        for i in 500..3000 {
            rhs.add(&i);
            union.add(&i);
        }
        lhs.merge(&rhs).unwrap();
        assert_eq!(lhs, union);
        assert_eq!(lhs.estimate(), union.estimate());

        let other = LogLog::<Sha256Hasher>::new(64).unwrap();
        assert_eq!(
            lhs.merge(&other),
            Err(ConfigError::Mismatch { lhs: 128, rhs: 64 })
        );
    }
}
