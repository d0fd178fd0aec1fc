use std::fmt::{Display, Formatter};

use enum_dispatch::enum_dispatch;

use crate::config::SketchConfig;
use crate::error::ConfigError;
use crate::hash::CanonicalBytes;
use crate::hyperloglog::HyperLogLog;
use crate::loglog::LogLog;
use crate::registers::Registers;

/// Sketch variants sharing the register layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SketchKind {
    LogLog,
    HyperLogLog,
}

impl Display for SketchKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SketchKind::LogLog => f.write_str("LogLog"),
            SketchKind::HyperLogLog => f.write_str("HyperLogLog"),
        }
    }
}

/// Operations common to every distinct-count sketch.
#[enum_dispatch]
pub trait CardinalitySketch {
    fn kind(&self) -> SketchKind;
    fn config(&self) -> &SketchConfig;
    fn registers(&self) -> &Registers;
    /// Insert an already projected 64-bit hash.
    fn insert_hash(&mut self, hash: u64);
    /// Estimated number of distinct inserted values.
    fn estimate(&self) -> f64;
    /// Reset every register to 0.
    fn clear(&mut self);
    fn size_of(&self) -> usize;

    /// Whether no value has been inserted since construction or the last `clear`.
    fn is_empty(&self) -> bool {
        self.registers().zeros() == self.registers().count()
    }

    fn summary(&self) -> String {
        format!(
            "{{ registers: {}, estimate: {:.2}, size: {} }}",
            self.config().registers(),
            self.estimate(),
            self.size_of()
        )
    }
}

/// Either sketch variant behind one type, using the default hash projector.
#[enum_dispatch(CardinalitySketch)]
#[derive(Debug, Clone, PartialEq)]
pub enum Sketch {
    LogLog(LogLog),
    HyperLogLog(HyperLogLog),
}

impl Sketch {
    /// Create an empty sketch of the given kind with `registers` registers.
    pub fn new(kind: SketchKind, registers: usize) -> Result<Self, ConfigError> {
        Ok(match kind {
            SketchKind::LogLog => Sketch::LogLog(LogLog::new(registers)?),
            SketchKind::HyperLogLog => Sketch::HyperLogLog(HyperLogLog::new(registers)?),
        })
    }

    /// Insert a hashable value
    #[inline]
    pub fn add<T: CanonicalBytes + ?Sized>(&mut self, value: &T) {
        match self {
            Sketch::LogLog(sketch) => sketch.add(value),
            Sketch::HyperLogLog(sketch) => sketch.add(value),
        }
    }

    /// Merge two sketches of the same kind and register count
    pub fn merge(&mut self, rhs: &Sketch) -> Result<(), ConfigError> {
        match (self, rhs) {
            (Sketch::LogLog(lhs), Sketch::LogLog(rhs)) => lhs.merge(rhs),
            (Sketch::HyperLogLog(lhs), Sketch::HyperLogLog(rhs)) => lhs.merge(rhs),
            (lhs, rhs) => Err(ConfigError::KindMismatch {
                lhs: lhs.kind(),
                rhs: rhs.kind(),
            }),
        }
    }
}
