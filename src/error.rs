use thiserror::Error;

use crate::sketch::SketchKind;

/// Errors raised while building or combining sketches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("register count {0} is not a positive power of two")]
    NotPowerOfTwo(usize),
    #[error("register count {registers} exceeds the maximum of {max}")]
    TooManyRegisters { registers: usize, max: usize },
    #[error("cannot merge sketch with {rhs} registers into sketch with {lhs} registers")]
    Mismatch { lhs: usize, rhs: usize },
    #[error("cannot merge {rhs} sketch into {lhs} sketch")]
    KindMismatch { lhs: SketchKind, rhs: SketchKind },
    #[error("expected {expected} registers, got {actual}")]
    RegisterCount { expected: usize, actual: usize },
    #[error("register {index} holds rank {rank}, maximum is {max}")]
    RankOutOfRange { index: usize, rank: u8, max: u8 },
    #[error("trial sweep needs at least one run per point")]
    NoRuns,
}
