//! `cardinality-sketches` estimates the number of distinct elements in a stream or dataset
//! with two register-based sketches sharing one layout:
//! - [`LogLog`]: geometric mean of register ranks.
//! - [`HyperLogLog`]: harmonic mean of `2^-rank` with small and large range corrections.
//!
//! Both project every value onto a deterministic 64-bit hash, use the top `log2(m)` bits as
//! register index and keep the maximum rank (position of the leftmost set bit) of the
//! remaining bits in each register.
//!
//! ```
//! use cardinality_sketches::{CardinalitySketch, HyperLogLog};
//!
//! let mut sketch: HyperLogLog = HyperLogLog::new(1024).unwrap();
//! for i in 0..10_000 {
//!     sketch.add(&i);
//! }
//! let error = (sketch.estimate() - 10_000.0).abs() / 10_000.0;
//! assert!(error < 0.2);
//! ```
pub mod config;
pub mod error;
pub mod hash;
pub mod hyperloglog;
pub mod loglog;
pub mod registers;
#[cfg(feature = "with_serde")]
mod serde;
pub mod sketch;
pub mod trials;

pub use config::SketchConfig;
pub use error::ConfigError;
pub use hash::{CanonicalBytes, HashProjector, Sha256Hasher, WyHash};
pub use hyperloglog::{HyperLogLog, Regime};
pub use loglog::LogLog;
pub use registers::Registers;
pub use sketch::{CardinalitySketch, Sketch, SketchKind};
pub use trials::{run_trials, TrialConfig, TrialPoint};
