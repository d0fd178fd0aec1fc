use crate::error::ConfigError;
use crate::registers::MAX_PRECISION;

/// Immutable sketch parameters fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchConfig {
    registers: usize,
    precision: u32,
    alpha: f64,
}

impl SketchConfig {
    /// Validate register count `m` and cache the bias correction constant computed by `alpha`.
    pub fn new(registers: usize, alpha: impl FnOnce(usize) -> f64) -> Result<Self, ConfigError> {
        if !registers.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(registers));
        }
        let precision = registers.trailing_zeros();
        if precision > MAX_PRECISION {
            return Err(ConfigError::TooManyRegisters {
                registers,
                max: 1 << MAX_PRECISION,
            });
        }
        Ok(Self {
            registers,
            precision,
            alpha: alpha(registers),
        })
    }

    /// Number of registers `m`
    #[inline]
    pub fn registers(&self) -> usize {
        self.registers
    }

    /// Number of bucket-index bits `log2(m)`
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Bias correction constant
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}
