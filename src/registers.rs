//! ## Register array
//! Shared by the LogLog and HyperLogLog sketches.
//!
//! A 64-bit hash is split into a bucket index (top `P` bits) and a remainder
//! (the other `64 - P` bits shifted to the top). The rank of the remainder is the
//! 1-based position of its leftmost set bit, so it lies in `[1, 64 - P + 1]`, where
//! the upper bound is reached only by an all-zero remainder.
//!
//! Ranks are stored bit-packed in a `u32` slice using `W` bits per register, where
//! `W` is the smallest width able to hold `64 - P + 1`:
//! - words[0..]    - store register ranks using `W` bits per each register.
//! - words[last]   - one extra element for branchless register reads and writes
//!   (see `set_register` for more details).

use std::fmt::{Debug, Formatter};
use std::mem::{size_of, size_of_val};

use crate::error::ConfigError;

/// Width of the projected hash.
pub const HASH_BITS: u32 = 64;
/// Largest supported precision, i.e. `2^26` registers.
pub const MAX_PRECISION: u32 = 26;

/// Fixed-length array of `2^P` monotonically growing ranks.
#[derive(Clone, PartialEq, Eq)]
pub struct Registers {
    words: Vec<u32>,
    count: usize,
    precision: u32,
    width: usize,
    zeros: usize,
}

impl Registers {
    /// Create zero-filled registers for the given precision.
    pub(crate) fn new(precision: u32) -> Self {
        debug_assert!(precision <= MAX_PRECISION);
        let count = 1usize << precision;
        let width = bit_width(max_rank(precision));
        Self {
            words: vec![0u32; count * width / 32 + 2],
            count,
            precision,
            width,
            zeros: count,
        }
    }

    /// Rebuild registers from explicit rank values, validating every rank.
    pub fn from_ranks(precision: u32, ranks: &[u8]) -> Result<Self, ConfigError> {
        let mut registers = Self::new(precision);
        if ranks.len() != registers.count {
            return Err(ConfigError::RegisterCount {
                expected: registers.count,
                actual: ranks.len(),
            });
        }
        let max = registers.max_rank();
        for (index, &rank) in ranks.iter().enumerate() {
            if rank > max {
                return Err(ConfigError::RankOutOfRange { index, rank, max });
            }
            registers.update(index, rank);
        }
        Ok(registers)
    }

    /// Number of registers
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of bucket-index bits
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Largest rank a register can hold
    #[inline]
    pub fn max_rank(&self) -> u8 {
        max_rank(self.precision)
    }

    /// Number of registers still set to 0
    #[inline]
    pub fn zeros(&self) -> usize {
        self.zeros
    }

    /// Return rank stored in register `idx`
    #[inline]
    pub fn get(&self, idx: usize) -> u8 {
        get_register(&self.words, self.width, idx) as u8
    }

    /// Iterate over all ranks in register order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.count).map(move |idx| self.get(idx))
    }

    /// Raise register `idx` to `rank` unless it already holds a rank at least as large.
    /// Returns whether the register changed.
    #[inline]
    pub(crate) fn update(&mut self, idx: usize, rank: u8) -> bool {
        let old_rank = self.get(idx);
        if rank <= old_rank {
            return false;
        }
        set_register(&mut self.words, self.width, idx, u32::from(rank));
        if old_rank == 0 {
            self.zeros -= 1;
        }
        true
    }

    /// Split `hash` into bucket and rank and update the matching register.
    #[inline]
    pub(crate) fn insert_hash(&mut self, hash: u64) -> bool {
        let (idx, rank) = bucket_and_rank(hash, self.precision);
        self.update(idx, rank)
    }

    /// Register-wise maximum of `self` and `rhs`.
    pub(crate) fn merge(&mut self, rhs: &Registers) -> Result<(), ConfigError> {
        if self.count != rhs.count {
            return Err(ConfigError::Mismatch {
                lhs: self.count,
                rhs: rhs.count,
            });
        }
        for idx in 0..self.count {
            self.update(idx, rhs.get(idx));
        }
        Ok(())
    }

    /// Reset every register to 0
    pub(crate) fn clear(&mut self) {
        self.words.fill(0);
        self.zeros = self.count;
    }

    /// Sum of all ranks
    pub fn rank_sum(&self) -> u64 {
        self.iter().map(u64::from).sum()
    }

    /// Sum of `2^-rank` over all registers
    pub fn harmonic_sum(&self) -> f64 {
        self.iter().map(|rank| 2f64.powi(-i32::from(rank))).sum()
    }

    /// Return memory size of the registers, including the heap allocated words
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(self.words.as_slice())
    }
}

impl Debug for Registers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registers")
            .field("count", &self.count)
            .field("width", &self.width)
            .field("zeros", &self.zeros)
            .finish()
    }
}

/// Largest rank produced for the given precision: an all-zero remainder of `64 - P` bits.
#[inline]
pub fn max_rank(precision: u32) -> u8 {
    (HASH_BITS - precision + 1) as u8
}

/// Split a 64-bit hash into its register index (top `precision` bits) and the rank of the
/// remaining bits.
///
/// The leading-zero scan is bounded by the remainder's `64 - precision` bits, so an all-zero
/// remainder yields `64 - precision + 1`.
#[inline]
pub fn bucket_and_rank(hash: u64, precision: u32) -> (usize, u8) {
    let idx = hash.checked_shr(HASH_BITS - precision).unwrap_or(0) as usize;
    let remainder = hash << precision;
    let rank = remainder.leading_zeros().min(HASH_BITS - precision) + 1;
    (idx, rank as u8)
}

/// Number of bits needed to store `v`
#[inline]
fn bit_width(v: u8) -> usize {
    (u8::BITS - v.leading_zeros()) as usize
}

/// Get `idx` register of `width` bits
#[inline]
fn get_register(words: &[u32], width: usize, idx: usize) -> u32 {
    let bit_idx = idx * width;
    let u32_idx = bit_idx / 32;
    let bit_pos = bit_idx % 32;
    let bits = &words[u32_idx..u32_idx + 2];
    let bits_1 = width.min(32 - bit_pos);
    let bits_2 = width - bits_1;
    let mask_1 = (1u32 << bits_1) - 1;
    let mask_2 = (1u32 << bits_2) - 1;

    ((bits[0] >> bit_pos) & mask_1) | ((bits[1] & mask_2) << bits_1)
}

/// Set `idx` register of `width` bits to new value `rank`
#[inline]
fn set_register(words: &mut [u32], width: usize, idx: usize, rank: u32) {
    let bit_idx = idx * width;
    let u32_idx = bit_idx / 32;
    let bit_pos = bit_idx % 32;
    let bits = &mut words[u32_idx..u32_idx + 2];
    let bits_1 = width.min(32 - bit_pos);
    let bits_2 = width - bits_1;
    let mask_1 = (1u32 << bits_1) - 1;
    let mask_2 = (1u32 << bits_2) - 1;

    // Unconditionally update two `u32` elements based on `rank` bits and masks
    bits[0] &= !(mask_1 << bit_pos);
    bits[0] |= (rank & mask_1) << bit_pos;
    bits[1] &= !mask_2;
    bits[1] |= (rank >> bits_1) & mask_2;
}
