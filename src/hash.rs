//! ## Hash projection
//! Every sketch maps its input onto a 64-bit value before touching the registers.
//! The projection must be identical across processes, platforms and sketch instances,
//! otherwise two sketches fed the same stream cannot be compared, merged or restored
//! from their serialized form.
//!
//! Values are therefore not hashed through `std::hash::Hash`, whose byte stream is native-endian,
//! width-dependent and not stable across compiler versions. Instead they write a canonical
//! byte form through [`CanonicalBytes`]:
//! - unsigned integers as 8 big-endian bytes of their `u64` value, signed integers as
//!   8 big-endian bytes of their `i64` value (so `5u32` and `5usize` project alike);
//! - 128-bit integers as 16 big-endian bytes;
//! - strings and chars as raw UTF-8, byte slices as is, `bool` as a single `0` or `1` byte.
//!
//! [`Sha256Hasher`] is the default projector: it feeds the canonical bytes into SHA-256 and
//! reads the first 8 bytes of the digest big-endian. Any `Hasher + Default` with a fixed seed
//! (e.g. [`WyHash`]) can be swapped in through the sketches' `H` type parameter. Projection is
//! only available through [`BuildHasherDefault`], so seeded builders such as
//! `std::collections::hash_map::RandomState` cannot act as projectors.

use std::hash::{BuildHasherDefault, Hasher};

use sha2::{Digest, Sha256};
/// Fast non-cryptographic alternative to [`Sha256Hasher`], seeded with 0 by `Default`.
pub use wyhash::WyHash;

/// Platform independent byte form of a value fed to the hash projector.
pub trait CanonicalBytes {
    fn write_canonical<S: Hasher>(&self, state: &mut S);
}

macro_rules! canonical_int {
    ($wide:ty => $($ty:ty),*) => {
        $(
            impl CanonicalBytes for $ty {
                #[inline]
                fn write_canonical<S: Hasher>(&self, state: &mut S) {
                    state.write(&<$wide>::from(*self).to_be_bytes());
                }
            }
        )*
    };
}

canonical_int!(u64 => u8, u16, u32, u64);
canonical_int!(i64 => i8, i16, i32, i64);
canonical_int!(u128 => u128);
canonical_int!(i128 => i128);

// pointer-sized integers are at most 64 bits wide on every supported target
impl CanonicalBytes for usize {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        (*self as u64).write_canonical(state);
    }
}

impl CanonicalBytes for isize {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        (*self as i64).write_canonical(state);
    }
}

impl CanonicalBytes for bool {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        state.write(&[u8::from(*self)]);
    }
}

impl CanonicalBytes for char {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        let mut buf = [0u8; 4];
        state.write(self.encode_utf8(&mut buf).as_bytes());
    }
}

impl CanonicalBytes for str {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        state.write(self.as_bytes());
    }
}

impl CanonicalBytes for String {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        state.write(self.as_bytes());
    }
}

impl CanonicalBytes for [u8] {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        state.write(self);
    }
}

impl<const N: usize> CanonicalBytes for [u8; N] {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        state.write(self);
    }
}

impl CanonicalBytes for Vec<u8> {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        state.write(self);
    }
}

impl<T: CanonicalBytes + ?Sized> CanonicalBytes for &T {
    #[inline]
    fn write_canonical<S: Hasher>(&self, state: &mut S) {
        (**self).write_canonical(state);
    }
}

/// Maps a value onto a uniformly distributed `u64`.
///
/// Only fixed-seed builders project:
/// ```compile_fail
/// use cardinality_sketches::HashProjector;
/// use std::collections::hash_map::RandomState;
///
/// RandomState::new().project(&1u64);
/// ```
pub trait HashProjector {
    fn project<T: CanonicalBytes + ?Sized>(&self, value: &T) -> u64;
}

impl<H: Hasher + Default> HashProjector for BuildHasherDefault<H> {
    #[inline]
    fn project<T: CanonicalBytes + ?Sized>(&self, value: &T) -> u64 {
        let mut state = H::default();
        value.write_canonical(&mut state);
        state.finish()
    }
}

/// `Hasher` backed by a SHA-256 digest truncated to its 8 leading bytes.
#[derive(Clone, Default)]
pub struct Sha256Hasher(Sha256);

impl Hasher for Sha256Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        let digest = self.0.clone().finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix)
    }
}
