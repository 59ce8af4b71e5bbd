//! Word abstraction shared by every engine.
//!
//! The round and schedule functions are written once against [`Word`] and
//! instantiated for the scalar words (`u32`, `u64`) and for the wide lane
//! words in [`crate::lanes`]. Everything here is wrapping arithmetic and
//! bitwise logic; no operation can fail.

use std::fmt::Debug;

/// Arithmetic and bitwise operations needed by SHA rounds and schedules.
///
/// Implementors are either a scalar word or a batch of independent scalar
/// words processed together. Operations act element-wise on batches.
pub trait Word: Copy + Send + Sync + 'static {
    /// Scalar element type of this word.
    type Scalar: Scalar;

    /// Broadcasts a scalar into every element.
    fn splat(value: Self::Scalar) -> Self;

    /// Wrapping addition.
    fn add(self, rhs: Self) -> Self;

    /// Bitwise exclusive or.
    fn xor(self, rhs: Self) -> Self;

    /// Bitwise and.
    fn and(self, rhs: Self) -> Self;

    /// Bitwise or.
    fn or(self, rhs: Self) -> Self;

    /// Bitwise complement.
    fn not(self) -> Self;

    /// Rotate right by `n` bits.
    fn rotr(self, n: u32) -> Self;

    /// Rotate left by `n` bits.
    fn rotl(self, n: u32) -> Self;

    /// Logical shift right by `n` bits.
    fn shr(self, n: u32) -> Self;
}

/// A single machine word (`u32` or `u64`) with big-endian serialization.
pub trait Scalar: Word<Scalar = Self> + Eq + Debug + Default {
    /// Width in bits.
    const BITS: u32;

    /// Width in bytes.
    const BYTES: usize;

    /// Reads a word from exactly [`Self::BYTES`] big-endian bytes.
    fn from_be_slice(bytes: &[u8]) -> Self;

    /// Writes the word as big-endian into exactly [`Self::BYTES`] bytes.
    fn write_be(self, out: &mut [u8]);

    /// Truncates a 128-bit value to this word width.
    fn from_u128(value: u128) -> Self;
}

macro_rules! impl_scalar_word {
    ($ty:ty) => {
        impl Word for $ty {
            type Scalar = $ty;

            #[inline(always)]
            fn splat(value: Self) -> Self {
                value
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                self ^ rhs
            }

            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                self & rhs
            }

            #[inline(always)]
            fn or(self, rhs: Self) -> Self {
                self | rhs
            }

            #[inline(always)]
            fn not(self) -> Self {
                !self
            }

            #[inline(always)]
            fn rotr(self, n: u32) -> Self {
                self.rotate_right(n)
            }

            #[inline(always)]
            fn rotl(self, n: u32) -> Self {
                self.rotate_left(n)
            }

            #[inline(always)]
            fn shr(self, n: u32) -> Self {
                self >> n
            }
        }

        impl Scalar for $ty {
            const BITS: u32 = <$ty>::BITS;
            const BYTES: usize = std::mem::size_of::<$ty>();

            #[inline(always)]
            fn from_be_slice(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_be_bytes(buf)
            }

            #[inline(always)]
            fn write_be(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_be_bytes());
            }

            #[inline(always)]
            fn from_u128(value: u128) -> Self {
                value as $ty
            }
        }
    };
}

impl_scalar_word!(u32);
impl_scalar_word!(u64);

/// Fixed-length array of words (state, schedule buffer, round constants).
///
/// Implemented for every `[X; N]`, which lets variants name their array
/// shapes as associated types without generic const expressions.
pub trait WordArray<X: Word>: Copy + Send + Sync + 'static {
    /// Number of words.
    const LEN: usize;

    /// Array with every entry set to `value`.
    fn splat(value: X) -> Self;

    /// Shared view of the words.
    fn words(&self) -> &[X];

    /// Mutable view of the words.
    fn words_mut(&mut self) -> &mut [X];
}

impl<X: Word, const N: usize> WordArray<X> for [X; N] {
    const LEN: usize = N;

    #[inline(always)]
    fn splat(value: X) -> Self {
        [value; N]
    }

    #[inline(always)]
    fn words(&self) -> &[X] {
        self
    }

    #[inline(always)]
    fn words_mut(&mut self) -> &mut [X] {
        self
    }
}

/// Fixed-length byte array (block, half-block, digest).
pub trait ByteArray:
    Copy + Send + Sync + Eq + Debug + std::hash::Hash + AsRef<[u8]> + AsMut<[u8]> + 'static
{
    /// Number of bytes.
    const LEN: usize;

    /// All-zero array.
    fn zeroed() -> Self;
}

impl<const N: usize> ByteArray for [u8; N] {
    const LEN: usize = N;

    #[inline(always)]
    fn zeroed() -> Self {
        [0u8; N]
    }
}
