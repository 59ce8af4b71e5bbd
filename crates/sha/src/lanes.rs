//! Wide lane words for the vector engine.
//!
//! A [`Lanes`] value holds the same word position of `N` independent blocks
//! (the transposed layout: word `k` of every block in one register-sized
//! value). Operations are element-wise, so the scalar round and schedule code
//! runs unchanged over `N` blocks at once. The loops are plain array maps that
//! the compiler lowers to SSE/AVX2/AVX-512/NEON instructions when those target
//! features are enabled for the build.

use crate::word::{Scalar, Word};

/// `N` independent scalar words processed as one wide word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct Lanes<W, const N: usize>(pub [W; N]);

impl<W: Scalar, const N: usize> Lanes<W, N> {
    /// Number of lanes.
    pub const LANES: usize = N;

    /// Builds a wide word from a per-lane function.
    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> W) -> Self {
        Self(std::array::from_fn(f))
    }

    /// Extracts one lane.
    #[inline(always)]
    pub fn lane(&self, index: usize) -> W {
        self.0[index]
    }

    #[inline(always)]
    fn zip(self, rhs: Self, f: impl Fn(W, W) -> W) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], rhs.0[i])))
    }

    #[inline(always)]
    fn map(self, f: impl Fn(W) -> W) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i])))
    }
}

impl<W: Scalar, const N: usize> Word for Lanes<W, N> {
    type Scalar = W;

    #[inline(always)]
    fn splat(value: W) -> Self {
        Self([value; N])
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, W::add)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        self.zip(rhs, W::xor)
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        self.zip(rhs, W::and)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        self.zip(rhs, W::or)
    }

    #[inline(always)]
    fn not(self) -> Self {
        self.map(W::not)
    }

    #[inline(always)]
    fn rotr(self, n: u32) -> Self {
        self.map(|x| x.rotr(n))
    }

    #[inline(always)]
    fn rotl(self, n: u32) -> Self {
        self.map(|x| x.rotl(n))
    }

    #[inline(always)]
    fn shr(self, n: u32) -> Self {
        self.map(|x| x.shr(n))
    }
}
