//! x86_64 SHA extensions backend.
//!
//! # Safety
//!
//! This module is compiled only when the build enables `sha` and `sse4.1`,
//! so every intrinsic here is available on any CPU the binary runs on. The
//! only raw-pointer operations are unaligned loads and stores of `[u32; 4]`,
//! which are exactly 16 bytes.

#![allow(unsafe_code)]

use std::arch::x86_64::{
    __m128i, _mm_add_epi32, _mm_alignr_epi8, _mm_loadu_si128, _mm_sha256msg1_epu32,
    _mm_sha256msg2_epu32, _mm_sha256rnds2_epu32, _mm_shuffle_epi32, _mm_storeu_si128,
};

use super::NativeOps;

/// Hardware backend using `sha256rnds2`, `sha256msg1` and `sha256msg2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShaNi;

impl NativeOps for ShaNi {
    type V = __m128i;

    #[inline(always)]
    fn load(words: &[u32; 4]) -> Self::V {
        // SAFETY: `words` is 16 readable bytes; loadu has no alignment requirement.
        unsafe { _mm_loadu_si128(words.as_ptr().cast()) }
    }

    #[inline(always)]
    fn store(v: Self::V) -> [u32; 4] {
        let mut out = [0u32; 4];
        // SAFETY: `out` is 16 writable bytes; storeu has no alignment requirement.
        unsafe { _mm_storeu_si128(out.as_mut_ptr().cast(), v) };
        out
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    fn add(a: Self::V, b: Self::V) -> Self::V {
        // SAFETY: SSE2 is part of the x86_64 baseline.
        unsafe { _mm_add_epi32(a, b) }
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    fn rnds2(cdgh: Self::V, abef: Self::V, wk: Self::V) -> Self::V {
        // SAFETY: the `sha` target feature is enabled for this build.
        unsafe { _mm_sha256rnds2_epu32(cdgh, abef, wk) }
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    fn msg1(a: Self::V, b: Self::V) -> Self::V {
        // SAFETY: the `sha` target feature is enabled for this build.
        unsafe { _mm_sha256msg1_epu32(a, b) }
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    fn msg2(a: Self::V, b: Self::V) -> Self::V {
        // SAFETY: the `sha` target feature is enabled for this build.
        unsafe { _mm_sha256msg2_epu32(a, b) }
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    fn alignr4(hi: Self::V, lo: Self::V) -> Self::V {
        // SAFETY: SSSE3 is implied by the `sse4.1` target feature.
        unsafe { _mm_alignr_epi8(hi, lo, 4) }
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    fn swap_high(v: Self::V) -> Self::V {
        // SAFETY: SSE2 is part of the x86_64 baseline.
        unsafe { _mm_shuffle_epi32(v, 0x0E) }
    }
}
