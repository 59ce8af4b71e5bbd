//! Native engine for SHA-256 (and SHA-224, which shares its rounds).
//!
//! The hardware works on one block at a time but advances two rounds per
//! instruction and extends the schedule four words per instruction. Its
//! state lives in two 4-word registers, `ABEF` and `CDGH`, so entry and exit
//! go through [`to_native_layout`] and [`from_native_layout`]. That pair is a
//! fixed lane permutation, unrelated to byte order.
//!
//! # Backends
//!
//! - `ShaNi`: x86_64 SHA extensions. Compiled only when the build enables
//!   `sha` and `sse4.1`, so it can never be selected on a CPU without them.
//! - [`Emulated`]: the same instruction semantics on plain arrays. It is the
//!   golden model for the hardware backend and lets the native algorithm be
//!   tested on every platform.
//!
//! [`Hardware`] names whichever backend the dispatcher uses.

mod emulated;
#[cfg(all(target_arch = "x86_64", target_feature = "sha", target_feature = "sse4.1"))]
mod shani;

pub use emulated::Emulated;
#[cfg(all(target_arch = "x86_64", target_feature = "sha", target_feature = "sse4.1"))]
pub use shani::ShaNi;

use crate::consts::K256;

/// Backend used by the dispatcher when the native engine is enabled.
#[cfg(all(target_arch = "x86_64", target_feature = "sha", target_feature = "sse4.1"))]
pub type Hardware = ShaNi;

/// Backend used by the dispatcher when the native engine is enabled.
///
/// Without hardware support the dispatcher never enables the native engine,
/// so this alias only keeps the variant hooks well-typed.
#[cfg(not(all(target_arch = "x86_64", target_feature = "sha", target_feature = "sse4.1")))]
pub type Hardware = Emulated;

/// Operations the native SHA-256 engine needs from a backend.
///
/// Vectors hold four 32-bit elements; element 0 is the lowest.
pub trait NativeOps {
    /// Four-element register.
    type V: Copy;

    /// Loads four words, element 0 first.
    fn load(words: &[u32; 4]) -> Self::V;

    /// Stores four words, element 0 first.
    fn store(v: Self::V) -> [u32; 4];

    /// Element-wise wrapping addition.
    fn add(a: Self::V, b: Self::V) -> Self::V;

    /// Two rounds. Returns the new `ABEF`; the new `CDGH` is the old `ABEF`.
    /// Only elements 0 and 1 of `wk` (message plus constant) are used.
    fn rnds2(cdgh: Self::V, abef: Self::V, wk: Self::V) -> Self::V;

    /// First schedule step: `w[t-16] + σ0(w[t-15])` for four words.
    fn msg1(a: Self::V, b: Self::V) -> Self::V;

    /// Second schedule step: adds `σ1` of the preceding words.
    fn msg2(a: Self::V, b: Self::V) -> Self::V;

    /// `[lo1, lo2, lo3, hi0]`: the concatenation shifted right by one word.
    fn alignr4(hi: Self::V, lo: Self::V) -> Self::V;

    /// Moves elements 2 and 3 down into 0 and 1.
    fn swap_high(v: Self::V) -> Self::V;
}

/// Splits an 8-word state into its `(ABEF, CDGH)` register halves.
///
/// `ABEF` holds `[f, e, b, a]` and `CDGH` holds `[h, g, d, c]` (element 0
/// first).
#[inline(always)]
pub fn to_native_layout(state: &[u32; 8]) -> ([u32; 4], [u32; 4]) {
    let [a, b, c, d, e, f, g, h] = *state;
    ([f, e, b, a], [h, g, d, c])
}

/// Inverse of [`to_native_layout`].
#[inline(always)]
pub fn from_native_layout(abef: &[u32; 4], cdgh: &[u32; 4]) -> [u32; 8] {
    let [f, e, b, a] = *abef;
    let [h, g, d, c] = *cdgh;
    [a, b, c, d, e, f, g, h]
}

#[inline(always)]
fn rounds4<O: NativeOps>(abef: &mut O::V, cdgh: &mut O::V, wk: O::V) {
    *cdgh = O::rnds2(*cdgh, *abef, wk);
    *abef = O::rnds2(*abef, *cdgh, O::swap_high(wk));
}

#[inline(always)]
fn quad(words: &[u32]) -> [u32; 4] {
    [words[0], words[1], words[2], words[3]]
}

#[inline(always)]
fn load_state<O: NativeOps>(state: &[u32; 8]) -> (O::V, O::V) {
    let (abef, cdgh) = to_native_layout(state);
    (O::load(&abef), O::load(&cdgh))
}

#[inline(always)]
fn store_state<O: NativeOps>(state: &mut [u32; 8], abef: O::V, cdgh: O::V) {
    *state = from_native_layout(&O::store(abef), &O::store(cdgh));
}

/// Compresses one block, extending the schedule in registers.
///
/// Quads 0..4 come straight from the block; quads 4..16 are derived with
/// `msg1`/`msg2` from the four preceding quads, kept in a ring of four.
#[inline]
pub fn compress_block<O: NativeOps>(state: &mut [u32; 8], block: &[u8; 64]) {
    let (mut abef, mut cdgh) = load_state::<O>(state);
    let (saved_abef, saved_cdgh) = (abef, cdgh);

    let mut ring = [O::load(&[0; 4]); 4];
    for q in 0..16 {
        let slot = q % 4;
        ring[slot] = if q < 4 {
            let mut words = [0u32; 4];
            for (word, bytes) in words.iter_mut().zip(block[q * 16..q * 16 + 16].chunks_exact(4)) {
                *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            }
            O::load(&words)
        } else {
            let prev = ring[(q + 3) % 4];
            let prev2 = ring[(q + 2) % 4];
            let partial = O::add(O::msg1(ring[slot], ring[(q + 1) % 4]), O::alignr4(prev, prev2));
            O::msg2(partial, prev)
        };
        let wk = O::add(ring[slot], O::load(&quad(&K256[q * 4..])));
        rounds4::<O>(&mut abef, &mut cdgh, wk);
    }

    abef = O::add(abef, saved_abef);
    cdgh = O::add(cdgh, saved_cdgh);
    store_state::<O>(state, abef, cdgh);
}

/// Compresses a buffer that already holds `w[t] + K[t]` for all 64 rounds.
///
/// No schedule work happens here; this is the path for the precomputed pad
/// schedules and for blocks whose schedule was built by the vector engine.
#[inline]
pub fn compress_scheduled<O: NativeOps>(state: &mut [u32; 8], buffer: &[u32; 64]) {
    let (mut abef, mut cdgh) = load_state::<O>(state);
    let (saved_abef, saved_cdgh) = (abef, cdgh);

    for wk in buffer.chunks_exact(4) {
        rounds4::<O>(&mut abef, &mut cdgh, O::load(&quad(wk)));
    }

    abef = O::add(abef, saved_abef);
    cdgh = O::add(cdgh, saved_cdgh);
    store_state::<O>(state, abef, cdgh);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::compress;
    use crate::consts::H256;
    use crate::variant::Sha256;

    fn sample_block(seed: u8) -> [u8; 64] {
        std::array::from_fn(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
    }

    #[test]
    fn layout_round_trips() {
        let state = [1, 2, 3, 4, 5, 6, 7, 8];
        let (abef, cdgh) = to_native_layout(&state);
        assert_eq!(abef, [6, 5, 2, 1]);
        assert_eq!(cdgh, [8, 7, 4, 3]);
        assert_eq!(from_native_layout(&abef, &cdgh), state);
    }

    #[test]
    fn emulated_block_matches_scalar() {
        for seed in [0u8, 1, 0x5a, 0xff] {
            let block = sample_block(seed);
            let mut expected = H256;
            compress::compress_block::<Sha256>(&mut expected, &block);
            let mut actual = H256;
            compress_block::<Emulated>(&mut actual, &block);
            assert_eq!(actual, expected, "seed {seed}");
        }
    }

    #[test]
    fn emulated_scheduled_matches_scalar() {
        let block = sample_block(7);
        let mut buffer = [0u32; 64];
        compress::input::<Sha256>(&mut buffer, &block);
        compress::schedule::<Sha256, u32>(&mut buffer);

        let mut expected = H256;
        compress::compress::<Sha256, u32>(&mut expected, &buffer);
        let mut actual = H256;
        compress_scheduled::<Emulated>(&mut actual, &buffer);
        assert_eq!(actual, expected);
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "sha", target_feature = "sse4.1"))]
    #[test]
    fn hardware_matches_emulated() {
        for seed in 0..16u8 {
            let block = sample_block(seed);
            let mut emulated = H256;
            compress_block::<Emulated>(&mut emulated, &block);
            let mut hardware = H256;
            compress_block::<ShaNi>(&mut hardware, &block);
            assert_eq!(hardware, emulated, "seed {seed}");
        }
    }
}
