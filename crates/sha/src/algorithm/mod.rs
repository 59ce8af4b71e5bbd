//! Hashing entry points and engine dispatch.
//!
//! [`Algorithm`] is a zero-sized handle parameterized by a variant and a
//! [`Strategy`]. Every call dispatches at compile time:
//!
//! 1. the vector engine, when the call has at least [`Algorithm::min_lanes`]
//!    independent schedules and the strategy enables vectors, taking batches
//!    from the widest enabled width down to the narrowest;
//! 2. otherwise, and for any remainder, the native engine when the strategy
//!    asks for it, the build provides it and the variant has one;
//! 3. otherwise the scalar engine.
//!
//! All three produce identical bits.
//!
//! # Examples
//!
//! ```
//! use sha::{Algorithm, Sha256};
//!
//! let digest = Algorithm::<Sha256>::hash_bytes(b"abc");
//! assert_eq!(digest[..4], [0xba, 0x78, 0x16, 0xbf]);
//! ```

pub mod compress;
pub mod native;
pub mod padding;
pub(crate) mod vector;

use std::marker::PhantomData;

use crate::capability::{Capabilities, Detected, Engine, Strategy};
use crate::trace::trace_dispatch;
use crate::variant::{Doubled, Sha};
use crate::word::{ByteArray, Scalar, WordArray};

/// Hashing functions for variant `S` under strategy `C`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Algorithm<S: Sha, C: Strategy = Detected>(PhantomData<(S, C)>);

impl<S: Sha, C: Strategy> Algorithm<S, C> {
    /// Whether calls use the native engine for single blocks and remainders.
    pub const NATIVE: bool = C::CAPS.native && Capabilities::BUILD.native && S::NATIVE;

    const WORD_BITS: u32 = <S::Word as Scalar>::BITS;

    /// Lane counts of the enabled vector widths, widest first, zero when
    /// disabled.
    pub(crate) const WIDTHS: [usize; 3] = C::CAPS.lane_widths(Self::WORD_BITS);

    /// Widest lane batch, or zero when vectors are disabled.
    pub const fn lanes() -> usize {
        C::CAPS.max_lanes(Self::WORD_BITS)
    }

    /// Fewest independent schedules that take the vector engine, or zero
    /// when vectors are disabled.
    pub const fn min_lanes() -> usize {
        C::CAPS.min_lanes(Self::WORD_BITS)
    }

    /// Engine a call with `blocks` independent schedules starts on.
    pub const fn engine(blocks: usize) -> Engine {
        let widths = Self::WIDTHS;
        let mut i = 0;
        while i < widths.len() {
            if widths[i] != 0 && blocks >= widths[i] {
                return Engine::Vector { lanes: widths[i] };
            }
            i += 1;
        }
        if Self::NATIVE {
            Engine::Native
        } else {
            Engine::Scalar
        }
    }

    /// Number of blocks a message of `len` bytes occupies once padded.
    pub const fn padded_blocks(len: usize) -> usize {
        (len + 1 + S::COUNT_BYTES).div_ceil(S::BLOCK_BYTES)
    }

    // ------------------------------------------------------------------
    // Engine primitives
    // ------------------------------------------------------------------

    #[inline(always)]
    fn compress_one(state: &mut S::State<S::Word>, block: &S::Block) {
        if Self::NATIVE {
            S::native_compress(state, block);
        } else {
            compress::compress_block::<S>(state, block);
        }
    }

    #[inline(always)]
    fn compress_scheduled(state: &mut S::State<S::Word>, buffer: &S::Buffer<S::Word>) {
        if Self::NATIVE {
            S::native_compress_scheduled(state, buffer);
        } else {
            compress::compress::<S, S::Word>(state, buffer);
        }
    }

    #[inline]
    fn empty_buffer() -> S::Buffer<S::Word> {
        <S::Buffer<S::Word> as WordArray<S::Word>>::splat(S::Word::default())
    }

    /// State after hashing one padded single-block message.
    #[inline]
    fn block_state(block: &S::Block) -> S::State<S::Word> {
        let mut state = S::H;
        Self::compress_one(&mut state, block);
        Self::compress_scheduled(&mut state, S::padding().block());
        state
    }

    /// State after hashing one padded half-block message.
    #[inline]
    fn half_state(half: &S::Half) -> S::State<S::Word> {
        let mut buffer = Self::empty_buffer();
        compress::input_half::<S>(&mut buffer, half);
        S::padding().pad_half(&mut buffer);
        compress::schedule::<S, S::Word>(&mut buffer);
        let mut state = S::H;
        Self::compress_scheduled(&mut state, &buffer);
        state
    }

    #[inline]
    fn join(left: &S::Half, right: &S::Half) -> S::Block {
        let mut block = S::Block::zeroed();
        let (head, tail) = block.as_mut().split_at_mut(S::BLOCK_BYTES / 2);
        head.copy_from_slice(left.as_ref());
        tail.copy_from_slice(right.as_ref());
        block
    }

    // ------------------------------------------------------------------
    // Single hash
    // ------------------------------------------------------------------

    /// Hashes a message of exactly one block.
    pub fn hash(block: &S::Block) -> S::Digest {
        compress::output::<S>(&Self::block_state(block))
    }

    /// Hashes a message of exactly one half-block.
    pub fn hash_half(half: &S::Half) -> S::Digest {
        compress::output::<S>(&Self::half_state(half))
    }

    /// Hashes the one-block message `left || right`.
    pub fn hash_pair(left: &S::Half, right: &S::Half) -> S::Digest {
        Self::hash(&Self::join(left, right))
    }

    /// Hashes a message of whole blocks.
    pub fn hash_blocks(blocks: &[S::Block]) -> S::Digest {
        let mut state = S::H;
        Self::accumulate(&mut state, blocks);
        Self::finalize(state, blocks.len() as u64)
    }

    /// Hashes a message of any length.
    pub fn hash_bytes(data: &[u8]) -> S::Digest {
        let mut hasher = crate::stream::Hasher::<S, C>::new();
        hasher.update(data);
        hasher.finalize()
    }

    // ------------------------------------------------------------------
    // Streaming primitives on caller-owned state
    // ------------------------------------------------------------------

    /// Compresses `blocks` into `state`, batching schedules through the
    /// vector engine when enough blocks are present.
    pub fn accumulate(state: &mut S::State<S::Word>, blocks: &[S::Block]) {
        let mut rest = blocks;
        for lanes in Self::WIDTHS {
            if lanes == 0 || rest.len() < lanes {
                continue;
            }
            trace_dispatch!(
                variant = S::NAME,
                strategy = C::NAME,
                lanes,
                blocks = rest.len(),
                "vector accumulate"
            );
            rest = match lanes {
                16 => vector::iterate::<S, 16>(state, rest, Self::NATIVE),
                8 => vector::iterate::<S, 8>(state, rest, Self::NATIVE),
                4 => vector::iterate::<S, 4>(state, rest, Self::NATIVE),
                2 => vector::iterate::<S, 2>(state, rest, Self::NATIVE),
                _ => rest,
            };
        }
        for block in rest {
            Self::compress_one(state, block);
        }
    }

    /// Compresses a single block into `state`.
    pub fn accumulate_block(state: &mut S::State<S::Word>, block: &S::Block) {
        Self::compress_one(state, block);
    }

    /// Pads a stream of `blocks` whole blocks and returns its digest.
    ///
    /// `state` is taken by value, so finalizing twice from the same state
    /// yields the same digest.
    pub fn finalize(mut state: S::State<S::Word>, blocks: u64) -> S::Digest {
        Self::pad_stream(&mut state, blocks);
        compress::output::<S>(&state)
    }

    /// Serializes a state as a digest without padding.
    pub fn normalize(state: &S::State<S::Word>) -> S::Digest {
        compress::output::<S>(state)
    }

    #[inline]
    pub(crate) fn pad_stream(state: &mut S::State<S::Word>, blocks: u64) {
        let mut buffer = Self::empty_buffer();
        S::padding().pad_stream(&mut buffer, blocks);
        compress::schedule::<S, S::Word>(&mut buffer);
        Self::compress_scheduled(state, &buffer);
    }
}

impl<S: Doubled, C: Strategy> Algorithm<S, C> {
    /// Rehashes a finished state as a half-block message.
    ///
    /// The state words are the first digest; they become schedule words
    /// `0..8` directly, followed by the precomputed half-block pad.
    pub fn finalize_second(state: &S::State<S::Word>) -> S::Digest {
        let mut buffer = Self::empty_buffer();
        buffer.words_mut()[..8].copy_from_slice(state.words());
        S::padding().pad_half(&mut buffer);
        compress::schedule::<S, S::Word>(&mut buffer);
        let mut second = S::H;
        Self::compress_scheduled(&mut second, &buffer);
        compress::output::<S>(&second)
    }

    /// Pads a stream of `blocks` whole blocks and returns the hash of its
    /// digest.
    pub fn finalize_double(mut state: S::State<S::Word>, blocks: u64) -> S::Digest {
        Self::pad_stream(&mut state, blocks);
        Self::finalize_second(&state)
    }

    /// `hash(hash(block))`.
    pub fn double_hash(block: &S::Block) -> S::Digest {
        Self::finalize_second(&Self::block_state(block))
    }

    /// `hash(hash(half))`.
    pub fn double_hash_half(half: &S::Half) -> S::Digest {
        Self::finalize_second(&Self::half_state(half))
    }

    /// `hash(hash(left || right))`; one Merkle node.
    pub fn double_hash_pair(left: &S::Half, right: &S::Half) -> S::Digest {
        Self::double_hash(&Self::join(left, right))
    }

    /// `hash(hash(blocks))`.
    pub fn double_hash_blocks(blocks: &[S::Block]) -> S::Digest {
        let mut state = S::H;
        Self::accumulate(&mut state, blocks);
        Self::finalize_double(state, blocks.len() as u64)
    }

    /// `hash(hash(data))` for a message of any length.
    pub fn double_hash_bytes(data: &[u8]) -> S::Digest {
        let mut hasher = crate::stream::Hasher::<S, C>::new();
        hasher.update(data);
        hasher.finalize_double()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Portable, Vector128, Vector256, Vector512};
    use crate::variant::{Sha160, Sha256, Sha384, Sha512};

    #[test]
    fn padded_blocks_switches_at_count_boundary() {
        assert_eq!(Algorithm::<Sha256>::padded_blocks(0), 1);
        assert_eq!(Algorithm::<Sha256>::padded_blocks(55), 1);
        assert_eq!(Algorithm::<Sha256>::padded_blocks(56), 2);
        assert_eq!(Algorithm::<Sha256>::padded_blocks(64), 2);
        assert_eq!(Algorithm::<Sha256>::padded_blocks(119), 2);
        assert_eq!(Algorithm::<Sha256>::padded_blocks(120), 3);
        assert_eq!(Algorithm::<Sha512>::padded_blocks(111), 1);
        assert_eq!(Algorithm::<Sha512>::padded_blocks(112), 2);
    }

    #[test]
    fn engine_selection_follows_strategy() {
        assert_eq!(Algorithm::<Sha256, Portable>::engine(64), Engine::Scalar);
        assert_eq!(Algorithm::<Sha256, Vector128>::engine(3), Engine::Scalar);
        assert_eq!(
            Algorithm::<Sha256, Vector128>::engine(4),
            Engine::Vector { lanes: 4 }
        );
        assert_eq!(
            Algorithm::<Sha256, Vector512>::engine(15),
            Engine::Vector { lanes: 8 }
        );
        assert_eq!(
            Algorithm::<Sha512, Vector512>::engine(9),
            Engine::Vector { lanes: 8 }
        );
        assert_eq!(
            Algorithm::<Sha384, Vector256>::engine(2),
            Engine::Vector { lanes: 2 }
        );
    }

    #[test]
    fn lane_counts_follow_word_size() {
        assert_eq!(Algorithm::<Sha256, Vector512>::lanes(), 16);
        assert_eq!(Algorithm::<Sha512, Vector512>::lanes(), 8);
        assert_eq!(Algorithm::<Sha160, Vector256>::min_lanes(), 4);
        assert_eq!(Algorithm::<Sha256, Portable>::lanes(), 0);
    }

    #[test]
    fn native_never_enabled_for_portable_or_sha512() {
        assert!(!Algorithm::<Sha256, Portable>::NATIVE);
        assert!(!Algorithm::<Sha512, Detected>::NATIVE);
        assert_eq!(
            Algorithm::<Sha256, crate::capability::Native>::NATIVE,
            Capabilities::BUILD.native
        );
    }

    #[test]
    fn finalize_is_repeatable() {
        let block = [0x61u8; 64];
        let mut state = Sha256::H;
        Algorithm::<Sha256>::accumulate_block(&mut state, &block);
        let first = Algorithm::<Sha256>::finalize(state, 1);
        let second = Algorithm::<Sha256>::finalize(state, 1);
        assert_eq!(first, second);
        assert_eq!(first, Algorithm::<Sha256>::hash(&block));
    }

    #[test]
    fn hash_pair_is_hash_of_joined_block() {
        let left = [1u8; 32];
        let right = [2u8; 32];
        let mut block = [1u8; 64];
        block[32..].fill(2);
        assert_eq!(
            Algorithm::<Sha256>::hash_pair(&left, &right),
            Algorithm::<Sha256>::hash(&block)
        );
    }

    #[test]
    fn double_hash_is_hash_of_digest() {
        let block = [0x42u8; 128];
        let first = Algorithm::<Sha512>::hash(&block);
        assert_eq!(
            Algorithm::<Sha512>::double_hash(&block),
            Algorithm::<Sha512>::hash_half(&first)
        );
    }

    #[test]
    fn normalize_serializes_initial_state() {
        let digest = Algorithm::<Sha256>::normalize(&Sha256::H);
        assert_eq!(digest[..4], [0x6a, 0x09, 0xe6, 0x67]);
    }
}
