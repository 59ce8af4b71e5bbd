//! Vector engine: lane-batched schedules and Merkle pairs.
//!
//! Blocks are packed in the transposed layout (word `k` of every block in
//! one [`Lanes`] value) and scheduled once per batch with the scalar code.
//! Two fusion points are used:
//!
//! * [`iterate`] hashes consecutive blocks of one message. The blocks'
//!   schedules are independent, but their compressions chain through the
//!   state, so each lane is unpacked and compressed in order.
//! * [`merkle`] hashes independent digest pairs, so rounds run fully
//!   vectorized as well: both compressions of the first hash and the rehash.
//!
//! Only full batches are processed. The caller hands the remainder to the
//! native or scalar engine; no lane is ever filled with padding.

use crate::algorithm::compress;
use crate::lanes::Lanes;
use crate::variant::{Doubled, Sha};
use crate::word::{ByteArray, Scalar, Word, WordArray};

type Wide<S, const N: usize> = Lanes<<S as Sha>::Word, N>;

#[inline(always)]
fn zeroed<S: Sha, const N: usize>() -> S::Buffer<Wide<S, N>> {
    <S::Buffer<Wide<S, N>> as WordArray<Wide<S, N>>>::splat(<Wide<S, N> as Word>::splat(
        S::Word::default(),
    ))
}

/// Packs `N` blocks into the first sixteen wide schedule words.
#[inline(always)]
fn pack<S: Sha, const N: usize>(wide: &mut S::Buffer<Wide<S, N>>, blocks: &[S::Block]) {
    debug_assert_eq!(blocks.len(), N);
    let bytes = <S::Word as Scalar>::BYTES;
    for (k, word) in wide.words_mut()[..16].iter_mut().enumerate() {
        *word = Lanes::from_fn(|lane| {
            S::Word::from_be_slice(&blocks[lane].as_ref()[k * bytes..(k + 1) * bytes])
        });
    }
}

/// Unpacks one lane of a scheduled wide buffer.
#[inline(always)]
fn extract<S: Sha, const N: usize>(wide: &S::Buffer<Wide<S, N>>, lane: usize) -> S::Buffer<S::Word> {
    let mut buffer = <S::Buffer<S::Word> as WordArray<S::Word>>::splat(S::Word::default());
    for (dst, src) in buffer.words_mut().iter_mut().zip(wide.words()) {
        *dst = src.lane(lane);
    }
    buffer
}

/// Accumulates every full batch of `N` blocks into `state`, returning the
/// blocks left over.
///
/// With `native` set, each lane's scheduled buffer is compressed by the
/// variant's hardware hook instead of the scalar rounds.
pub(crate) fn iterate<'a, S: Sha, const N: usize>(
    state: &mut S::State<S::Word>,
    blocks: &'a [S::Block],
    native: bool,
) -> &'a [S::Block] {
    let chunks = blocks.chunks_exact(N);
    let rest = chunks.remainder();
    let mut wide = zeroed::<S, N>();

    for chunk in chunks {
        pack::<S, N>(&mut wide, chunk);
        compress::schedule::<S, Wide<S, N>>(&mut wide);
        for lane in 0..N {
            let buffer = extract::<S, N>(&wide, lane);
            if native {
                S::native_compress_scheduled(state, &buffer);
            } else {
                compress::compress::<S, S::Word>(state, &buffer);
            }
        }
    }

    rest
}

/// Double-hashes digest pairs `first..` of `digests` in batches of `N`,
/// writing pair `i`'s result to `digests[i]`. Returns the index of the first
/// pair not processed.
///
/// Pair `i` reads `digests[2i]` and `digests[2i + 1]`. A batch reads all of
/// its inputs before writing, and every write index is below every later
/// read index, so one level can be folded in place.
pub(crate) fn merkle<S: Doubled, const N: usize>(
    digests: &mut [S::Digest],
    first: usize,
    pairs: usize,
) -> usize {
    debug_assert!(digests.len() >= pairs * 2);
    let bytes = <S::Word as Scalar>::BYTES;
    let padding = S::padding();
    let mut wide = zeroed::<S, N>();
    let mut next = first;

    while pairs - next >= N {
        let base = next;
        for (k, word) in wide.words_mut()[..16].iter_mut().enumerate() {
            let (side, offset) = (k / 8, (k % 8) * bytes);
            *word = Lanes::from_fn(|lane| {
                let digest = &digests[2 * (base + lane) + side];
                S::Word::from_be_slice(&digest.as_ref()[offset..offset + bytes])
            });
        }
        compress::schedule::<S, Wide<S, N>>(&mut wide);

        let mut state = <S::State<Wide<S, N>> as WordArray<Wide<S, N>>>::splat(Word::splat(
            S::Word::default(),
        ));
        for (s, &h) in state.words_mut().iter_mut().zip(S::H.words()) {
            *s = Word::splat(h);
        }
        compress::compress::<S, Wide<S, N>>(&mut state, &wide);

        for (dst, &pad) in wide.words_mut().iter_mut().zip(padding.block().words()) {
            *dst = Word::splat(pad);
        }
        compress::compress::<S, Wide<S, N>>(&mut state, &wide);

        // Rehash: the first digest is the half-block message.
        for (dst, &src) in wide.words_mut()[..8].iter_mut().zip(state.words()) {
            *dst = src;
        }
        for (dst, &pad) in wide.words_mut()[8..16].iter_mut().zip(padding.half()) {
            *dst = Word::splat(pad);
        }
        compress::schedule::<S, Wide<S, N>>(&mut wide);
        for (s, &h) in state.words_mut().iter_mut().zip(S::H.words()) {
            *s = Word::splat(h);
        }
        compress::compress::<S, Wide<S, N>>(&mut state, &wide);

        for lane in 0..N {
            let mut digest = S::Digest::zeroed();
            for (chunk, word) in digest.as_mut().chunks_exact_mut(bytes).zip(state.words()) {
                word.lane(lane).write_be(chunk);
            }
            digests[base + lane] = digest;
        }
        next += N;
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{Sha160, Sha256, Sha512};

    fn blocks<S: Sha>(count: usize) -> Vec<S::Block> {
        (0..count)
            .map(|i| {
                let mut block = S::Block::zeroed();
                for (j, byte) in block.as_mut().iter_mut().enumerate() {
                    *byte = (i * 7 + j * 13) as u8;
                }
                block
            })
            .collect()
    }

    fn scalar_accumulate<S: Sha>(blocks: &[S::Block]) -> S::State<S::Word> {
        let mut state = S::H;
        for block in blocks {
            compress::compress_block::<S>(&mut state, block);
        }
        state
    }

    #[test]
    fn iterate_matches_scalar_and_returns_remainder() {
        let input = blocks::<Sha256>(11);
        let mut state = Sha256::H;
        let rest = iterate::<Sha256, 4>(&mut state, &input, false);
        assert_eq!(rest.len(), 3);
        for block in rest {
            compress::compress_block::<Sha256>(&mut state, block);
        }
        assert_eq!(state, scalar_accumulate::<Sha256>(&input));
    }

    #[test]
    fn iterate_covers_sha1_and_sha512() {
        let input = blocks::<Sha160>(16);
        let mut state = Sha160::H;
        assert!(iterate::<Sha160, 16>(&mut state, &input, false).is_empty());
        assert_eq!(state, scalar_accumulate::<Sha160>(&input));

        let input = blocks::<Sha512>(4);
        let mut state = Sha512::H;
        assert!(iterate::<Sha512, 2>(&mut state, &input, false).is_empty());
        assert_eq!(state, scalar_accumulate::<Sha512>(&input));
    }

    #[test]
    fn iterate_with_native_hook_matches_scalar() {
        let input = blocks::<Sha256>(8);
        let mut state = Sha256::H;
        assert!(iterate::<Sha256, 8>(&mut state, &input, true).is_empty());
        assert_eq!(state, scalar_accumulate::<Sha256>(&input));
    }

    #[test]
    fn merkle_stops_before_partial_batch() {
        let mut digests: Vec<[u8; 32]> = (0..10u8).map(|i| [i; 32]).collect();
        let original = digests.clone();
        let next = merkle::<Sha256, 4>(&mut digests, 0, 5);
        assert_eq!(next, 4);
        // The unprocessed fifth pair is still intact at its source indices.
        assert_eq!(digests[8], original[8]);
        assert_eq!(digests[9], original[9]);
    }
}
