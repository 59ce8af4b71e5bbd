//! FIPS 180-4 padding and the precomputed pad schedules.
//!
//! A message is padded with one `1` bit (the byte `0x80`), zeros, and the
//! message length in bits as a big-endian integer filling the last two words
//! of the final block. Three shapes recur often enough to precompute:
//!
//! * the pad block after a message of exactly one block, fully scheduled
//!   (message words plus round constants), so hashing a single block or a
//!   digest pair costs one scheduled compression for the padding;
//! * the second half of a half-block message (the rehash in double hashing);
//! * the pad block after a block-aligned stream, missing only its count.
//!
//! All three are built once per variant behind a `OnceLock` (see
//! [`Sha::padding`]) and never change afterwards.

use crate::algorithm::compress;
use crate::trace::trace_padding;
use crate::variant::Sha;
use crate::word::{Scalar, WordArray};

/// Precomputed padding for one variant.
pub struct Padding<S: Sha> {
    block: S::Buffer<S::Word>,
    half: [S::Word; 8],
    stream: [S::Word; 16],
}

/// First pad word: the `1` bit in the top byte.
#[inline]
fn marker<W: Scalar>() -> W {
    W::from_u128(0x80u128 << (W::BITS - 8))
}

/// The bit count as the two trailing words (high, low).
#[inline]
pub(crate) fn count_words<W: Scalar>(bits: u128) -> [W; 2] {
    [W::from_u128(bits >> W::BITS), W::from_u128(bits)]
}

impl<S: Sha> Padding<S> {
    /// Computes every pad schedule for `S`.
    pub fn new() -> Self {
        let zero = S::Word::default();

        let mut stream = [zero; 16];
        stream[0] = marker::<S::Word>();

        let mut half = [zero; 8];
        half[0] = marker::<S::Word>();
        let half_bits = (S::BLOCK_BYTES as u128 / 2) * 8;
        half[6..].copy_from_slice(&count_words::<S::Word>(half_bits));

        let mut block = <S::Buffer<S::Word> as WordArray<S::Word>>::splat(zero);
        block.words_mut()[..16].copy_from_slice(&stream);
        let block_bits = S::BLOCK_BYTES as u128 * 8;
        block.words_mut()[14..16].copy_from_slice(&count_words::<S::Word>(block_bits));
        compress::schedule::<S, S::Word>(&mut block);

        trace_padding!(
            variant = S::NAME,
            rounds = S::ROUNDS,
            "computed pad schedules for {}",
            S::NAME
        );

        Self {
            block,
            half,
            stream,
        }
    }

    /// Scheduled pad block following a one-block message.
    #[inline]
    pub fn block(&self) -> &S::Buffer<S::Word> {
        &self.block
    }

    /// Pad words `8..16` following a half-block message.
    #[inline]
    pub fn half(&self) -> &[S::Word; 8] {
        &self.half
    }

    /// Writes the half-block pad into words `8..16` of `buffer`.
    #[inline]
    pub fn pad_half(&self, buffer: &mut S::Buffer<S::Word>) {
        buffer.words_mut()[8..16].copy_from_slice(&self.half);
    }

    /// Writes the unscheduled pad block following `blocks` whole blocks.
    #[inline]
    pub fn pad_stream(&self, buffer: &mut S::Buffer<S::Word>, blocks: u64) {
        let words = buffer.words_mut();
        words[..16].copy_from_slice(&self.stream);
        let bits = u128::from(blocks) * S::BLOCK_BYTES as u128 * 8;
        words[14..16].copy_from_slice(&count_words::<S::Word>(bits));
    }
}

impl<S: Sha> Default for Padding<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sha> std::fmt::Debug for Padding<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Padding")
            .field("variant", &S::NAME)
            .field("half", &self.half)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{Sha160, Sha256, Sha512};
    use crate::word::ByteArray;

    #[test]
    fn marker_sits_in_top_byte() {
        assert_eq!(marker::<u32>(), 0x8000_0000);
        assert_eq!(marker::<u64>(), 0x8000_0000_0000_0000);
    }

    #[test]
    fn count_words_split_high_and_low() {
        assert_eq!(count_words::<u32>(0x1_0000_0200), [1, 0x200]);
        assert_eq!(count_words::<u64>(512), [0, 512]);
    }

    #[test]
    fn half_pad_encodes_half_block_length() {
        let half = Sha256::padding().half();
        assert_eq!(half[0], 0x8000_0000);
        assert!(half[1..6].iter().all(|&w| w == 0));
        assert_eq!(&half[6..], &[0u32, 256]);

        let half = Sha512::padding().half();
        assert_eq!(half[7], 512);
    }

    #[test]
    fn stream_pad_carries_total_length() {
        let mut buffer = [0u32; 64];
        Sha256::padding().pad_stream(&mut buffer, 3);
        assert_eq!(buffer[0], 0x8000_0000);
        assert_eq!(buffer[15], 3 * 512);
        assert_eq!(buffer[14], 0);

        let mut buffer = [0u32; 80];
        Sha160::padding().pad_stream(&mut buffer, 1 << 26);
        assert_eq!(buffer[14], 8);
        assert_eq!(buffer[15], 0);
    }

    #[test]
    fn block_pad_matches_scheduling_a_literal_pad_block() {
        let mut bytes = <Sha256 as Sha>::Block::zeroed();
        bytes[0] = 0x80;
        bytes[62] = 0x02;
        let mut expected = [0u32; 64];
        compress::input::<Sha256>(&mut expected, &bytes);
        compress::schedule::<Sha256, u32>(&mut expected);
        assert_eq!(Sha256::padding().block(), &expected);
    }

    #[test]
    fn padding_is_built_once() {
        let first: *const Padding<Sha256> = Sha256::padding();
        let second: *const Padding<Sha256> = Sha256::padding();
        assert_eq!(first, second);
    }
}
