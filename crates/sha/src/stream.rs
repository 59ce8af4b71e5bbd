//! Streaming accumulators.
//!
//! [`Stream`] takes whole blocks and counts them; [`Hasher`] takes bytes and
//! buffers a partial block. Both finish through methods that consume `self`,
//! so an accumulator cannot be fed again once it has produced a digest.
//!
//! ```
//! use sha::{Hasher, Sha256};
//!
//! let mut hasher = Hasher::<Sha256>::new();
//! hasher.update(b"a");
//! hasher.update(b"bc");
//! let digest = hasher.finalize();
//! assert_eq!(digest[..4], [0xba, 0x78, 0x16, 0xbf]);
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::algorithm::Algorithm;
use crate::capability::{Detected, Strategy};
use crate::variant::{Doubled, Sha};
use crate::word::ByteArray;

/// Whole blocks gathered on the stack before each vector dispatch.
const BATCH_BLOCKS: usize = 16;

/// Block-granular accumulator.
#[derive(Clone)]
pub struct Stream<S: Sha, C: Strategy = Detected> {
    state: S::State<S::Word>,
    blocks: u64,
    _strategy: PhantomData<C>,
}

impl<S: Sha, C: Strategy> Stream<S, C> {
    /// Starts from the variant's initial state.
    pub fn new() -> Self {
        Self {
            state: S::H,
            blocks: 0,
            _strategy: PhantomData,
        }
    }

    /// Compresses `blocks` in order.
    pub fn accumulate_blocks(&mut self, blocks: &[S::Block]) {
        Algorithm::<S, C>::accumulate(&mut self.state, blocks);
        self.blocks += blocks.len() as u64;
    }

    /// Compresses one block.
    pub fn accumulate(&mut self, block: &S::Block) {
        Algorithm::<S, C>::accumulate_block(&mut self.state, block);
        self.blocks += 1;
    }

    /// Blocks accumulated so far.
    pub fn block_count(&self) -> u64 {
        self.blocks
    }

    /// Current state serialized without padding.
    pub fn normalize(&self) -> S::Digest {
        Algorithm::<S, C>::normalize(&self.state)
    }

    /// Pads and returns the digest of everything accumulated.
    pub fn finalize(self) -> S::Digest {
        Algorithm::<S, C>::finalize(self.state, self.blocks)
    }

    fn into_state(self) -> S::State<S::Word> {
        self.state
    }
}

impl<S: Doubled, C: Strategy> Stream<S, C> {
    /// Pads and returns the hash of the digest of everything accumulated.
    pub fn finalize_double(self) -> S::Digest {
        Algorithm::<S, C>::finalize_double(self.state, self.blocks)
    }
}

impl<S: Sha, C: Strategy> Default for Stream<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sha, C: Strategy> fmt::Debug for Stream<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("variant", &S::NAME)
            .field("strategy", &C::NAME)
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}

/// Byte-granular accumulator for messages of any length.
#[derive(Clone)]
pub struct Hasher<S: Sha, C: Strategy = Detected> {
    stream: Stream<S, C>,
    pending: S::Block,
    filled: usize,
}

impl<S: Sha, C: Strategy> Hasher<S, C> {
    /// Empty message.
    pub fn new() -> Self {
        Self {
            stream: Stream::new(),
            pending: S::Block::zeroed(),
            filled: 0,
        }
    }

    /// Appends `data` to the message.
    pub fn update(&mut self, mut data: &[u8]) {
        if self.filled > 0 {
            let take = (S::BLOCK_BYTES - self.filled).min(data.len());
            self.pending.as_mut()[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            if self.filled < S::BLOCK_BYTES {
                return;
            }
            self.stream.accumulate(&self.pending);
            self.filled = 0;
        }

        let mut chunks = data.chunks_exact(S::BLOCK_BYTES);
        let mut batch = [S::Block::zeroed(); BATCH_BLOCKS];
        loop {
            let mut count = 0;
            for (slot, chunk) in batch.iter_mut().zip(chunks.by_ref()) {
                slot.as_mut().copy_from_slice(chunk);
                count += 1;
            }
            if count == 0 {
                break;
            }
            self.stream.accumulate_blocks(&batch[..count]);
        }

        let rest = chunks.remainder();
        self.pending.as_mut()[..rest.len()].copy_from_slice(rest);
        self.filled = rest.len();
    }

    /// Total bytes appended so far.
    pub fn len(&self) -> u64 {
        self.stream.block_count() * S::BLOCK_BYTES as u64 + self.filled as u64
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the digest of the message.
    pub fn finalize(self) -> S::Digest {
        if self.filled == 0 {
            return self.stream.finalize();
        }
        Algorithm::<S, C>::normalize(&self.close())
    }

    /// Folds the buffered tail and the length field into one or two final
    /// blocks and returns the resulting state.
    fn close(self) -> S::State<S::Word> {
        let bits = u128::from(self.len()) * 8;
        let count = bits.to_be_bytes();
        let count = &count[count.len() - S::COUNT_BYTES..];
        let filled = self.filled;

        let mut state = self.stream.into_state();
        let mut block = S::Block::zeroed();
        block.as_mut()[..filled].copy_from_slice(&self.pending.as_ref()[..filled]);
        block.as_mut()[filled] = 0x80;

        if filled + 1 + S::COUNT_BYTES > S::BLOCK_BYTES {
            Algorithm::<S, C>::accumulate_block(&mut state, &block);
            block = S::Block::zeroed();
        }
        block.as_mut()[S::BLOCK_BYTES - S::COUNT_BYTES..].copy_from_slice(count);
        Algorithm::<S, C>::accumulate_block(&mut state, &block);
        state
    }
}

impl<S: Doubled, C: Strategy> Hasher<S, C> {
    /// Returns the hash of the message digest.
    pub fn finalize_double(self) -> S::Digest {
        if self.filled == 0 {
            return self.stream.finalize_double();
        }
        Algorithm::<S, C>::finalize_second(&self.close())
    }
}

impl<S: Sha, C: Strategy> Default for Hasher<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sha, C: Strategy> fmt::Debug for Hasher<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("variant", &S::NAME)
            .field("strategy", &C::NAME)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<S: Sha, C: Strategy> std::io::Write for Hasher<S, C> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
