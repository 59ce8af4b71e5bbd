//! Variant markers and the parameters that distinguish them.
//!
//! Every SHA variant is a zero-sized type implementing [`Sha`]. The trait
//! fixes the scalar word, the array shapes (state, schedule buffer, block,
//! half-block, digest), the round constants, the initial state and the round
//! function family. The engines in [`crate::algorithm`] are generic over it.

use std::fmt::Debug;
use std::sync::OnceLock;

use crate::algorithm::compress;
use crate::algorithm::native;
use crate::algorithm::padding::Padding;
use crate::consts;
use crate::word::{ByteArray, Scalar, Word, WordArray};

/// Rotation and shift amounts of the four SHA-2 sigma functions.
///
/// `big0`/`big1` are the round functions (three rotations each);
/// `small0`/`small1` are the schedule functions (two rotations, one shift).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotations {
    /// Σ0 rotations applied to `a`.
    pub big0: [u32; 3],
    /// Σ1 rotations applied to `e`.
    pub big1: [u32; 3],
    /// σ0 rotations and shift applied to `w[t-15]`.
    pub small0: [u32; 3],
    /// σ1 rotations and shift applied to `w[t-2]`.
    pub small1: [u32; 3],
}

/// Round function family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Five-word state with choice/parity/majority rounds and a rotate-left
    /// schedule.
    Sha1,
    /// Eight-word state with sigma rounds and a sigma schedule.
    Sha2(Rotations),
}

const ROTATIONS_256: Rotations = Rotations {
    big0: [2, 13, 22],
    big1: [6, 11, 25],
    small0: [7, 18, 3],
    small1: [17, 19, 10],
};

const ROTATIONS_512: Rotations = Rotations {
    big0: [28, 34, 39],
    big1: [14, 18, 41],
    small0: [1, 8, 7],
    small1: [19, 61, 6],
};

/// Parameters of one SHA variant.
pub trait Sha: Copy + Debug + Default + Send + Sync + 'static {
    /// Scalar word (`u32` or `u64`).
    type Word: Scalar;
    /// Running state of `STATE_WORDS` words of type `X`.
    type State<X: Word>: WordArray<X>;
    /// Message schedule of `ROUNDS` words of type `X`.
    type Buffer<X: Word>: WordArray<X>;
    /// One block of input.
    type Block: ByteArray;
    /// Half a block of input.
    type Half: ByteArray;
    /// Serialized output.
    type Digest: ByteArray;

    /// Human readable name, used in log events.
    const NAME: &'static str;
    /// Number of rounds, equal to the schedule length.
    const ROUNDS: usize;
    /// Number of state words.
    const STATE_WORDS: usize;
    /// Block size in bytes.
    const BLOCK_BYTES: usize;
    /// Digest size in bytes.
    const DIGEST_BYTES: usize;
    /// Size of the trailing length field in bytes.
    const COUNT_BYTES: usize;
    /// Round constants.
    const K: Self::Buffer<Self::Word>;
    /// Initial state.
    const H: Self::State<Self::Word>;
    /// Round function family.
    const FAMILY: Family;
    /// Whether a hardware engine exists for this variant.
    const NATIVE: bool = false;

    /// Precomputed pad schedules, built on first use.
    fn padding() -> &'static Padding<Self>;

    /// Compresses one block with the hardware engine.
    ///
    /// Only called when [`Self::NATIVE`] is set and the build provides the
    /// instructions.
    #[inline]
    fn native_compress(state: &mut Self::State<Self::Word>, block: &Self::Block) {
        compress::compress_block::<Self>(state, block);
    }

    /// Compresses an already scheduled buffer (message plus constants) with
    /// the hardware engine.
    #[inline]
    fn native_compress_scheduled(
        state: &mut Self::State<Self::Word>,
        buffer: &Self::Buffer<Self::Word>,
    ) {
        compress::compress::<Self, Self::Word>(state, buffer);
    }
}

/// Variants whose digest fills exactly one half-block, so a digest can be
/// rehashed as a half-block and two digests form one block.
///
/// Double hashing and Merkle trees are defined only for these.
pub trait Doubled: Sha {}

macro_rules! variant {
    (
        $(#[$meta:meta])*
        $name:ident {
            name: $label:literal,
            word: $word:ty,
            state: $state:literal,
            rounds: $rounds:literal,
            block: $block:literal,
            digest: $digest:literal,
            count: $count:literal,
            k: $k:expr,
            h: $h:expr,
            family: $family:expr,
            $(native: $native:ident,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Sha for $name {
            type Word = $word;
            type State<X: Word> = [X; $state];
            type Buffer<X: Word> = [X; $rounds];
            type Block = [u8; $block];
            type Half = [u8; $block / 2];
            type Digest = [u8; $digest];

            const NAME: &'static str = $label;
            const ROUNDS: usize = $rounds;
            const STATE_WORDS: usize = $state;
            const BLOCK_BYTES: usize = $block;
            const DIGEST_BYTES: usize = $digest;
            const COUNT_BYTES: usize = $count;
            const K: [$word; $rounds] = $k;
            const H: [$word; $state] = $h;
            const FAMILY: Family = $family;

            fn padding() -> &'static Padding<Self> {
                static PADDING: OnceLock<Padding<$name>> = OnceLock::new();
                PADDING.get_or_init(Padding::new)
            }

            $(variant!(@$native);)?
        }
    };
    (@sha_ni) => {
        const NATIVE: bool = true;

        #[inline]
        fn native_compress(state: &mut Self::State<Self::Word>, block: &Self::Block) {
            native::compress_block::<native::Hardware>(state, block);
        }

        #[inline]
        fn native_compress_scheduled(
            state: &mut Self::State<Self::Word>,
            buffer: &Self::Buffer<Self::Word>,
        ) {
            native::compress_scheduled::<native::Hardware>(state, buffer);
        }
    };
}

variant! {
    /// SHA-1 (160-bit digest).
    Sha160 {
        name: "sha160",
        word: u32,
        state: 5,
        rounds: 80,
        block: 64,
        digest: 20,
        count: 8,
        k: consts::K160,
        h: consts::H160,
        family: Family::Sha1,
    }
}

variant! {
    /// SHA-224.
    Sha224 {
        name: "sha224",
        word: u32,
        state: 8,
        rounds: 64,
        block: 64,
        digest: 28,
        count: 8,
        k: consts::K256,
        h: consts::H224,
        family: Family::Sha2(ROTATIONS_256),
        native: sha_ni,
    }
}

variant! {
    /// SHA-256.
    Sha256 {
        name: "sha256",
        word: u32,
        state: 8,
        rounds: 64,
        block: 64,
        digest: 32,
        count: 8,
        k: consts::K256,
        h: consts::H256,
        family: Family::Sha2(ROTATIONS_256),
        native: sha_ni,
    }
}

variant! {
    /// SHA-384.
    Sha384 {
        name: "sha384",
        word: u64,
        state: 8,
        rounds: 80,
        block: 128,
        digest: 48,
        count: 16,
        k: consts::K512,
        h: consts::H384,
        family: Family::Sha2(ROTATIONS_512),
    }
}

variant! {
    /// SHA-512.
    Sha512 {
        name: "sha512",
        word: u64,
        state: 8,
        rounds: 80,
        block: 128,
        digest: 64,
        count: 16,
        k: consts::K512,
        h: consts::H512,
        family: Family::Sha2(ROTATIONS_512),
    }
}

variant! {
    /// SHA-512/256 (SHA-512 rounds, distinct initial state, 32-byte digest).
    Sha512_256 {
        name: "sha512_256",
        word: u64,
        state: 8,
        rounds: 80,
        block: 128,
        digest: 32,
        count: 16,
        k: consts::K512,
        h: consts::H512_256,
        family: Family::Sha2(ROTATIONS_512),
    }
}

impl Doubled for Sha256 {}
impl Doubled for Sha512 {}
