//! Every engine must produce the same bits.
//!
//! The scalar rounds are the reference. The emulated native backend is
//! compared against them directly, and the vector strategies are compared
//! through the public accumulate and finalize entry points.

use proptest::prelude::*;
use sha::algorithm::{compress, native};
use sha::{
    Algorithm, Detected, Emulated, Engine, Native, Portable, Sha, Sha160, Sha224, Sha256,
    Sha384, Sha512, Strategy, Vector128, Vector256, Vector512, from_native_layout,
    to_native_layout,
};

fn blocks_from<const N: usize>(bytes: &[u8]) -> Vec<[u8; N]> {
    bytes
        .chunks_exact(N)
        .map(|chunk| chunk.try_into().expect("chunk has block length"))
        .collect()
}

fn accumulated<S: Sha, C: Strategy>(blocks: &[S::Block]) -> S::Digest {
    let mut state = S::H;
    Algorithm::<S, C>::accumulate(&mut state, blocks);
    Algorithm::<S, C>::normalize(&state)
}

/// Asserts that every strategy agrees with the portable one on `blocks`.
fn assert_strategies_agree<S: Sha>(blocks: &[S::Block]) {
    let expected = accumulated::<S, Portable>(blocks);
    assert_eq!(accumulated::<S, Detected>(blocks), expected, "{} detected", S::NAME);
    assert_eq!(accumulated::<S, Native>(blocks), expected, "{} native", S::NAME);
    assert_eq!(accumulated::<S, Vector128>(blocks), expected, "{} vector128", S::NAME);
    assert_eq!(accumulated::<S, Vector256>(blocks), expected, "{} vector256", S::NAME);
    assert_eq!(accumulated::<S, Vector512>(blocks), expected, "{} vector512", S::NAME);
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn portable_strategy_always_uses_scalar_rounds() {
    for blocks in [0, 1, 2, 16, 100] {
        assert_eq!(Algorithm::<Sha256, Portable>::engine(blocks), Engine::Scalar);
        assert_eq!(Algorithm::<Sha512, Portable>::engine(blocks), Engine::Scalar);
    }
}

#[test]
fn vector_strategies_need_a_full_batch() {
    assert_eq!(Algorithm::<Sha256, Vector128>::min_lanes(), 4);
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
        Algorithm::<Sha512, Vector512>::engine(8),
        Engine::Vector { lanes: 8 }
    );
    assert_eq!(
        Algorithm::<Sha512, Vector256>::engine(3),
        Engine::Vector { lanes: 2 }
    );
}

#[test]
fn native_engine_only_for_sha256_family() {
    assert!(!Algorithm::<Sha160, Native>::NATIVE);
    assert!(!Algorithm::<Sha384, Native>::NATIVE);
    assert!(!Algorithm::<Sha512, Native>::NATIVE);
    assert_eq!(
        Algorithm::<Sha256, Native>::NATIVE,
        Algorithm::<Sha224, Native>::NATIVE
    );
    assert_eq!(
        Algorithm::<Sha256, Native>::NATIVE,
        sha::native_acceleration_available()
    );
}

// ============================================================================
// Whole-message agreement
// ============================================================================

#[test]
fn strategies_agree_on_every_batch_remainder() {
    let bytes: Vec<u8> = (0..64 * 40).map(|i| (i * 7 + 3) as u8).collect();
    let blocks = blocks_from::<64>(&bytes);
    for count in 0..=blocks.len() {
        assert_strategies_agree::<Sha256>(&blocks[..count]);
    }
    for count in [0, 1, 5, 16, 17, 33] {
        assert_strategies_agree::<Sha160>(&blocks[..count]);
        assert_strategies_agree::<Sha224>(&blocks[..count]);
    }

    let wide = blocks_from::<128>(&bytes);
    for count in 0..=wide.len() {
        assert_strategies_agree::<Sha512>(&wide[..count]);
        assert_strategies_agree::<Sha384>(&wide[..count]);
    }
}

#[test]
fn finalize_is_repeatable_from_the_same_state() {
    let blocks = [[0x42u8; 64]; 3];
    let mut state = Sha256::H;
    Algorithm::<Sha256, Vector128>::accumulate(&mut state, &blocks);
    let first = Algorithm::<Sha256, Vector128>::finalize(state, 3);
    let second = Algorithm::<Sha256, Vector128>::finalize(state, 3);
    assert_eq!(first, second);
    assert_eq!(first, Algorithm::<Sha256, Portable>::hash_blocks(&blocks));
}

// ============================================================================
// Native backend
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn emulated_native_matches_scalar(
        state in prop::array::uniform8(any::<u32>()),
        bytes in prop::collection::vec(any::<u8>(), 64),
    ) {
        let block: [u8; 64] = bytes.as_slice().try_into().expect("64 bytes");

        let mut expected = state;
        compress::compress_block::<Sha256>(&mut expected, &block);
        let mut actual = state;
        native::compress_block::<Emulated>(&mut actual, &block);
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn emulated_scheduled_matches_scalar(
        state in prop::array::uniform8(any::<u32>()),
        bytes in prop::collection::vec(any::<u8>(), 64),
    ) {
        let block: [u8; 64] = bytes.as_slice().try_into().expect("64 bytes");
        let mut buffer = [0u32; 64];
        compress::input::<Sha256>(&mut buffer, &block);
        compress::schedule::<Sha256, u32>(&mut buffer);

        let mut expected = state;
        compress::compress::<Sha256, u32>(&mut expected, &buffer);
        let mut actual = state;
        native::compress_scheduled::<Emulated>(&mut actual, &buffer);
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn native_layout_is_invertible(state in prop::array::uniform8(any::<u32>())) {
        let (abef, cdgh) = to_native_layout(&state);
        prop_assert_eq!(from_native_layout(&abef, &cdgh), state);
    }

    #[test]
    fn strategies_agree_on_random_blocks(
        bytes in prop::collection::vec(any::<u8>(), 0..64 * 24)
    ) {
        assert_strategies_agree::<Sha256>(&blocks_from::<64>(&bytes));
        assert_strategies_agree::<Sha512>(&blocks_from::<128>(&bytes));
    }
}
