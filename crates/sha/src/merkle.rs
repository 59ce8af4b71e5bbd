//! Merkle driver.
//!
//! A level is folded by double-hashing the concatenation of each adjacent
//! pair of digests. The tree is folded level by level until one digest, the
//! root, remains. Sibling pairs on a level are independent, so they are fed
//! to the vector engine in full lane batches with every round vectorized;
//! leftover pairs go through the pairwise path one at a time.
//!
//! How a level with an odd number of digests is resolved is an explicit
//! [`OddPolicy`].
//!
//! ```
//! use sha::{Algorithm, Sha256};
//!
//! let leaves = vec![[0u8; 32], [1u8; 32], [2u8; 32]];
//! let root = Algorithm::<Sha256>::merkle_root(leaves.clone()).unwrap();
//!
//! // With the default policy the odd leaf is paired with itself.
//! let left = Algorithm::<Sha256>::double_hash_pair(&leaves[0], &leaves[1]);
//! let right = Algorithm::<Sha256>::double_hash_pair(&leaves[2], &leaves[2]);
//! assert_eq!(root, Algorithm::<Sha256>::double_hash_pair(&left, &right));
//! ```

use crate::algorithm::{Algorithm, vector};
use crate::capability::Strategy;
use crate::error::MerkleError;
use crate::trace::trace_merkle;
use crate::variant::{Doubled, Sha};
use crate::word::ByteArray;

/// Resolution of a level with an odd number of digests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OddPolicy {
    /// Pair the last digest with a copy of itself.
    #[default]
    Duplicate,
    /// Move the last digest up to the next level unchanged.
    CarryForward,
    /// Fail with [`MerkleError::OddLevel`].
    Reject,
}

impl OddPolicy {
    /// Short name used in log events.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate",
            Self::CarryForward => "carry-forward",
            Self::Reject => "reject",
        }
    }
}

/// Two digests as one block.
#[inline]
fn join<S: Doubled>(left: &S::Digest, right: &S::Digest) -> S::Block {
    let mut block = S::Block::zeroed();
    let (head, tail) = block.as_mut().split_at_mut(S::BLOCK_BYTES / 2);
    head.copy_from_slice(left.as_ref());
    tail.copy_from_slice(right.as_ref());
    block
}

/// Applies `policy` to an odd level. Returns the digest to re-append after
/// folding, if any.
fn resolve_odd<S: Sha>(
    digests: &mut Vec<S::Digest>,
    policy: OddPolicy,
) -> Result<Option<S::Digest>, MerkleError> {
    let len = digests.len();
    if len % 2 == 0 {
        return Ok(None);
    }
    match (policy, digests.last().copied()) {
        (OddPolicy::Duplicate, Some(last)) => {
            digests.push(last);
            Ok(None)
        }
        (OddPolicy::CarryForward, Some(last)) => Ok(Some(last)),
        (OddPolicy::Reject, _) => Err(MerkleError::OddLevel { len }),
        (_, None) => Err(MerkleError::Empty),
    }
}

impl<S: Doubled, C: Strategy> Algorithm<S, C> {
    /// Folds one level in place with the default [`OddPolicy`].
    pub fn merkle_hash(digests: &mut Vec<S::Digest>) -> Result<(), MerkleError> {
        Self::merkle_hash_with(digests, OddPolicy::default())
    }

    /// Folds one level in place.
    ///
    /// An empty list is an error and a single digest is left unchanged.
    pub fn merkle_hash_with(
        digests: &mut Vec<S::Digest>,
        policy: OddPolicy,
    ) -> Result<(), MerkleError> {
        match digests.len() {
            0 => return Err(MerkleError::Empty),
            1 => return Ok(()),
            _ => {}
        }
        let carried = resolve_odd::<S>(digests, policy)?;
        let pairs = digests.len() / 2;

        let mut next = 0;
        for lanes in Self::WIDTHS {
            if lanes == 0 || pairs - next < lanes {
                continue;
            }
            next = match lanes {
                16 => vector::merkle::<S, 16>(digests, next, pairs),
                8 => vector::merkle::<S, 8>(digests, next, pairs),
                4 => vector::merkle::<S, 4>(digests, next, pairs),
                2 => vector::merkle::<S, 2>(digests, next, pairs),
                _ => next,
            };
        }
        Self::fold_pairs(digests, next, pairs);

        digests.truncate(pairs);
        digests.extend(carried);
        trace_merkle!(trace; variant = S::NAME, pairs, vector_pairs = next, "merkle level");
        Ok(())
    }

    /// Folds one level in place one pair at a time, without lane batching.
    ///
    /// This is the reference the batched path must match.
    pub fn merkle_hash_scalar(
        digests: &mut Vec<S::Digest>,
        policy: OddPolicy,
    ) -> Result<(), MerkleError> {
        match digests.len() {
            0 => return Err(MerkleError::Empty),
            1 => return Ok(()),
            _ => {}
        }
        let carried = resolve_odd::<S>(digests, policy)?;
        let pairs = digests.len() / 2;
        Self::fold_pairs(digests, 0, pairs);
        digests.truncate(pairs);
        digests.extend(carried);
        Ok(())
    }

    /// Pair `i` reads `2i` and `2i + 1` and writes `i`, so in-order folding
    /// never overwrites an unread digest.
    fn fold_pairs(digests: &mut [S::Digest], first: usize, pairs: usize) {
        for i in first..pairs {
            let block = join::<S>(&digests[2 * i], &digests[2 * i + 1]);
            digests[i] = Self::double_hash(&block);
        }
    }

    /// Folds a digest list to its root with the default [`OddPolicy`].
    pub fn merkle_root(digests: Vec<S::Digest>) -> Result<S::Digest, MerkleError> {
        Self::merkle_root_with(digests, OddPolicy::default())
    }

    /// Folds a digest list to its root.
    pub fn merkle_root_with(
        mut digests: Vec<S::Digest>,
        policy: OddPolicy,
    ) -> Result<S::Digest, MerkleError> {
        trace_merkle!(
            variant = S::NAME,
            strategy = C::NAME,
            leaves = digests.len(),
            engine = Self::engine(digests.len() / 2).name(),
            policy = policy.name(),
            "merkle root"
        );
        while digests.len() > 1 {
            Self::merkle_hash_with(&mut digests, policy)?;
        }
        digests.first().copied().ok_or(MerkleError::Empty)
    }

    /// Folds a digest list to its root with [`Self::merkle_hash_scalar`].
    pub fn merkle_root_scalar(
        mut digests: Vec<S::Digest>,
        policy: OddPolicy,
    ) -> Result<S::Digest, MerkleError> {
        while digests.len() > 1 {
            Self::merkle_hash_scalar(&mut digests, policy)?;
        }
        digests.first().copied().ok_or(MerkleError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Portable, Vector128, Vector512};
    use crate::variant::{Sha256, Sha512};

    fn leaves(count: usize) -> Vec<[u8; 32]> {
        (0..count)
            .map(|i| std::array::from_fn(|j| (i * 17 + j) as u8))
            .collect()
    }

    #[test]
    fn empty_list_is_an_error() {
        assert_eq!(
            Algorithm::<Sha256>::merkle_root(Vec::new()),
            Err(MerkleError::Empty)
        );
        assert_eq!(
            Algorithm::<Sha256>::merkle_hash(&mut Vec::new()),
            Err(MerkleError::Empty)
        );
    }

    #[test]
    fn single_digest_is_its_own_root() {
        let leaf = [9u8; 32];
        assert_eq!(Algorithm::<Sha256>::merkle_root(vec![leaf]), Ok(leaf));
        let mut level = vec![leaf];
        Algorithm::<Sha256>::merkle_hash(&mut level).expect("single digest");
        assert_eq!(level, vec![leaf]);
    }

    #[test]
    fn reject_policy_fails_on_odd_level() {
        assert_eq!(
            Algorithm::<Sha256>::merkle_root_with(leaves(3), OddPolicy::Reject),
            Err(MerkleError::OddLevel { len: 3 })
        );
        // Four leaves never produce an odd level.
        assert!(Algorithm::<Sha256>::merkle_root_with(leaves(4), OddPolicy::Reject).is_ok());
    }

    #[test]
    fn carry_forward_moves_last_digest_up() {
        let input = leaves(3);
        let mut level = input.clone();
        Algorithm::<Sha256>::merkle_hash_with(&mut level, OddPolicy::CarryForward)
            .expect("odd level");
        assert_eq!(level.len(), 2);
        assert_eq!(
            level[0],
            Algorithm::<Sha256>::double_hash_pair(&input[0], &input[1])
        );
        assert_eq!(level[1], input[2]);
    }

    #[test]
    fn duplicate_pairs_last_with_itself() {
        let input = leaves(5);
        let mut level = input.clone();
        Algorithm::<Sha256>::merkle_hash(&mut level).expect("odd level");
        assert_eq!(level.len(), 3);
        assert_eq!(
            level[2],
            Algorithm::<Sha256>::double_hash_pair(&input[4], &input[4])
        );
    }

    #[test]
    fn batched_level_matches_pairwise_level() {
        for count in [2, 7, 8, 9, 16, 31, 33, 64] {
            let mut batched = leaves(count);
            let mut pairwise = batched.clone();
            Algorithm::<Sha256, Vector512>::merkle_hash(&mut batched).expect("level");
            Algorithm::<Sha256, Portable>::merkle_hash_scalar(&mut pairwise, OddPolicy::Duplicate)
                .expect("level");
            assert_eq!(batched, pairwise, "{count} leaves");
        }
    }

    #[test]
    fn sha512_roots_agree_across_strategies() {
        let input: Vec<[u8; 64]> = (0..13u8).map(|i| [i; 64]).collect();
        for policy in [OddPolicy::Duplicate, OddPolicy::CarryForward] {
            let expected =
                Algorithm::<Sha512, Portable>::merkle_root_scalar(input.clone(), policy);
            assert_eq!(
                Algorithm::<Sha512, Vector128>::merkle_root_with(input.clone(), policy),
                expected
            );
            assert_eq!(
                Algorithm::<Sha512, Vector512>::merkle_root_with(input.clone(), policy),
                expected
            );
        }
    }
}
