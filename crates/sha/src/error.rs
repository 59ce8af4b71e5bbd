//! Error types.

use thiserror::Error;

/// Errors from folding a digest list into a Merkle root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// The digest list was empty; an empty tree has no root.
    #[error("cannot compute a Merkle root of an empty digest list")]
    Empty,

    /// A level had an odd number of digests under [`OddPolicy::Reject`].
    ///
    /// [`OddPolicy::Reject`]: crate::OddPolicy::Reject
    #[error("Merkle level has an odd number of digests ({len}) and the policy rejects it")]
    OddLevel {
        /// Number of digests on the offending level.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_condition() {
        assert!(MerkleError::Empty.to_string().contains("empty"));
        let odd = MerkleError::OddLevel { len: 3 };
        assert!(odd.to_string().contains("(3)"));
    }
}
