#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod algorithm;
pub mod capability;
mod consts;
mod error;
pub mod lanes;
mod merkle;
pub mod stream;
mod trace;
pub mod variant;
pub mod word;

pub use algorithm::Algorithm;
pub use algorithm::native::{Emulated, NativeOps, from_native_layout, to_native_layout};
pub use algorithm::padding::Padding;
pub use capability::{
    Capabilities, Detected, Engine, Native, Portable, Strategy, Vector128, Vector256, Vector512,
};
pub use error::MerkleError;
pub use merkle::OddPolicy;
pub use stream::{Hasher, Stream};
pub use variant::{Doubled, Sha, Sha160, Sha224, Sha256, Sha384, Sha512, Sha512_256};

/// SHA-1 with build-detected engines.
pub type Sha160Algorithm = Algorithm<Sha160>;
/// SHA-224 with build-detected engines.
pub type Sha224Algorithm = Algorithm<Sha224>;
/// SHA-256 with build-detected engines.
pub type Sha256Algorithm = Algorithm<Sha256>;
/// SHA-384 with build-detected engines.
pub type Sha384Algorithm = Algorithm<Sha384>;
/// SHA-512 with build-detected engines.
pub type Sha512Algorithm = Algorithm<Sha512>;
/// SHA-512/256 with build-detected engines.
pub type Sha512_256Algorithm = Algorithm<Sha512_256>;

/// Reports whether this build hashes SHA-256 with hardware instructions.
///
/// Useful for logging or diagnostics.
pub const fn native_acceleration_available() -> bool {
    Algorithm::<Sha256>::NATIVE
}
