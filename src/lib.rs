//! An incremental BLAKE3 tree hash.
//!
//! BLAKE3 splits its input into 1024-byte chunks, hashes every chunk into a
//! leaf and combines the leaves pairwise into a binary tree whose root yields
//! an output of any requested length. This crate builds that tree on the fly
//! from a stream of [`Hasher::update`] calls, keeping only one chunk buffer
//! and one chaining value per pending subtree in memory.
//!
//! Three functions share the same tree:
//!
//! - the plain hash, [`hash`] / [`Hasher::new`],
//! - the keyed hash, [`keyed_hash`] / [`Hasher::new_keyed`], a MAC or PRF,
//! - key derivation, [`derive_key`] / [`Hasher::new_derive_key`].
//!
//! Compression is portable and single threaded.
//!
//! # Example
//!
//! ```
//! let mut hasher = treehash::Hasher::new();
//! hasher.update(b"abc");
//! hasher.update(b"def");
//! let hash = hasher.finalize();
//! let extended = hasher.digest(500);
//! assert_eq!(hash.as_bytes()[..], extended[..32]);
//! assert_eq!(hash, treehash::hash(b"abcdef"));
//! ```

mod chunk;
mod compress;
mod error;
mod hash;
mod hasher;
mod output;
mod traits;

#[cfg(kani)]
mod proofs;

pub use digest;

pub use crate::error::Error;
pub use crate::hash::Hash;
pub use crate::hasher::{Hasher, Mode};
pub use crate::output::OutputReader;

/// The number of bytes in a [`Hash`], the default output length.
pub const OUT_LEN: usize = 32;

/// The number of bytes in a key for the keyed hash function.
pub const KEY_LEN: usize = 32;

/// The number of bytes in a block, the unit of compression.
pub const BLOCK_LEN: usize = 64;

/// The number of bytes in a chunk, one leaf of the tree.
pub const CHUNK_LEN: usize = 1024;

/// Hash `input` with the default 32-byte output.
pub fn hash(input: &[u8]) -> Hash {
    Hasher::new().update(input).finalize()
}

/// Keyed hash of `input`, usable as a MAC. The returned [`Hash`] compares in
/// constant time.
pub fn keyed_hash(key: &[u8; KEY_LEN], input: &[u8]) -> Hash {
    Hasher::new_keyed(key).update(input).finalize()
}

/// Derive a 32-byte subkey from `key_material` under `context`.
///
/// The context string should be hardcoded, globally unique and application
/// specific. Derive longer keys with [`Hasher::new_derive_key`] and
/// [`Hasher::digest`].
pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; OUT_LEN] {
    Hasher::new_derive_key(context)
        .update(key_material)
        .finalize()
        .into_bytes()
}
