use std::fmt;

use arrayvec::ArrayVec;

use crate::chunk::ChunkState;
use crate::compress::{
    key_words_from_bytes, CVWords, DERIVE_KEY_CONTEXT, DERIVE_KEY_MATERIAL, IV, KEYED_HASH,
};
use crate::error::Error;
use crate::hash::Hash;
use crate::output::{parent_cv, parent_output, Output, OutputReader};
use crate::{CHUNK_LEN, KEY_LEN, OUT_LEN};

// 2^54 chunks of CHUNK_LEN bytes is 2^64 bytes, the most a u64 byte count can
// describe. One stack entry per set bit of the chunk count.
const MAX_DEPTH: usize = 54;

/// Which of the three BLAKE3 functions a [`Hasher`] computes.
///
/// The mode only affects the initial chaining value and the domain-separation
/// flag mixed into every compression; the tree is built the same way in all
/// of them.
#[derive(Clone, PartialEq, Eq)]
pub enum Mode {
    /// The plain hash function.
    Hash,
    /// The keyed hash function, usable as a MAC or PRF.
    KeyedHash([u8; KEY_LEN]),
    /// Key derivation. The context string should be hardcoded, globally
    /// unique and application specific, e.g.
    /// `"example.com 2019-12-25 16:18:03 session tokens v1"`. The key material
    /// is what gets fed to [`Hasher::update`].
    DeriveKey(String),
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => f.write_str("Hash"),
            Self::KeyedHash(_) => f.write_str("KeyedHash(..)"),
            Self::DeriveKey(context) => f.debug_tuple("DeriveKey").field(context).finish(),
        }
    }
}

/// An incremental BLAKE3 hasher that accepts any number of writes.
///
/// Input is split into 1024-byte chunks which become the leaves of a binary
/// tree. The tree is never stored: completed subtrees are kept as chaining
/// values on a small stack and merged as soon as a sibling of equal size
/// appears. Finalizing is non-destructive, so a hasher can be finalized any
/// number of times, at any output length, and updated again afterwards.
///
/// ```
/// use treehash::Hasher;
///
/// let mut hasher = Hasher::new();
/// hasher.update(b"This is ").update(b"a string");
/// assert_eq!(
///     hasher.hexdigest(32),
///     "718b749f12a61257438b2ea6643555fd995001c9d9ff84764f93f82610a780f2"
/// );
/// assert_eq!(hasher.hexdigest(16), "718b749f12a61257438b2ea6643555fd");
/// ```
#[derive(Clone)]
pub struct Hasher {
    chunk_state: ChunkState,
    key_words: CVWords,
    cv_stack: ArrayVec<CVWords, MAX_DEPTH>,
    flags: u32,
}

impl Hasher {
    const fn new_internal(key_words: CVWords, flags: u32) -> Self {
        Self {
            chunk_state: ChunkState::new(key_words, 0, flags),
            key_words,
            cv_stack: ArrayVec::new_const(),
            flags,
        }
    }

    /// Construct a new `Hasher` for the regular hash function.
    pub const fn new() -> Self {
        Self::new_internal(IV, 0)
    }

    /// Construct a new `Hasher` for the keyed hash function.
    pub fn new_keyed(key: &[u8; KEY_LEN]) -> Self {
        Self::new_internal(key_words_from_bytes(key), KEYED_HASH)
    }

    /// Like [`Hasher::new_keyed`], for keys whose length is only known at
    /// runtime. Anything but exactly [`KEY_LEN`] bytes is rejected.
    pub fn try_new_keyed(key: &[u8]) -> Result<Self, Error> {
        let len = key.len();
        let key: &[u8; KEY_LEN] = key.try_into().map_err(|_| {
            tracing::debug!(len, "rejected keyed hash key");
            Error::InvalidKeyLength { len }
        })?;
        Ok(Self::new_keyed(key))
    }

    /// Construct a new `Hasher` for the key derivation function.
    ///
    /// The context string is hashed on its own, in the
    /// `DERIVE_KEY_CONTEXT` domain, and the result keys the returned hasher.
    pub fn new_derive_key(context: &str) -> Self {
        let mut context_hasher = Self::new_internal(IV, DERIVE_KEY_CONTEXT);
        context_hasher.update(context.as_bytes());
        let context_key = context_hasher.finalize();
        tracing::trace!(context_len = context.len(), "hashed key derivation context");
        Self::new_internal(key_words_from_bytes(context_key.as_bytes()), DERIVE_KEY_MATERIAL)
    }

    pub fn with_mode(mode: &Mode) -> Self {
        match mode {
            Mode::Hash => Self::new(),
            Mode::KeyedHash(key) => Self::new_keyed(key),
            Mode::DeriveKey(context) => Self::new_derive_key(context),
        }
    }

    // Section 5.1.2 of the BLAKE3 paper describes this merge. `total_chunks`
    // counts every completed chunk including this one; each trailing zero bit
    // in it is a subtree that `new_cv` just completed. Its left half is on top
    // of the stack.
    fn add_chunk_chaining_value(&mut self, mut new_cv: CVWords, mut total_chunks: u64) {
        while total_chunks & 1 == 0 {
            let left = self
                .cv_stack
                .pop()
                .expect("an even chunk count always has a pending left subtree");
            new_cv = parent_cv(left, new_cv, self.key_words, self.flags);
            total_chunks >>= 1;
        }
        self.cv_stack.push(new_cv);
    }

    /// Add input to the hash state. This can be called any number of times,
    /// with input of any length, including none.
    pub fn update(&mut self, mut input: &[u8]) -> &mut Self {
        while !input.is_empty() {
            // A full chunk followed by more input cannot be the root, so it is
            // safe to fold it into the tree now.
            if self.chunk_state.len() == CHUNK_LEN {
                let chunk_cv = self.chunk_state.output().chaining_value();
                let total_chunks = self.chunk_state.chunk_counter() + 1;
                self.add_chunk_chaining_value(chunk_cv, total_chunks);
                self.chunk_state = ChunkState::new(self.key_words, total_chunks, self.flags);
            }

            let want = CHUNK_LEN - self.chunk_state.len();
            let take = want.min(input.len());
            self.chunk_state.update(&input[..take]);
            input = &input[take..];
        }
        self
    }

    // Walks the right edge of the tree from the current chunk up to the root,
    // merging with each pending subtree from newest to oldest.
    fn final_output(&self) -> Output {
        let mut output = self.chunk_state.output();
        for &left in self.cv_stack.iter().rev() {
            output = parent_output(left, output.chaining_value(), self.key_words, self.flags);
        }
        output
    }

    /// Finalize into the default 32-byte [`Hash`].
    pub fn finalize(&self) -> Hash {
        let mut out = [0; OUT_LEN];
        self.finalize_into(&mut out);
        Hash::from_bytes(out)
    }

    /// Finalize and write `out.len()` output bytes. Shorter outputs are
    /// prefixes of longer ones.
    pub fn finalize_into(&self, out: &mut [u8]) {
        self.final_output().root_output_bytes(out);
    }

    /// Finalize into a reader over the unbounded output stream.
    pub fn finalize_xof(&self) -> OutputReader {
        OutputReader::new(self.final_output())
    }

    /// The first `out_len` bytes of output.
    pub fn digest(&self, out_len: usize) -> Vec<u8> {
        let mut out = vec![0; out_len];
        self.finalize_into(&mut out);
        out
    }

    /// [`Hasher::digest`] as lowercase hex, `2 * out_len` characters.
    pub fn hexdigest(&self, out_len: usize) -> String {
        hex::encode(self.digest(out_len))
    }

    /// Total number of input bytes absorbed so far.
    pub fn count(&self) -> u64 {
        self.chunk_state.chunk_counter() * CHUNK_LEN as u64 + self.chunk_state.len() as u64
    }

    /// Drop all input, keeping the mode and key.
    pub fn reset(&mut self) -> &mut Self {
        tracing::trace!(count = self.count(), "reset hasher");
        self.chunk_state = ChunkState::new(self.key_words, 0, self.flags);
        self.cv_stack.clear();
        self
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

// Key words and chaining values are secret in the keyed modes.
impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("flags", &self.flags)
            .field("count", &self.count())
            .field("pending_subtrees", &self.cv_stack.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn stack_mirrors_completed_chunk_count() {
        for completed in 1..=40usize {
            let mut hasher = Hasher::new();
            hasher.update(&input(completed * CHUNK_LEN + 1));
            assert_eq!(
                hasher.cv_stack.len(),
                completed.count_ones() as usize,
                "completed {completed}"
            );
        }
    }

    #[test]
    fn tail_chunk_is_not_finalized_eagerly() {
        let mut hasher = Hasher::new();
        hasher.update(&input(CHUNK_LEN));
        assert!(hasher.cv_stack.is_empty());
        assert_eq!(hasher.chunk_state.len(), CHUNK_LEN);

        hasher.update(&input(2 * CHUNK_LEN)[CHUNK_LEN..]);
        assert_eq!(hasher.cv_stack.len(), 1);
        assert_eq!(hasher.chunk_state.chunk_counter(), 1);
        assert_eq!(hasher.count(), 2 * CHUNK_LEN as u64);
    }

    #[test]
    fn finalize_does_not_mutate() {
        let mut hasher = Hasher::new();
        hasher.update(&input(5000));
        let first = hasher.digest(100);
        assert_eq!(hasher.digest(100), first);
        assert_eq!(hasher.digest(40)[..], first[..40]);
        assert_eq!(hasher.finalize().as_bytes()[..], first[..32]);

        hasher.update(b"more");
        assert_ne!(hasher.digest(100), first);
    }

    #[test]
    fn reset_returns_to_empty() {
        let key = [0x42; KEY_LEN];
        let mut hasher = Hasher::new_keyed(&key);
        hasher.update(&input(3000));
        hasher.reset();
        assert_eq!(hasher.count(), 0);
        assert_eq!(hasher.finalize(), Hasher::new_keyed(&key).finalize());
    }

    #[test]
    fn keyed_construction_checks_length() {
        for len in [0, 1, 31, 33, 64] {
            assert_eq!(
                Hasher::try_new_keyed(&vec![0; len]).map(|_| ()),
                Err(Error::InvalidKeyLength { len })
            );
        }
        let key = [9u8; KEY_LEN];
        let mut fallible = Hasher::try_new_keyed(&key).expect("32-byte key");
        let mut infallible = Hasher::new_keyed(&key);
        fallible.update(b"abc");
        infallible.update(b"abc");
        assert_eq!(fallible.finalize(), infallible.finalize());
    }

    #[test]
    fn with_mode_matches_constructors() {
        let key = [1u8; KEY_LEN];
        let context = "treehash 2024-01-01 unit test";
        let cases = [
            (Mode::Hash, Hasher::new()),
            (Mode::KeyedHash(key), Hasher::new_keyed(&key)),
            (Mode::DeriveKey(context.to_string()), Hasher::new_derive_key(context)),
        ];
        for (mode, mut expected) in cases {
            let mut hasher = Hasher::with_mode(&mode);
            hasher.update(b"payload");
            expected.update(b"payload");
            assert_eq!(hasher.finalize(), expected.finalize(), "{mode:?}");
        }
    }

    #[test]
    fn debug_hides_key_material() {
        let hasher = Hasher::new_keyed(&[0xEE; KEY_LEN]);
        let rendered = format!("{hasher:?}");
        assert!(rendered.contains("count: 0"));
        assert!(!rendered.contains("key"));
        assert_eq!(format!("{:?}", Mode::KeyedHash([0xEE; KEY_LEN])), "KeyedHash(..)");
    }
}
