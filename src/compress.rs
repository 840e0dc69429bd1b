//! The BLAKE3 compression function and the word/byte conversions around it.
//!
//! Everything here is a pure function of its arguments. The chunk and parent
//! layers above only decide *which* chaining value, block, counter, length and
//! flags get fed in.

use crate::{BLOCK_LEN, KEY_LEN};

/// Eight 32-bit words: a chaining value or a key.
pub(crate) type CVWords = [u32; 8];
/// Sixteen 32-bit words: one message block, or one full compression output.
pub(crate) type BlockWords = [u32; 16];

pub(crate) const CHUNK_START: u32 = 1 << 0;
pub(crate) const CHUNK_END: u32 = 1 << 1;
pub(crate) const PARENT: u32 = 1 << 2;
pub(crate) const ROOT: u32 = 1 << 3;
pub(crate) const KEYED_HASH: u32 = 1 << 4;
pub(crate) const DERIVE_KEY_CONTEXT: u32 = 1 << 5;
pub(crate) const DERIVE_KEY_MATERIAL: u32 = 1 << 6;

pub(crate) const IV: CVWords = [
    0x6A09E667, 0xBB67AE85, 0x3C6EF372, 0xA54FF53A, 0x510E527F, 0x9B05688C, 0x1F83D9AB, 0x5BE0CD19,
];

const MSG_PERMUTATION: [usize; 16] = [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8];

const ROUNDS: usize = 7;

// The quarter-round. Mixes one column or one diagonal of the state with two
// message words.
#[inline(always)]
fn g(state: &mut BlockWords, a: usize, b: usize, c: usize, d: usize, mx: u32, my: u32) {
    state[a] = state[a].wrapping_add(state[b]).wrapping_add(mx);
    state[d] = (state[d] ^ state[a]).rotate_right(16);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_right(12);
    state[a] = state[a].wrapping_add(state[b]).wrapping_add(my);
    state[d] = (state[d] ^ state[a]).rotate_right(8);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_right(7);
}

#[inline(always)]
fn round(state: &mut BlockWords, m: &BlockWords) {
    // Columns.
    g(state, 0, 4, 8, 12, m[0], m[1]);
    g(state, 1, 5, 9, 13, m[2], m[3]);
    g(state, 2, 6, 10, 14, m[4], m[5]);
    g(state, 3, 7, 11, 15, m[6], m[7]);
    // Diagonals.
    g(state, 0, 5, 10, 15, m[8], m[9]);
    g(state, 1, 6, 11, 12, m[10], m[11]);
    g(state, 2, 7, 8, 13, m[12], m[13]);
    g(state, 3, 4, 9, 14, m[14], m[15]);
}

#[inline(always)]
fn permute(m: &BlockWords) -> BlockWords {
    std::array::from_fn(|i| m[MSG_PERMUTATION[i]])
}

/// Runs the seven-round compression and returns the full 16-word state after
/// the feed-forward. The first eight words are the next chaining value; all
/// sixteen are used as extended output.
pub(crate) fn compress(
    chaining_value: &CVWords,
    block_words: &BlockWords,
    counter: u64,
    block_len: u32,
    flags: u32,
) -> BlockWords {
    debug_assert!(block_len as usize <= BLOCK_LEN);
    #[rustfmt::skip]
    let mut state = [
        chaining_value[0], chaining_value[1], chaining_value[2], chaining_value[3],
        chaining_value[4], chaining_value[5], chaining_value[6], chaining_value[7],
        IV[0],             IV[1],             IV[2],             IV[3],
        counter as u32,    (counter >> 32) as u32, block_len,    flags,
    ];

    let mut block = *block_words;
    for r in 0..ROUNDS {
        round(&mut state, &block);
        if r + 1 < ROUNDS {
            block = permute(&block);
        }
    }

    for i in 0..8 {
        state[i] ^= state[i + 8];
        state[i + 8] ^= chaining_value[i];
    }
    state
}

#[inline]
pub(crate) fn first_8_words(compression_output: BlockWords) -> CVWords {
    std::array::from_fn(|i| compression_output[i])
}

/// Packs a full 64-byte block into little-endian words.
#[inline]
pub(crate) fn block_words_from_bytes(bytes: &[u8; BLOCK_LEN]) -> BlockWords {
    let mut words = [0; 16];
    words_from_le_bytes(bytes, &mut words);
    words
}

#[inline]
pub(crate) fn key_words_from_bytes(bytes: &[u8; KEY_LEN]) -> CVWords {
    let mut words = [0; 8];
    words_from_le_bytes(bytes, &mut words);
    words
}

fn words_from_le_bytes(bytes: &[u8], words: &mut [u32]) {
    debug_assert_eq!(bytes.len(), 4 * words.len());
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

/// Serializes one compression output into its 64 output bytes.
#[inline]
pub(crate) fn le_bytes_from_words(words: &BlockWords) -> [u8; BLOCK_LEN] {
    let mut out = [0; BLOCK_LEN];
    for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}
