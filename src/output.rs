use std::fmt;

use crate::compress::{compress, first_8_words, le_bytes_from_words, BlockWords, CVWords, PARENT, ROOT};
use crate::BLOCK_LEN;

// Every chunk or parent node can produce either an 8-word chaining value or,
// with the ROOT flag, any number of output bytes. `Output` holds the
// compression inputs right before that choice is made.
#[derive(Clone)]
pub(crate) struct Output {
    pub(crate) input_chaining_value: CVWords,
    pub(crate) block_words: BlockWords,
    pub(crate) counter: u64,
    pub(crate) block_len: u32,
    pub(crate) flags: u32,
}

impl Output {
    pub(crate) fn chaining_value(&self) -> CVWords {
        first_8_words(compress(
            &self.input_chaining_value,
            &self.block_words,
            self.counter,
            self.block_len,
            self.flags,
        ))
    }

    /// One 64-byte block of root output. `output_block_counter` counts output
    /// blocks and has nothing to do with the chunk counter.
    pub(crate) fn root_output_block(&self, output_block_counter: u64) -> [u8; BLOCK_LEN] {
        le_bytes_from_words(&compress(
            &self.input_chaining_value,
            &self.block_words,
            output_block_counter,
            self.block_len,
            self.flags | ROOT,
        ))
    }

    /// Fills `out` with the start of the root output stream. Produces exactly
    /// `out.len().div_ceil(BLOCK_LEN)` blocks.
    pub(crate) fn root_output_bytes(&self, out: &mut [u8]) {
        for (output_block_counter, out_block) in (0u64..).zip(out.chunks_mut(BLOCK_LEN)) {
            let block = self.root_output_block(output_block_counter);
            out_block.copy_from_slice(&block[..out_block.len()]);
        }
    }
}

pub(crate) fn parent_output(
    left_child_cv: CVWords,
    right_child_cv: CVWords,
    key_words: CVWords,
    flags: u32,
) -> Output {
    let mut block_words = [0; 16];
    block_words[..8].copy_from_slice(&left_child_cv);
    block_words[8..].copy_from_slice(&right_child_cv);
    Output {
        input_chaining_value: key_words,
        block_words,
        counter: 0,
        block_len: BLOCK_LEN as u32,
        flags: PARENT | flags,
    }
}

pub(crate) fn parent_cv(
    left_child_cv: CVWords,
    right_child_cv: CVWords,
    key_words: CVWords,
    flags: u32,
) -> CVWords {
    parent_output(left_child_cv, right_child_cv, key_words, flags).chaining_value()
}

/// A seekable reader over the extendable output of a finalized [`Hasher`].
///
/// Obtained from [`Hasher::finalize_xof`]. The stream is effectively
/// unbounded (2^64 blocks of 64 bytes); the first 32 bytes are the default
/// digest.
///
/// ```
/// let mut hasher = treehash::Hasher::new();
/// hasher.update(b"abc");
/// let mut reader = hasher.finalize_xof();
/// let mut first = [0; 16];
/// let mut second = [0; 16];
/// reader.fill(&mut first);
/// reader.fill(&mut second);
/// assert_eq!(hasher.digest(32), [first, second].concat());
/// ```
///
/// [`Hasher`]: crate::Hasher
/// [`Hasher::finalize_xof`]: crate::Hasher::finalize_xof
#[derive(Clone)]
pub struct OutputReader {
    inner: Output,
    output_block_counter: u64,
    position_within_block: u8,
}

impl OutputReader {
    pub(crate) fn new(inner: Output) -> Self {
        Self {
            inner,
            output_block_counter: 0,
            position_within_block: 0,
        }
    }

    /// Writes the next `buf.len()` output bytes into `buf` and advances.
    pub fn fill(&mut self, mut buf: &mut [u8]) {
        while !buf.is_empty() {
            let block = self.inner.root_output_block(self.output_block_counter);
            let start = self.position_within_block as usize;
            let take = (BLOCK_LEN - start).min(buf.len());
            buf[..take].copy_from_slice(&block[start..start + take]);
            buf = &mut buf[take..];
            self.position_within_block += take as u8;
            if self.position_within_block as usize == BLOCK_LEN {
                self.output_block_counter = self.output_block_counter.wrapping_add(1);
                self.position_within_block = 0;
            }
        }
    }

    /// The current byte offset into the output stream.
    pub fn position(&self) -> u64 {
        self.output_block_counter
            .wrapping_mul(BLOCK_LEN as u64)
            .wrapping_add(self.position_within_block as u64)
    }

    /// Seeks to an absolute byte offset in the output stream.
    pub fn set_position(&mut self, position: u64) {
        self.output_block_counter = position / BLOCK_LEN as u64;
        self.position_within_block = (position % BLOCK_LEN as u64) as u8;
    }
}

impl fmt::Debug for OutputReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputReader")
            .field("position", &self.position())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::IV;

    fn sample() -> Output {
        Output {
            input_chaining_value: IV,
            block_words: std::array::from_fn(|i| i as u32),
            counter: 7,
            block_len: 16,
            flags: 0,
        }
    }

    #[test]
    fn root_output_zero_len_is_empty() {
        let mut out: [u8; 0] = [];
        sample().root_output_bytes(&mut out);
    }

    #[test]
    fn root_output_spans_blocks() {
        let output = sample();
        let mut out = [0u8; 3 * BLOCK_LEN + 5];
        output.root_output_bytes(&mut out);
        assert_eq!(out[..BLOCK_LEN], output.root_output_block(0));
        assert_eq!(out[BLOCK_LEN..2 * BLOCK_LEN], output.root_output_block(1));
        assert_eq!(out[3 * BLOCK_LEN..], output.root_output_block(3)[..5]);
    }

    #[test]
    fn parent_node_layout() {
        let left = [1; 8];
        let right = [2; 8];
        let parent = parent_output(left, right, IV, 0);
        assert_eq!(parent.block_words[..8], left);
        assert_eq!(parent.block_words[8..], right);
        assert_eq!(parent.block_len, BLOCK_LEN as u32);
        assert_eq!(parent.counter, 0);
        assert_eq!(parent.flags, PARENT);
        assert_eq!(parent_cv(left, right, IV, 0), parent.chaining_value());
        assert_ne!(parent_cv(right, left, IV, 0), parent.chaining_value());
    }

    #[test]
    fn reader_seek_and_position() {
        let output = sample();
        let mut expected = [0u8; 300];
        output.root_output_bytes(&mut expected);

        let mut reader = OutputReader::new(output);
        reader.set_position(130);
        assert_eq!(reader.position(), 130);
        let mut tail = [0u8; 170];
        reader.fill(&mut tail);
        assert_eq!(tail[..], expected[130..]);
        assert_eq!(reader.position(), 300);
    }
}
