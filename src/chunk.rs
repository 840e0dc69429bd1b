use crate::compress::{
    block_words_from_bytes, compress, first_8_words, CVWords, CHUNK_END, CHUNK_START,
};
use crate::output::Output;
use crate::{BLOCK_LEN, CHUNK_LEN};

/// Accumulates the input of a single chunk, one leaf of the tree.
///
/// Full blocks are compressed lazily: a block is only chained into the running
/// CV once the next byte arrives, because the last block of a chunk has to be
/// compressed with `CHUNK_END` (and possibly `ROOT`), which is decided later.
#[derive(Clone)]
pub(crate) struct ChunkState {
    chaining_value: CVWords,
    chunk_counter: u64,
    block: [u8; BLOCK_LEN],
    block_len: u8,
    blocks_compressed: u8,
    flags: u32,
}

impl ChunkState {
    pub(crate) const fn new(key_words: CVWords, chunk_counter: u64, flags: u32) -> Self {
        Self {
            chaining_value: key_words,
            chunk_counter,
            block: [0; BLOCK_LEN],
            block_len: 0,
            blocks_compressed: 0,
            flags,
        }
    }

    pub(crate) fn chunk_counter(&self) -> u64 {
        self.chunk_counter
    }

    /// Bytes absorbed by this chunk so far, `0..=CHUNK_LEN`.
    pub(crate) fn len(&self) -> usize {
        BLOCK_LEN * self.blocks_compressed as usize + self.block_len as usize
    }

    fn start_flag(&self) -> u32 {
        if self.blocks_compressed == 0 {
            CHUNK_START
        } else {
            0
        }
    }

    /// Absorbs `input`. The caller guarantees the chunk never grows past
    /// `CHUNK_LEN`.
    pub(crate) fn update(&mut self, mut input: &[u8]) {
        debug_assert!(self.len() + input.len() <= CHUNK_LEN);
        while !input.is_empty() {
            // More input follows, so a full buffered block is not the last one.
            if self.block_len as usize == BLOCK_LEN {
                let block_words = block_words_from_bytes(&self.block);
                self.chaining_value = first_8_words(compress(
                    &self.chaining_value,
                    &block_words,
                    self.chunk_counter,
                    BLOCK_LEN as u32,
                    self.flags | self.start_flag(),
                ));
                self.blocks_compressed += 1;
                self.block = [0; BLOCK_LEN];
                self.block_len = 0;
            }

            let want = BLOCK_LEN - self.block_len as usize;
            let take = want.min(input.len());
            let start = self.block_len as usize;
            self.block[start..start + take].copy_from_slice(&input[..take]);
            self.block_len += take as u8;
            input = &input[take..];
        }
    }

    /// The chunk node for whatever has been absorbed. Does not consume the
    /// state; the block buffer is zero past `block_len`.
    pub(crate) fn output(&self) -> Output {
        Output {
            input_chaining_value: self.chaining_value,
            block_words: block_words_from_bytes(&self.block),
            counter: self.chunk_counter,
            block_len: self.block_len as u32,
            flags: self.flags | self.start_flag() | CHUNK_END,
        }
    }
}
