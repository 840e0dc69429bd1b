//! [`digest`] trait implementations, so a [`Hasher`] can be used wherever a
//! `Digest`, `Mac` or `ExtendableOutput` is expected.
//!
//! ```
//! use digest::Digest;
//!
//! let out = <treehash::Hasher as Digest>::digest(b"abc");
//! assert_eq!(out[..], treehash::hash(b"abc").as_bytes()[..]);
//! ```

use digest::crypto_common::{BlockSizeUser, Key, KeyInit, KeySizeUser};
use digest::generic_array::GenericArray;
use digest::typenum::{U32, U64};

use crate::{Hasher, OutputReader};

impl digest::HashMarker for Hasher {}

impl digest::MacMarker for Hasher {}

impl digest::Update for Hasher {
    fn update(&mut self, data: &[u8]) {
        Hasher::update(self, data);
    }
}

impl digest::Reset for Hasher {
    fn reset(&mut self) {
        Hasher::reset(self);
    }
}

impl digest::OutputSizeUser for Hasher {
    type OutputSize = U32;
}

impl BlockSizeUser for Hasher {
    type BlockSize = U64;
}

impl KeySizeUser for Hasher {
    type KeySize = U32;
}

impl KeyInit for Hasher {
    fn new(key: &Key<Self>) -> Self {
        let key: [u8; 32] = (*key).into();
        Hasher::new_keyed(&key)
    }
}

impl digest::FixedOutput for Hasher {
    fn finalize_into(self, out: &mut GenericArray<u8, U32>) {
        Hasher::finalize_into(&self, out);
    }
}

impl digest::FixedOutputReset for Hasher {
    fn finalize_into_reset(&mut self, out: &mut GenericArray<u8, U32>) {
        Hasher::finalize_into(self, out);
        Hasher::reset(self);
    }
}

impl digest::ExtendableOutput for Hasher {
    type Reader = OutputReader;

    fn finalize_xof(self) -> OutputReader {
        Hasher::finalize_xof(&self)
    }
}

impl digest::ExtendableOutputReset for Hasher {
    fn finalize_xof_reset(&mut self) -> OutputReader {
        let reader = Hasher::finalize_xof(self);
        Hasher::reset(self);
        reader
    }
}

impl digest::XofReader for OutputReader {
    fn read(&mut self, buffer: &mut [u8]) {
        self.fill(buffer);
    }
}
