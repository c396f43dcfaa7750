use std::vec;
use std::vec::Vec;

use crate::{RingView, WORD_SIZE};

mod concurrency;

/// A caller-owned linear block: two index words followed by `capacity`
/// payload bytes. Lives on the heap so views stay valid when the block value
/// moves.
pub(crate) struct Block {
    mem: Vec<usize>,
    base: *mut u8,
}

impl Block {
    pub(crate) fn new(capacity: usize) -> Self {
        assert_eq!(capacity % WORD_SIZE, 0, "test capacities are word multiples");
        let mut mem = vec![0usize; 2 + capacity / WORD_SIZE];
        let base = mem.as_mut_ptr().cast::<u8>();
        Self { mem, base }
    }

    pub(crate) fn base(&self) -> *mut u8 {
        self.base
    }

    pub(crate) fn byte_len(&self) -> usize {
        self.mem.len() * WORD_SIZE
    }

    pub(crate) fn ring(&self) -> RingView {
        unsafe { RingView::linear(self.base, self.byte_len()) }
    }

    /// Overwrite the write-index word, bypassing the view (tampering).
    pub(crate) fn poke_write_index(&self, word: usize) {
        unsafe { self.base.cast::<usize>().write_volatile(word) };
    }

    /// Overwrite the read-index word, bypassing the view (tampering).
    pub(crate) fn poke_read_index(&self, word: usize) {
        unsafe { self.base.cast::<usize>().add(1).write_volatile(word) };
    }

    /// Raw view of the whole block, index words included.
    pub(crate) fn words(&self) -> &[usize] {
        unsafe { core::slice::from_raw_parts(self.base.cast::<usize>(), self.mem.len()) }
    }
}

/// Deterministic byte pattern for round-trip checks.
pub(crate) fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 13) as u8).collect()
}
