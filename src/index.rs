//! Cycle-bit index encoding and the cell abstraction over caller-owned words.
//!
//! Each cursor is published as a single `usize`: the low `usize::BITS - 1`
//! bits hold the position inside the payload, the top bit holds a wrap flag
//! that toggles every time the cursor crosses the end of the payload. Two
//! cursors with equal positions are disambiguated by the flags: equal flags
//! mean empty, differing flags mean full.

use core::sync::atomic::{AtomicUsize, Ordering};

/// Bits available for the position field.
pub const INDEX_BITS: u32 = usize::BITS - 1;

/// Mask selecting the wrap flag (top bit of the word).
pub const CYCLE_MASK: usize = 1 << INDEX_BITS;

/// Mask selecting the position field (everything below the wrap flag).
pub const POSITION_MASK: usize = !CYCLE_MASK;

/// Size in bytes of one index word.
pub const WORD_SIZE: usize = size_of::<usize>();

/// Extract the position field from an index word.
#[inline]
#[must_use]
pub const fn position(word: usize) -> usize {
    word & POSITION_MASK
}

/// Extract the wrap flag from an index word.
#[inline]
#[must_use]
pub const fn wrap_flag(word: usize) -> bool {
    word >> INDEX_BITS != 0
}

/// Compose an index word from a position and a wrap flag.
///
/// `position` must fit the position field; capacities are capped at
/// [`POSITION_MASK`] by the constructors so in-range positions always do.
#[inline]
#[must_use]
pub const fn encode(position: usize, wrap: bool) -> usize {
    position & POSITION_MASK | if wrap { CYCLE_MASK } else { 0 }
}

/// Atomic view over a caller-owned index word.
///
/// The word lives in memory supplied at construction time (possibly a shared
/// mapping); the cell never owns it. Each role stores only to its own cell
/// (Release) and loads the peer's (Acquire), so a word-sized publish is the
/// only synchronization between the two sides.
#[repr(transparent)]
pub(crate) struct IndexCell(*mut usize);

impl IndexCell {
    /// # Safety
    /// `word` must be non-null, aligned, and valid for atomic access for the
    /// lifetime of the cell.
    #[inline]
    pub(crate) const unsafe fn new(word: *mut usize) -> Self {
        Self(word)
    }

    #[inline]
    fn atomic(&self) -> &AtomicUsize {
        // Validity is established by `new`.
        unsafe { AtomicUsize::from_ptr(self.0) }
    }

    /// Load the peer's word with Acquire ordering.
    #[inline]
    pub(crate) fn load(&self) -> usize {
        self.atomic().load(Ordering::Acquire)
    }

    /// Load our own word; no one else stores to it.
    #[inline]
    pub(crate) fn load_own(&self) -> usize {
        self.atomic().load(Ordering::Relaxed)
    }

    /// Publish a new word with Release ordering.
    #[inline]
    pub(crate) fn store(&self, word: usize) {
        self.atomic().store(word, Ordering::Release);
    }
}
