//! The `RingView` handle: layout validation, transfer operations, reset.

use core::ptr;

use snafu::ensure;

use crate::error::{
    CapacityOverflowSnafu, LayoutError, MisalignedSnafu, NullRegionSnafu, RegionTooSmallSnafu,
    RingError,
};
use crate::index::{self, IndexCell, POSITION_MASK, WORD_SIZE};
use crate::transfer::{self, FromPayload, IntoPayload};

/// Byte offset of the payload inside a linear block.
const LINEAR_PAYLOAD_OFFSET: usize = 2 * WORD_SIZE;

/// A non-owning view of an SPSC byte ring over caller-supplied memory.
///
/// The view references two index words and a payload region it does not own;
/// the caller allocates them (one contiguous block via [`linear`], or three
/// independent regions via [`scattered`]) and frees them after the view is
/// discarded. Cloning the view yields a second handle over the same memory:
/// the intended concurrent use is exactly one clone per role, one writing and
/// one reading.
///
/// Transfers never block. They return the byte count actually moved, which
/// may be short (including `0` for a full write or empty read); retry policy
/// belongs to the caller.
///
/// [`linear`]: RingView::linear
/// [`scattered`]: RingView::scattered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingView {
    write_index: *mut usize,
    read_index: *mut usize,
    payload: *mut u8,
    capacity: usize,
}

// The pointers target caller memory that is valid wherever the caller says it
// is; moving a handle between threads is part of the SPSC contract.
unsafe impl Send for RingView {}

// `&self` methods only perform atomic loads; transfers require `&mut self`.
unsafe impl Sync for RingView {}

impl RingView {
    /// The sentinel returned by failed construction and left behind by
    /// [`reset`](RingView::reset). Compares equal across constructions.
    pub const INVALID: RingView = RingView {
        write_index: ptr::null_mut(),
        read_index: ptr::null_mut(),
        payload: ptr::null_mut(),
        capacity: 0,
    };

    /// Build a view over three independent regions.
    ///
    /// Fails if any pointer is null, `size < 2 * WORD_SIZE`, or `size` would
    /// collide with the wrap-flag bit. On success both index words are
    /// zeroed: positions 0, flags 0, empty.
    ///
    /// # Safety
    /// `write_index` and `read_index` must each point to a distinct, aligned
    /// `usize` and `payload` to `size` bytes, all valid (and not otherwise
    /// mutated) for the lifetime of every handle derived from this view.
    pub unsafe fn try_scattered(
        write_index: *mut usize,
        read_index: *mut usize,
        payload: *mut u8,
        size: usize,
    ) -> Result<RingView, LayoutError> {
        ensure!(!write_index.is_null(), NullRegionSnafu { what: "write index" });
        ensure!(!read_index.is_null(), NullRegionSnafu { what: "read index" });
        ensure!(!payload.is_null(), NullRegionSnafu { what: "payload" });
        ensure!(
            size >= 2 * WORD_SIZE,
            RegionTooSmallSnafu { needed: 2 * WORD_SIZE, actual: size }
        );
        ensure!(size <= POSITION_MASK, CapacityOverflowSnafu { max: POSITION_MASK });

        let view = RingView { write_index, read_index, payload, capacity: size };
        view.write_cell().store(index::encode(0, false));
        view.read_cell().store(index::encode(0, false));
        Ok(view)
    }

    /// Build a view carving one contiguous block: the write-index word at
    /// offset 0, the read-index word at offset [`WORD_SIZE`], and the
    /// remaining `block_len - 2 * WORD_SIZE` bytes as payload.
    ///
    /// Fails if `block` is null or not word-aligned, or `block_len` is below
    /// `4 * WORD_SIZE` (two index words plus a two-word minimum payload).
    ///
    /// # Safety
    /// `block` must be valid for `block_len` bytes (and not otherwise
    /// mutated) for the lifetime of every handle derived from this view.
    pub unsafe fn try_linear(block: *mut u8, block_len: usize) -> Result<RingView, LayoutError> {
        ensure!(!block.is_null(), NullRegionSnafu { what: "block" });
        ensure!(block.addr() % WORD_SIZE == 0, MisalignedSnafu);
        ensure!(
            block_len >= 4 * WORD_SIZE,
            RegionTooSmallSnafu { needed: 4 * WORD_SIZE, actual: block_len }
        );

        unsafe {
            Self::try_scattered(
                block.cast::<usize>(),
                block.add(WORD_SIZE).cast::<usize>(),
                block.add(LINEAR_PAYLOAD_OFFSET),
                block_len - LINEAR_PAYLOAD_OFFSET,
            )
        }
    }

    /// Sentinel-returning form of [`try_scattered`](RingView::try_scattered):
    /// failure yields [`RingView::INVALID`].
    ///
    /// # Safety
    /// Same contract as [`try_scattered`](RingView::try_scattered).
    #[must_use]
    pub unsafe fn scattered(
        write_index: *mut usize,
        read_index: *mut usize,
        payload: *mut u8,
        size: usize,
    ) -> RingView {
        unsafe { Self::try_scattered(write_index, read_index, payload, size) }
            .unwrap_or(Self::INVALID)
    }

    /// Sentinel-returning form of [`try_linear`](RingView::try_linear):
    /// failure yields [`RingView::INVALID`].
    ///
    /// # Safety
    /// Same contract as [`try_linear`](RingView::try_linear).
    #[must_use]
    pub unsafe fn linear(block: *mut u8, block_len: usize) -> RingView {
        unsafe { Self::try_linear(block, block_len) }.unwrap_or(Self::INVALID)
    }

    /// True unless this handle is the invalid sentinel.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.capacity != 0
            && !self.write_index.is_null()
            && !self.read_index.is_null()
            && !self.payload.is_null()
    }

    /// Payload capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Unread bytes currently held. `0` on an invalid handle.
    #[must_use]
    pub fn len(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        let w = self.write_cell().load();
        let r = self.read_cell().load();
        let wpos = index::position(w);
        let rpos = index::position(r);
        if wpos == rpos {
            if index::wrap_flag(w) == index::wrap_flag(r) { 0 } else { self.capacity }
        } else {
            (wpos + self.capacity - rpos) % self.capacity
        }
    }

    /// True if no unread bytes are held.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if exactly `capacity` unread bytes are held.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.is_valid() && self.len() == self.capacity
    }

    /// Write bytes from `data` into the ring.
    ///
    /// Returns the count actually written: short when the reader's cursor is
    /// in the way, `0` when full. `Err(Corrupted)` means the read cursor sits
    /// ahead of published bytes (external tampering); the ring should be
    /// reset and rebuilt.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, RingError> {
        if !self.is_valid() {
            return Err(RingError::Inactive);
        }
        let w_cell = self.write_cell();
        let r_cell = self.read_cell();
        let w = w_cell.load_own();
        let r = r_cell.load();
        let (wpos, wwrap) = (index::position(w), index::wrap_flag(w));
        let (rpos, rwrap) = (index::position(r), index::wrap_flag(r));

        if (wwrap == rwrap && wpos < rpos) || (wwrap != rwrap && wpos > rpos) {
            return Err(RingError::Corrupted);
        }
        if wwrap != rwrap && wpos == rpos {
            return Ok(0); // full
        }

        let moved = unsafe {
            transfer::transfer::<IntoPayload>(
                self.payload,
                self.capacity,
                &w_cell,
                &r_cell,
                data.as_ptr().cast_mut(),
                data.len(),
            )
        };
        Ok(moved)
    }

    /// Read bytes from the ring into `data`.
    ///
    /// Returns the count actually read: short when the writer's cursor is in
    /// the way, `0` when empty. `Err(Corrupted)` as for
    /// [`write`](RingView::write).
    pub fn read(&mut self, data: &mut [u8]) -> Result<usize, RingError> {
        if !self.is_valid() {
            return Err(RingError::Inactive);
        }
        let r_cell = self.read_cell();
        let w_cell = self.write_cell();
        let r = r_cell.load_own();
        let w = w_cell.load();
        let (rpos, rwrap) = (index::position(r), index::wrap_flag(r));
        let (wpos, wwrap) = (index::position(w), index::wrap_flag(w));

        if (rwrap != wwrap && rpos < wpos) || (rwrap == wwrap && wpos < rpos) {
            return Err(RingError::Corrupted);
        }
        if wpos == rpos && wwrap == rwrap {
            return Ok(0); // empty
        }

        let moved = unsafe {
            transfer::transfer::<FromPayload>(
                self.payload,
                self.capacity,
                &r_cell,
                &w_cell,
                data.as_mut_ptr(),
                data.len(),
            )
        };
        Ok(moved)
    }

    /// Zero the payload and both index words, then downgrade this handle in
    /// place to [`RingView::INVALID`]. No-op on an already-invalid handle.
    ///
    /// The backing allocation stays with the caller; a new view must be
    /// constructed before transferring again.
    pub fn reset(&mut self) {
        if !self.is_valid() {
            return;
        }
        unsafe { ptr::write_bytes(self.payload, 0, self.capacity) };
        self.write_cell().store(0);
        self.read_cell().store(0);
        *self = Self::INVALID;
    }

    #[inline]
    fn write_cell(&self) -> IndexCell {
        // Non-null on every path that calls this.
        unsafe { IndexCell::new(self.write_index) }
    }

    #[inline]
    fn read_cell(&self) -> IndexCell {
        unsafe { IndexCell::new(self.read_index) }
    }
}
