//! Coarse mutual-exclusion wrapper around a [`RingView`].
//!
//! The lock is an injected dependency: any primitive that can run a closure
//! as a critical section works, supplied by reference at construction time.
//! The wrapper serializes producer and consumer against each other, trading
//! throughput for a race-free critical section covering the whole of each
//! operation (index read, transfer, index publish) on every exit path.

use core::cell::UnsafeCell;

use crate::error::{LayoutError, RingError};
use crate::ring::RingView;

/// Mutual-exclusion provider guarding a ring's critical sections.
///
/// Implementations only need acquire/release semantics; the closure form
/// adapts guard-based locks and raw primitives alike.
pub trait RawLock {
    /// Run `f` with the lock held.
    fn with<R>(&self, f: impl FnOnce() -> R) -> R;
}

#[cfg(feature = "std")]
impl RawLock for std::sync::Mutex<()> {
    fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        // The critical section holds no state worth poisoning.
        let _guard = self.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f()
    }
}

/// Interior-mutable cell for the wrapped view.
#[repr(transparent)]
struct RingCell(UnsafeCell<RingView>);

impl RingCell {
    #[inline]
    const fn new(ring: RingView) -> Self {
        Self(UnsafeCell::new(ring))
    }

    /// # Safety
    /// Caller must hold the lock.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn get_mut_unchecked(&self) -> &mut RingView {
        unsafe { &mut *self.0.get() }
    }

    #[inline]
    fn into_inner(self) -> RingView {
        self.0.into_inner()
    }
}

/// A [`RingView`] whose every operation runs under an external lock.
///
/// Unlike the bare view, a `LockedRing` may be shared by reference between
/// the producer and consumer threads: the lock serializes them.
pub struct LockedRing<'l, L: RawLock> {
    ring: RingCell,
    lock: &'l L,
}

// All access to the inner view goes through the lock.
unsafe impl<L: RawLock + Sync> Send for LockedRing<'_, L> {}
unsafe impl<L: RawLock + Sync> Sync for LockedRing<'_, L> {}

impl<'l, L: RawLock> LockedRing<'l, L> {
    /// Wrap an existing view with a lock.
    #[must_use]
    pub const fn new(ring: RingView, lock: &'l L) -> Self {
        Self { ring: RingCell::new(ring), lock }
    }

    /// Locked counterpart of [`RingView::try_scattered`].
    ///
    /// # Safety
    /// Same contract as [`RingView::try_scattered`].
    pub unsafe fn scattered(
        write_index: *mut usize,
        read_index: *mut usize,
        payload: *mut u8,
        size: usize,
        lock: &'l L,
    ) -> Result<Self, LayoutError> {
        let ring = unsafe { RingView::try_scattered(write_index, read_index, payload, size) }?;
        Ok(Self::new(ring, lock))
    }

    /// Locked counterpart of [`RingView::try_linear`].
    ///
    /// # Safety
    /// Same contract as [`RingView::try_linear`].
    pub unsafe fn linear(
        block: *mut u8,
        block_len: usize,
        lock: &'l L,
    ) -> Result<Self, LayoutError> {
        let ring = unsafe { RingView::try_linear(block, block_len) }?;
        Ok(Self::new(ring, lock))
    }

    /// [`RingView::write`] under the lock.
    pub fn write(&self, data: &[u8]) -> Result<usize, RingError> {
        self.lock.with(|| unsafe { self.ring.get_mut_unchecked() }.write(data))
    }

    /// [`RingView::read`] under the lock.
    pub fn read(&self, data: &mut [u8]) -> Result<usize, RingError> {
        self.lock.with(|| unsafe { self.ring.get_mut_unchecked() }.read(data))
    }

    /// [`RingView::reset`] under the lock.
    pub fn reset(&self) {
        self.lock.with(|| unsafe { self.ring.get_mut_unchecked() }.reset());
    }

    /// [`RingView::len`] under the lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock.with(|| unsafe { self.ring.get_mut_unchecked() }.len())
    }

    /// [`RingView::is_empty`] under the lock.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [`RingView::is_full`] under the lock.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.lock.with(|| unsafe { self.ring.get_mut_unchecked() }.is_full())
    }

    /// [`RingView::capacity`] under the lock (reset can zero it).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock.with(|| unsafe { self.ring.get_mut_unchecked() }.capacity())
    }

    /// [`RingView::is_valid`] under the lock.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lock.with(|| unsafe { self.ring.get_mut_unchecked() }.is_valid())
    }

    /// Unwrap, returning the inner view.
    #[must_use]
    pub fn into_inner(self) -> RingView {
        self.ring.into_inner()
    }
}
