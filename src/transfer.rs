//! The shared transfer engine behind `write` and `read`.
//!
//! Both operations move bytes between the payload and a caller buffer while
//! advancing one cursor (*own*) toward the other (*peer*). The engine is
//! written once against [`CopyDirection`] and instantiated with the copy
//! direction reversed for each role.
//!
//! After the role-specific pre-guards have rejected invalid, full, and empty
//! states, the bytes a role may touch run from its own position to the peer's
//! position: a contiguous run when the peer sits strictly ahead, otherwise a
//! run that passes through the end of the payload and restarts at offset 0.
//! Only the second shape ever needs two copies, and only then does the wrap
//! flag toggle.

use crate::index::{self, IndexCell};

/// Copy hook distinguishing the write and read instantiations.
pub(crate) trait CopyDirection {
    /// Move `len` bytes between the payload cursor and the caller buffer.
    ///
    /// # Safety
    /// Both pointers must be valid for `len` bytes and must not overlap.
    unsafe fn copy(cursor: *mut u8, data: *mut u8, len: usize);
}

/// Write direction: caller buffer into the payload.
pub(crate) struct IntoPayload;

impl CopyDirection for IntoPayload {
    #[inline]
    unsafe fn copy(cursor: *mut u8, data: *mut u8, len: usize) {
        unsafe { core::ptr::copy_nonoverlapping(data.cast_const(), cursor, len) };
    }
}

/// Read direction: payload into the caller buffer.
pub(crate) struct FromPayload;

impl CopyDirection for FromPayload {
    #[inline]
    unsafe fn copy(cursor: *mut u8, data: *mut u8, len: usize) {
        unsafe { core::ptr::copy_nonoverlapping(cursor.cast_const(), data, len) };
    }
}

/// Move up to `want` bytes and publish the advanced own cursor.
///
/// Returns the byte count actually moved, `0..=min(want, capacity)`. A short
/// count means the peer's cursor was in the way, never an error.
///
/// # Safety
/// `payload` must be valid for `capacity` bytes, `data` for `want` bytes, and
/// the caller must hold the role that owns `own` (no concurrent advance of
/// the same cursor).
pub(crate) unsafe fn transfer<D: CopyDirection>(
    payload: *mut u8,
    capacity: usize,
    own: &IndexCell,
    peer: &IndexCell,
    data: *mut u8,
    want: usize,
) -> usize {
    let own_word = own.load_own();
    let peer_word = peer.load();
    let own_pos = index::position(own_word);
    let own_wrap = index::wrap_flag(own_word);
    let peer_pos = index::position(peer_word);

    // One call never moves more than the whole payload's worth.
    let mut len = want.min(capacity);

    if peer_pos > own_pos {
        // Contiguous run [own_pos, peer_pos): stop exactly at the peer.
        len = len.min(peer_pos - own_pos);
        unsafe { D::copy(payload.add(own_pos), data, len) };
        own.store(index::encode(own_pos + len, own_wrap));
        return len;
    }

    // The run passes through the end of the payload: [own_pos, capacity)
    // then [0, peer_pos). Equal positions here mean the guards already
    // classified the state, so the whole capacity is available.
    len = len.min(capacity - own_pos + peer_pos);
    let first = capacity - own_pos;

    if len < first {
        // Stops short of the end; the flag keeps its lap.
        unsafe { D::copy(payload.add(own_pos), data, len) };
        own.store(index::encode(own_pos + len, own_wrap));
        return len;
    }

    let rest = len - first;
    unsafe {
        D::copy(payload.add(own_pos), data, first);
        D::copy(payload, data.add(first), rest);
    }
    own.store(index::encode(rest, !own_wrap));
    len
}
