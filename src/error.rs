//! Error types for layout validation and transfer operations.

use snafu::Snafu;

/// Why a layout could not be built.
///
/// Returned by [`RingView::try_scattered`](crate::RingView::try_scattered)
/// and [`RingView::try_linear`](crate::RingView::try_linear). The sentinel
/// constructors map every variant to [`RingView::INVALID`](crate::RingView::INVALID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum LayoutError {
    /// A required memory reference was null.
    #[snafu(display("{what} reference is null"))]
    NullRegion {
        /// Which reference was null.
        what: &'static str,
    },

    /// The supplied region cannot hold the minimum layout.
    #[snafu(display("region too small: need {needed} bytes, got {actual}"))]
    RegionTooSmall {
        /// Minimum byte count for this layout.
        needed: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// The block is not aligned to the index word size.
    #[snafu(display("block is not word-aligned"))]
    Misaligned,

    /// The capacity would collide with the wrap-flag bit.
    #[snafu(display("capacity exceeds the position field (max {max} bytes)"))]
    CapacityOverflow {
        /// Largest representable capacity.
        max: usize,
    },
}

/// Why a transfer refused to move bytes.
///
/// Full and empty are not errors; they are `Ok(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[non_exhaustive]
pub enum RingError {
    /// The handle is the invalid sentinel (failed construction or reset).
    #[snafu(display("ring view is inactive"))]
    Inactive,

    /// The two index words contradict each other: the read cursor is ahead
    /// of bytes the writer has published. The ring should be reset and
    /// rebuilt.
    #[snafu(display("index words are mutually inconsistent"))]
    Corrupted,
}
