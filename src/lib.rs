//! SPSC byte ring buffer over caller-supplied memory.
//!
//! `ringview` moves bytes through a fixed-capacity ring whose backing memory
//! the caller owns: two index words and a payload region, either carved from
//! one contiguous block ([`RingView::linear`]) or living at independent
//! addresses ([`RingView::scattered`]) — e.g. separately mapped shared-memory
//! regions visible to two processes, cores, or a host and a device.
//!
//! Each cursor is published as a single word carrying a position plus a wrap
//! flag, so either side can tell full from empty (and detect a corrupted
//! counterpart) from the two words alone, without external metadata.
//!
//! # Example
//!
//! ```
//! use ringview::{RingView, WORD_SIZE};
//!
//! // One caller-owned block: two index words, then 64 payload bytes.
//! let mut block = vec![0usize; 2 + 64 / WORD_SIZE];
//! let len = block.len() * WORD_SIZE;
//! let mut ring = unsafe { RingView::linear(block.as_mut_ptr().cast(), len) };
//! assert!(ring.is_valid());
//!
//! assert_eq!(ring.write(b"Hello World!"), Ok(12));
//! let mut out = [0u8; 12];
//! assert_eq!(ring.read(&mut out), Ok(12));
//! assert_eq!(&out, b"Hello World!");
//! ```
//!
//! # Concurrency
//!
//! Operations are synchronous and never block; a full write or empty read
//! returns `Ok(0)`. Lock-free SPSC use hands one clone of the view to the
//! producer and one to the consumer: each side stores only its own index word
//! (Release) and loads the peer's (Acquire). Alternatively [`LockedRing`]
//! serializes both sides behind an injected [`RawLock`].

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

mod error;
pub mod index;
mod lock;
mod ring;
mod transfer;
pub mod version;

#[cfg(test)]
mod tests;

pub use error::{LayoutError, RingError};
pub use index::{CYCLE_MASK, INDEX_BITS, POSITION_MASK, WORD_SIZE, encode, position, wrap_flag};
pub use lock::{LockedRing, RawLock};
pub use ring::RingView;
