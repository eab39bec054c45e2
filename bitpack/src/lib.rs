//! # bitpack
//!
//! A `no_std` compatible library for frame-of-reference bit packing of
//! integer columns, with predicate kernels that scan the packed bytes and
//! report matching rows in a [`Bitset`].
//!
//! Two layouts are provided:
//!
//! - [`block`]: blocks of 64 values packed into `w` 64-bit words, for
//!   storage and bulk decoding.
//! - [`stream`]: values written back to back most significant bit first,
//!   scanned by the per-width kernel tables in [`cmp`].
//!
//! ```rust
//! use bitpack::{stream, Bitset, Filter, PackedStream};
//!
//! // Timestamps within a block differ by at most a few thousand ticks
//! let ts: Vec<u64> = (0..100).map(|i| 1_700_000_000 + i * 37).collect();
//! let (minv, maxv) = (ts[0], ts[99]);
//!
//! let mut buf = vec![0u8; 8 * ts.len()];
//! let (len, width) = stream::encode(&mut buf, &ts, minv, maxv).unwrap();
//! assert_eq!(width.get(), 12);
//! assert_eq!(len, 150);
//!
//! let packed = PackedStream::new(&buf[..len], width, ts.len(), minv).unwrap();
//! let mut hits = Bitset::new(ts.len());
//! packed
//!     .filter(Filter::Between(1_700_000_100, 1_700_000_200), &mut hits)
//!     .unwrap();
//! assert_eq!(hits.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): `std::error::Error` for [`BitpackError`].
//! - `validate`: the unchecked packers panic on values that do not fit
//!   the requested width instead of silently dropping their high bits.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bit_ops;
pub mod block;
pub mod cmp;
pub mod error;
pub mod filter;
pub mod packed;
pub mod predicate;
pub mod stream;
pub mod width;

pub use bitset::Bitset;
pub use cmp::CompareOp;
pub use error::BitpackError;
pub use filter::{Filter, Resolved};
pub use packed::{PackedBlocks, PackedStream};
pub use width::{BitWidth, MAX_WIDTH, PackedInt};

pub type Result<T> = core::result::Result<T, BitpackError>;
