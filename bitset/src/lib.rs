//! # bitset
//!
//! Row-match bitsets written by the bit-packed predicate kernels.
//!
//! Row `i` lives in byte `i / 8` at mask `0x80 >> (i % 8)`, so the first row of
//! every byte is its most significant bit. This is the same order in which a
//! one-bit-wide packed stream stores its values, which lets a packed buffer be
//! copied straight into a bitset.
//!
//! ```rust
//! use bitset::Bitset;
//!
//! let mut bits = Bitset::new(10);
//! bits.set(0);
//! bits.set(9);
//! assert_eq!(bits.bytes(), &[0b1000_0000, 0b0100_0000]);
//! assert_eq!(bits.count(), 2);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bitset;
pub mod error;

pub use bitset::Bitset;
pub use error::BitsetError;

pub type Result<T> = core::result::Result<T, BitsetError>;
