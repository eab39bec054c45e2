//! Fixed-length bitset stored as 64-bit words and exposed as bytes.
//!
//! # Examples
//!
//! ```rust
//! use bitset::Bitset;
//!
//! // A one-bit packed buffer is already a bitset in row order.
//! let packed = [0b1011_0000u8];
//! let mut bits = Bitset::new(5);
//! bits.set_from_bytes(&packed, 5, false);
//! assert_eq!(bits.iter().collect::<Vec<_>>(), vec![0, 2, 3]);
//!
//! // Flip the polarity of those rows.
//! bits.neg();
//! assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 4]);
//! ```

use crate::{BitsetError, Result};
use alloc::vec;
use alloc::vec::Vec;

/// Mask of row `i` inside its byte.
#[inline(always)]
const fn row_mask(i: usize) -> u8 {
    0x80 >> (i & 7)
}

/// Mask covering the first `r` rows of a byte, `r` in `1..8`.
#[inline(always)]
const fn head_mask(r: usize) -> u8 {
    !(0xFF >> r)
}

#[derive(Debug, Clone)]
pub struct Bitset {
    words: Vec<u64>,
    len: usize,
    cnt: Option<usize>,
}

impl Bitset {
    /// Creates a zeroed bitset holding `len` rows.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
            cnt: Some(0),
        }
    }

    /// Creates a bitset from the first `len` bits of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`BitsetError::InsufficientBytes`] when `buf` is shorter than
    /// `ceil(len / 8)` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitset::Bitset;
    ///
    /// let bits = Bitset::from_bytes(&[0xFF, 0xFF], 12).unwrap();
    /// assert_eq!(bits.count(), 12);
    /// assert!(Bitset::from_bytes(&[0xFF], 12).is_err());
    /// ```
    pub fn from_bytes(buf: &[u8], len: usize) -> Result<Self> {
        let needed = len.div_ceil(8);
        if buf.len() < needed {
            return Err(BitsetError::InsufficientBytes {
                needed,
                found: buf.len(),
            });
        }
        let mut bits = Self::new(len);
        bits.set_from_bytes(buf, len, false);
        Ok(bits)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw byte view, `ceil(len / 8)` bytes long.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        let l = self.len.div_ceil(8);
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..l]
    }

    /// Mutable raw byte view.
    ///
    /// Writers must leave bits at positions `>= len` clear and call
    /// [`Bitset::reset_count`] after changing anything.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let l = self.len.div_ceil(8);
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..l]
    }

    /// Sets row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`.
    #[inline]
    pub fn set(&mut self, i: usize) {
        assert!(i < self.len, "index {} out of bounds for length {}", i, self.len);
        let byte = &mut self.bytes_mut()[i >> 3];
        let was_set = *byte & row_mask(i) != 0;
        *byte |= row_mask(i);
        if !was_set {
            self.cnt = self.cnt.map(|c| c + 1);
        }
    }

    /// Sets row `i`, reporting out-of-range rows as an error.
    pub fn try_set(&mut self, i: usize) -> Result<()> {
        if i >= self.len {
            return Err(BitsetError::IndexOutOfBounds {
                index: i,
                len: self.len,
            });
        }
        self.set(i);
        Ok(())
    }

    /// Clears row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`.
    #[inline]
    pub fn unset(&mut self, i: usize) {
        assert!(i < self.len, "index {} out of bounds for length {}", i, self.len);
        let byte = &mut self.bytes_mut()[i >> 3];
        let was_set = *byte & row_mask(i) != 0;
        *byte &= !row_mask(i);
        if was_set {
            self.cnt = self.cnt.map(|c| c - 1);
        }
    }

    /// Returns whether row `i` is set. Rows past the end are never set.
    #[inline]
    pub fn is_set(&self, i: usize) -> bool {
        i < self.len && self.bytes()[i >> 3] & row_mask(i) != 0
    }

    /// Sets rows `start..end`.
    pub fn set_range(&mut self, start: usize, end: usize) {
        assert!(
            start <= end && end <= self.len,
            "range {}..{} out of bounds for length {}",
            start,
            end,
            self.len
        );
        let bytes = self.bytes_mut();
        let mut i = start;
        while i < end && i & 7 != 0 {
            bytes[i >> 3] |= row_mask(i);
            i += 1;
        }
        let full_end = end & !7;
        if i < full_end {
            bytes[i >> 3..full_end >> 3].fill(0xFF);
            i = full_end;
        }
        while i < end {
            bytes[i >> 3] |= row_mask(i);
            i += 1;
        }
        self.cnt = None;
    }

    /// Copies the first `n` bits of `buf` into rows `0..n`.
    ///
    /// With `reverse` every source byte is bit-reversed first, which adapts
    /// buffers that keep their first row in the least significant bit.
    /// Rows `n..len` keep their previous state.
    ///
    /// # Panics
    ///
    /// Panics if `n > len` or `buf` holds fewer than `ceil(n / 8)` bytes.
    pub fn set_from_bytes(&mut self, buf: &[u8], n: usize, reverse: bool) {
        assert!(n <= self.len, "{} rows exceed bitset length {}", n, self.len);
        let full = n >> 3;
        let rem = n & 7;
        let src = &buf[..n.div_ceil(8)];
        let dst = self.bytes_mut();

        if reverse {
            for (d, s) in dst[..full].iter_mut().zip(src) {
                *d = s.reverse_bits();
            }
        } else {
            dst[..full].copy_from_slice(&src[..full]);
        }

        if rem > 0 {
            let s = if reverse {
                src[full].reverse_bits()
            } else {
                src[full]
            };
            let m = head_mask(rem);
            dst[full] = (dst[full] & !m) | (s & m);
        }
        self.cnt = None;
    }

    /// Inverts every row.
    pub fn neg(&mut self) -> &mut Self {
        for w in self.words.iter_mut() {
            *w = !*w;
        }
        self.clear_tail();
        self.cnt = self.cnt.map(|c| self.len - c);
        self
    }

    /// Inverts rows `0..n`, leaving the rest untouched.
    pub fn neg_prefix(&mut self, n: usize) -> &mut Self {
        if n == self.len {
            return self.neg();
        }
        assert!(n <= self.len, "{} rows exceed bitset length {}", n, self.len);
        let full = n >> 3;
        let rem = n & 7;
        let bytes = self.bytes_mut();
        for b in bytes[..full].iter_mut() {
            *b = !*b;
        }
        if rem > 0 {
            bytes[full] ^= head_mask(rem);
        }
        self.cnt = None;
        self
    }

    /// Sets every row.
    pub fn one(&mut self) -> &mut Self {
        self.words.fill(u64::MAX);
        self.clear_tail();
        self.cnt = Some(self.len);
        self
    }

    /// Clears every row.
    pub fn zero(&mut self) -> &mut Self {
        self.words.fill(0);
        self.cnt = Some(0);
        self
    }

    /// Forgets the cached population count.
    #[inline]
    pub fn reset_count(&mut self) {
        self.cnt = None;
    }

    /// Number of set rows, computed on demand when no count is cached.
    pub fn count(&self) -> usize {
        self.cnt.unwrap_or_else(|| self.popcount())
    }

    /// Computes the population count and caches it.
    pub fn recount(&mut self) -> usize {
        let c = self.popcount();
        self.cnt = Some(c);
        c
    }

    /// Iterates over the indices of set rows in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bytes: self.bytes(),
            next: 0,
            base: 0,
            cur: 0,
        }
    }

    /// One `bool` per row, mostly useful in tests and debug output.
    pub fn to_vec_bool(&self) -> Vec<bool> {
        (0..self.len).map(|i| self.is_set(i)).collect()
    }

    fn popcount(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn clear_tail(&mut self) {
        let l = self.len.div_ceil(8);
        let bytes = bytemuck::cast_slice_mut::<u64, u8>(&mut self.words);
        bytes[l..].fill(0);
        let rem = self.len & 7;
        if rem != 0 {
            bytes[l - 1] &= head_mask(rem);
        }
    }
}

impl Default for Bitset {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PartialEq for Bitset {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.words == other.words
    }
}

impl Eq for Bitset {}

pub struct Iter<'a> {
    bytes: &'a [u8],
    next: usize,
    base: usize,
    cur: u8,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cur == 0 {
            let b = *self.bytes.get(self.next)?;
            self.base = self.next * 8;
            self.next += 1;
            self.cur = b;
        }
        let lz = self.cur.leading_zeros() as usize;
        self.cur &= !(0x80u8 >> lz);
        Some(self.base + lz)
    }
}

impl<'a> IntoIterator for &'a Bitset {
    type Item = usize;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
