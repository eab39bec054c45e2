//! Typed read-only views over packed buffers.
//!
//! The views pair a buffer with the metadata needed to read it back: the
//! value count, the bit width and the minimum every value is stored against.
//! Both answer the same [`Filter`] queries with a bitset of matching rows.

use crate::block::{self, BLOCK_LEN};
use crate::cmp::fill;
use crate::filter::{Filter, Resolved};
use crate::{BitWidth, BitpackError, PackedInt, Result, stream};
use bitset::Bitset;
use bytemuck::PodCastError;

fn check_rows(bits: &Bitset, n: usize) -> Result<()> {
    if bits.len() < n {
        return Err(BitpackError::InsufficientRows {
            needed: n,
            found: bits.len(),
        });
    }
    Ok(())
}

/// Values in the streaming layout.
///
/// ```rust
/// use bitpack::{stream, Bitset, Filter, PackedStream};
///
/// let vals = [-5i32, 3, 0, -5, 10, 7];
/// let mut buf = [0u8; 16];
/// let (len, width) = stream::encode(&mut buf, &vals, -5, 10).unwrap();
///
/// let packed = PackedStream::new(&buf[..len], width, vals.len(), -5).unwrap();
/// assert_eq!(packed.get(4), Some(10));
///
/// let mut bits = Bitset::new(vals.len());
/// packed.filter(Filter::Greater(0), &mut bits).unwrap();
/// assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 4, 5]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PackedStream<'a, T: PackedInt> {
    buf: &'a [u8],
    width: BitWidth,
    len: usize,
    minv: T,
}

impl<'a, T: PackedInt> PackedStream<'a, T> {
    /// # Errors
    ///
    /// Returns [`BitpackError::InsufficientBytes`] when `buf` cannot hold `len` values.
    pub fn new(buf: &'a [u8], width: BitWidth, len: usize, minv: T) -> Result<Self> {
        let needed = width.stream_len(len);
        if buf.len() < needed {
            return Err(BitpackError::InsufficientBytes {
                needed,
                found: buf.len(),
            });
        }
        Ok(Self {
            buf: &buf[..needed],
            width,
            len,
            minv,
        })
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn minv(&self) -> T {
        self.minv
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.buf
    }

    pub fn get(&self, index: usize) -> Option<T> {
        (index < self.len)
            .then(|| T::from_bits(stream::get(self.buf, self.width, index)).wrapping_add(self.minv))
    }

    /// Unpacks up to `dst.len()` values, returning how many were written.
    pub fn decode(&self, dst: &mut [T]) -> usize {
        let n = dst.len().min(self.len);
        stream::decode(&mut dst[..n], self.buf, self.width, self.minv)
    }

    /// Sets the bit of every row whose value matches `filter`.
    ///
    /// `bits` must hold at least [`len`](Self::len) rows with the first `len` clear.
    ///
    /// # Errors
    ///
    /// Returns [`BitpackError::InsufficientRows`] when `bits` is too short.
    pub fn filter<'b>(&self, filter: Filter<T>, bits: &'b mut Bitset) -> Result<&'b mut Bitset> {
        check_rows(bits, self.len)?;
        log::trace!(
            "filter {:?} over {} rows at width {}",
            filter,
            self.len,
            self.width
        );
        Ok(match filter.resolve(self.minv, self.width) {
            Resolved::All => fill(bits, self.len),
            Resolved::Nothing => bits,
            Resolved::Kernel(op) => op.run(self.buf, self.width, self.len, bits),
        })
    }

    /// Reinterprets a one-bit stream as the bitset of rows holding `minv + 1`.
    ///
    /// # Errors
    ///
    /// Fails for any width other than 1.
    pub fn to_bitset(&self) -> Result<Bitset> {
        if self.width.get() != 1 {
            return Err(BitpackError::InvalidBitWidth {
                width: self.width.get(),
                max: 1,
            });
        }
        Ok(Bitset::from_bytes(self.buf, self.len)?)
    }
}

/// Values in the word layout, in whole 64-value blocks.
#[derive(Debug, Clone, Copy)]
pub struct PackedBlocks<'a, T: PackedInt> {
    words: &'a [u64],
    width: BitWidth,
    len: usize,
    minv: T,
}

impl<'a, T: PackedInt> PackedBlocks<'a, T> {
    /// # Errors
    ///
    /// Fails when the width is too wide for `T` or `words` cannot hold `len` values.
    pub fn new(words: &'a [u64], width: BitWidth, len: usize, minv: T) -> Result<Self> {
        let width = width.check::<T>()?;
        let needed = width.block_words(len);
        if words.len() < needed {
            return Err(BitpackError::InsufficientWords {
                needed,
                found: words.len(),
            });
        }
        Ok(Self {
            words: &words[..needed],
            width,
            len,
            minv,
        })
    }

    /// Views raw bytes as native-endian words without copying.
    ///
    /// # Errors
    ///
    /// Fails on an unaligned buffer, a length that is not a multiple of 8, or
    /// any error of [`PackedBlocks::new`].
    pub fn from_bytes(bytes: &'a [u8], width: BitWidth, len: usize, minv: T) -> Result<Self> {
        let words = bytemuck::try_cast_slice::<u8, u64>(bytes).map_err(|e| match e {
            PodCastError::OutputSliceWouldHaveSlop => BitpackError::InsufficientBytes {
                needed: bytes.len().next_multiple_of(8),
                found: bytes.len(),
            },
            _ => BitpackError::Misaligned,
        })?;
        Self::new(words, width, len, minv)
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn minv(&self) -> T {
        self.minv
    }

    pub fn words(&self) -> &'a [u64] {
        self.words
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.words)
    }

    pub fn num_blocks(&self) -> usize {
        self.len.div_ceil(BLOCK_LEN)
    }

    pub fn get(&self, index: usize) -> Option<T> {
        (index < self.len)
            .then(|| T::from_bits(block::get(self.words, self.width, index)).wrapping_add(self.minv))
    }

    /// Unpacks block `b` in full, padding included.
    pub fn decode_block(&self, b: usize, out: &mut [T; BLOCK_LEN]) {
        let w = self.width.get();
        block::bitread(out, &self.words[b * w..(b + 1) * w], w, self.minv);
    }

    /// Unpacks up to `dst.len()` values, returning how many were written.
    pub fn decode(&self, dst: &mut [T]) -> usize {
        let n = dst.len().min(self.len);
        block::decode_blocks(&mut dst[..n], self.words, self.width, self.minv)
    }

    /// Sets the bit of every row whose value matches `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`BitpackError::InsufficientRows`] when `bits` is too short.
    pub fn filter<'b>(&self, filter: Filter<T>, bits: &'b mut Bitset) -> Result<&'b mut Bitset> {
        check_rows(bits, self.len)?;
        log::trace!(
            "filter {:?} over {} blocks at width {}",
            filter,
            self.num_blocks(),
            self.width
        );
        let op = match filter.resolve(self.minv, self.width) {
            Resolved::All => return Ok(fill(bits, self.len)),
            Resolved::Nothing => return Ok(bits),
            Resolved::Kernel(op) => op,
        };

        let w = self.width.get();
        let res = bits.bytes_mut();
        for b in 0..self.num_blocks() {
            let rows = (self.len - b * BLOCK_LEN).min(BLOCK_LEN);
            let mut hits = op.run_block(&self.words[b * w..(b + 1) * w], self.width);
            if rows < BLOCK_LEN {
                hits &= (1u64 << rows) - 1;
            }
            for (j, byte) in res[b * 8..b * 8 + rows.div_ceil(8)].iter_mut().enumerate() {
                *byte |= ((hits >> (8 * j)) as u8).reverse_bits();
            }
        }
        bits.reset_count();
        Ok(bits)
    }
}
