//! Bit widths and the integer domains that can be packed.

use crate::bit_ops::{mask, stream_len};
use crate::block::BLOCK_LEN;
use crate::{BitpackError, Result};
use core::fmt;

/// Widest field any layout packs. Width 64 is never produced.
pub const MAX_WIDTH: usize = 63;

/// Number of bits used per packed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BitWidth(u8);

impl BitWidth {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(MAX_WIDTH as u8);

    /// # Errors
    ///
    /// Returns [`BitpackError::InvalidBitWidth`] for widths above 63.
    pub const fn new(width: usize) -> Result<Self> {
        if width > MAX_WIDTH {
            Err(BitpackError::InvalidBitWidth {
                width,
                max: MAX_WIDTH,
            })
        } else {
            Ok(Self(width as u8))
        }
    }

    /// Width needed to store every value of `minv..=maxv` as an offset from `minv`.
    ///
    /// ```
    /// use bitpack::BitWidth;
    ///
    /// assert_eq!(BitWidth::for_range(10u32, 10).unwrap().get(), 0);
    /// assert_eq!(BitWidth::for_range(10u32, 17).unwrap().get(), 3);
    /// assert_eq!(BitWidth::for_range(-4i16, 3).unwrap().get(), 3);
    /// assert!(BitWidth::for_range(0u64, u64::MAX).is_err());
    /// ```
    pub fn for_range<T: PackedInt>(minv: T, maxv: T) -> Result<Self> {
        let span = maxv.delta(minv);
        Self::new(64 - span.leading_zeros() as usize)
    }

    #[inline(always)]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Largest offset representable at this width.
    #[inline(always)]
    pub const fn mask(self) -> u64 {
        mask(self.0 as usize)
    }

    /// Bytes used by `n` values in the streaming layout.
    #[inline]
    pub const fn stream_len(self, n: usize) -> usize {
        stream_len(n, self.0 as usize)
    }

    /// Words used by `n` values in the word layout, padded to whole blocks.
    #[inline]
    pub const fn block_words(self, n: usize) -> usize {
        n.div_ceil(BLOCK_LEN) * self.0 as usize
    }

    /// Rejects widths the word layout cannot hold for `T`.
    pub fn check<T: PackedInt>(self) -> Result<Self> {
        if self.get() > T::MAX_WIDTH {
            Err(BitpackError::InvalidBitWidth {
                width: self.get(),
                max: T::MAX_WIDTH,
            })
        } else {
            Ok(self)
        }
    }
}

impl TryFrom<usize> for BitWidth {
    type Error = BitpackError;

    fn try_from(width: usize) -> Result<Self> {
        Self::new(width)
    }
}

impl From<BitWidth> for usize {
    fn from(width: BitWidth) -> usize {
        width.get()
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer domain whose values are stored as unsigned offsets from a block minimum.
///
/// Signed types are sign-extended into `u64` before subtracting, so the offset
/// of any value above the minimum is its true distance in two's complement.
pub trait PackedInt: Copy + Ord + Default + fmt::Debug + 'static {
    const BITS: u32;
    /// Widest word-layout field for this domain.
    const MAX_WIDTH: usize = Self::BITS as usize - 1;

    fn to_bits(self) -> u64;
    fn from_bits(bits: u64) -> Self;
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Offset of `self` above `minv`, wrapping when `self < minv`.
    #[inline(always)]
    fn delta(self, minv: Self) -> u64 {
        self.to_bits().wrapping_sub(minv.to_bits())
    }
}

macro_rules! impl_packed_int {
    ($($t:ty),*) => {
        $(
            impl PackedInt for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline(always)]
                fn to_bits(self) -> u64 {
                    self as u64
                }

                #[inline(always)]
                fn from_bits(bits: u64) -> Self {
                    bits as $t
                }

                #[inline(always)]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }
            }
        )*
    };
}

impl_packed_int!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Finds the first value that is below `minv` or further than `width` bits above it.
pub(crate) fn check_values<T: PackedInt>(vals: &[T], minv: T, width: usize) -> Result<()> {
    let m = mask(width);
    match vals.iter().position(|v| *v < minv || v.delta(minv) > m) {
        Some(index) => Err(BitpackError::ValueOverflow { index, width }),
        None => Ok(()),
    }
}
