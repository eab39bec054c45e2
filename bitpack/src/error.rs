use bitset::BitsetError;
#[cfg(feature = "std")]
use thiserror::Error;

#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitpackError {
    #[cfg_attr(
        feature = "std",
        error("bit width {width} is out of range, maximum is {max}")
    )]
    InvalidBitWidth { width: usize, max: usize },

    #[cfg_attr(
        feature = "std",
        error("value at index {index} does not fit in {width} bits above the block minimum")
    )]
    ValueOverflow { index: usize, width: usize },

    #[cfg_attr(
        feature = "std",
        error("insufficient words: {needed} needed, {found} found")
    )]
    InsufficientWords { needed: usize, found: usize },

    #[cfg_attr(
        feature = "std",
        error("insufficient bytes: {needed} needed, {found} found")
    )]
    InsufficientBytes { needed: usize, found: usize },

    #[cfg_attr(
        feature = "std",
        error("bitset holds {found} rows, {needed} needed")
    )]
    InsufficientRows { needed: usize, found: usize },

    #[cfg_attr(feature = "std", error("word buffer is not 8-byte aligned"))]
    Misaligned,

    #[cfg_attr(feature = "std", error("bitset error: {0}"))]
    Bitset(#[cfg_attr(feature = "std", from)] BitsetError),
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for BitpackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BitpackError::InvalidBitWidth { width, max } => {
                write!(f, "bit width {} is out of range, maximum is {}", width, max)
            }
            BitpackError::ValueOverflow { index, width } => write!(
                f,
                "value at index {} does not fit in {} bits above the block minimum",
                index, width
            ),
            BitpackError::InsufficientWords { needed, found } => {
                write!(f, "insufficient words: {} needed, {} found", needed, found)
            }
            BitpackError::InsufficientBytes { needed, found } => {
                write!(f, "insufficient bytes: {} needed, {} found", needed, found)
            }
            BitpackError::InsufficientRows { needed, found } => {
                write!(f, "bitset holds {} rows, {} needed", found, needed)
            }
            BitpackError::Misaligned => write!(f, "word buffer is not 8-byte aligned"),
            BitpackError::Bitset(e) => write!(f, "bitset error: {}", e),
        }
    }
}

#[cfg(not(feature = "std"))]
impl From<BitsetError> for BitpackError {
    fn from(err: BitsetError) -> Self {
        BitpackError::Bitset(err)
    }
}
