#[cfg(feature = "std")]
use thiserror::Error;

/// Bitset errors
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitsetError {
    /// Source buffer holds fewer bytes than the requested bit length needs
    #[cfg_attr(
        feature = "std",
        error("insufficient bytes: {needed} needed, {found} found")
    )]
    InsufficientBytes { needed: usize, found: usize },

    /// Out-of-bounds access
    #[cfg_attr(feature = "std", error("index {index} out of bounds for length {len}"))]
    IndexOutOfBounds { index: usize, len: usize },
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for BitsetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BitsetError::InsufficientBytes { needed, found } => {
                write!(f, "insufficient bytes: {} needed, {} found", needed, found)
            }
            BitsetError::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for length {}", index, len)
            }
        }
    }
}
