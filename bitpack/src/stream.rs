//! Streaming layout: offsets written back to back, most significant bit first.
//!
//! Value `i` occupies stream bits `i * w .. (i + 1) * w`, where stream bit `k`
//! is bit `7 - k % 8` of byte `k / 8`. A buffer of `n` values is exactly
//! `ceil(n * w / 8)` bytes long and every 8 values fill exactly `w` bytes,
//! which is the unit the predicate kernels scan.

use crate::bit_ops::read_msb;
#[cfg(feature = "validate")]
use crate::width::check_values;
use crate::{BitWidth, PackedInt, Result};

/// Packs `vals` as offsets from `minv`, using the narrowest width that covers `maxv`.
///
/// Returns the number of bytes written and the width used.
///
/// # Errors
///
/// Fails when `maxv - minv` needs all 64 bits.
///
/// # Panics
///
/// Panics if `buf` is too short for the encoded stream.
///
/// ```
/// use bitpack::stream;
///
/// let vals = [10u32, 11, 17, 12];
/// let mut buf = [0u8; 16];
/// let (len, width) = stream::encode(&mut buf, &vals, 10, 17).unwrap();
/// assert_eq!((len, width.get()), (2, 3));
/// assert_eq!(&buf[..len], &[0b000_001_11, 0b1_010_0000]);
/// ```
pub fn encode<T: PackedInt>(
    buf: &mut [u8],
    vals: &[T],
    minv: T,
    maxv: T,
) -> Result<(usize, BitWidth)> {
    let width = BitWidth::for_range(minv, maxv)?;
    Ok((encode_with(buf, vals, minv, width), width))
}

/// Packs `vals` at a caller-chosen width. Bits above the width are dropped.
///
/// # Panics
///
/// Panics if `buf` is shorter than `width.stream_len(vals.len())`. With the
/// `validate` feature it also panics on values outside the width.
pub fn encode_with<T: PackedInt>(buf: &mut [u8], vals: &[T], minv: T, width: BitWidth) -> usize {
    let w = width.get();
    let len = width.stream_len(vals.len());
    let out = &mut buf[..len];
    if w == 0 {
        return 0;
    }
    #[cfg(feature = "validate")]
    if let Err(e) = check_values(vals, minv, w) {
        panic!("{}", e);
    }

    let m = width.mask();
    let mut acc = 0u128;
    let mut nbits = 0;
    let mut pos = 0;
    for v in vals {
        acc = (acc << w) | (v.delta(minv) & m) as u128;
        nbits += w;
        while nbits >= 8 {
            nbits -= 8;
            out[pos] = (acc >> nbits) as u8;
            pos += 1;
        }
    }
    if nbits > 0 {
        out[pos] = (acc << (8 - nbits)) as u8;
        pos += 1;
    }
    pos
}

/// Unpacks `dst.len()` values from `buf` and returns how many were written.
///
/// # Panics
///
/// Panics if `buf` is shorter than `width.stream_len(dst.len())`.
pub fn decode<T: PackedInt>(dst: &mut [T], buf: &[u8], width: BitWidth, minv: T) -> usize {
    let w = width.get();
    if w == 0 {
        dst.fill(minv);
        return dst.len();
    }

    let src = &buf[..width.stream_len(dst.len())];
    let m = width.mask();
    let mut acc = 0u128;
    let mut nbits = 0;
    let mut pos = 0;
    for d in dst.iter_mut() {
        while nbits < w {
            acc = (acc << 8) | src[pos] as u128;
            pos += 1;
            nbits += 8;
        }
        nbits -= w;
        *d = T::from_bits((acc >> nbits) as u64 & m).wrapping_add(minv);
    }
    dst.len()
}

/// Reads the offset stored at `index`.
#[inline]
pub fn get(buf: &[u8], width: BitWidth, index: usize) -> u64 {
    let w = width.get();
    read_msb(buf, index * w, w)
}
