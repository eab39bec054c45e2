//! Word layout: blocks of 64 values packed into `w` 64-bit words.
//!
//! Value `i` of a block occupies bits `i * w .. (i + 1) * w` of the block's
//! bit stream, where bit `k` of the stream is bit `k % 64` of word `k / 64`.
//! A value that crosses a word boundary keeps its low bits in the upper end
//! of one word and its high bits in the low end of the next. Values are
//! stored as offsets from a block minimum, so a block of `T` never needs more
//! than `T::BITS - 1` bits per value and a constant block needs no words.
//!
//! ```rust
//! use bitpack::block::{bitpack, bitread, BLOCK_LEN};
//!
//! let mut vals = [0u32; BLOCK_LEN];
//! for (i, v) in vals.iter_mut().enumerate() {
//!     *v = 1000 + (i as u32 * 7) % 100;
//! }
//!
//! let mut words = [0u64; 7];
//! bitpack(1000, &vals, &mut words, 7);
//!
//! let mut out = [0u32; BLOCK_LEN];
//! bitread(&mut out, &words, 7, 1000);
//! assert_eq!(vals, out);
//! ```

use crate::bit_ops::mask;
use crate::predicate::Predicate;
use crate::width::check_values;
use crate::{BitWidth, BitpackError, PackedInt, Result};
use seq_macro::seq;

/// Values per block.
pub const BLOCK_LEN: usize = 64;

#[inline(always)]
fn field<const W: usize>(words: &[u64; W], i: usize) -> u64 {
    let bit = i * W;
    let (word, shift) = (bit / 64, bit % 64);
    let mut d = words[word] >> shift;
    if shift + W > 64 {
        d |= words[word + 1] << (64 - shift);
    }
    d & mask(W)
}

/// Packs one block at a width known at compile time.
///
/// Every value must lie in `minv..=minv + 2^W - 1`.
#[inline]
pub fn pack<T: PackedInt, const W: usize>(minv: T, input: &[T; BLOCK_LEN], out: &mut [u64; W]) {
    out.fill(0);
    if W == 0 {
        return;
    }
    for (i, v) in input.iter().enumerate() {
        let d = v.delta(minv);
        debug_assert!(
            d <= mask(W),
            "value {:?} at {} does not fit in {} bits above {:?}",
            v,
            i,
            W,
            minv
        );
        let bit = i * W;
        let (word, shift) = (bit / 64, bit % 64);
        out[word] |= d << shift;
        if shift + W > 64 {
            out[word + 1] |= d >> (64 - shift);
        }
    }
}

/// Unpacks one block at a width known at compile time.
#[inline]
pub fn unpack<T: PackedInt, const W: usize>(input: &[u64; W], minv: T, out: &mut [T; BLOCK_LEN]) {
    if W == 0 {
        out.fill(minv);
        return;
    }
    for (i, o) in out.iter_mut().enumerate() {
        *o = T::from_bits(field(input, i)).wrapping_add(minv);
    }
}

/// Evaluates `P` over one packed block. Bit `i` of the result is row `i`.
///
/// Width 0 stores nothing, so every row equals offset 0 and the result is
/// all ones or all zeros.
#[inline]
pub fn compare<const W: usize, P: Predicate>(input: &[u64; W], operand: P::Operand) -> u64 {
    if W == 0 {
        return if P::test(0, operand) { u64::MAX } else { 0 };
    }
    let mut res = 0u64;
    for i in 0..BLOCK_LEN {
        res |= (P::test(field(input, i), operand) as u64) << i;
    }
    res
}

fn words<const W: usize>(input: &[u64]) -> &[u64; W] {
    match input.first_chunk::<W>() {
        Some(w) => w,
        None => panic!("block needs {} words, got {}", W, input.len()),
    }
}

fn words_mut<const W: usize>(out: &mut [u64]) -> &mut [u64; W] {
    let len = out.len();
    match out.first_chunk_mut::<W>() {
        Some(w) => w,
        None => panic!("block needs {} words, got {}", W, len),
    }
}

fn assert_width<T: PackedInt>(log2: usize) {
    assert!(
        log2 <= T::MAX_WIDTH,
        "bit width {} exceeds {} for {}-bit values",
        log2,
        T::MAX_WIDTH,
        T::BITS
    );
}

/// Packs one block into the first `log2` words of `out`.
///
/// # Panics
///
/// Panics if `log2 > T::BITS - 1` or `out` is shorter than `log2` words. With
/// the `validate` feature it also panics on values outside the width.
pub fn bitpack<T: PackedInt>(minv: T, input: &[T; BLOCK_LEN], out: &mut [u64], log2: usize) {
    assert_width::<T>(log2);
    #[cfg(feature = "validate")]
    if let Err(e) = check_values(input, minv, log2) {
        panic!("{}", e);
    }
    seq!(W in 0..64 {
        match log2 {
            #(
                W => pack::<T, W>(minv, input, words_mut::<W>(out)),
            )*
            _ => unreachable!(),
        }
    })
}

/// Unpacks one block from the first `log2` words of `input`.
///
/// # Panics
///
/// Panics if `log2 > T::BITS - 1` or `input` is shorter than `log2` words.
pub fn bitread<T: PackedInt>(out: &mut [T; BLOCK_LEN], input: &[u64], log2: usize, minv: T) {
    assert_width::<T>(log2);
    seq!(W in 0..64 {
        match log2 {
            #(
                W => unpack::<T, W>(words::<W>(input), minv, out),
            )*
            _ => unreachable!(),
        }
    })
}

/// Checked form of [`bitpack`].
///
/// # Errors
///
/// Fails on a width the domain cannot hold, a short output, or a value
/// outside `minv..=minv + 2^width - 1`. Nothing is written on failure.
pub fn try_bitpack<T: PackedInt>(
    minv: T,
    input: &[T; BLOCK_LEN],
    out: &mut [u64],
    width: BitWidth,
) -> Result<()> {
    let w = width.check::<T>()?.get();
    if out.len() < w {
        return Err(BitpackError::InsufficientWords {
            needed: w,
            found: out.len(),
        });
    }
    check_values(input, minv, w)?;
    bitpack(minv, input, out, w);
    Ok(())
}

/// Evaluates `P` over the block in the first `log2` words of `input`.
pub fn matches<P: Predicate>(input: &[u64], log2: usize, operand: P::Operand) -> u64 {
    assert!(log2 <= 63, "bit width {} exceeds 63", log2);
    seq!(W in 0..64 {
        match log2 {
            #(
                W => compare::<W, P>(words::<W>(input), operand),
            )*
            _ => unreachable!(),
        }
    })
}

/// Reads value `index` of a run of packed blocks without unpacking its block.
pub fn get(words: &[u64], width: BitWidth, index: usize) -> u64 {
    let w = width.get();
    if w == 0 {
        return 0;
    }
    let base = (index / BLOCK_LEN) * w * 64;
    let bit = base + (index % BLOCK_LEN) * w;
    let (word, shift) = (bit / 64, bit % 64);
    let mut d = words[word] >> shift;
    if shift + w > 64 {
        d |= words[word + 1] << (64 - shift);
    }
    d & width.mask()
}

/// Packs `vals` into consecutive blocks and returns the number of words written.
///
/// The final partial block is padded with `minv`.
///
/// # Panics
///
/// Panics if `out` holds fewer than `width.block_words(vals.len())` words.
pub fn encode_blocks<T: PackedInt>(vals: &[T], minv: T, width: BitWidth, out: &mut [u64]) -> usize {
    let w = width.get();
    let needed = width.block_words(vals.len());
    assert!(
        out.len() >= needed,
        "output holds {} words, {} needed",
        out.len(),
        needed
    );

    let mut chunks = vals.chunks_exact(BLOCK_LEN);
    let mut pos = 0;
    for chunk in chunks.by_ref() {
        let Some(block) = chunk.first_chunk::<BLOCK_LEN>() else {
            break;
        };
        bitpack(minv, block, &mut out[pos..pos + w], w);
        pos += w;
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut block = [minv; BLOCK_LEN];
        block[..rest.len()].copy_from_slice(rest);
        bitpack(minv, &block, &mut out[pos..pos + w], w);
        pos += w;
    }
    pos
}

/// Unpacks `dst.len()` values from consecutive blocks.
///
/// # Panics
///
/// Panics if `words` holds fewer than `width.block_words(dst.len())` words.
pub fn decode_blocks<T: PackedInt>(dst: &mut [T], words: &[u64], width: BitWidth, minv: T) -> usize {
    let w = width.get();
    let needed = width.block_words(dst.len());
    assert!(
        words.len() >= needed,
        "input holds {} words, {} needed",
        words.len(),
        needed
    );

    let n = dst.len();
    let mut chunks = dst.chunks_exact_mut(BLOCK_LEN);
    let mut pos = 0;
    for chunk in chunks.by_ref() {
        let Some(block) = chunk.first_chunk_mut::<BLOCK_LEN>() else {
            break;
        };
        bitread(block, &words[pos..pos + w], w, minv);
        pos += w;
    }

    let rest = chunks.into_remainder();
    if !rest.is_empty() {
        let mut block = [minv; BLOCK_LEN];
        bitread(&mut block, &words[pos..pos + w], w, minv);
        let k = rest.len();
        rest.copy_from_slice(&block[..k]);
    }
    n
}
