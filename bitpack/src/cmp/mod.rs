//! Predicate kernels over the streaming layout.
//!
//! Each table holds one kernel per bit width `0..=63`. A kernel takes the
//! packed buffer, the comparand (or range), the row count and a zeroed bitset
//! of at least that many rows, and sets the bit of every matching row:
//!
//! ```rust
//! use bitpack::cmp::{EQUAL, LESS};
//! use bitpack::{stream, BitWidth, Bitset};
//!
//! let vals = [1u64, 5, 5, 2, 7, 0, 5, 3, 5];
//! let width = BitWidth::new(3).unwrap();
//! let mut buf = vec![0u8; width.stream_len(vals.len())];
//! stream::encode_with(&mut buf, &vals, 0, width);
//!
//! let mut bits = Bitset::new(vals.len());
//! EQUAL[3](&buf, 5, vals.len(), &mut bits);
//! assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 2, 6, 8]);
//!
//! let mut bits = Bitset::new(vals.len());
//! LESS[3](&buf, 2, vals.len(), &mut bits);
//! assert_eq!(bits.iter().collect::<Vec<_>>(), vec![0, 5]);
//! ```
//!
//! Comparands are full 64-bit values. A comparand beyond the width simply
//! matches the rows it would match if the values were unpacked.

mod fixed;
mod kernel;
pub mod reference;

use crate::block;
use crate::predicate::{
    Between, Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual, Predicate,
};
use crate::{BitWidth, MAX_WIDTH};
use bitset::Bitset;
use seq_macro::seq;

/// Kernel comparing every value against one operand.
pub type CmpFn = for<'a> fn(&[u8], u64, usize, &'a mut Bitset) -> &'a mut Bitset;

/// Kernel testing every value against an inclusive range.
pub type CmpFn2 = for<'a> fn(&[u8], u64, u64, usize, &'a mut Bitset) -> &'a mut Bitset;

/// Sets rows `0..n`.
pub(crate) fn fill(bits: &mut Bitset, n: usize) -> &mut Bitset {
    if n == bits.len() {
        bits.one()
    } else {
        bits.set_range(0, n);
        bits
    }
}

/// Runs `P` over `n` values packed at `W` bits.
///
/// # Panics
///
/// Panics if `W > 63`, the bitset holds fewer than `n` rows, or `buf` is
/// shorter than `ceil(n * W / 8)` bytes.
#[inline]
pub fn compare<'a, const W: usize, P: Predicate>(
    buf: &[u8],
    operand: P::Operand,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    assert!(W <= MAX_WIDTH, "bit width {} exceeds {}", W, MAX_WIDTH);
    assert!(
        n <= bits.len(),
        "{} rows exceed bitset length {}",
        n,
        bits.len()
    );
    match W {
        0 => kernel::constant::<P>(operand, n, bits),
        1 => kernel::single_bit::<P>(buf, operand, n, bits),
        8 => fixed::compare::<1, P>(buf, operand, n, bits),
        16 => fixed::compare::<2, P>(buf, operand, n, bits),
        32 => fixed::compare::<4, P>(buf, operand, n, bits),
        _ => kernel::compare::<W, P>(buf, operand, n, bits),
    }
}

fn equal<'a, const W: usize>(buf: &[u8], val: u64, n: usize, bits: &'a mut Bitset) -> &'a mut Bitset {
    compare::<W, Equal>(buf, val, n, bits)
}

fn not_equal<'a, const W: usize>(
    buf: &[u8],
    val: u64,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    compare::<W, NotEqual>(buf, val, n, bits)
}

fn less<'a, const W: usize>(buf: &[u8], val: u64, n: usize, bits: &'a mut Bitset) -> &'a mut Bitset {
    compare::<W, Less>(buf, val, n, bits)
}

fn less_equal<'a, const W: usize>(
    buf: &[u8],
    val: u64,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    compare::<W, LessEqual>(buf, val, n, bits)
}

fn greater<'a, const W: usize>(
    buf: &[u8],
    val: u64,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    compare::<W, Greater>(buf, val, n, bits)
}

fn greater_equal<'a, const W: usize>(
    buf: &[u8],
    val: u64,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    compare::<W, GreaterEqual>(buf, val, n, bits)
}

fn between<'a, const W: usize>(
    buf: &[u8],
    lo: u64,
    hi: u64,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    compare::<W, Between>(buf, (lo, hi), n, bits)
}

macro_rules! width_table {
    ($kernel:ident) => {
        seq!(W in 0..64 {
            [#($kernel::<W>,)*]
        })
    };
}

/// `value == val`, indexed by bit width.
pub static EQUAL: [CmpFn; 64] = width_table!(equal);
/// `value != val`, indexed by bit width.
pub static NOT_EQUAL: [CmpFn; 64] = width_table!(not_equal);
/// `value < val`, indexed by bit width.
pub static LESS: [CmpFn; 64] = width_table!(less);
/// `value <= val`, indexed by bit width.
pub static LESS_EQUAL: [CmpFn; 64] = width_table!(less_equal);
/// `value > val`, indexed by bit width.
pub static GREATER: [CmpFn; 64] = width_table!(greater);
/// `value >= val`, indexed by bit width.
pub static GREATER_EQUAL: [CmpFn; 64] = width_table!(greater_equal);
/// `lo <= value <= hi`, indexed by bit width.
pub static BETWEEN: [CmpFn2; 64] = width_table!(between);

/// A comparison on packed offsets, ready to run at any width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal(u64),
    NotEqual(u64),
    Less(u64),
    LessEqual(u64),
    Greater(u64),
    GreaterEqual(u64),
    Between(u64, u64),
}

impl CompareOp {
    /// Whether a single unpacked offset matches.
    pub fn test(self, value: u64) -> bool {
        match self {
            CompareOp::Equal(v) => Equal::test(value, v),
            CompareOp::NotEqual(v) => NotEqual::test(value, v),
            CompareOp::Less(v) => Less::test(value, v),
            CompareOp::LessEqual(v) => LessEqual::test(value, v),
            CompareOp::Greater(v) => Greater::test(value, v),
            CompareOp::GreaterEqual(v) => GreaterEqual::test(value, v),
            CompareOp::Between(lo, hi) => Between::test(value, (lo, hi)),
        }
    }

    /// Runs the table kernel for `width` over a streaming buffer.
    pub fn run<'a>(self, buf: &[u8], width: BitWidth, n: usize, bits: &'a mut Bitset) -> &'a mut Bitset {
        let w = width.get();
        match self {
            CompareOp::Equal(v) => EQUAL[w](buf, v, n, bits),
            CompareOp::NotEqual(v) => NOT_EQUAL[w](buf, v, n, bits),
            CompareOp::Less(v) => LESS[w](buf, v, n, bits),
            CompareOp::LessEqual(v) => LESS_EQUAL[w](buf, v, n, bits),
            CompareOp::Greater(v) => GREATER[w](buf, v, n, bits),
            CompareOp::GreaterEqual(v) => GREATER_EQUAL[w](buf, v, n, bits),
            CompareOp::Between(lo, hi) => BETWEEN[w](buf, lo, hi, n, bits),
        }
    }

    /// Runs the bitwise oracle over a streaming buffer.
    pub fn run_reference<'a>(
        self,
        buf: &[u8],
        width: BitWidth,
        n: usize,
        bits: &'a mut Bitset,
    ) -> &'a mut Bitset {
        let w = width.get();
        match self {
            CompareOp::Equal(v) => reference::compare::<Equal>(buf, w, v, n, bits),
            CompareOp::NotEqual(v) => reference::compare::<NotEqual>(buf, w, v, n, bits),
            CompareOp::Less(v) => reference::compare::<Less>(buf, w, v, n, bits),
            CompareOp::LessEqual(v) => reference::compare::<LessEqual>(buf, w, v, n, bits),
            CompareOp::Greater(v) => reference::compare::<Greater>(buf, w, v, n, bits),
            CompareOp::GreaterEqual(v) => reference::compare::<GreaterEqual>(buf, w, v, n, bits),
            CompareOp::Between(lo, hi) => reference::compare::<Between>(buf, w, (lo, hi), n, bits),
        }
    }

    /// Evaluates over one word-layout block. Bit `i` of the result is row `i`.
    pub fn run_block(self, words: &[u64], width: BitWidth) -> u64 {
        let w = width.get();
        match self {
            CompareOp::Equal(v) => block::matches::<Equal>(words, w, v),
            CompareOp::NotEqual(v) => block::matches::<NotEqual>(words, w, v),
            CompareOp::Less(v) => block::matches::<Less>(words, w, v),
            CompareOp::LessEqual(v) => block::matches::<LessEqual>(words, w, v),
            CompareOp::Greater(v) => block::matches::<Greater>(words, w, v),
            CompareOp::GreaterEqual(v) => block::matches::<GreaterEqual>(words, w, v),
            CompareOp::Between(lo, hi) => block::matches::<Between>(words, w, (lo, hi)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SIZES: [usize; 8] = [1, 7, 8, 15, 16, 23, 128, 1025];

    fn random_stream(rng: &mut StdRng, w: usize, n: usize) -> (Vec<u64>, Vec<u8>) {
        let width = BitWidth::new(w).unwrap();
        let vals: Vec<u64> = (0..n).map(|_| rng.random::<u64>() & width.mask()).collect();
        let mut buf = vec![0u8; width.stream_len(n)];
        stream::encode_with(&mut buf, &vals, 0, width);
        (vals, buf)
    }

    fn ops_for(vals: &[u64], w: usize) -> Vec<CompareOp> {
        let max = BitWidth::new(w).unwrap().mask();
        let mid = vals[vals.len() / 2];
        let mut ops = Vec::new();
        for v in [0, mid, max, max.wrapping_add(1), u64::MAX] {
            ops.extend([
                CompareOp::Equal(v),
                CompareOp::NotEqual(v),
                CompareOp::Less(v),
                CompareOp::LessEqual(v),
                CompareOp::Greater(v),
                CompareOp::GreaterEqual(v),
            ]);
        }
        ops.extend([
            CompareOp::Between(0, mid),
            CompareOp::Between(mid, max),
            CompareOp::Between(mid / 2, mid),
            CompareOp::Between(mid, mid / 2),
            CompareOp::Between(max.wrapping_add(1), u64::MAX),
        ]);
        ops
    }

    #[test]
    fn tables_match_reference() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for w in 0..=MAX_WIDTH {
            let width = BitWidth::new(w).unwrap();
            for n in SIZES {
                let (vals, buf) = random_stream(&mut rng, w, n);
                for op in ops_for(&vals, w) {
                    let mut fast = Bitset::new(n);
                    let mut slow = Bitset::new(n);
                    op.run(&buf, width, n, &mut fast);
                    op.run_reference(&buf, width, n, &mut slow);
                    assert_eq!(fast, slow, "width {} n {} {:?}", w, n, op);
                    let expected = vals.iter().filter(|v| op.test(**v)).count();
                    assert_eq!(fast.count(), expected, "width {} n {} {:?}", w, n, op);
                }
            }
        }
    }

    #[test]
    fn longer_bitset_keeps_extra_rows() {
        let mut rng = StdRng::seed_from_u64(7);
        for w in [0, 1, 5, 8, 13, 16, 32, 47] {
            let (_, buf) = random_stream(&mut rng, w, 13);
            let mut bits = Bitset::new(40);
            bits.set(39);
            NOT_EQUAL[w](&buf, u64::MAX, 13, &mut bits);
            assert_eq!(bits.count(), 14, "width {}", w);
            assert!(bits.is_set(39));
            assert!(!bits.is_set(13));
        }
    }

    #[test]
    fn empty_input_leaves_bitset_alone() {
        for w in 0..=MAX_WIDTH {
            let mut bits = Bitset::new(0);
            EQUAL[w](&[], 0, 0, &mut bits);
            BETWEEN[w](&[], 0, u64::MAX, 0, &mut bits);
            assert_eq!(bits.count(), 0);
        }
    }

    #[test]
    fn single_bit_polarities() {
        let buf = [0b1011_0000u8];
        let mut bits = Bitset::new(5);
        EQUAL[1](&buf, 1, 5, &mut bits);
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![0, 2, 3]);

        let mut bits = Bitset::new(5);
        EQUAL[1](&buf, 0, 5, &mut bits);
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 4]);

        let mut bits = Bitset::new(5);
        LESS_EQUAL[1](&buf, 1, 5, &mut bits);
        assert_eq!(bits.count(), 5);

        let mut bits = Bitset::new(5);
        GREATER[1](&buf, 1, 5, &mut bits);
        assert_eq!(bits.count(), 0);
    }

    #[test]
    #[should_panic(expected = "rows exceed bitset length")]
    fn short_bitset_panics() {
        let buf = [0u8; 8];
        let mut bits = Bitset::new(4);
        EQUAL[7](&buf, 0, 8, &mut bits);
    }
}
