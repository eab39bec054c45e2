//! Byte-aligned widths: every value is a plain big-endian integer of `B` bytes.

use crate::bit_ops::{be_u16, be_u32, be_u64};
use crate::predicate::Predicate;
use bitset::Bitset;

#[inline(always)]
fn load<const B: usize>(v: &[u8]) -> u64 {
    match B {
        1 => v[0] as u64,
        2 => be_u16(v) as u64,
        4 => be_u32(v) as u64,
        _ => be_u64(v),
    }
}

pub(super) fn compare<'a, const B: usize, P: Predicate>(
    buf: &[u8],
    operand: P::Operand,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    let buf = &buf[..n * B];
    let res = bits.bytes_mut();
    let mut dirty = false;

    let mut groups = buf.chunks_exact(8 * B);
    for (k, group) in groups.by_ref().enumerate() {
        let mut b = 0u8;
        for (row, v) in group.chunks_exact(B).enumerate() {
            b |= (P::test(load::<B>(v), operand) as u8) << (7 - row);
        }
        if b != 0 {
            res[k] = b;
            dirty = true;
        }
    }
    if dirty {
        bits.reset_count();
    }

    let base = n & !7;
    for (row, v) in groups.remainder().chunks_exact(B).enumerate() {
        if P::test(load::<B>(v), operand) {
            bits.set(base + row);
        }
    }
    bits
}
