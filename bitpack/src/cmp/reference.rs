//! Decode-then-compare oracle for the streaming kernels.
//!
//! Reads one value at a time with the bitwise reader. Far slower than the
//! table kernels but simple enough to be obviously right.

use crate::bit_ops::read_msb;
use crate::predicate::Predicate;
use bitset::Bitset;

pub fn compare<'a, P: Predicate>(
    buf: &[u8],
    width: usize,
    operand: P::Operand,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    for i in 0..n {
        if P::test(read_msb(buf, i * width, width), operand) {
            bits.set(i);
        }
    }
    bits
}
