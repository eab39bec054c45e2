//! Generic streaming kernel for any width in `2..=63`.
//!
//! Eight consecutive values always span exactly `W` bytes, so the buffer is
//! scanned one `W`-byte group at a time and each group yields one bitset byte.
//! Where each row's field sits inside a group depends only on `W` and is
//! computed at compile time.

use super::fill;
use crate::bit_ops::{be_u16, be_u32, be_u64, mask, stream_len};
use crate::predicate::Predicate;
use bitset::Bitset;

/// Load window for one row of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Field {
    /// First byte of the window inside the group.
    start: usize,
    /// Window size: 1, 2, 4 or 8 bytes, or 9 for an 8-byte load plus a spill byte.
    load: usize,
    /// Right shift for 1..8 byte windows, left shift of the 8-byte part for 9.
    shift: u32,
}

impl Field {
    const NONE: Self = Self {
        start: 0,
        load: 0,
        shift: 0,
    };
}

const fn fields(w: usize) -> [Field; 8] {
    let mut out = [Field::NONE; 8];
    if w == 0 {
        return out;
    }
    let mut row = 0;
    while row < 8 {
        let first = row * w;
        let last = first + w;
        let lo = first / 8;
        let end = last.div_ceil(8);
        let span = end - lo;

        let f = if span > 8 {
            Field {
                start: lo,
                load: 9,
                shift: (last - lo * 8 - 64) as u32,
            }
        } else {
            let load = if span == 1 {
                1
            } else if span == 2 {
                2
            } else if span <= 4 {
                4
            } else {
                8
            };
            // right-align the window on the field, clamped to the group start
            let start = if end >= load { end - load } else { 0 };
            Field {
                start,
                load,
                shift: ((start + load) * 8 - last) as u32,
            }
        };
        assert!(f.start + f.load <= w);
        out[row] = f;
        row += 1;
    }
    out
}

struct Group<const W: usize>;

impl<const W: usize> Group<W> {
    const FIELDS: [Field; 8] = fields(W);
    const MASK: u64 = mask(W);
}

#[inline(always)]
fn extract<const W: usize>(group: &[u8; W], f: Field) -> u64 {
    let s = f.start;
    let raw = match f.load {
        1 => (group[s] >> f.shift) as u64,
        2 => (be_u16(&group[s..]) >> f.shift) as u64,
        4 => (be_u32(&group[s..]) >> f.shift) as u64,
        8 => be_u64(&group[s..]) >> f.shift,
        _ => (be_u64(&group[s..]) << f.shift) | (group[s + 8] >> (8 - f.shift)) as u64,
    };
    raw & Group::<W>::MASK
}

/// Scans `n` rows of a `W`-bit stream, one output byte per 8 rows.
///
/// Group bytes are stored only when some row matched, so `bits` must arrive
/// with rows `0..n` clear.
pub(super) fn compare<'a, const W: usize, P: Predicate>(
    buf: &[u8],
    operand: P::Operand,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    let full = n / 8;
    let buf = &buf[..stream_len(n, W)];
    let (body, tail) = buf.split_at(full * W);

    let res = bits.bytes_mut();
    let mut dirty = false;
    for (k, chunk) in body.chunks_exact(W).enumerate() {
        let Some(group) = chunk.first_chunk::<W>() else {
            break;
        };
        let mut b = 0u8;
        for (row, f) in Group::<W>::FIELDS.iter().enumerate() {
            b |= (P::test(extract(group, *f), operand) as u8) << (7 - row);
        }
        if b != 0 {
            res[k] = b;
            dirty = true;
        }
    }
    if dirty {
        bits.reset_count();
    }

    let rem = n % 8;
    if rem > 0 {
        let mut pad = [0u8; W];
        pad[..tail.len()].copy_from_slice(tail);
        let base = full * 8;
        for (row, f) in Group::<W>::FIELDS[..rem].iter().enumerate() {
            if P::test(extract(&pad, *f), operand) {
                bits.set(base + row);
            }
        }
    }
    bits
}

/// Width 0: every row holds offset 0.
pub(super) fn constant<'a, P: Predicate>(
    operand: P::Operand,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    if P::test(0, operand) {
        fill(bits, n)
    } else {
        bits
    }
}

/// Width 1: the packed buffer already is a bitset of the rows holding 1.
pub(super) fn single_bit<'a, P: Predicate>(
    buf: &[u8],
    operand: P::Operand,
    n: usize,
    bits: &'a mut Bitset,
) -> &'a mut Bitset {
    match (P::test(0, operand), P::test(1, operand)) {
        (false, false) => bits,
        (true, true) => fill(bits, n),
        (false, true) => {
            bits.set_from_bytes(buf, n, false);
            bits
        }
        (true, false) => {
            bits.set_from_bytes(buf, n, false);
            bits.neg_prefix(n)
        }
    }
}
