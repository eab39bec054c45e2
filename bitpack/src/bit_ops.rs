//! Bit-level helpers shared by the packers and the kernels.

/// All-ones mask of the low `width` bits. Width 0 yields 0.
#[inline(always)]
pub const fn mask(width: usize) -> u64 {
    if width == 0 {
        0
    } else {
        u64::MAX >> (64 - width)
    }
}

/// Bytes occupied by `n` values of `width` bits in the streaming layout.
#[inline(always)]
pub const fn stream_len(n: usize, width: usize) -> usize {
    (n * width).div_ceil(8)
}

#[inline(always)]
pub fn be_u16(buf: &[u8]) -> u16 {
    u16::from_be_bytes([buf[0], buf[1]])
}

#[inline(always)]
pub fn be_u32(buf: &[u8]) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[..4]);
    u32::from_be_bytes(b)
}

#[inline(always)]
pub fn be_u64(buf: &[u8]) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[..8]);
    u64::from_be_bytes(b)
}

// slow but hopefully correct version, used for point reads and as the test oracle
pub fn write_msb(buf: &mut [u8], bit_offset: usize, width: usize, value: u64) {
    for i in 0..width {
        let bit = (value >> (width - 1 - i)) & 1;
        let pos = bit_offset + i;
        let m = 0x80u8 >> (pos % 8);

        if bit == 1 {
            buf[pos / 8] |= m;
        } else {
            buf[pos / 8] &= !m;
        }
    }
}

pub fn read_msb(buf: &[u8], bit_offset: usize, width: usize) -> u64 {
    let mut value = 0u64;

    for i in 0..width {
        let pos = bit_offset + i;
        let bit = (buf[pos / 8] >> (7 - pos % 8)) & 1;
        value = (value << 1) | bit as u64;
    }

    value
}
