//! GHASH multiply-accumulate (NIST SP 800-38D).
//!
//! GCM numbers bits from the most significant bit of the first byte; reversing
//! the bits of each byte turns that into plain little-endian bit order.

/// Reverses the bits within each byte.
fn brev8(value: u128) -> u128 {
    u128::from_le_bytes(value.to_le_bytes().map(u8::reverse_bits))
}

/// `(acc ^ data) * h` in GF(2^128).
pub fn multiply_accumulate(acc: u128, data: u128, h: u128) -> u128 {
    multiply(acc ^ data, h)
}

/// `a * h` in GF(2^128) with the GCM polynomial.
pub fn multiply(a: u128, h: u128) -> u128 {
    let s = brev8(a);
    let mut h = brev8(h);
    let mut z = 0u128;
    for bit in 0..128 {
        if (s >> bit) & 1 != 0 {
            z ^= h;
        }
        let reduce = h >> 127 != 0;
        h <<= 1;
        if reduce {
            h ^= 0x87;
        }
    }
    brev8(z)
}
