//! AES (FIPS-197) on 128-bit element groups.
//!
//! The state is column-major: byte `4c + r` of the group is row `r` of
//! column `c`, so each 32-bit element holds one column.

use super::{Block, from_bytes, to_bytes};

/// Forward S-box.
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Inverse S-box.
const INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb,
    0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb,
    0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e,
    0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25,
    0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92,
    0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84,
    0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06,
    0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b,
    0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73,
    0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e,
    0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b,
    0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4,
    0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f,
    0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef,
    0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d,
];

/// Round constants for the 128-bit key schedule, indexed by round - 1.
pub const RCON: [u32; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Multiplication by x in GF(2^8).
const fn xtime(b: u8) -> u8 {
    (b << 1) ^ if b & 0x80 != 0 { 0x1b } else { 0 }
}

/// Multiplication in GF(2^8).
const fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut p = 0;
    while b != 0 {
        if b & 1 != 0 {
            p ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    p
}

fn sub_bytes(state: &mut [u8; 16], table: &[u8; 256]) {
    for b in state.iter_mut() {
        *b = table[usize::from(*b)];
    }
}

fn shift_rows(state: &mut [u8; 16], inverse: bool) {
    let old = *state;
    for r in 1..4 {
        for c in 0..4 {
            let src = if inverse { (c + 4 - r) % 4 } else { (c + r) % 4 };
            state[4 * c + r] = old[4 * src + r];
        }
    }
}

fn mix_columns(state: &mut [u8; 16], coeffs: [u8; 4]) {
    for col in state.chunks_exact_mut(4) {
        let a = [col[0], col[1], col[2], col[3]];
        for (r, out) in col.iter_mut().enumerate() {
            *out = (0..4).fold(0, |acc, k| acc ^ gf_mul(coeffs[(k + 4 - r) % 4], a[k]));
        }
    }
}

fn add_round_key(state: &mut [u8; 16], key: Block) {
    for (b, k) in state.iter_mut().zip(to_bytes(key)) {
        *b ^= k;
    }
}

/// One encryption round: SubBytes, ShiftRows, MixColumns (unless `last`), AddRoundKey.
pub fn encrypt_round(state: Block, key: Block, last: bool) -> Block {
    let mut s = to_bytes(state);
    sub_bytes(&mut s, &SBOX);
    shift_rows(&mut s, false);
    if !last {
        mix_columns(&mut s, [2, 3, 1, 1]);
    }
    add_round_key(&mut s, key);
    from_bytes(s)
}

/// One decryption round: InvShiftRows, InvSubBytes, AddRoundKey, InvMixColumns (unless `last`).
pub fn decrypt_round(state: Block, key: Block, last: bool) -> Block {
    let mut s = to_bytes(state);
    shift_rows(&mut s, true);
    sub_bytes(&mut s, &INV_SBOX);
    add_round_key(&mut s, key);
    if !last {
        mix_columns(&mut s, [14, 11, 13, 9]);
    }
    from_bytes(s)
}

/// Round-zero key addition.
pub fn add_key(state: Block, key: Block) -> Block {
    std::array::from_fn(|k| state[k] ^ key[k])
}

fn sub_word(w: u32) -> u32 {
    u32::from_le_bytes(w.to_le_bytes().map(|b| SBOX[usize::from(b)]))
}

const fn rot_word(w: u32) -> u32 {
    w.rotate_right(8)
}

/// AES-128 round key `rnd` from round key `rnd - 1`. Out-of-range rounds
/// (0 and 11..=15) have bit 3 inverted first.
pub fn expand_128(current: Block, rnd: u32) -> Block {
    let mut rnd = rnd & 0xf;
    if rnd == 0 || rnd > 10 {
        rnd ^= 0b1000;
    }
    let w0 = current[0] ^ sub_word(rot_word(current[3])) ^ RCON[(rnd - 1) as usize];
    let w1 = w0 ^ current[1];
    let w2 = w1 ^ current[2];
    let w3 = w2 ^ current[3];
    [w0, w1, w2, w3]
}

/// AES-256 round key `rnd` from round keys `rnd - 2` (`older`) and `rnd - 1`
/// (`current`). Out-of-range rounds (0, 1 and 15) have bit 3 inverted first.
pub fn expand_256(older: Block, current: Block, rnd: u32) -> Block {
    let mut rnd = rnd & 0xf;
    if rnd < 2 || rnd > 14 {
        rnd ^= 0b1000;
    }
    let t = if rnd % 2 == 0 {
        sub_word(rot_word(current[3])) ^ RCON[(rnd / 2 - 1) as usize]
    } else {
        sub_word(current[3])
    };
    let w0 = older[0] ^ t;
    let w1 = w0 ^ older[1];
    let w2 = w1 ^ older[2];
    let w3 = w2 ^ older[3];
    [w0, w1, w2, w3]
}
