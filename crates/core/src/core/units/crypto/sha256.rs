//! SHA-256 (FIPS 180-4) building blocks.
//!
//! Working variables travel in the `{a, b, e, f}` / `{c, d, g, h}` split the
//! vector compression instructions use.

const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// Initial hash value.
pub const H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Round constant `i`.
pub const fn round_constant(i: usize) -> u32 {
    K[i % 64]
}

const fn sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

const fn sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

const fn sum0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

const fn sum1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

const fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

const fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

/// Four new schedule words `W[16..20]` from `W[0..4]`, `{W4, W9, W10, W11}`
/// and `W[12..16]`.
pub fn message_schedule(w0_3: [u32; 4], w4_9_11: [u32; 4], w12_15: [u32; 4]) -> [u32; 4] {
    let [w0, w1, w2, w3] = w0_3;
    let [w4, w9, w10, w11] = w4_9_11;
    let [w12, _w13, w14, w15] = w12_15;
    let w16 = sigma1(w14)
        .wrapping_add(w9)
        .wrapping_add(sigma0(w1))
        .wrapping_add(w0);
    let w17 = sigma1(w15)
        .wrapping_add(w10)
        .wrapping_add(sigma0(w2))
        .wrapping_add(w1);
    let w18 = sigma1(w16)
        .wrapping_add(w11)
        .wrapping_add(sigma0(w3))
        .wrapping_add(w2);
    let w19 = sigma1(w17)
        .wrapping_add(w12)
        .wrapping_add(sigma0(w4))
        .wrapping_add(w3);
    [w16, w17, w18, w19]
}

/// Two compression rounds.
///
/// `abef` holds `[f, e, b, a]` and `cdgh` holds `[h, g, d, c]`, element 0
/// first; `wk` are the two message words with their round constants added.
/// Returns the new `[f, e, b, a]`.
pub fn compress_two(abef: [u32; 4], cdgh: [u32; 4], wk: [u32; 2]) -> [u32; 4] {
    let [mut f, mut e, mut b, mut a] = abef;
    let [mut h, mut g, mut d, mut c] = cdgh;
    for w in wk {
        let t1 = h
            .wrapping_add(sum1(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(w);
        let t2 = sum0(a).wrapping_add(maj(a, b, c));
        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }
    let _ = (h, g, d, c);
    [f, e, b, a]
}
