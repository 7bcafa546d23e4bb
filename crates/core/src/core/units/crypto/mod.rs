//! Crypto Primitives.
//!
//! The block transforms behind the vector crypto instructions. Each works on
//! one 128-bit element group given as four 32-bit words, element 0 first, with
//! bytes in little-endian order inside each word (byte `j` of the group is
//! byte `j % 4` of word `j / 4`).
//! - [`aes`]: AES rounds and key expansion (Zvkned).
//! - [`ghash`]: GHASH multiply-accumulate in GF(2^128) (Zvkg).
//! - [`sha256`]: SHA-256 message schedule and compression (Zvknha).

/// AES round functions and key schedule.
pub mod aes;

/// GF(2^128) multiplication for GHASH.
pub mod ghash;

/// SHA-256 message schedule and compression rounds.
pub mod sha256;

/// One element group: four 32-bit words, element 0 first.
pub type Block = [u32; 4];

/// Bytes of a group in memory order.
pub fn to_bytes(block: Block) -> [u8; 16] {
    let mut out = [0u8; 16];
    for (chunk, word) in out.chunks_exact_mut(4).zip(block) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

/// Group from bytes in memory order.
pub fn from_bytes(bytes: [u8; 16]) -> Block {
    std::array::from_fn(|k| {
        u32::from_le_bytes([bytes[4 * k], bytes[4 * k + 1], bytes[4 * k + 2], bytes[4 * k + 3]])
    })
}

/// Group as a little-endian 128-bit integer.
pub fn to_u128(block: Block) -> u128 {
    u128::from_le_bytes(to_bytes(block))
}

/// Group from a little-endian 128-bit integer.
pub fn from_u128(value: u128) -> Block {
    from_bytes(value.to_le_bytes())
}
