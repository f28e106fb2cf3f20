//! Salsa20/8 core permutation
//!
//! The reduced 8-round Salsa20 mixing function, used by BlockMix purely
//! as a diffusion primitive: no key, no counter, no keystream. This is
//! the innermost hot loop of a derivation, and the place where a single
//! swapped operand in a rotate silently breaks every output, so the
//! round structure below follows RFC 7914 section 3 word for word:
//! four iterations of column rounds followed by row rounds, then the
//! feed-forward addition of the input.

/// Salsa block length in bytes (sixteen 32-bit words).
pub const SALSA_BLOCK_LEN: usize = 64;

#[inline(always)]
fn quarter_round(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

/// Applies the Salsa20/8 core to a 64-byte block in place.
///
/// Words are little-endian, arranged row-major as a 4x4 matrix.
pub fn salsa20_8(block: &mut [u8; SALSA_BLOCK_LEN]) {
    let mut input = [0u32; 16];
    for (word, chunk) in input.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().unwrap());
    }

    let mut x = input;
    for _ in 0..4 {
        // Column rounds.
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 5, 9, 13, 1);
        quarter_round(&mut x, 10, 14, 2, 6);
        quarter_round(&mut x, 15, 3, 7, 11);
        // Row rounds.
        quarter_round(&mut x, 0, 1, 2, 3);
        quarter_round(&mut x, 5, 6, 7, 4);
        quarter_round(&mut x, 10, 11, 8, 9);
        quarter_round(&mut x, 15, 12, 13, 14);
    }

    for (chunk, (word, orig)) in block.chunks_exact_mut(4).zip(x.iter().zip(input.iter())) {
        chunk.copy_from_slice(&word.wrapping_add(*orig).to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc7914_vector() {
        // RFC 7914 section 8.
        let mut block: [u8; SALSA_BLOCK_LEN] = hex::decode(
            "7e879a214f3ec9867ca940e641718f26\
             baee555b8c61c1c03db8db473e9f729c\
             a223232b121e75c5635963699ef8ba33\
             1f1ed9aaf4b19e69a2511d30399da1f9",
        )
        .unwrap()
        .try_into()
        .unwrap();

        salsa20_8(&mut block);

        assert_eq!(
            hex::encode(block),
            "a41f859c6608cc993b81cacb020cef05\
             044b2181a2fd337dfd7b1c6396682f29\
             b4393168e3c9e6bcfe6bc5b7a06d96ba\
             e424cc102c91745c24ad673dc7618f81"
        );
    }

    #[test]
    fn test_zero_is_a_fixed_point() {
        // The core has no constants mixed in, so the all-zero block
        // maps to itself. Useful canary: padding BlockMix inputs with
        // zeros would produce degenerate mixing.
        let mut block = [0u8; SALSA_BLOCK_LEN];
        salsa20_8(&mut block);
        assert_eq!(block, [0u8; SALSA_BLOCK_LEN]);
    }

    #[test]
    fn test_single_bit_avalanche() {
        let mut a = [0x5au8; SALSA_BLOCK_LEN];
        let mut b = [0x5au8; SALSA_BLOCK_LEN];
        b[0] ^= 1;
        salsa20_8(&mut a);
        salsa20_8(&mut b);

        let differing: u32 = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum();
        // 8 rounds should flip roughly half of the 512 output bits.
        assert!(differing > 128, "only {} bits changed", differing);
    }
}
