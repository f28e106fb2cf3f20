//! BlockMix and ROMix (RFC 7914 sections 4 and 5)
//!
//! ROMix is the memory-hard heart of scrypt: it materializes N
//! successive BlockMix states into a scratch table and then revisits
//! the table at data-dependent indices. The table must stay resident
//! for the entire fill+mix cycle; recomputing entries on demand would
//! alter the time-memory tradeoff the algorithm exists to enforce.

use crate::salsa::{SALSA_BLOCK_LEN, salsa20_8};

/// Writes `x ^ y` into `out`. All three slices must be equal length.
fn xor_into(x: &[u8], y: &[u8], out: &mut [u8]) {
    for (o, (a, b)) in out.iter_mut().zip(x.iter().zip(y.iter())) {
        *o = a ^ b;
    }
}

/// scryptBlockMix: mixes a `2r`-sub-block buffer from `input` into
/// `output` (same length, a multiple of 128 bytes).
///
/// The running accumulator starts as the last 64-byte sub-block; each
/// input sub-block is XORed into it and passed through Salsa20/8. The
/// results are de-interleaved on the way out: even-indexed sub-blocks
/// land in the first half of `output`, odd-indexed in the second half.
/// Getting this placement wrong is the classic scrypt transcription
/// bug, so it is pinned by a reference-transcription test below.
pub fn block_mix(input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len(), output.len());
    debug_assert_eq!(input.len() % (2 * SALSA_BLOCK_LEN), 0);

    let half = input.len() / 2;
    let mut acc = [0u8; SALSA_BLOCK_LEN];
    acc.copy_from_slice(&input[input.len() - SALSA_BLOCK_LEN..]);

    let mut mixed = [0u8; SALSA_BLOCK_LEN];
    for (i, sub_block) in input.chunks_exact(SALSA_BLOCK_LEN).enumerate() {
        xor_into(&acc, sub_block, &mut mixed);
        salsa20_8(&mut mixed);
        acc = mixed;

        let slot = if i % 2 == 0 {
            (i / 2) * SALSA_BLOCK_LEN
        } else {
            half + (i / 2) * SALSA_BLOCK_LEN
        };
        output[slot..slot + SALSA_BLOCK_LEN].copy_from_slice(&acc);
    }
}

/// Integerify: the last 64-byte sub-block interpreted as a
/// little-endian integer, reduced mod `n`.
///
/// `n` is a validated power of two no larger than 2^32, so masking the
/// low 64 bits with `n - 1` is an exact reduction.
fn integerify(block: &[u8], n: usize) -> usize {
    let tail = &block[block.len() - SALSA_BLOCK_LEN..];
    let value = u64::from_le_bytes(tail[..8].try_into().unwrap());
    (value as usize) & (n - 1)
}

/// scryptROMix: transforms `block` in place using an `n`-entry scratch
/// `table` and a same-sized `scratch` work buffer (both caller
/// allocated; each entry/buffer is `block.len()` bytes).
pub fn ro_mix(block: &mut [u8], table: &mut [u8], scratch: &mut [u8], n: usize) {
    let entry_len = block.len();
    debug_assert_eq!(table.len(), n * entry_len);
    debug_assert_eq!(scratch.len(), entry_len);
    debug_assert!(n.is_power_of_two() && n > 1);

    // Fill pass: entry i stores X_i, and BlockMix advances the working
    // block to X_{i+1}. Reading the stored copy while writing the live
    // block avoids a second bounce buffer.
    for entry in table.chunks_exact_mut(entry_len) {
        entry.copy_from_slice(block);
        block_mix(entry, block);
    }

    // Mix pass: N data-dependent table reads. The index depends on the
    // current block, which is what forces the table to stay resident.
    for _ in 0..n {
        let j = integerify(block, n);
        xor_into(block, &table[j * entry_len..(j + 1) * entry_len], scratch);
        block_mix(scratch, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic filler so the tests exercise non-trivial data
    /// without a RNG dependency.
    fn pattern(len: usize, seed: u8) -> Vec<u8> {
        (0..len)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect()
    }

    /// scryptBlockMix transcribed literally from the RFC 7914 text:
    /// build Y_0..Y_{2r-1} sequentially, then emit
    /// (Y_0, Y_2, ..., Y_1, Y_3, ...) as a separate step.
    fn block_mix_reference(input: &[u8]) -> Vec<u8> {
        let r2 = input.len() / SALSA_BLOCK_LEN;
        let mut x: [u8; SALSA_BLOCK_LEN] = input[input.len() - SALSA_BLOCK_LEN..]
            .try_into()
            .unwrap();
        let mut y: Vec<[u8; SALSA_BLOCK_LEN]> = Vec::new();
        for i in 0..r2 {
            for (a, b) in x
                .iter_mut()
                .zip(&input[i * SALSA_BLOCK_LEN..(i + 1) * SALSA_BLOCK_LEN])
            {
                *a ^= b;
            }
            salsa20_8(&mut x);
            y.push(x);
        }
        let mut out = Vec::new();
        for i in (0..r2).step_by(2) {
            out.extend_from_slice(&y[i]);
        }
        for i in (1..r2).step_by(2) {
            out.extend_from_slice(&y[i]);
        }
        out
    }

    #[test]
    fn test_block_mix_matches_reference_r1() {
        let input = pattern(128, 7);
        let mut output = vec![0u8; 128];
        block_mix(&input, &mut output);
        assert_eq!(output, block_mix_reference(&input));
    }

    #[test]
    fn test_block_mix_matches_reference_r4() {
        // r = 4 gives eight sub-blocks, enough for the de-interleave to
        // actually reorder things.
        let input = pattern(512, 99);
        let mut output = vec![0u8; 512];
        block_mix(&input, &mut output);
        assert_eq!(output, block_mix_reference(&input));
    }

    #[test]
    fn test_ro_mix_matches_literal_two_pass() {
        // ROMix transcribed with per-entry Vecs and no buffer reuse.
        let n = 16;
        let len = 128;
        let input = pattern(len, 3);

        let mut v: Vec<Vec<u8>> = Vec::new();
        let mut x = input.clone();
        for _ in 0..n {
            v.push(x.clone());
            let prev = x.clone();
            block_mix(&prev, &mut x);
        }
        for _ in 0..n {
            let j = integerify(&x, n);
            let mut t = vec![0u8; len];
            xor_into(&x, &v[j], &mut t);
            block_mix(&t, &mut x);
        }

        let mut block = input;
        let mut table = vec![0u8; n * len];
        let mut scratch = vec![0u8; len];
        ro_mix(&mut block, &mut table, &mut scratch, n);

        assert_eq!(block, x);
    }

    #[test]
    fn test_integerify_masks_to_table_range() {
        let mut block = vec![0u8; 128];
        block[64..72].copy_from_slice(&u64::MAX.to_le_bytes());
        assert_eq!(integerify(&block, 1024), 1023);

        block[64..72].copy_from_slice(&1024u64.to_le_bytes());
        assert_eq!(integerify(&block, 1024), 0);
    }

    #[test]
    fn test_ro_mix_is_deterministic() {
        let n = 8;
        let len = 256;
        let run = || {
            let mut block = pattern(len, 42);
            let mut table = vec![0u8; n * len];
            let mut scratch = vec![0u8; len];
            ro_mix(&mut block, &mut table, &mut scratch, n);
            block
        };
        assert_eq!(run(), run());
    }
}
