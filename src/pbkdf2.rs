//! PBKDF2-HMAC-SHA256 (RFC 8018)
//!
//! scrypt uses this twice per derivation, both times with a single
//! iteration: once to expand passphrase+salt into the ROMix working
//! block, once to compress the mixed block into the requested key.

use zeroize::Zeroize;

use crate::error::{ErrorKind, Result, invalid_parameter};
use crate::hmac::HmacSha256;
use crate::sha256::DIGEST_LEN;

/// Fills `out` with PBKDF2-HMAC-SHA256 output.
///
/// Each 32-byte output block `i` (1-based) is the XOR of the iterated
/// chain `U_1 = HMAC(password, salt || be32(i))`, `U_j = HMAC(password,
/// U_{j-1})`; the final block is truncated to fit `out`.
pub fn derive(password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) -> Result<()> {
    if out.is_empty() {
        return Err(invalid_parameter(
            ErrorKind::OutputLength,
            "PBKDF2 output length must be positive",
        ));
    }
    if iterations == 0 {
        return Err(invalid_parameter(
            ErrorKind::ZeroCostParameter,
            "PBKDF2 iteration count must be positive",
        ));
    }
    // The block counter is a 32-bit big-endian integer; RFC 8018 caps
    // the output at (2^32 - 1) blocks.
    let blocks = out.len().div_ceil(DIGEST_LEN);
    if blocks > u32::MAX as usize {
        return Err(invalid_parameter(
            ErrorKind::SizeOverflow,
            "PBKDF2 output length exceeds (2^32 - 1) blocks",
        ));
    }

    // Key the MAC once; every U computation starts from a clone of
    // this template instead of rerunning the key schedule.
    let keyed = HmacSha256::new(password);

    for (index, chunk) in out.chunks_mut(DIGEST_LEN).enumerate() {
        let counter = (index as u32) + 1;

        let mut mac = keyed.clone();
        mac.update(salt);
        mac.update(&counter.to_be_bytes());
        let mut u = mac.finalize();

        let mut acc = u;
        for _ in 1..iterations {
            let mut mac = keyed.clone();
            mac.update(&u);
            u = mac.finalize();
            for (a, b) in acc.iter_mut().zip(u.iter()) {
                *a ^= b;
            }
        }

        chunk.copy_from_slice(&acc[..chunk.len()]);
        u.zeroize();
        acc.zeroize();
    }

    Ok(())
}
