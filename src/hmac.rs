//! HMAC-SHA256 (RFC 2104 / FIPS 198-1)
//!
//! The keyed construction `H((K ^ opad) || H((K ^ ipad) || m))`. The
//! key-mixed inner and outer hashers are kept as reusable templates so
//! PBKDF2 can MAC many messages under one password without redoing the
//! key schedule.

use zeroize::Zeroize;

use crate::sha256::{BLOCK_LEN, DIGEST_LEN, Sha256};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Streaming HMAC-SHA256.
///
/// `Clone` is cheap and yields a fresh MAC keyed with the same key,
/// positioned before any message bytes.
#[derive(Clone)]
pub struct HmacSha256 {
    inner: Sha256,
    /// Outer hasher with the opad-mixed key already absorbed.
    outer: Sha256,
}

impl HmacSha256 {
    pub fn new(key: &[u8]) -> Self {
        // Keys longer than the block size are replaced by their digest.
        let mut padded = [0u8; BLOCK_LEN];
        if key.len() > BLOCK_LEN {
            padded[..DIGEST_LEN].copy_from_slice(&Sha256::digest(key));
        } else {
            padded[..key.len()].copy_from_slice(key);
        }

        let mut inner = Sha256::new();
        let mut outer = Sha256::new();
        for b in &mut padded {
            *b ^= IPAD;
        }
        inner.update(&padded);
        for b in &mut padded {
            // Undo ipad, apply opad.
            *b ^= IPAD ^ OPAD;
        }
        outer.update(&padded);
        padded.zeroize();

        Self { inner, outer }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(self) -> [u8; DIGEST_LEN] {
        let inner_digest = self.inner.finalize();
        let mut outer = self.outer;
        outer.update(&inner_digest);
        outer.finalize()
    }

    /// One-shot MAC of `data` under `key`.
    pub fn mac(key: &[u8], data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut h = Self::new(key);
        h.update(data);
        h.finalize()
    }
}
