//! Boundary adapter: loosely-typed requests in, hex strings out
//!
//! Bridge layers (mobile runtimes, FFI, RPC) hand over passphrases and
//! salts as either UTF-8 text or raw byte arrays, plus a bag of
//! integer options, and expect the derived key back as a lowercase hex
//! string. This module owns that translation so the `kdf` core stays a
//! pure bytes-in/bytes-out function.
//!
//! Option presence is explicit: a missing `N` is `None`, never 0. The
//! upstream plugin this replaces conflated the two, which made a
//! caller-supplied 0 silently mean "unset" - here both are rejected,
//! each with its own message.

use zeroize::Zeroizing;

use crate::error::{ErrorKind, Result, invalid_parameter};
use crate::kdf;
use crate::params::Params;

/// A passphrase or salt as delivered across the boundary.
#[derive(Debug, Clone)]
pub enum Material {
    /// UTF-8 text; its byte representation is used directly.
    Text(String),
    /// An explicit byte array.
    Bytes(Vec<u8>),
}

impl Material {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Material::Text(s) => s.as_bytes(),
            Material::Bytes(b) => b,
        }
    }
}

/// Integer options as delivered across the boundary. Every field is
/// required; `None` means the caller never supplied it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub n: Option<u64>,
    pub r: Option<u32>,
    pub p: Option<u32>,
    pub dk_len: Option<usize>,
}

impl Options {
    /// Validates presence of every option and turns the cost fields
    /// into checked [`Params`].
    fn resolve(&self) -> Result<(Params, usize)> {
        let n = require(self.n, "N")?;
        let r = require(self.r, "r")?;
        let p = require(self.p, "p")?;
        let dk_len = require(self.dk_len, "dkLen")?;
        if dk_len == 0 {
            return Err(invalid_parameter(
                ErrorKind::OutputLength,
                "option dkLen must be positive",
            ));
        }
        Ok((Params::new(n, r, p)?, dk_len))
    }
}

fn require<T: Copy>(option: Option<T>, name: &str) -> Result<T> {
    option.ok_or_else(|| {
        invalid_parameter(ErrorKind::MissingOption, format!("option {} is required", name))
    })
}

/// Derives a key per `options` and returns it hex-encoded: lowercase,
/// two characters per byte, high nibble first.
pub fn derive_hex(passphrase: &Material, salt: &Material, options: &Options) -> Result<String> {
    let (params, dk_len) = options.resolve()?;
    let key = kdf::derive(passphrase.as_bytes(), salt.as_bytes(), &params, dk_len)?;
    Ok(encode_key(&key))
}

/// Hex-encodes a derived key. Split out from [`derive_hex`] so callers
/// holding raw key bytes (e.g. the CLI after a salt decode) share one
/// encoding path.
pub fn encode_key(key: &Zeroizing<Vec<u8>>) -> String {
    hex::encode(key.as_slice())
}

/// Decodes a hex-encoded salt from the boundary.
pub fn decode_salt_hex(salt: &str) -> Result<Vec<u8>> {
    hex::decode(salt).map_err(|e| {
        crate::error::SaltmineError::with_kind_and_source(
            crate::error::ErrorCategory::User,
            ErrorKind::MalformedInput,
            format!("salt is not valid hex: {}", e),
            e,
        )
    })
}
