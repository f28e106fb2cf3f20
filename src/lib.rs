//! saltmine - scrypt password-based key derivation (RFC 7914)
//!
//! The whole pipeline is implemented in this crate, leaves first:
//! SHA-256, HMAC-SHA256, PBKDF2, the Salsa20/8 core, BlockMix, ROMix,
//! and the scrypt driver. Each layer is pinned to its standard test
//! vectors, because nothing in scrypt self-checks: a bit flipped in
//! any primitive just yields confidently wrong keys.
//!
//! ```
//! use saltmine::{kdf, params::Params};
//!
//! let params = Params::new(16384, 8, 1)?;
//! let key = kdf::derive(b"correct horse", b"battery staple", &params, 32)?;
//! assert_eq!(key.len(), 32);
//! # Ok::<(), saltmine::error::SaltmineError>(())
//! ```

#![forbid(unsafe_code)]

pub mod adapter;
pub mod error;
pub mod kdf;
pub mod params;

mod hmac;
mod pbkdf2;
mod romix;
mod salsa;
mod sha256;
