//! Validated scrypt cost parameters
//!
//! All size arithmetic happens here, in checked form, before a single
//! byte of scratch memory is allocated. A `Params` that exists is a
//! parameter set the rest of the crate can trust.

use crate::error::{ErrorKind, Result, invalid_parameter};

/// Bytes per `r` unit in a ROMix sub-block pair (two 64-byte blocks).
const MIX_BLOCK_UNIT: usize = 128;

/// CPU/memory cost parameters for a derivation.
///
/// Invariants enforced at construction, per RFC 7914:
/// - `n` is a power of two, `1 < n <= 2^32`
/// - `r` and `p` are positive
/// - `r * p < 2^30`
/// - the working block (`128 * r * p` bytes) and scratch table
///   (`128 * n * r` bytes) sizes fit in `usize`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    n: u64,
    r: u32,
    p: u32,
}

impl Params {
    /// Parameters giving ~16 MiB scratch and interactive-login latency;
    /// the conventional modern default (N=16384, r=8, p=1).
    pub fn recommended() -> Self {
        Self {
            n: 16384,
            r: 8,
            p: 1,
        }
    }

    pub fn new(n: u64, r: u32, p: u32) -> Result<Self> {
        if n <= 1 || !n.is_power_of_two() {
            return Err(invalid_parameter(
                ErrorKind::CostNotPowerOfTwo,
                format!("N must be a power of two greater than 1, got {}", n),
            ));
        }
        if n > 1 << 32 {
            // integerify reduces a 64-bit read mod N; past 2^32 the RFC
            // limit N < 2^(128*r/8) is unsatisfiable for any sane r
            // anyway, and the scratch table could not be addressed.
            return Err(invalid_parameter(
                ErrorKind::SizeOverflow,
                format!("N must not exceed 2^32, got {}", n),
            ));
        }
        if r == 0 || p == 0 {
            return Err(invalid_parameter(
                ErrorKind::ZeroCostParameter,
                "r and p must be positive",
            ));
        }
        if (r as u64) * (p as u64) >= 1 << 30 {
            return Err(invalid_parameter(
                ErrorKind::ParallelismTooLarge,
                format!("r * p must be less than 2^30, got {} * {}", r, p),
            ));
        }

        let params = Self { n, r, p };
        // Force both size computations now so the driver can allocate
        // without re-checking.
        params
            .checked_block_bytes()
            .ok_or_else(|| size_overflow("working block", n, r, p))?;
        params
            .checked_scratch_bytes()
            .ok_or_else(|| size_overflow("scratch table", n, r, p))?;
        Ok(params)
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    /// Bytes in one ROMix chunk: `128 * r`.
    pub fn chunk_bytes(&self) -> usize {
        MIX_BLOCK_UNIT * self.r as usize
    }

    /// Bytes in the PBKDF2-expanded working block: `128 * r * p`.
    pub fn block_bytes(&self) -> usize {
        self.checked_block_bytes()
            .expect("validated at construction")
    }

    /// Bytes in the ROMix scratch table: `128 * N * r`. This is the
    /// peak per-chunk memory requirement of a derivation.
    pub fn scratch_bytes(&self) -> usize {
        self.checked_scratch_bytes()
            .expect("validated at construction")
    }

    fn checked_block_bytes(&self) -> Option<usize> {
        (MIX_BLOCK_UNIT as u64)
            .checked_mul(self.r as u64)?
            .checked_mul(self.p as u64)?
            .try_into()
            .ok()
    }

    fn checked_scratch_bytes(&self) -> Option<usize> {
        (MIX_BLOCK_UNIT as u64)
            .checked_mul(self.r as u64)?
            .checked_mul(self.n)?
            .try_into()
            .ok()
    }
}

fn size_overflow(what: &str, n: u64, r: u32, p: u32) -> crate::error::SaltmineError {
    invalid_parameter(
        ErrorKind::SizeOverflow,
        format!(
            "{} size overflows addressable memory for N={}, r={}, p={}",
            what, n, r, p
        ),
    )
}
