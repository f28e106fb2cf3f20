//! The scrypt driver (RFC 7914 section 6)
//!
//! Expand with PBKDF2, ROMix each of the `p` chunks, compress with
//! PBKDF2. Blocking and synchronous by contract: cost parameters can
//! make a call take seconds, and moving it off a latency-sensitive
//! thread is the caller's job, not this module's.

use std::thread;

use zeroize::Zeroizing;

use crate::error::{ErrorCategory, ErrorKind, Result, SaltmineError, invalid_parameter};
use crate::params::Params;
use crate::pbkdf2;
use crate::romix;
use crate::sha256::DIGEST_LEN;

/// Derives `dk_len` bytes of key material from `passphrase` and `salt`.
///
/// Deterministic: identical inputs always produce identical output.
/// The passphrase and salt are borrowed and never mutated; the returned
/// key is zeroized when dropped.
pub fn derive(
    passphrase: &[u8],
    salt: &[u8],
    params: &Params,
    dk_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if dk_len == 0 {
        return Err(invalid_parameter(
            ErrorKind::OutputLength,
            "dkLen must be positive",
        ));
    }
    let mut out = Zeroizing::new(alloc_zeroed(dk_len)?);
    derive_into(passphrase, salt, params, &mut out)?;
    Ok(out)
}

/// Like [`derive`], writing the key into a caller-provided buffer.
///
/// On error the buffer contents are unspecified but never a partial
/// key: the final PBKDF2 pass is the only step that writes to it, and
/// it runs only after every prior step has succeeded.
pub fn derive_into(passphrase: &[u8], salt: &[u8], params: &Params, out: &mut [u8]) -> Result<()> {
    if out.is_empty() {
        return Err(invalid_parameter(
            ErrorKind::OutputLength,
            "dkLen must be positive",
        ));
    }
    if out.len().div_ceil(DIGEST_LEN) > u32::MAX as usize {
        return Err(invalid_parameter(
            ErrorKind::SizeOverflow,
            "dkLen exceeds the PBKDF2 output limit",
        ));
    }

    // B = PBKDF2(passphrase, salt, 1, p * 128 * r). Secret-derived, so
    // wiped on every exit path.
    let mut block = Zeroizing::new(alloc_zeroed(params.block_bytes())?);
    pbkdf2::derive(passphrase, salt, 1, &mut block)?;

    if params.p() == 1 {
        mix_sequential(&mut block, params)?;
    } else {
        mix_parallel(&mut block, params)?;
    }

    pbkdf2::derive(passphrase, &block, 1, out)
}

/// ROMix over every chunk on the calling thread, one scratch table
/// reused across chunks.
fn mix_sequential(block: &mut [u8], params: &Params) -> Result<()> {
    let n = params.n() as usize;
    let mut table = alloc_zeroed(params.scratch_bytes())?;
    let mut scratch = alloc_zeroed(params.chunk_bytes())?;
    for chunk in block.chunks_mut(params.chunk_bytes()) {
        romix::ro_mix(chunk, &mut table, &mut scratch, n);
    }
    Ok(())
}

/// ROMix over the `p` independent chunks on scoped worker threads.
///
/// Chunks are dealt round-robin to at most `available_parallelism`
/// workers; each worker owns one scratch table and walks its chunks
/// sequentially. No chunk is touched by two workers, so the output is
/// byte-identical to [`mix_sequential`] regardless of scheduling.
fn mix_parallel(block: &mut [u8], params: &Params) -> Result<()> {
    let n = params.n() as usize;
    let chunk_bytes = params.chunk_bytes();
    let workers = thread::available_parallelism()
        .map(|w| w.get())
        .unwrap_or(1)
        .min(params.p() as usize);

    let mut groups: Vec<Vec<&mut [u8]>> = (0..workers).map(|_| Vec::new()).collect();
    for (i, chunk) in block.chunks_mut(chunk_bytes).enumerate() {
        groups[i % workers].push(chunk);
    }

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for group in groups {
            handles.push(scope.spawn(move || -> Result<()> {
                let mut table = alloc_zeroed(params.scratch_bytes())?;
                let mut scratch = alloc_zeroed(chunk_bytes)?;
                for chunk in group {
                    romix::ro_mix(chunk, &mut table, &mut scratch, n);
                }
                Ok(())
            }));
        }
        for handle in handles {
            match handle.join() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(SaltmineError::with_kind(
                        ErrorCategory::Internal,
                        ErrorKind::InternalInvariant,
                        "ROMix worker thread panicked",
                    ));
                }
            }
        }
        Ok(())
    })
}

/// Allocates a zero-filled buffer, surfacing exhaustion as an
/// `Allocation` error instead of aborting the process. Scratch tables
/// run to hundreds of megabytes at high N, so this is the one
/// allocation site where failure is an expected outcome.
fn alloc_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        SaltmineError::with_kind_and_source(
            ErrorCategory::Resource,
            ErrorKind::Allocation,
            format!("failed to allocate {} bytes of derivation memory", len),
            e,
        )
    })?;
    buf.resize(len, 0);
    Ok(buf)
}
