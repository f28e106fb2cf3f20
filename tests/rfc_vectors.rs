//! RFC 7914 known-answer vector validation

use serde::Deserialize;

use saltmine::kdf;
use saltmine::params::Params;

#[derive(Debug, Deserialize)]
struct KdfVector {
    passphrase: String,
    salt: String,
    n: u64,
    r: u32,
    p: u32,
    dk_len: usize,
    derived: String,
    large: bool,
    comment: String,
}

fn load_vectors() -> Vec<KdfVector> {
    let json_data = include_str!("../testdata/rfc7914-vectors.json");
    serde_json::from_str(json_data).expect("failed to parse RFC vector file")
}

/// Run the vectors matching the `large` flag, reporting every mismatch
/// before failing so one bad vector does not mask another.
fn run_vectors(large: bool) {
    let vectors: Vec<KdfVector> = load_vectors()
        .into_iter()
        .filter(|v| v.large == large)
        .collect();
    assert!(!vectors.is_empty(), "vector file is missing entries");
    println!("Testing {} RFC 7914 vectors", vectors.len());

    let mut failed = 0;

    for (i, vector) in vectors.iter().enumerate() {
        let params = match Params::new(vector.n, vector.r, vector.p) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Vector {}: FAILED - parameters rejected: {}", i, e);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
        };

        let key = match kdf::derive(
            vector.passphrase.as_bytes(),
            vector.salt.as_bytes(),
            &params,
            vector.dk_len,
        ) {
            Ok(key) => key,
            Err(e) => {
                eprintln!("Vector {}: FAILED to derive - {}", i, e);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
        };

        let derived = hex::encode(key.as_slice());
        if derived != vector.derived {
            eprintln!("Vector {}: FAILED - key mismatch", i);
            eprintln!("  Comment:  {}", vector.comment);
            eprintln!("  Expected: {}", vector.derived);
            eprintln!("  Actual:   {}", derived);
            failed += 1;
        }
    }

    assert_eq!(failed, 0, "{} vector(s) failed", failed);
}

#[test]
fn test_rfc7914_vectors() {
    run_vectors(false);
}

/// The N=2^20 vector allocates a 1 GiB scratch table; run explicitly
/// with `cargo test -- --ignored` on machines that can afford it.
#[test]
#[ignore]
fn test_rfc7914_large_vectors() {
    run_vectors(true);
}

/// Byte-identical output across repeated calls, including across the
/// parallel path (p > 1 in vector 2).
#[test]
fn test_vectors_are_reproducible() {
    for vector in load_vectors().iter().filter(|v| !v.large) {
        let params = Params::new(vector.n, vector.r, vector.p).unwrap();
        let first = kdf::derive(
            vector.passphrase.as_bytes(),
            vector.salt.as_bytes(),
            &params,
            vector.dk_len,
        )
        .unwrap();
        let second = kdf::derive(
            vector.passphrase.as_bytes(),
            vector.salt.as_bytes(),
            &params,
            vector.dk_len,
        )
        .unwrap();
        assert_eq!(first.as_slice(), second.as_slice(), "{}", vector.comment);
    }
}
