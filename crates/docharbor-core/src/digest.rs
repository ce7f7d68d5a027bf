//! Content digest used for deduplication and integrity checks.
//!
//! The digest is computed over the full document bytes *before* any
//! catalog mutation, so dedup checks never race against partially
//! written records.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of a byte slice.
///
/// Pure function, no side effects. Two documents are considered
/// byte-identical exactly when their digests are equal.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}
