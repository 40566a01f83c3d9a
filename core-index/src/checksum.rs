//! Content checksum helpers.
//!
//! The index keys on hex-encoded SHA-256 of a file's bytes. These helpers are
//! the canonical producers of that key; the index itself treats checksums as
//! opaque strings.

use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Checksum of an in-memory byte slice.
pub fn checksum_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_encode(&hasher.finalize())
}

/// Checksum of a file on disk, read in streaming chunks.
///
/// Read failures are item-scoped IO errors, not index errors; callers map
/// them into their own error types.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub async fn checksum_file(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        let read = file.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}
