//! Manifest fingerprinting for content-addressed dependency caching
//!
//! A fingerprint is the SHA-256 digest of the exact bytes of a requirements
//! manifest, as lowercase hex. Identical bytes always produce the same
//! fingerprint; any byte difference changes it. The digest accepted by the
//! last successful install is persisted to a small record file, which is the
//! cache key the gate compares against.

use crate::error::{PyzpackError, PyzpackResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Compute the SHA-256 fingerprint of a file's contents as lowercase hex.
///
/// A missing file is a caller error and surfaces as `PathNotFound`.
pub fn fingerprint(path: &Path) -> PyzpackResult<String> {
    let contents = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PyzpackError::PathNotFound(path.to_path_buf())
        } else {
            PyzpackError::io(format!("reading {}", path.display()), e)
        }
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}

/// Write a fingerprint to `record` verbatim, overwriting any prior content.
///
/// Callers pass the digest they computed before acting on it, so the record
/// always reflects the manifest bytes that were actually installed.
pub fn store_record(record: &Path, digest: &str) -> PyzpackResult<()> {
    fs::write(record, digest)
        .map_err(|e| PyzpackError::io(format!("writing record {}", record.display()), e))
}

/// Read a previously stored fingerprint record.
///
/// An absent record is a legitimate "no prior successful install" state,
/// reported as `Ok(None)`.
pub fn read_record(record: &Path) -> PyzpackResult<Option<String>> {
    match fs::read_to_string(record) {
        Ok(text) => Ok(Some(text.trim().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PyzpackError::io(
            format!("reading record {}", record.display()),
            e,
        )),
    }
}
