//! Dependency-cache gate and stale-entry reclamation
//!
//! Two concerns share this module:
//!
//! - the reuse-vs-reinstall gate for a package's dependency distribution
//!   directory, keyed by the fingerprint of its requirements manifest
//!   ([`gate`], [`fingerprint`]);
//! - reclamation of stale runtime cache entries left behind by builds other
//!   than the current one ([`reclaim`]).
//!
//! The gate owns the fingerprint record inside the distribution directory
//! and only rewrites it after a successful install, so an interrupted or
//! failed install always forces a retry.

pub mod fingerprint;
pub mod gate;
pub mod reclaim;

pub use fingerprint::{fingerprint, read_record, store_record};
pub use gate::{CacheOutcome, CacheStatus, DependencyCache, RECORD_FILENAME};
pub use reclaim::{CacheEntryName, ReclaimSummary, Reclaimer, BUILD_ID_LEN};

use std::fs;
use std::path::Path;

/// Format bytes as human-readable size (e.g., "1.5 GB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Total size of a directory tree in bytes, best-effort.
///
/// Unreadable entries count as zero; the result is informational only.
pub fn dir_size(path: &Path) -> u64 {
    let mut size = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                size += dir_size(&path);
            } else if let Ok(meta) = entry.metadata() {
                size += meta.len();
            }
        }
    }
    size
}
