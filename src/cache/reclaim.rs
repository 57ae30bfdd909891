//! Stale cache-entry reclamation
//!
//! Packaged archives extract themselves into per-build directories under a
//! shared cache root; superseded builds leave their directories (and lock
//! markers) behind. The reclaimer scans the root for sibling entries of the
//! same family that do not belong to the current build and deletes them.
//!
//! An entry name is `"{prefix}{build_id}"` with a fixed-width build id.
//! Siblings share the prefix; anything else under the root (other tools'
//! caches, lock markers, plain files) is left alone. A name that contains
//! the current build id anywhere is never touched, so a concurrent build
//! cannot have its entry deleted out from under it.

use crate::diag::DebugSink;
use crate::error::{PyzpackError, PyzpackResult};
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::dir_size;

/// Width of the build-identifier suffix in a cache entry's directory name,
/// in characters
pub const BUILD_ID_LEN: usize = 64;

/// Parsed form of a cache entry's directory name: a family prefix followed
/// by a build identifier of exactly [`BUILD_ID_LEN`] characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntryName {
    prefix: String,
    build_id: String,
}

impl CacheEntryName {
    /// Split a directory name into family prefix and build-id suffix.
    ///
    /// Returns `None` when the name is shorter than [`BUILD_ID_LEN`]
    /// characters (counting characters, not bytes, so multi-byte names
    /// split correctly).
    pub fn parse(name: &str) -> Option<Self> {
        let (mid, _) = name.char_indices().rev().nth(BUILD_ID_LEN - 1)?;
        let (prefix, build_id) = name.split_at(mid);
        Some(Self {
            prefix: prefix.to_string(),
            build_id: build_id.to_string(),
        })
    }

    /// The family prefix (may be empty)
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The build-identifier suffix
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    /// Whether `other` belongs to the same cache family
    pub fn same_family(&self, other: &CacheEntryName) -> bool {
        self.prefix == other.prefix
    }

    /// Name of the lock marker file that accompanies this entry in the
    /// cache root, derived from the directory name's stem
    pub fn lock_marker_name(&self) -> String {
        let name = self.to_string();
        let stem = Path::new(&name)
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or(&name);
        format!(".{stem}_lock")
    }
}

impl fmt::Display for CacheEntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.build_id)
    }
}

/// Outcome of one reclamation pass
#[derive(Debug, Clone, Default)]
pub struct ReclaimSummary {
    /// Entries under the cache root that were examined
    pub scanned: usize,
    /// Stale entries deleted (or, in dry-run mode, that would be deleted)
    pub deleted: usize,
    /// Lock markers removed alongside their entries
    pub locks_removed: usize,
    /// Bytes freed by the deleted entries
    pub bytes_reclaimed: u64,
    /// Paths of the deleted (or would-be deleted) entries
    pub entries: Vec<PathBuf>,
}

/// Scans a cache root and deletes sibling entries that belong to other
/// builds, together with their lock markers
#[derive(Debug)]
pub struct Reclaimer {
    cache_root: PathBuf,
    current: CacheEntryName,
    build_id: String,
    sink: DebugSink,
    dry_run: bool,
}

impl Reclaimer {
    /// Create a reclaimer for an explicit cache root and current entry
    pub fn new(
        cache_root: PathBuf,
        current: CacheEntryName,
        build_id: impl Into<String>,
        sink: DebugSink,
    ) -> Self {
        Self {
            cache_root,
            current,
            build_id: build_id.into(),
            sink,
            dry_run: false,
        }
    }

    /// Derive the cache root and current entry from a site-packages path.
    ///
    /// The entry directory is the parent of the site-packages directory and
    /// the cache root is the entry's parent, matching the on-disk layout the
    /// packaged archives unpack into.
    pub fn from_site_packages(
        site_packages: &Path,
        build_id: impl Into<String>,
        sink: DebugSink,
    ) -> PyzpackResult<Self> {
        let entry_dir = site_packages.parent().ok_or_else(|| {
            PyzpackError::path_invalid(site_packages, "expected a path inside a cache entry")
        })?;
        let cache_root = entry_dir.parent().ok_or_else(|| {
            PyzpackError::path_invalid(site_packages, "cache entry has no parent cache root")
        })?;
        let name = entry_dir
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| {
                PyzpackError::path_invalid(entry_dir, "cache entry name is not valid UTF-8")
            })?;
        let current = CacheEntryName::parse(name).ok_or_else(|| {
            PyzpackError::path_invalid(
                entry_dir,
                format!("cache entry name must end in a {BUILD_ID_LEN}-character build id"),
            )
        })?;

        Ok(Self::new(cache_root.to_path_buf(), current, build_id, sink))
    }

    /// Report what would be deleted without touching the filesystem
    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// The cache root this reclaimer scans
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Run one reclamation pass.
    ///
    /// Sibling entries are handled independently, but a failed directory
    /// deletion aborts the remaining scan; lock-marker deletion is
    /// best-effort and never fails the pass.
    pub fn run(&self) -> PyzpackResult<ReclaimSummary> {
        if self.build_id.is_empty() {
            return Err(PyzpackError::User(
                "build id must not be empty".to_string(),
            ));
        }

        let mut summary = ReclaimSummary::default();

        let entries = fs::read_dir(&self.cache_root).map_err(|e| {
            PyzpackError::io(
                format!("reading cache root {}", self.cache_root.display()),
                e,
            )
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                PyzpackError::io(
                    format!("reading cache root {}", self.cache_root.display()),
                    e,
                )
            })?;
            summary.scanned += 1;

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };

            // Anything referencing the active build is never stale, even if
            // its shape matches by accident.
            if name.contains(&self.build_id) {
                continue;
            }

            let Some(candidate) = CacheEntryName::parse(name) else {
                continue;
            };
            if !candidate.same_family(&self.current) {
                continue;
            }

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let size = dir_size(&path);

            if self.dry_run {
                self.sink
                    .debug(format!("Would delete {} and lock marker", path.display()));
                summary.deleted += 1;
                summary.bytes_reclaimed += size;
                summary.entries.push(path);
                continue;
            }

            self.sink
                .debug(format!("Deleting {} and lock marker", path.display()));
            fs::remove_dir_all(&path).map_err(|e| {
                PyzpackError::io(format!("removing stale cache entry {}", path.display()), e)
            })?;
            summary.deleted += 1;
            summary.bytes_reclaimed += size;
            summary.entries.push(path);

            let lock_path = self.cache_root.join(candidate.lock_marker_name());
            match fs::remove_file(&lock_path) {
                Ok(()) => summary.locks_removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    self.sink.debug(format!(
                        "Failed to remove lock marker {}: {e}",
                        lock_path.display()
                    ));
                }
            }
        }

        Ok(summary)
    }
}
