//! Reuse-vs-reinstall gate for the dependency distribution directory
//!
//! The gate compares the manifest's current fingerprint against the record
//! left by the last successful install. On a match the distribution
//! directory is reused untouched; on a mismatch (or a missing record, or an
//! explicit force) the directory is wiped and rebuilt from scratch. The
//! record is rewritten only after the installer returns success, and the
//! wipe removes any previous record first, so a failed install can never
//! masquerade as a hit on the next run.

use crate::cache::fingerprint::{fingerprint, read_record, store_record};
use crate::error::{PyzpackError, PyzpackResult};
use crate::tools::Installer;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the fingerprint record file inside the distribution directory
pub const RECORD_FILENAME: &str = "_shiv_reqs_hash.txt";

/// What [`DependencyCache::sync`] did to the distribution directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Dependencies were (re)installed and the record updated
    Installed,
    /// The record matched the manifest; nothing was touched
    Reused,
}

/// Snapshot of the gate's decision inputs
#[derive(Debug, Clone)]
pub struct CacheStatus {
    /// Fingerprint of the manifest as it is on disk right now
    pub manifest_digest: String,
    /// Fingerprint recorded by the last successful install, if any
    pub recorded_digest: Option<String>,
    /// Whether the two match
    pub fresh: bool,
}

/// Content-addressed gate over one distribution directory
pub struct DependencyCache {
    manifest: PathBuf,
    dist_dir: PathBuf,
}

impl DependencyCache {
    /// Create a gate for `manifest` guarding `dist_dir`
    pub fn new(manifest: impl Into<PathBuf>, dist_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            dist_dir: dist_dir.into(),
        }
    }

    /// The requirements manifest this gate fingerprints
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// The distribution directory this gate guards
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Where the fingerprint record lives
    pub fn record_path(&self) -> PathBuf {
        self.dist_dir.join(RECORD_FILENAME)
    }

    /// Compare the manifest fingerprint against the stored record.
    ///
    /// A missing manifest is an error; a missing record just means no
    /// successful install has happened yet.
    pub fn status(&self) -> PyzpackResult<CacheStatus> {
        let manifest_digest = fingerprint(&self.manifest)?;
        let recorded_digest = read_record(&self.record_path())?;
        let fresh = recorded_digest.as_deref() == Some(manifest_digest.as_str());

        Ok(CacheStatus {
            manifest_digest,
            recorded_digest,
            fresh,
        })
    }

    /// Bring the distribution directory in sync with the manifest.
    ///
    /// The manifest is fingerprinted up front even when `force` is set, so a
    /// missing manifest fails before anything is deleted. The record written
    /// on success holds that up-front digest.
    pub async fn sync(
        &self,
        installer: &dyn Installer,
        force: bool,
    ) -> PyzpackResult<CacheOutcome> {
        let status = self.status()?;

        if status.fresh && !force {
            debug!(
                "Dependencies up to date in {} ({})",
                self.dist_dir.display(),
                status.manifest_digest
            );
            return Ok(CacheOutcome::Reused);
        }

        if self.dist_dir.exists() {
            debug!("Clearing stale distribution {}", self.dist_dir.display());
            tokio::fs::remove_dir_all(&self.dist_dir).await.map_err(|e| {
                PyzpackError::io(
                    format!("clearing distribution {}", self.dist_dir.display()),
                    e,
                )
            })?;
        }
        tokio::fs::create_dir_all(&self.dist_dir).await.map_err(|e| {
            PyzpackError::io(
                format!("creating distribution {}", self.dist_dir.display()),
                e,
            )
        })?;

        installer.install(&self.manifest, &self.dist_dir).await?;

        store_record(&self.record_path(), &status.manifest_digest)?;
        Ok(CacheOutcome::Installed)
    }
}
