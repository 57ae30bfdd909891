//! Build pipeline
//!
//! One build runs in four stages: resolve and validate the package layout,
//! sync the dependency distribution through the cache gate, refresh the app
//! payload inside the distribution, then hand the assembled tree to the
//! packager. The payload refresh happens on cache hits too, so app code
//! changes always reach the archive even when dependencies are reused.

pub mod layout;

pub use layout::{BuildLayout, DIST_DIRNAME};

use crate::cache::{CacheOutcome, DependencyCache};
use crate::error::{PyzpackError, PyzpackResult};
use crate::tools::{Installer, PackageBuilder, PackageSpec};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inputs for one build
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Directory holding the app payload and requirements manifest
    pub package_dir: PathBuf,
    /// App directory name inside the package directory
    pub app: String,
    /// Dotted `module:function` entry point for the archive
    pub entry_point: String,
    /// Requirements manifest, relative to the package directory unless
    /// absolute
    pub requirements: PathBuf,
    /// Interpreter name for pip and the archive shebang
    pub python: String,
    /// Archive path override; defaults to `<app>.pyz` in the package
    /// directory
    pub output: Option<PathBuf>,
    /// Optional preamble script bundled into the archive
    pub preamble: Option<PathBuf>,
    /// Reinstall dependencies even when the manifest fingerprint matches
    pub force_deps: bool,
}

/// What a finished build produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Whether dependencies were installed or reused
    pub outcome: CacheOutcome,
    /// The archive that was written
    pub output_file: PathBuf,
}

/// Run one build end to end
pub async fn run(
    request: &BuildRequest,
    installer: &dyn Installer,
    packager: &dyn PackageBuilder,
) -> PyzpackResult<BuildReport> {
    let layout = BuildLayout::new(&request.package_dir, &request.app);
    layout.validate()?;

    if let Some(preamble) = &request.preamble {
        if !preamble.exists() {
            return Err(PyzpackError::PathNotFound(preamble.clone()));
        }
    }

    let requirements = layout.requirements_path(&request.requirements);
    let output_file = request
        .output
        .clone()
        .unwrap_or_else(|| layout.default_output());

    let cache = DependencyCache::new(&requirements, layout.dist_dir());
    let outcome = cache.sync(installer, request.force_deps).await?;
    match outcome {
        CacheOutcome::Installed => info!("Installed dependencies from {}", requirements.display()),
        CacheOutcome::Reused => debug!("Reused dependency distribution"),
    }

    refresh_payload(&layout.app_dir(), &layout.dist_app_dir())?;

    let spec = PackageSpec {
        site_packages: layout.dist_dir(),
        python: request.python.clone(),
        output_file: output_file.clone(),
        entry_point: request.entry_point.clone(),
        preamble: request.preamble.clone(),
    };
    packager.package(&spec).await?;

    Ok(BuildReport {
        outcome,
        output_file,
    })
}

/// Replace the app payload inside the distribution with a fresh copy.
///
/// The previous payload is removed first so files deleted from the app
/// since the last build do not linger in the archive.
fn refresh_payload(app_dir: &Path, dist_app_dir: &Path) -> PyzpackResult<()> {
    if dist_app_dir.exists() {
        fs::remove_dir_all(dist_app_dir).map_err(|e| {
            PyzpackError::io(
                format!("clearing app payload {}", dist_app_dir.display()),
                e,
            )
        })?;
    }
    copy_dir_recursive(app_dir, dist_app_dir)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> PyzpackResult<()> {
    fs::create_dir_all(dst)
        .map_err(|e| PyzpackError::io(format!("creating {}", dst.display()), e))?;

    let entries = fs::read_dir(src)
        .map_err(|e| PyzpackError::io(format!("reading {}", src.display()), e))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| PyzpackError::io(format!("reading {}", src.display()), e))?;
        let path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if path.is_dir() {
            copy_dir_recursive(&path, &dst_path)?;
        } else {
            fs::copy(&path, &dst_path)
                .map_err(|e| PyzpackError::io(format!("copying {}", path.display()), e))?;
        }
    }

    Ok(())
}

/// Strip `base` from `path` for display; paths outside `base` come back
/// unchanged
pub fn relativize(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
