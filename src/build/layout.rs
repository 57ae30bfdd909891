//! Filesystem layout of a package build
//!
//! Everything lives under the package directory: the app payload in a
//! subdirectory named after the app, the dependency distribution in
//! `_shiv_dist`, and the default archive next to them. The layout is pure
//! path arithmetic; [`BuildLayout::validate`] is the only method that looks
//! at the disk.

use crate::error::{PyzpackError, PyzpackResult};
use std::path::{Path, PathBuf};

/// Name of the dependency distribution directory inside the package directory
pub const DIST_DIRNAME: &str = "_shiv_dist";

/// Resolved paths for one package build
#[derive(Debug, Clone)]
pub struct BuildLayout {
    package_dir: PathBuf,
    app: String,
}

impl BuildLayout {
    /// Describe the layout of `app` inside `package_dir`
    pub fn new(package_dir: impl Into<PathBuf>, app: impl Into<String>) -> Self {
        Self {
            package_dir: package_dir.into(),
            app: app.into(),
        }
    }

    /// Check that the package and app directories exist and that the app
    /// name is a plain directory name
    pub fn validate(&self) -> PyzpackResult<()> {
        if self.app.is_empty() || self.app.chars().any(std::path::is_separator) {
            return Err(PyzpackError::User(format!(
                "app name must be a plain directory name, got '{}'",
                self.app
            )));
        }

        if !self.package_dir.exists() {
            return Err(PyzpackError::PathNotFound(self.package_dir.clone()));
        }
        if !self.package_dir.is_dir() {
            return Err(PyzpackError::path_invalid(
                &self.package_dir,
                "package path is not a directory",
            ));
        }

        let app_dir = self.app_dir();
        if !app_dir.exists() {
            return Err(PyzpackError::PathNotFound(app_dir));
        }
        if !app_dir.is_dir() {
            return Err(PyzpackError::path_invalid(
                app_dir,
                "app path is not a directory",
            ));
        }

        Ok(())
    }

    /// The package directory itself
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// The app's directory name
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Source directory of the app payload
    pub fn app_dir(&self) -> PathBuf {
        self.package_dir.join(&self.app)
    }

    /// The dependency distribution directory
    pub fn dist_dir(&self) -> PathBuf {
        self.package_dir.join(DIST_DIRNAME)
    }

    /// Where the app payload lands inside the distribution
    pub fn dist_app_dir(&self) -> PathBuf {
        self.dist_dir().join(&self.app)
    }

    /// Resolve the requirements manifest path.
    ///
    /// A relative path is taken relative to the package directory; an
    /// absolute path is used as given.
    pub fn requirements_path(&self, requirements: &Path) -> PathBuf {
        self.package_dir.join(requirements)
    }

    /// Default archive path when the caller does not choose one
    pub fn default_output(&self) -> PathBuf {
        self.package_dir.join(format!("{}.pyz", self.app))
    }
}
