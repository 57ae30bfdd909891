//! Dependency installation via pip
//!
//! Runs `<python> -m pip install` against a requirements manifest with an
//! explicit `--target` directory, inheriting the terminal so pip's own
//! progress output stays visible.

use crate::error::{PyzpackError, PyzpackResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Installs a requirements manifest into a target directory
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install every requirement in `manifest` into `target`
    async fn install(&self, manifest: &Path, target: &Path) -> PyzpackResult<()>;
}

/// [`Installer`] backed by the pip module of a Python interpreter
pub struct PipInstaller {
    python: String,
}

impl PipInstaller {
    /// Create an installer that runs pip through `python`
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    fn argv(&self, manifest: &Path, target: &Path) -> Vec<String> {
        vec![
            self.python.clone(),
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            "-r".to_string(),
            manifest.display().to_string(),
            "--target".to_string(),
            target.display().to_string(),
        ]
    }
}

#[async_trait]
impl Installer for PipInstaller {
    async fn install(&self, manifest: &Path, target: &Path) -> PyzpackResult<()> {
        let argv = self.argv(manifest, target);
        debug!("Executing: {}", argv.join(" "));

        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                PyzpackError::tool_failed(
                    &self.python,
                    argv.join(" "),
                    format!("Install Python and ensure `{}` is on PATH", self.python),
                    e,
                )
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PyzpackError::ToolExit {
                command: argv.join(" "),
                code: status.code().unwrap_or(-1),
            })
        }
    }
}
