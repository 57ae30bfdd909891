//! Archive packaging via shiv
//!
//! Turns an installed site-packages tree into a single executable `.pyz`
//! archive. The archive's shebang goes through `/usr/bin/env` so the
//! configured interpreter name is resolved on the machine that runs it,
//! not the one that built it.

use crate::error::{PyzpackError, PyzpackResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Everything shiv needs to produce one archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Directory holding the installed dependencies and app payload
    pub site_packages: PathBuf,
    /// Interpreter name embedded in the archive's env shebang
    pub python: String,
    /// Where to write the archive
    pub output_file: PathBuf,
    /// Dotted `module:function` entry point
    pub entry_point: String,
    /// Optional preamble script bundled into the archive
    pub preamble: Option<PathBuf>,
}

/// Builds an executable archive from a [`PackageSpec`]
#[async_trait]
pub trait PackageBuilder: Send + Sync {
    /// Produce the archive described by `spec`
    async fn package(&self, spec: &PackageSpec) -> PyzpackResult<()>;
}

/// [`PackageBuilder`] backed by the shiv command-line tool
pub struct ShivPackager {
    shiv: String,
}

impl ShivPackager {
    /// Create a packager that runs the given shiv binary
    pub fn new(shiv: impl Into<String>) -> Self {
        Self { shiv: shiv.into() }
    }

    fn argv(&self, spec: &PackageSpec) -> Vec<String> {
        let mut args = vec![
            self.shiv.clone(),
            "--compile-pyc".to_string(),
            "--compressed".to_string(),
            "--site-packages".to_string(),
            spec.site_packages.display().to_string(),
            "--python".to_string(),
            format!("/usr/bin/env {}", spec.python),
            "--output-file".to_string(),
            spec.output_file.display().to_string(),
            "--entry-point".to_string(),
            spec.entry_point.clone(),
        ];

        if let Some(preamble) = &spec.preamble {
            args.push("--preamble".to_string());
            args.push(preamble.display().to_string());
        }

        args
    }
}

#[async_trait]
impl PackageBuilder for ShivPackager {
    async fn package(&self, spec: &PackageSpec) -> PyzpackResult<()> {
        let argv = self.argv(spec);
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
                    &self.shiv,
                    argv.join(" "),
                    "Install it with: pip install shiv".to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PackageSpec {
        PackageSpec {
            site_packages: PathBuf::from("/work/_shiv_dist"),
            python: "python3".to_string(),
            output_file: PathBuf::from("/work/myapp.pyz"),
            entry_point: "myapp.cli:main".to_string(),
            preamble: None,
        }
    }

    #[test]
    fn shiv_argv_shape() {
        let packager = ShivPackager::new("shiv");
        let argv = packager.argv(&spec());

        assert_eq!(
            argv,
            vec![
                "shiv",
                "--compile-pyc",
                "--compressed",
                "--site-packages",
                "/work/_shiv_dist",
                "--python",
                "/usr/bin/env python3",
                "--output-file",
                "/work/myapp.pyz",
                "--entry-point",
                "myapp.cli:main",
            ]
        );
    }

    #[test]
    fn shiv_argv_appends_preamble() {
        let packager = ShivPackager::new("shiv");
        let mut spec = spec();
        spec.preamble = Some(PathBuf::from("/work/preamble.py"));

        let argv = packager.argv(&spec);
        let tail: Vec<_> = argv.iter().rev().take(2).rev().collect();
        assert_eq!(tail, vec!["--preamble", "/work/preamble.py"]);
    }

    #[test]
    fn shiv_argv_env_shebang_tracks_interpreter() {
        let packager = ShivPackager::new("shiv");
        let mut spec = spec();
        spec.python = "python3.12".to_string();

        let argv = packager.argv(&spec);
        assert!(argv.contains(&"/usr/bin/env python3.12".to_string()));
    }
}
