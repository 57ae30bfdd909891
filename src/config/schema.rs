//! Configuration schema for pyzpack
//!
//! Configuration is stored per package at `<package_dir>/pyzpack.toml`.
//! Every field has a default so a missing file and an empty file behave the
//! same; `app` and `entry_point` stay optional here because they may come
//! from the command line instead.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildSection,

    /// External tool names
    pub tools: ToolsSection,
}

/// Build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// App directory name inside the package directory
    pub app: Option<String>,

    /// Entry point as `module:function`
    pub entry_point: Option<String>,

    /// Requirements manifest, relative to the package directory
    pub requirements: PathBuf,

    /// Archive output path; defaults to `<app>.pyz` in the package directory
    pub output: Option<PathBuf>,

    /// Preamble script bundled into the archive
    pub preamble: Option<PathBuf>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            app: None,
            entry_point: None,
            requirements: PathBuf::from("requirements.txt"),
            output: None,
            preamble: None,
        }
    }
}

/// External tool names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// Interpreter used for pip and for the archive shebang
    pub python: String,

    /// shiv binary to invoke
    pub shiv: String,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            shiv: "shiv".to_string(),
        }
    }
}
