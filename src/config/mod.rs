//! Configuration management for pyzpack

pub mod schema;

pub use schema::{BuildSection, Config, ToolsSection};

use crate::error::{PyzpackError, PyzpackResult};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Configuration file name inside the package directory
pub const CONFIG_FILENAME: &str = "pyzpack.toml";

impl Config {
    /// Load the configuration for a package directory.
    ///
    /// A missing file is not an error; every value then comes from defaults
    /// or the command line.
    pub async fn load(package_dir: &Path) -> PyzpackResult<Config> {
        let path = package_dir.join(CONFIG_FILENAME);
        if !path.exists() {
            debug!("No {} found, using defaults", CONFIG_FILENAME);
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| PyzpackError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| PyzpackError::ConfigInvalid {
            path,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).await.unwrap();
        assert_eq!(config.tools.python, "python3");
    }

    #[tokio::test]
    async fn load_reads_package_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"
                [build]
                app = "svc"
                requirements = "reqs/prod.txt"

                [tools]
                python = "python3.12"
            "#,
        )
        .unwrap();

        let config = Config::load(temp.path()).await.unwrap();
        assert_eq!(config.build.app.as_deref(), Some("svc"));
        assert_eq!(
            config.build.requirements,
            std::path::PathBuf::from("reqs/prod.txt")
        );
        assert_eq!(config.tools.python, "python3.12");
    }

    #[tokio::test]
    async fn load_rejects_malformed_toml() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILENAME), "[build\napp =").unwrap();

        let err = Config::load(temp.path()).await.unwrap_err();
        assert!(matches!(err, PyzpackError::ConfigInvalid { .. }));
    }

    #[tokio::test]
    async fn load_rejects_unknown_value_types() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILENAME), "[build]\napp = 42").unwrap();

        let err = Config::load(temp.path()).await.unwrap_err();
        assert!(matches!(err, PyzpackError::ConfigInvalid { .. }));
    }
}
