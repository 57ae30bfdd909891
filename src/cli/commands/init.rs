//! Init command - create a package-local pyzpack.toml

use crate::cli::args::InitArgs;
use crate::config::CONFIG_FILENAME;
use crate::error::{PyzpackError, PyzpackResult};
use console::style;
use std::path::Path;
use tokio::fs;

/// Template for the package config
const INIT_TEMPLATE: &str = r#"# pyzpack package configuration
# Every value here can be overridden on the command line.

[build]
# App directory name inside this package directory
# app = "myapp"

# Entry point as module:function
# entry_point = "myapp.cli:main"

# Requirements manifest, relative to this directory
requirements = "requirements.txt"

# Archive output path (defaults to <app>.pyz next to this file)
# output = "myapp.pyz"

# Preamble script bundled into the archive
# preamble = "preamble.py"

[tools]
# Interpreter used for pip and for the archive shebang
python = "python3"

# shiv binary to invoke
shiv = "shiv"
"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> PyzpackResult<()> {
    let target_dir = match args.path {
        Some(ref p) => p.clone(),
        None => std::env::current_dir()
            .map_err(|e| PyzpackError::io("getting current directory", e))?,
    };

    let config_path = target_dir.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(PyzpackError::User(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        )));
    }

    ensure_dir(&target_dir).await?;

    fs::write(&config_path, INIT_TEMPLATE)
        .await
        .map_err(|e| PyzpackError::io(format!("writing {}", config_path.display()), e))?;

    println!(
        "{} Created {}",
        style("✓").green(),
        config_path.display()
    );

    Ok(())
}

async fn ensure_dir(dir: &Path) -> PyzpackResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| PyzpackError::io(format!("creating directory {}", dir.display()), e))?;
    }
    Ok(())
}
