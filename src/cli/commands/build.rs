//! Build command - pack the app and its dependencies into an archive

use crate::build::{self, BuildRequest};
use crate::cache::CacheOutcome;
use crate::cli::args::BuildArgs;
use crate::config::Config;
use crate::error::{PyzpackError, PyzpackResult};
use crate::tools::{PipInstaller, ShivPackager};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Execute the build command
pub async fn execute(args: BuildArgs) -> PyzpackResult<()> {
    let pb = create_progress_bar("Preparing build...");

    let package_dir = match args.package_dir.clone() {
        Some(p) => p,
        None => {
            env::current_dir().map_err(|e| PyzpackError::io("getting current directory", e))?
        }
    };

    let config = Config::load(&package_dir).await?;
    let shiv = config.tools.shiv.clone();
    let request = merge_request(args, &config, package_dir)?;

    debug!(
        "Building {} from {}",
        request.app,
        request.package_dir.display()
    );

    let installer = PipInstaller::new(request.python.clone());
    let packager = ShivPackager::new(shiv);

    // The collaborators inherit the terminal, so the spinner has to be gone
    // before the pipeline starts.
    pb.finish_and_clear();

    let report = build::run(&request, &installer, &packager).await?;

    match report.outcome {
        CacheOutcome::Reused => {
            println!(
                "{} Requirements already up-to-date, skipping install.",
                style("✓").green()
            );
        }
        CacheOutcome::Installed => {
            println!("{} Dependencies installed.", style("✓").green());
        }
    }

    let cwd = env::current_dir().map_err(|e| PyzpackError::io("getting current directory", e))?;
    let shown = build::relativize(&report.output_file, &cwd);
    if shown.is_absolute() {
        println!("{} Archive saved to {}", style("✓").green(), shown.display());
    } else {
        println!(
            "{} Archive saved to ./{}",
            style("✓").green(),
            shown.display()
        );
    }

    Ok(())
}

/// Combine CLI flags with the package configuration; flags win.
///
/// Relative paths from the config file are taken relative to the package
/// directory (where the file lives); flag paths are used as typed. The
/// requirements manifest is package-relative in both cases.
fn merge_request(
    args: BuildArgs,
    config: &Config,
    package_dir: PathBuf,
) -> PyzpackResult<BuildRequest> {
    let app = args
        .app
        .or_else(|| config.build.app.clone())
        .ok_or_else(|| {
            PyzpackError::User(
                "no app name given; pass --app or set build.app in pyzpack.toml".to_string(),
            )
        })?;

    let entry_point = args
        .entry_point
        .or_else(|| config.build.entry_point.clone())
        .ok_or_else(|| {
            PyzpackError::User(
                "no entry point given; pass --entry-point or set build.entry_point in pyzpack.toml"
                    .to_string(),
            )
        })?;

    let output = args
        .output
        .or_else(|| config.build.output.as_ref().map(|o| package_dir.join(o)));
    let preamble = args
        .preamble
        .or_else(|| config.build.preamble.as_ref().map(|p| package_dir.join(p)));

    Ok(BuildRequest {
        app,
        entry_point,
        requirements: args
            .requirements
            .unwrap_or_else(|| config.build.requirements.clone()),
        python: args
            .python
            .unwrap_or_else(|| config.tools.python.clone()),
        output,
        preamble,
        force_deps: args.force_deps,
        package_dir,
    })
}

fn create_progress_bar(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
