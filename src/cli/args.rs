//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pyzpack - Python app packer with a content-addressed dependency cache
///
/// Packs an application directory plus its pip-resolved dependencies into a
/// single executable .pyz archive via shiv, skipping the pip install when
/// the requirements manifest has not changed since the last build.
#[derive(Parser, Debug)]
#[command(name = "pyzpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the executable archive
    Build(BuildArgs),

    /// Inspect and reclaim dependency caches
    Cache(CacheArgs),

    /// Initialize a pyzpack.toml config
    Init(InitArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Package directory (defaults to current directory)
    pub package_dir: Option<PathBuf>,

    /// App directory name inside the package directory
    #[arg(short, long)]
    pub app: Option<String>,

    /// Entry point as module:function
    #[arg(short, long)]
    pub entry_point: Option<String>,

    /// Requirements manifest, relative to the package directory
    #[arg(short, long)]
    pub requirements: Option<PathBuf>,

    /// Interpreter used for pip and for the archive shebang
    #[arg(short, long, env = "PYZPACK_PYTHON")]
    pub python: Option<String>,

    /// Archive output path (defaults to <app>.pyz in the package directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preamble script bundled into the archive
    #[arg(long)]
    pub preamble: Option<PathBuf>,

    /// Reinstall dependencies even when the manifest is unchanged
    #[arg(long)]
    pub force_deps: bool,
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing pyzpack.toml
    #[arg(short, long)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List the entries of a runtime cache root
    List {
        /// Cache root to scan (defaults to ~/.shiv)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the reuse-vs-reinstall decision for a package
    Info {
        /// Package directory (defaults to current directory)
        package_dir: Option<PathBuf>,

        /// Requirements manifest override, relative to the package directory
        #[arg(short, long)]
        requirements: Option<PathBuf>,
    },

    /// Delete cache entries left behind by other builds
    Reclaim {
        /// site-packages directory of the current build's cache entry
        #[arg(long)]
        site_packages: PathBuf,

        /// Build identifier of the current build
        #[arg(long)]
        build_id: String,

        /// Show what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Output format for cache list
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
