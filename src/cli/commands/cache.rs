//! Cache command - inspect cache state and reclaim stale entries

use crate::build::DIST_DIRNAME;
use crate::cache::{dir_size, format_bytes, CacheEntryName, DependencyCache, Reclaimer};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::diag::{DebugSink, STDERR_DEBUG_ENV};
use crate::error::{PyzpackError, PyzpackResult};
use chrono::{DateTime, Local};
use console::style;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Execute the cache command
pub async fn execute(args: CacheArgs) -> PyzpackResult<()> {
    match args.action {
        CacheAction::List { root, format } => list_entries(root, format),
        CacheAction::Info {
            package_dir,
            requirements,
        } => show_package_info(package_dir, requirements).await,
        CacheAction::Reclaim {
            site_packages,
            build_id,
            dry_run,
        } => reclaim_entries(&site_packages, build_id, dry_run),
    }
}

/// One row of `cache list` output
#[derive(Debug)]
struct EntryRow {
    name: String,
    size: u64,
    modified: Option<DateTime<Local>>,
    locked: bool,
}

/// List the cache entries under a runtime cache root
fn list_entries(root: Option<PathBuf>, format: OutputFormat) -> PyzpackResult<()> {
    let explicit = root.is_some();
    let root = match root {
        Some(r) => r,
        None => default_cache_root()?,
    };

    if !root.exists() {
        if explicit {
            return Err(PyzpackError::PathNotFound(root));
        }
        println!("No cache entries found.");
        return Ok(());
    }

    let entries = collect_entries(&root)?;

    if entries.is_empty() {
        println!("No cache entries found.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_entry_table(&entries),
        OutputFormat::Json => print_entry_json(&entries)?,
        OutputFormat::Plain => print_entry_plain(&entries),
    }

    Ok(())
}

/// Runtime cache root the packaged archives unpack into by default
fn default_cache_root() -> PyzpackResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".shiv"))
        .ok_or_else(|| {
            PyzpackError::User("cannot determine the home directory; pass --root".to_string())
        })
}

fn collect_entries(root: &Path) -> PyzpackResult<Vec<EntryRow>> {
    let mut rows = Vec::new();

    let dir = fs::read_dir(root)
        .map_err(|e| PyzpackError::io(format!("reading cache root {}", root.display()), e))?;
    for entry in dir {
        let entry = entry
            .map_err(|e| PyzpackError::io(format!("reading cache root {}", root.display()), e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let Some(parsed) = CacheEntryName::parse(&name) else {
            continue;
        };

        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::from);

        rows.push(EntryRow {
            locked: root.join(parsed.lock_marker_name()).exists(),
            size: dir_size(&path),
            modified,
            name,
        });
    }

    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(rows)
}

fn print_entry_table(entries: &[EntryRow]) {
    println!("{:<70} {:>10} {:<17} {:<6}", "ENTRY", "SIZE", "MODIFIED", "LOCK");
    println!("{}", "-".repeat(105));

    let mut total = 0u64;
    for row in entries {
        let modified = row
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let lock = if row.locked { "yes" } else { "-" };

        println!(
            "{:<70} {:>10} {:<17} {:<6}",
            row.name,
            format_bytes(row.size),
            modified,
            lock
        );
        total += row.size;
    }

    println!();
    println!("Total: {} entry(ies), {}", entries.len(), format_bytes(total));
}

fn print_entry_json(entries: &[EntryRow]) -> PyzpackResult<()> {
    #[derive(serde::Serialize)]
    struct EntryJson {
        name: String,
        size_bytes: u64,
        modified: Option<String>,
        locked: bool,
    }

    let json_entries: Vec<EntryJson> = entries
        .iter()
        .map(|row| EntryJson {
            name: row.name.clone(),
            size_bytes: row.size,
            modified: row.modified.map(|m| m.to_rfc3339()),
            locked: row.locked,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json_entries)?);
    Ok(())
}

fn print_entry_plain(entries: &[EntryRow]) {
    for row in entries {
        println!("{}", row.name);
    }
}

/// Show manifest digest vs recorded digest for a package directory
async fn show_package_info(
    package_dir: Option<PathBuf>,
    requirements: Option<PathBuf>,
) -> PyzpackResult<()> {
    let package_dir = match package_dir {
        Some(p) => p.canonicalize().unwrap_or(p),
        None => {
            env::current_dir().map_err(|e| PyzpackError::io("getting current directory", e))?
        }
    };

    let config = Config::load(&package_dir).await?;
    let requirements = requirements.unwrap_or(config.build.requirements);
    let manifest = package_dir.join(&requirements);

    println!("Package:  {}", package_dir.display());
    println!("Manifest: {}", requirements.display());

    if !manifest.exists() {
        println!();
        println!("No requirements manifest found at this path.");
        return Ok(());
    }

    let cache = DependencyCache::new(manifest, package_dir.join(DIST_DIRNAME));
    let status = cache.status()?;

    println!("Digest:   {}", status.manifest_digest);
    println!(
        "Recorded: {}",
        status.recorded_digest.as_deref().unwrap_or("none")
    );
    println!();

    if status.fresh {
        println!(
            "{} Dependencies are up to date; the next build will skip the install.",
            style("✓").green()
        );
    } else if status.recorded_digest.is_none() {
        println!(
            "{} No previous install; the next build will install dependencies.",
            style("○").dim()
        );
    } else {
        println!(
            "{} Manifest changed; the next build will reinstall dependencies.",
            style("!").yellow()
        );
    }

    Ok(())
}

/// Delete stale sibling entries of the current build's cache entry
fn reclaim_entries(site_packages: &Path, build_id: String, dry_run: bool) -> PyzpackResult<()> {
    let sink = DebugSink::new(env::var_os(STDERR_DEBUG_ENV).is_some());

    let mut reclaimer = Reclaimer::from_site_packages(site_packages, build_id, sink)?;
    if dry_run {
        reclaimer = reclaimer.with_dry_run();
    }

    let summary = reclaimer.run()?;

    if summary.deleted == 0 {
        println!(
            "No stale cache entries under {} ({} item(s) scanned).",
            reclaimer.cache_root().display(),
            summary.scanned
        );
        return Ok(());
    }

    let verb = if dry_run { "Would delete" } else { "Deleted" };
    println!(
        "{} {} of {} scanned item(s) under {}:",
        verb,
        summary.deleted,
        summary.scanned,
        reclaimer.cache_root().display()
    );
    for path in &summary.entries {
        println!("  {} {}", style("•").red(), path.display());
    }
    println!();

    if dry_run {
        println!(
            "Dry run - nothing removed. {} reclaimable.",
            format_bytes(summary.bytes_reclaimed)
        );
    } else {
        println!(
            "{} Freed {}, removed {} lock marker(s)",
            style("✓").green(),
            format_bytes(summary.bytes_reclaimed),
            summary.locks_removed
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_id(c: char) -> String {
        std::iter::repeat(c).take(64).collect()
    }

    #[test]
    fn collect_entries_skips_non_cache_names() {
        let root = TempDir::new().unwrap();
        let entry = format!("myapp_{}", build_id('a'));
        fs::create_dir(root.path().join(&entry)).unwrap();
        fs::write(root.path().join(&entry).join("f.bin"), vec![0u8; 32]).unwrap();
        fs::write(root.path().join(format!(".myapp_{}_lock", build_id('a'))), "").unwrap();

        // Not cache entries: too short, and a plain file.
        fs::create_dir(root.path().join("tmp")).unwrap();
        fs::write(root.path().join(build_id('b')), "file").unwrap();

        let rows = collect_entries(root.path()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, entry);
        assert_eq!(rows[0].size, 32);
        assert!(rows[0].locked);
        assert!(rows[0].modified.is_some());
    }

    #[test]
    fn collect_entries_sorted_and_unlocked() {
        let root = TempDir::new().unwrap();
        for c in ['c', 'a', 'b'] {
            fs::create_dir(root.path().join(format!("app_{}", build_id(c)))).unwrap();
        }

        let rows = collect_entries(root.path()).unwrap();

        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                format!("app_{}", build_id('a')).as_str(),
                format!("app_{}", build_id('b')).as_str(),
                format!("app_{}", build_id('c')).as_str(),
            ]
        );
        assert!(rows.iter().all(|r| !r.locked));
    }

    #[test]
    fn collect_entries_missing_root_errors() {
        let root = TempDir::new().unwrap();
        let err = collect_entries(&root.path().join("absent")).unwrap_err();
        assert!(matches!(err, PyzpackError::Io { .. }));
    }
}
