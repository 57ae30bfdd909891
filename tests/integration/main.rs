//! Integration tests for pyzpack

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn pyzpack() -> Command {
        cargo_bin_cmd!("pyzpack")
    }

    fn build_id(c: char) -> String {
        std::iter::repeat(c).take(64).collect()
    }

    fn make_entry(root: &Path, name: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("payload.bin"), vec![0u8; 64]).unwrap();
        fs::write(root.join(format!(".{name}_lock")), "").unwrap();
    }

    #[test]
    fn help_displays() {
        pyzpack()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("dependency cache"));
    }

    #[test]
    fn version_displays() {
        pyzpack()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pyzpack"));
    }

    #[test]
    fn build_requires_app_name() {
        let temp = TempDir::new().unwrap();

        pyzpack()
            .current_dir(temp.path())
            .arg("build")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no app name given"));
    }

    #[test]
    fn build_fails_on_missing_app_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "flask\n").unwrap();

        pyzpack()
            .current_dir(temp.path())
            .args(["build", "--app", "myapp", "--entry-point", "myapp.cli:main"])
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("Path not found")
                    .and(predicate::str::contains("myapp")),
            );
    }

    #[test]
    fn build_fails_on_missing_manifest_before_installing() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("myapp")).unwrap();

        pyzpack()
            .current_dir(temp.path())
            .args(["build", "--app", "myapp", "--entry-point", "myapp.cli:main"])
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("Path not found")
                    .and(predicate::str::contains("requirements.txt")),
            );
    }

    #[test]
    fn build_reports_malformed_config_with_hint() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyzpack.toml"), "[build\napp =").unwrap();

        pyzpack()
            .current_dir(temp.path())
            .arg("build")
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("Invalid configuration")
                    .and(predicate::str::contains("Hint:")),
            );
    }

    #[test]
    fn init_creates_then_refuses_overwrite() {
        let temp = TempDir::new().unwrap();

        pyzpack()
            .args(["init", "--path"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let content = fs::read_to_string(temp.path().join("pyzpack.toml")).unwrap();
        assert!(content.contains("[build]"));
        assert!(content.contains("[tools]"));

        pyzpack()
            .args(["init", "--path"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        pyzpack()
            .args(["init", "--force", "--path"])
            .arg(temp.path())
            .assert()
            .success();
    }

    #[test]
    fn cache_list_empty_root() {
        let temp = TempDir::new().unwrap();

        pyzpack()
            .args(["cache", "list", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache entries found"));
    }

    #[test]
    fn cache_list_missing_explicit_root_fails() {
        let temp = TempDir::new().unwrap();

        pyzpack()
            .args(["cache", "list", "--root"])
            .arg(temp.path().join("absent"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn cache_list_shows_entries() {
        let temp = TempDir::new().unwrap();
        let entry = format!("myapp_{}", build_id('a'));
        make_entry(temp.path(), &entry);
        // Non-entry clutter that must not be listed.
        fs::create_dir(temp.path().join("scratch")).unwrap();

        pyzpack()
            .args(["cache", "list", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(
                predicate::str::contains(&entry)
                    .and(predicate::str::contains("Total: 1 entry(ies)"))
                    .and(predicate::str::contains("scratch").not()),
            );

        pyzpack()
            .args(["cache", "list", "--format", "json", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(
                predicate::str::contains("\"locked\": true")
                    .and(predicate::str::contains(&entry)),
            );
    }

    #[test]
    fn cache_info_without_manifest() {
        let temp = TempDir::new().unwrap();

        pyzpack()
            .args(["cache", "info"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("No requirements manifest"));
    }

    #[test]
    fn cache_info_reports_first_build_decision() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "flask\n").unwrap();

        pyzpack()
            .args(["cache", "info"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(
                predicate::str::contains("No previous install")
                    .and(predicate::str::contains("Recorded: none")),
            );
    }

    #[test]
    fn cache_reclaim_deletes_only_stale_family_entries() {
        let temp = TempDir::new().unwrap();
        let current = format!("myapp_{}", build_id('a'));
        let stale = format!("myapp_{}", build_id('b'));
        let foreign = format!("other_{}", build_id('c'));
        make_entry(temp.path(), &current);
        make_entry(temp.path(), &stale);
        make_entry(temp.path(), &foreign);

        let site_packages = temp.path().join(&current).join("site-packages");

        // Dry run first: reports the stale entry but removes nothing. The
        // root holds three entry directories and three lock markers.
        pyzpack()
            .args(["cache", "reclaim", "--dry-run", "--build-id", &build_id('a')])
            .arg("--site-packages")
            .arg(&site_packages)
            .assert()
            .success()
            .stdout(
                predicate::str::contains("Would delete 1 of 6 scanned item(s)")
                    .and(predicate::str::contains("Dry run")),
            );
        assert!(temp.path().join(&stale).exists());

        pyzpack()
            .args(["cache", "reclaim", "--build-id", &build_id('a')])
            .arg("--site-packages")
            .arg(&site_packages)
            .assert()
            .success()
            .stdout(
                predicate::str::contains("Deleted 1 of 6 scanned item(s)")
                    .and(predicate::str::contains("Freed")),
            );

        assert!(temp.path().join(&current).exists());
        assert!(!temp.path().join(&stale).exists());
        assert!(!temp.path().join(format!(".{stale}_lock")).exists());
        assert!(temp.path().join(&foreign).exists());
        assert!(temp.path().join(format!(".{foreign}_lock")).exists());
    }

    #[test]
    fn cache_reclaim_reports_clean_root() {
        let temp = TempDir::new().unwrap();
        let current = format!("myapp_{}", build_id('a'));
        make_entry(temp.path(), &current);

        pyzpack()
            .args(["cache", "reclaim", "--build-id", &build_id('a')])
            .arg("--site-packages")
            .arg(temp.path().join(&current).join("site-packages"))
            .assert()
            .success()
            .stdout(
                predicate::str::contains("No stale cache entries")
                    .and(predicate::str::contains("2 item(s) scanned")),
            );
    }

    #[test]
    fn cache_reclaim_rejects_unparseable_entry_path() {
        pyzpack()
            .args([
                "cache",
                "reclaim",
                "--site-packages",
                "/tmp/short/site-packages",
                "--build-id",
            ])
            .arg(build_id('a'))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid path"));
    }
}
