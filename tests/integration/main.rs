//! Integration tests for imgcache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn imgcache() -> Command {
        cargo_bin_cmd!("imgcache")
    }

    /// Config pointing storage at a scratch directory, with no origin
    fn scratch_config(temp: &TempDir) -> std::path::PathBuf {
        let store_dir = temp.path().join("store");
        fs::create_dir_all(&store_dir).unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            format!(
                "[storage]\nurl = \"file://{}\"\n",
                store_dir.display()
            ),
        )
        .unwrap();
        config_path
    }

    #[test]
    fn help_displays() {
        imgcache()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Lazy image variant cache"));
    }

    #[test]
    fn version_displays() {
        imgcache()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("imgcache"));
    }

    #[test]
    fn profiles_lists_builtin_catalog() {
        imgcache()
            .arg("profiles")
            .assert()
            .success()
            .stdout(
                predicate::str::contains("thumbnail")
                    .and(predicate::str::contains("technical-drawing"))
                    .and(predicate::str::contains("icon")),
            );
    }

    #[test]
    fn profiles_json_output() {
        imgcache()
            .args(["profiles", "--format", "json"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("\"name\": \"technical-drawing\"")
                    .and(predicate::str::contains("\"fill_color\": \"#00ff00\"")),
            );
    }

    #[test]
    fn fetch_unknown_profile_fails() {
        let temp = TempDir::new().unwrap();
        let config = scratch_config(&temp);
        imgcache()
            .args(["fetch", "poster", "photo.jpg"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown image profile"));
    }

    #[test]
    fn fetch_invalid_reference_fails() {
        let temp = TempDir::new().unwrap();
        let config = scratch_config(&temp);
        imgcache()
            .args(["fetch", "thumbnail", "noextension"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Bad request"));
    }

    #[test]
    fn fetch_without_origin_reports_missing_setting() {
        let temp = TempDir::new().unwrap();
        let config = scratch_config(&temp);
        imgcache()
            .args(["fetch", "thumbnail", "photo.jpg"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("source.base_url"));
    }

    #[test]
    fn flush_variant_succeeds_without_origin() {
        let temp = TempDir::new().unwrap();
        let config = scratch_config(&temp);
        imgcache()
            .args(["flush", "thumbnail", "photo.jpg"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .success()
            .stderr(predicate::str::contains("Flushed"));
    }

    #[test]
    fn flush_original_removes_cached_files() {
        let temp = TempDir::new().unwrap();
        let config = scratch_config(&temp);
        let store_dir = temp.path().join("store");

        // seed both tiers the way the resolver would lay them out
        for tier in ["original", "thumbnail", "icon"] {
            let dir = store_dir.join(tier).join("abcd").join("efgh");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("abcdefghi.jpg"), b"bytes").unwrap();
        }

        imgcache()
            .args(["flush", "original", "abcdefghi.jpg"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .success();

        for tier in ["original", "thumbnail", "icon"] {
            assert!(
                !store_dir
                    .join(tier)
                    .join("abcd/efgh/abcdefghi.jpg")
                    .exists(),
                "{tier} copy should be gone"
            );
        }
    }

    #[test]
    fn serve_refuses_to_start_without_origin() {
        let temp = TempDir::new().unwrap();
        let config = scratch_config(&temp);
        imgcache()
            .args(["serve"])
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("source.base_url"));
    }
}
