//! Integration tests for the tickrs CLI.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

/// Get the tickrs binary with a clean environment and an empty config.
fn tickrs_bin(config_dir: &Path) -> Command {
    let config = config_dir.join("config.toml");
    if !config.exists() {
        fs::write(&config, "").expect("Failed to write config");
    }

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tickrs"));
    cmd.current_dir(config_dir)
        .env_remove("TICKRS_TICKERS")
        .env_remove("TICKRS_TICKERS_FROM")
        .env_remove("TICKRS_DELAY")
        .env_remove("TICKRS_LOG_FILE")
        .env_remove("RUST_LOG")
        .env("TICKRS_CONFIG", &config);
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    tickrs_bin(dir)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_help_flag() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tickrs"));
    assert!(stdout.contains("52-week"));
    assert!(stdout.contains("--tickers"));
    assert!(stdout.contains("--tickers-from"));
    assert!(stdout.contains("--once"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tickrs"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_default_tickers_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--once"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tickers.txt"));
}

#[test]
fn test_missing_explicit_tickers_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--once", "--tickers-from", "nope.txt"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.txt"));
}

#[test]
fn test_only_comments_means_no_tickers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tickers.txt"), "# nothing yet\n\n   \n").unwrap();
    let output = run(dir.path(), &["--once"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No tickers to watch"));
    assert!(stderr.contains("[tickers]"));
}

#[test]
fn test_tickers_sources_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--tickers", "AAPL", "--tickers-from", "tickers.txt"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"));
}

#[test]
fn test_tickers_from_flag_wins_over_tickers_env() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("watch.txt"), "# empty watchlist\n").unwrap();
    let output = tickrs_bin(dir.path())
        .env("TICKRS_TICKERS", "MSFT")
        .args(["--once", "--tickers-from", "watch.txt"])
        .output()
        .expect("Failed to execute command");

    // The flag is honored: the (empty) file is read instead of the env list.
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("cannot be used with"));
    assert!(stderr.contains("No tickers to watch in watch.txt"));
}

#[test]
fn test_tickers_env_is_used_without_flags() {
    let dir = tempfile::tempdir().unwrap();
    let output = tickrs_bin(dir.path())
        .env("TICKRS_TICKERS", "AAPL,,MSFT")
        .arg("--once")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid ticker in TICKRS_TICKERS"));
}

#[test]
fn test_blank_config_symbol_names_the_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[tickers]\nsymbols = [\"IBM\", \" \"]\n",
    )
    .unwrap();
    let output = run(dir.path(), &["--once"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[tickers] symbols"));
    assert!(!stderr.contains("--tickers list"));
}

#[test]
fn test_invalid_delay() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["-t", "AAPL", "-d", "invalid"]);

    assert!(!output.status.success());
}

#[test]
fn test_invalid_export_format() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--once", "-t", "AAPL", "--export", "xml"]);

    assert!(!output.status.success());
}

#[test]
fn test_broken_explicit_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "[general\n").unwrap();
    let output = run(dir.path(), &["--once", "-t", "AAPL"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config.toml"));
}

/// Test one-shot mode with network access.
/// This test is ignored by default as it requires network access.
/// Run with: cargo test -- --ignored
#[test]
#[ignore]
fn test_once_with_network() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--once", "-t", "aapl,msft", "--timeout", "5"]);

    // Network failure is acceptable in CI
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("TKR"));
        assert!(stdout.contains("AAPL"));
        assert!(stdout.contains("MSFT"));
    }
}
