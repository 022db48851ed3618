//! Tracing subscriber setup.
//!
//! The interactive view owns the terminal, so it never logs to stderr: logs go
//! to `--log-file` or to a file under the user's cache directory. One-shot
//! mode logs to stderr unless a file is given.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// No file location could be determined; drop everything.
    Discard,
}

impl LogTarget {
    /// Pick a destination from the CLI and run mode.
    pub fn resolve(log_file: Option<&Path>, interactive: bool) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path.to_path_buf()),
            None if interactive => default_log_path().map_or(LogTarget::Discard, LogTarget::File),
            None => LogTarget::Stderr,
        }
    }
}

/// Default log file location.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("tickrs").join("tickrs.log"))
}

/// Directives used when `RUST_LOG` is unset. Verbose only raises our own
/// crate; HTTP internals stay at info.
fn default_directives(verbose: bool) -> &'static str {
    if verbose { "tickrs=debug,info" } else { "info" }
}

/// Base filter: `RUST_LOG` if set, otherwise [`default_directives`].
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

/// Install the global subscriber.
pub fn init(target: &LogTarget, verbose: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(verbose));

    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_explicit_file() {
        let target = LogTarget::resolve(Some(Path::new("/tmp/t.log")), true);
        assert_eq!(target, LogTarget::File(PathBuf::from("/tmp/t.log")));
        let target = LogTarget::resolve(Some(Path::new("/tmp/t.log")), false);
        assert_eq!(target, LogTarget::File(PathBuf::from("/tmp/t.log")));
    }

    #[test]
    fn test_resolve_one_shot_uses_stderr() {
        assert_eq!(LogTarget::resolve(None, false), LogTarget::Stderr);
    }

    #[test]
    fn test_resolve_interactive_never_stderr() {
        assert_ne!(LogTarget::resolve(None, true), LogTarget::Stderr);
    }

    #[test]
    fn test_verbose_raises_only_this_crate() {
        assert_eq!(default_directives(false), "info");
        assert_eq!(default_directives(true), "tickrs=debug,info");
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tickrs.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
