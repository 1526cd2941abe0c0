//! File logging.
//!
//! The terminal belongs to the UI, so logs only go to a file.
//!
//! Filter priority:
//! 1. `VCVIEW_LOG` - a bare level (`debug`) applies to the vcview crates, anything
//!    with `=`, `:` or `,` is used as a full filter
//! 2. `RUST_LOG`
//! 3. `warn` globally, `info` for the vcview crates
//!
//! Default file: `.vcview/logs/vcview-<pid>.log`, override with `--log-file`.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: &[&str] = &["vcview", "vc_base", "vc_mod_git"];

/// Must be held for the lifetime of the program; dropping it flushes the file writer.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub fn init(log_dir: &Path, override_path: Option<PathBuf>) -> anyhow::Result<LogGuard> {
    let (dir, filename) = resolve_log_path(log_dir, override_path);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().with_writer(non_blocking_file).with_ansi(false).with_filter(create_filter());

    Registry::default().with(file_layer).try_init().context("installing tracing subscriber")?;

    Ok(LogGuard { _file_guard: file_guard, log_file: dir.join(filename) })
}

fn resolve_log_path(log_dir: &Path, override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("vcview-{}.log", std::process::id());

    match override_path {
        // A path with an extension names the file itself
        Some(path) if path.extension().is_some() => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or(filename);
            (dir.to_path_buf(), name)
        }
        Some(dir) => (dir, filename),
        None => (log_dir.to_path_buf(), filename),
    }
}

fn create_filter() -> EnvFilter {
    if let Ok(level) = env::var("VCVIEW_LOG") {
        return EnvFilter::new(expand_level(&level));
    }
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }
    EnvFilter::new(expand_level("info"))
}

fn expand_level(level: &str) -> String {
    if level.contains('=') || level.contains(':') || level.contains(',') {
        return level.to_string();
    }
    let crates: Vec<String> = CRATES.iter().map(|c| format!("{}={}", c, level)).collect();
    format!("warn,{}", crates.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_expands_to_our_crates() {
        assert_eq!(expand_level("debug"), "warn,vcview=debug,vc_base=debug,vc_mod_git=debug");
        assert_eq!(expand_level("vc_mod_git=trace"), "vc_mod_git=trace");
    }

    #[test]
    fn log_path_resolution() {
        let (dir, name) = resolve_log_path(Path::new(".vcview/logs"), None);
        assert_eq!(dir, PathBuf::from(".vcview/logs"));
        assert!(name.starts_with("vcview-") && name.ends_with(".log"));

        let (dir, name) = resolve_log_path(Path::new("x"), Some(PathBuf::from("/tmp/out.log")));
        assert_eq!((dir, name.as_str()), (PathBuf::from("/tmp"), "out.log"));

        let (dir, name) = resolve_log_path(Path::new("x"), Some(PathBuf::from("out.log")));
        assert_eq!((dir, name.as_str()), (PathBuf::from("."), "out.log"));

        let (dir, _) = resolve_log_path(Path::new("x"), Some(PathBuf::from("/var/log/vcview")));
        assert_eq!(dir, PathBuf::from("/var/log/vcview"));
    }
}
