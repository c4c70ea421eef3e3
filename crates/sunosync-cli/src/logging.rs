//! Tracing setup: compact console output plus a plain-text log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset.
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global subscriber.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` wins over the `info`
/// default. With a log file, events are also appended to it without ANSI
/// colors. Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = if verbose {
        EnvFilter::new(default_directive(true))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
    };

    let (file_layer, guard) = match log_file.and_then(split_log_path) {
        Some((dir, name)) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Failed to create log directory {}: {e}", dir.display());
            }
            let appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .compact(),
        )
        .with(file_layer)
        .try_init()
        .ok();

    guard
}

fn split_log_path(path: &Path) -> Option<(&Path, &std::ffi::OsStr)> {
    let name = path.file_name()?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Some((dir, name))
}
