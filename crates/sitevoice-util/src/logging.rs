use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Keeps the non-blocking file writer alive. Dropping it flushes pending
/// log lines, so binaries hold it for the lifetime of `main`.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
    pub path: Option<PathBuf>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber.
///
/// With `print` set, events go to stderr. Otherwise they are written to a
/// timestamped file under `log_dir` (current directory when `None`). When the
/// file cannot be created the subscriber falls back to stderr.
pub fn init_tracing(log_dir: Option<&Path>, print: bool) -> LogGuard {
    if print {
        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
        return LogGuard {
            _worker: None,
            path: None,
        };
    }

    let log_dir = log_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let timestamp = Local::now().format("%Y-%m-%dT%H%M%S").to_string();
    let log_path = log_dir.join(format!("{}.log", timestamp));

    let _ = std::fs::create_dir_all(&log_dir);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path);

    match file {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .try_init();
            LogGuard {
                _worker: Some(guard),
                path: Some(log_path),
            }
        }
        Err(error) => {
            let _ = tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init();
            tracing::warn!(path = %log_path.display(), %error, "could not open log file, logging to stderr");
            LogGuard {
                _worker: None,
                path: None,
            }
        }
    }
}
