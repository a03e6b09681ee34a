use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive; logs are flushed when it drops.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("jobb").join("logs")
}

/// Installs the global tracing subscriber writing to a daily log file.
///
/// The terminal belongs to the UI, so logs only ever go to disk. Returns
/// `None` when the log directory cannot be created or a subscriber is
/// already installed; the board runs fine without logging.
pub fn init(log_dir: Option<&Path>) -> Option<LoggingGuard> {
    let log_dir = log_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    let (non_blocking, guard) = file_writer(&log_dir).ok()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobb=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(panic = %panic_info, "panic");
        previous_hook(panic_info);
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}

/// Creates `log_dir` and a background writer appending to its daily
/// `jobb.log` file. Dropping the guard flushes pending lines.
fn file_writer(log_dir: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "jobb.log");
    Ok(tracing_appender::non_blocking(file_appender))
}
