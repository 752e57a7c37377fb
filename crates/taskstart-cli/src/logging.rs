use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the process-wide subscriber: every event goes to the log file and
/// stdout, errors are repeated on stderr. Keep the guard alive until exit so
/// the file writer flushes.
pub fn init(log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("invalid log file path: {}", log_file.display()))?;
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_ansi(false);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr.with_max_level(Level::ERROR))
        .with_target(true);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .with(stdout_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(guard)
}
