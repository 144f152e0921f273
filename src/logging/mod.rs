use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;

/// Get the appropriate log level based on verbosity
pub fn get_log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Name of the log file written in dev mode
pub fn dev_log_file_name() -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("dataproc_url_dev_{}.log", timestamp)
}

/// Initialize tracing for the process.
///
/// Logs go to stderr so stdout stays clean for the printed URL or host. In dev
/// mode they go to a timestamped file instead; the returned guard must be held
/// until exit or buffered lines are lost.
pub fn init(verbosity: u8, dev: bool) -> Result<Option<WorkerGuard>> {
    if dev {
        let log_file_path = dev_log_file_name();
        eprintln!("🔍 Development mode enabled. Logs will be written to: {}", log_file_path);

        let file_appender = tracing_appender::rolling::never(".", &log_file_path);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        fmt()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .with_writer(non_blocking)
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
        return Ok(Some(guard));
    }

    fmt()
        .with_max_level(get_log_level(verbosity))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
    Ok(None)
}
