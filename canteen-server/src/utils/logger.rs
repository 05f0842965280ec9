//! Logging infrastructure
//!
//! Structured logging setup for development and production. Controlled
//! by `RUST_LOG` where set, falling back to the given level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with an optional file output
///
/// When `log_dir` points at an existing directory, logs additionally go
/// to a daily-rolling file in it.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "canteen-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
