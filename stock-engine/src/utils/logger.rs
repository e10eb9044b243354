//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and
//! production environments.

use crate::core::config::Config;
use std::path::Path;

/// Initialize the logger from engine configuration
pub fn init_logger(config: &Config) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(
            config
                .log_level
                .parse()
                .unwrap_or(tracing::Level::INFO),
        )
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Daily-rolling file output when a log directory is configured
    if let Some(dir) = &config.log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "stock-engine");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
