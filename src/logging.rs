use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a log file path.
pub const LOG_FILE_ENV: &str = "UNISTATE_LOG";
/// Environment variable that, when set, logs to stderr instead.
pub const LOG_STDERR_ENV: &str = "UNISTATE_LOG_STDERR";

/// Initialize tracing.
///
/// Logging is off unless `UNISTATE_LOG` names a file or `UNISTATE_LOG_STDERR`
/// is set. File names get a `.{timestamp}.{pid}` suffix so that concurrent
/// processes never share a file. The filter comes from `RUST_LOG`, default
/// `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Ok(log_path) = std::env::var(LOG_FILE_ENV) {
        let unique_path = unique_log_path(&log_path);
        let Ok(file) = std::fs::File::create(&unique_path) else {
            eprintln!("Warning: Failed to create log file: {}", unique_path);
            return;
        };

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_level(true);

        // A subscriber installed earlier (e.g. by a test harness) wins.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .try_init();
        return;
    }

    if std::env::var_os(LOG_STDERR_ENV).is_some() {
        let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(true);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init();
    }
}

fn unique_log_path(base: &str) -> String {
    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}.{}.{}", base, timestamp, pid)
}
