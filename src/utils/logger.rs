use crate::utils::validation::LOG_LEVELS;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is unset.
///
/// Monitoring stats are logged at info, so enabling the monitor raises a quieter
/// level to info.
pub fn default_directive(verbose: bool, monitor: bool, level: Option<&str>) -> String {
    if verbose {
        return "require_bundler=debug,info".to_string();
    }

    let level = level.unwrap_or("warn");
    let rank = |l: &str| LOG_LEVELS.iter().position(|known| *known == l);
    let level = match (monitor, rank(level), rank("info")) {
        (true, Some(current), Some(info)) if current > info => "info",
        (true, None, _) => "info",
        _ => level,
    };
    format!("require_bundler={}", level)
}

fn default_filter(verbose: bool, monitor: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, monitor, level)))
}

/// Compact human-readable logs on stderr; stdout stays free for reports.
pub fn init_cli_logger(verbose: bool, monitor: bool) {
    init_cli_logger_with_level(verbose, monitor, None);
}

/// Like [`init_cli_logger`], with a default level taken from configuration.
pub fn init_cli_logger_with_level(verbose: bool, monitor: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, monitor, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, monitor: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, monitor, None))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
