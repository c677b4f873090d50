use crate::modules::logger::file::setup_file_logger;
use crate::modules::settings::cli::SETTINGS;
use chrono::Local;
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use tracing_subscriber::EnvFilter;

mod file;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

pub fn initialize_logging() -> Result<(), String> {
    let level = parse_log_level(&SETTINGS.smabridge_log_level)?;
    let result = if SETTINGS.smabridge_log_to_file {
        setup_file_logger(level)
    } else {
        setup_stdout_logger(level)
    };
    result.map_err(|e| format!("Failed to install the global log subscriber: {}", e))
}

fn setup_stdout_logger(level: Level) -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_target(true)
        .with_timer(LocalTimer);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(level_filter(level))
        .with_ansi(SETTINGS.smabridge_ansi_logs)
        .with_writer(std::io::stdout)
        .event_format(format)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// Our own crates log at the configured level, the HTTP stack one level quieter.
fn level_filter(level: Level) -> EnvFilter {
    let noisy = match level {
        Level::TRACE => Level::DEBUG,
        Level::DEBUG => Level::INFO,
        _ => Level::WARN,
    };
    EnvFilter::new(format!(
        "{level},hyper={noisy},reqwest={noisy},rustls={noisy},poem={level}",
        level = level.as_str().to_lowercase(),
        noisy = noisy.as_str().to_lowercase()
    ))
}

fn parse_log_level(value: &str) -> Result<Level, String> {
    value.parse::<Level>().map_err(|_| {
        format!(
            "Invalid log level specified. Use one of: error, warn, info, debug, trace. \
             The log level you currently specified is 'smabridge_log_level'='{}'",
            value
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_levels() {
        assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), Level::WARN);
    }

    #[test]
    fn rejects_unknown_level() {
        let message = parse_log_level("verbose").unwrap_err();
        assert!(message.contains("'smabridge_log_level'='verbose'"));
    }
}
