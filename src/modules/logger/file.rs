use crate::modules::logger::{level_filter, LocalTimer};
use crate::modules::settings::cli::SETTINGS;
use crate::modules::settings::dir::DATA_DIR_MANAGER;
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

pub static LOG_WORKER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn setup_file_logger(level: Level) -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
    let server_nonb = match server_log_writer() {
        Some((writer, guard)) => {
            let _ = LOG_WORKER_GUARD.set(guard);
            writer
        }
        None => {
            // Fall back to stdout so start-up errors stay visible.
            let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            let _ = LOG_WORKER_GUARD.set(guard);
            writer
        }
    };

    let server_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_level(true)
        .with_writer(server_nonb)
        .with_target(true);

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(level))
        .with(server_layer);

    tracing::subscriber::set_global_default(subscriber)
}

fn server_log_writer() -> Option<(NonBlocking, WorkerGuard)> {
    let rolling = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("smabridge")
        .max_log_files(SETTINGS.smabridge_max_server_log_files)
        .build(DATA_DIR_MANAGER.log_dir.clone());
    match rolling {
        Ok(rolling) => Some(tracing_appender::non_blocking(rolling)),
        Err(e) => {
            eprintln!(
                "failed to initialize rolling file appender in {:?}: {}",
                DATA_DIR_MANAGER.log_dir, e
            );
            None
        }
    }
}
