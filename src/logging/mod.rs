/*!
 * Logging Module
 * Tracing subscriber setup and request-logging middleware.
 */
pub mod middleware;

use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system. The returned guards must be held for the
/// process lifetime; dropping them shuts down the background writer threads
/// and loses buffered log lines.
pub fn init() -> Vec<WorkerGuard> {
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let is_production = environment == "production";

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
        if is_production {
            "info".to_string()
        } else {
            "debug".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "market_content_api={},tower_http=info,axum=info",
            log_level
        ))
    });

    let mut guards = Vec::new();

    // Daily append-only file under logs/, one file per day, enabled by the
    // ENABLE_FILE_LOGS switch. Structured JSON lines so the level, message,
    // and metadata fields survive into the file.
    let file_logs_enabled = std::env::var("ENABLE_FILE_LOGS")
        .map(|v| v == "true")
        .unwrap_or(false);

    let file_layer = if file_logs_enabled {
        std::fs::create_dir_all("logs").ok();
        let appender = rolling::daily("logs", "app.log");
        let (file_writer, file_guard) = non_blocking(appender);
        guards.push(file_guard);

        Some(
            fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
    } else {
        None
    };

    let (console_writer, console_guard) = non_blocking(io::stdout());
    guards.push(console_guard);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if is_production {
        registry
            .with(fmt::layer().json().with_writer(console_writer).with_target(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(console_writer)
                    .with_target(true),
            )
            .init();
    }

    tracing::info!(environment, file_logs = file_logs_enabled, "logging initialized");

    guards
}
