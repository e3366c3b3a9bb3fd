//! Logger initialization.

use log::LevelFilter;

/// Initialize `env_logger`.
///
/// `RUST_LOG` wins when set, so per-module filters keep working
/// (`RUST_LOG=firmsite=debug`). Otherwise `level` applies to everything.
/// Calling this twice is harmless.
pub fn init_logger(level: LevelFilter) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let _ = logger_builder(level, rust_log.as_deref()).try_init();
}

fn logger_builder(level: LevelFilter, rust_log: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    match rust_log {
        Some(filters) if !filters.trim().is_empty() => {
            builder.parse_filters(filters);
        }
        _ => {
            builder.filter_level(level);
            builder.filter_module("html5ever", LevelFilter::Error);
            builder.filter_module("selectors", LevelFilter::Warn);
        }
    }
    builder.format_timestamp_millis();
    builder
}
