//! Logger setup.

use std::{str::FromStr, sync::Once};

use log::LevelFilter;

/// Overrides the configured level, e.g. `OBSIDIAN_LOG=debug`.
pub const LOG_ENV: &str = "OBSIDIAN_LOG";

static INIT: Once = Once::new();

/// Resolves the level filter: the environment override wins over `configured`, and anything
/// unparsable falls back to `Info`.
pub fn resolve_level(configured: &str, env: Option<&str>) -> LevelFilter {
    env.and_then(|s| LevelFilter::from_str(s.trim()).ok())
        .or_else(|| LevelFilter::from_str(configured.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

/// Installs the global `fern` logger writing timestamped lines to stderr. Later calls are
/// ignored.
pub fn init(configured_level: &str) {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV).ok();
        let level = resolve_level(configured_level, env.as_deref());

        let result = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] {}: {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(level)
            .chain(std::io::stderr())
            .apply();

        match result {
            Ok(()) => log::debug!("Logging initialized at {}", level),
            Err(err) => eprintln!("Failed to initialize logging: {}", err),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_config() {
        assert_eq!(resolve_level("info", Some("debug")), LevelFilter::Debug);
        assert_eq!(resolve_level("warn", None), LevelFilter::Warn);
        assert_eq!(resolve_level("warn", Some("nonsense")), LevelFilter::Warn);
        assert_eq!(resolve_level("nonsense", None), LevelFilter::Info);
    }
}
