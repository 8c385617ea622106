//! Log bridge for the `tagwm` binary.
//!
//! Routes every `log::info!()`/`log::warn!()`/... call from this crate and the
//! `tagwm-*` library crates to stderr as `[LEVEL target] message` lines.
//!
//! Level precedence: the `--log-level` flag, then `RUST_LOG`, then `warn`.
//! `RUST_LOG` is read in its simplest form: the last bare level in a
//! comma-separated list (`RUST_LOG=debug`, `RUST_LOG=tagwm=trace,info`).

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

struct LogBridge {
    level: LevelFilter,
    /// Serializes whole lines so records from different threads don't interleave.
    out: Mutex<()>,
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        let _guard = self.out.lock();
        let _ = io::stderr().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Install the log bridge. Calling it again has no effect.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env = std::env::var("RUST_LOG").ok();
    let level = resolve_level(cli_level, env.as_deref());

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        level,
        out: Mutex::new(()),
    });
    if log::set_logger(bridge).is_ok() {
        log::set_max_level(bridge.level);
    }
}

fn resolve_level(cli_level: Option<LevelFilter>, env: Option<&str>) -> LevelFilter {
    cli_level
        .or_else(|| env.and_then(level_from_env))
        .unwrap_or(DEFAULT_LEVEL)
}

fn level_from_env(value: &str) -> Option<LevelFilter> {
    value
        .split(',')
        .filter(|directive| !directive.contains('='))
        .filter_map(|directive| directive.trim().parse().ok())
        .last()
}

fn format_record(record: &Record<'_>) -> String {
    format!(
        "{} [{:<5} {}] {}\n",
        timestamp(),
        record.level(),
        record.target(),
        record.args()
    )
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_cli_level_wins() {
        assert_eq!(
            resolve_level(Some(LevelFilter::Trace), Some("error")),
            LevelFilter::Trace
        );
    }

    #[test]
    fn test_env_level() {
        assert_eq!(resolve_level(None, Some("debug")), LevelFilter::Debug);
        assert_eq!(
            resolve_level(None, Some("tagwm_config=trace,info")),
            LevelFilter::Info
        );
        assert_eq!(
            resolve_level(None, Some("tagwm_config=trace")),
            DEFAULT_LEVEL
        );
        assert_eq!(resolve_level(None, Some("loud")), DEFAULT_LEVEL);
    }

    #[test]
    fn test_default_level() {
        assert_eq!(resolve_level(None, None), LevelFilter::Warn);
    }

    #[test]
    fn test_record_format() {
        let line = format_record(
            &Record::builder()
                .level(Level::Info)
                .target("tagwm_config::manager")
                .args(format_args!("config loaded"))
                .build(),
        );
        assert!(
            line.ends_with("[INFO  tagwm_config::manager] config loaded\n"),
            "{line}"
        );
    }
}
