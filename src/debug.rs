//! Logging for rootclock
//!
//! Routes the `log` facade to stderr, one line per record:
//! `[timestamp] [LEVEL] [target] message`.
//!
//! Level precedence, highest first:
//! - the `--log-level` CLI flag
//! - the `RUST_LOG` environment variable (a plain level name)
//! - `log_level` from the config file, applied once it is loaded

use parking_lot::Mutex;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use rootclock_config::LogLevel;

/// Writes records to stderr; the mutex keeps lines from interleaving.
struct StderrLogger {
    lock: Mutex<()>,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        let _guard = self.lock.lock();
        let _ = std::io::stderr().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Set when the CLI or `RUST_LOG` chose the level, so the config cannot
/// override it.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// The level from the CLI flag or `RUST_LOG`, if either is set.
pub fn pinned_level(cli_level: Option<LogLevel>, rust_log: Option<&str>) -> Option<LevelFilter> {
    cli_level
        .map(LogLevel::to_level_filter)
        .or_else(|| rust_log.and_then(|v| v.trim().parse::<LevelFilter>().ok()))
}

/// Install the stderr logger.
///
/// Until [`apply_config_level`] runs the level is the pinned one or the
/// config default.
pub fn init_log_bridge(cli_level: Option<LogLevel>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let pinned = pinned_level(cli_level, rust_log.as_deref());
    LEVEL_PINNED.store(pinned.is_some(), Ordering::SeqCst);

    let logger = LOGGER.get_or_init(|| StderrLogger {
        lock: Mutex::new(()),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(pinned.unwrap_or_else(|| LogLevel::default().to_level_filter()));
    }
}

/// Apply the config file's level unless the CLI or `RUST_LOG` set one.
pub fn apply_config_level(level: LogLevel) {
    if !LEVEL_PINNED.load(Ordering::SeqCst) {
        log::set_max_level(level.to_level_filter());
    }
}
