//! Stderr backend for the `log` facade.
//!
//! Lines look like `[00:00:01.204][DEBUG] message`, timed from the first
//! record.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static START: OnceLock<Instant> = OnceLock::new();
static LOGGER: StderrLogger = StderrLogger;

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = u64::try_from(ms).unwrap_or(u64::MAX);
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Writes every enabled record to stderr.
#[derive(Debug, Clone, Copy)]
pub struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = fmt_elapsed(start().elapsed().as_millis());
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{elapsed}][{}] {}",
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install [`StderrLogger`] at `level`.
///
/// # Errors
///
/// Fails if another logger was installed first.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    start();
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

/// `Debug` in debug builds, `Info` otherwise.
#[must_use]
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        Level::Debug.to_level_filter()
    } else {
        Level::Info.to_level_filter()
    }
}
