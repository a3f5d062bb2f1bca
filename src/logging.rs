// src/logging.rs

//! Minimal `log` backend that prints `[LEVEL] message` to stderr in colour.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

struct TermLogger;

static LOGGER: TermLogger = TermLogger;

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Cyan,
        Level::Trace => Color::Magenta,
    }
}

impl Log for TermLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let stderr = StandardStream::stderr(ColorChoice::Auto);
        let mut stderr = stderr.lock();
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(level_color(record.level()))).set_bold(true);
        let _ = stderr.set_color(&spec);
        let _ = write!(stderr, "[{}]", record.level());
        let _ = stderr.reset();
        let _ = writeln!(stderr, " {}", record.args());
    }

    fn flush(&self) {}
}

/// Installs the logger. Fails if another logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
