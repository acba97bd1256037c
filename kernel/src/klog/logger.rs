// kernel/src/klog/logger.rs
//
// `log::Log` implementation for the kernel
// - one line per record: "[LEVEL] target: message\r\n"
// - lines are formatted on the stack and truncated at MAX_LINE
// - the sink is a plain function installed at runtime; records are
//   dropped until one is present
// - never called from interrupt handlers

use core::fmt::{self, Write};

use heapless::String;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

pub const MAX_LINE: usize = 192;

/// Receives one fully formatted line, terminator included.
pub type LogSink = fn(&str);

pub struct KernelLogger {
    sink: Mutex<Option<LogSink>>,
}

impl KernelLogger {
    pub const fn new() -> Self {
        Self { sink: Mutex::new(None) }
    }

    pub fn set_sink(&self, sink: LogSink) {
        *self.sink.lock() = Some(sink);
    }
}

impl Default for KernelLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Some(sink) = *self.sink.lock() else {
            return;
        };
        sink(format_record(record).as_str());
    }

    fn flush(&self) {}
}

fn tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DBG",
        Level::Trace => "TRC",
    }
}

/// Fills a buffer char by char and stops at the first one that does not fit.
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.0.push(c).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

/// Render one record. Overlong messages are cut so the line ending always fits.
pub fn format_record(record: &Record<'_>) -> String<MAX_LINE> {
    let mut body: String<{ MAX_LINE - 2 }> = String::new();
    // Err here only means the body was cut short
    let _ = write!(
        Truncating(&mut body),
        "[{}] {}: {}",
        tag(record.level()),
        record.target(),
        record.args()
    );

    let mut line = String::new();
    let _ = line.push_str(&body);
    let _ = line.push_str("\r\n");
    line
}

static LOGGER: KernelLogger = KernelLogger::new();

/// Install the kernel logger with `sink` as its output.
pub fn init(sink: LogSink, level: LevelFilter) -> Result<(), SetLoggerError> {
    LOGGER.set_sink(sink);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
