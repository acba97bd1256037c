//! Kernel logging backend for the `log` facade.

pub mod logger;

pub use logger::{format_record, init, KernelLogger, LogSink, MAX_LINE};
