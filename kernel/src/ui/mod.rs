//! Operator-facing pieces: the command line buffer, console output and the
//! dispatch loop.

pub mod cli;
pub mod console;
pub mod line;
