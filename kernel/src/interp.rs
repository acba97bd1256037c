// kernel/src/interp.rs
//! Command interpreter boundary.
//!
//! The interpreter is external; the core hands it a line and gets back an
//! [`ExecResult`]. Codes mean something only to the interpreter, except for
//! the message table below used to report them.

use core::fmt;
use core::num::NonZeroU32;

use crate::ui::line::CommandLine;

pub type ExecResult = Result<(), ErrorCode>;

/// Positive interpreter error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(NonZeroU32);

impl ErrorCode {
    pub const DISK_ERROR: Self = Self::known(1);
    pub const NO_FILE: Self = Self::known(4);
    pub const NO_PATH: Self = Self::known(5);
    pub const INVALID_NAME: Self = Self::known(6);
    pub const NO_FILESYSTEM: Self = Self::known(13);
    pub const INVALID_PARAMETER: Self = Self::known(19);
    pub const INVALID_COMMAND: Self = Self::known(20);
    pub const INVALID_EXECUTABLE: Self = Self::known(21);

    const fn known(raw: u32) -> Self {
        match NonZeroU32::new(raw) {
            Some(code) => Self(code),
            None => panic!("error code 0 means success"),
        }
    }

    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Registered message for this code, if any.
    pub fn lookup(self) -> Option<&'static str> {
        MESSAGES.get(self.get() as usize).copied()
    }

    /// Message to show the operator; never empty.
    pub fn message(self) -> &'static str {
        self.lookup().unwrap_or(UNKNOWN_ERROR)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lookup() {
            Some(msg) => f.write_str(msg),
            None => write!(f, "{} {}", UNKNOWN_ERROR, self.get()),
        }
    }
}

/// Map a raw interpreter status: anything `<= 0` is success.
pub fn from_status(status: i32) -> ExecResult {
    match u32::try_from(status).ok().and_then(ErrorCode::new) {
        Some(code) => Err(code),
        None => Ok(()),
    }
}

pub const UNKNOWN_ERROR: &str = "Unknown error";

// Index is the error code; slot 0 is success and never reported.
static MESSAGES: [&str; 26] = [
    "OK",
    "Error accessing SD card",
    "Assertion failed",
    "SD card failure",
    "Could not find file",
    "Could not find path",
    "Invalid path name",
    "Access denied or directory full",
    "Access denied",
    "Invalid file/directory object",
    "SD card is write protected",
    "Logical drive number is invalid",
    "Volume has no work area",
    "No valid FAT volume",
    "Error occurred during mkfs",
    "Volume timeout",
    "Volume locked",
    "LFN working buffer could not be allocated",
    "Too many open files",
    "Invalid parameter",
    "Invalid command",
    "Invalid executable",
    "Out of memory",
    "Not implemented",
    "Load overlaps system area",
    "Bad string",
];

/// External command interpreter.
pub trait CommandInterpreter {
    /// Execute one command line (terminator excluded).
    fn exec(&mut self, line: &[u8]) -> ExecResult;

    /// Load `path` from the mounted filesystem and execute it line by line,
    /// using `scratch` as the line buffer.
    fn exec_script(&mut self, path: &str, scratch: &mut CommandLine) -> ExecResult;
}
