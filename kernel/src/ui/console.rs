// ui/console.rs
//
// Console output over the coprocessor link
// - fmt::Write adapter; bytes go out verbatim (the coprocessor wants "\n\r")
// - version banner, error reports, escape notice

use core::fmt::{self, Write};

use crate::config::MosConfig;
use crate::hal::SerialLink;
use crate::interp::ErrorCode;

pub struct Console<'a> {
    link: &'a mut dyn SerialLink,
}

impl<'a> Console<'a> {
    pub fn new(link: &'a mut dyn SerialLink) -> Self {
        Self { link }
    }

    #[inline]
    pub fn put(&mut self, byte: u8) {
        self.link.write_byte(byte);
    }

    /// Print the message for a failed command. Unknown codes still print.
    pub fn report(&mut self, code: ErrorCode) {
        let _ = write!(self, "{}\n\r", code);
    }

    pub fn escape_notice(&mut self, prompt: char) {
        let _ = write!(self, "{}Escape\n\r", prompt);
    }

    pub fn banner(&mut self, config: &MosConfig) {
        let _ = write_banner(self, config);
    }
}

impl Write for Console<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.link.write_all(s.as_bytes());
        Ok(())
    }
}

/// `"<product> MOS Version <major>.<minor:02>[ RC<n>]\n\r\n\r"`
pub fn write_banner<W: Write>(out: &mut W, config: &MosConfig) -> fmt::Result {
    write!(out, "{} MOS Version {}.{:02}", config.product, config.version, config.revision)?;
    if config.rc > 0 {
        write!(out, " RC{}", config.rc)?;
    }
    out.write_str("\n\r\n\r")
}
