// kernel/src/config.rs
//! Link parameters and build configuration.
//!
//! Both values are plain `Copy` data built with `const fn`, so a board can
//! keep them in statics. The startup-script toggle is an ordinary field:
//! the `autoexec` cargo feature only picks its default.

/// Parity mode of the coprocessor link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: Parity,
}

impl SerialConfig {
    /// Fixed link to the display/input coprocessor: 1,152,000 baud, 8N1.
    pub const COPROCESSOR: Self = Self {
        baud: 1_152_000,
        data_bits: 8,
        stop_bits: 1,
        parity: Parity::None,
    };
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::COPROCESSOR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosConfig {
    /// Product name printed in front of the banner.
    pub product: &'static str,
    pub version: u8,
    pub revision: u8,
    /// Release candidate number; 0 means a final release.
    pub rc: u8,
    /// Prompt character, also prefixed to the escape notice.
    pub prompt: char,
    /// Run the startup script on cold boot.
    pub autoexec: bool,
    pub autoexec_path: &'static str,
    pub serial: SerialConfig,
}

impl MosConfig {
    pub const fn new() -> Self {
        Self {
            product: "Agon Quark",
            version: 1,
            revision: 3,
            rc: 0,
            prompt: '*',
            autoexec: cfg!(feature = "autoexec"),
            autoexec_path: "autoexec.txt",
            serial: SerialConfig::COPROCESSOR,
        }
    }

    pub const fn with_product(mut self, product: &'static str) -> Self {
        self.product = product;
        self
    }

    pub const fn with_version(mut self, version: u8, revision: u8, rc: u8) -> Self {
        self.version = version;
        self.revision = revision;
        self.rc = rc;
        self
    }

    pub const fn with_prompt(mut self, prompt: char) -> Self {
        self.prompt = prompt;
        self
    }

    pub const fn with_autoexec(mut self, enabled: bool) -> Self {
        self.autoexec = enabled;
        self
    }

    pub const fn with_serial(mut self, serial: SerialConfig) -> Self {
        self.serial = serial;
        self
    }
}

impl Default for MosConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coprocessor_link_is_8n1_at_1152000() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baud, 1_152_000);
        assert_eq!((cfg.data_bits, cfg.stop_bits, cfg.parity), (8, 1, Parity::None));
    }

    #[test]
    fn autoexec_default_follows_feature() {
        assert_eq!(MosConfig::new().autoexec, cfg!(feature = "autoexec"));
        assert!(!MosConfig::new().with_autoexec(false).autoexec);
    }

    #[test]
    fn builders_override_fields() {
        const CFG: MosConfig = MosConfig::new().with_version(2, 1, 4).with_prompt('>');
        assert_eq!((CFG.version, CFG.revision, CFG.rc), (2, 1, 4));
        assert_eq!(CFG.prompt, '>');
        assert_eq!(CFG.autoexec_path, "autoexec.txt");
    }
}
