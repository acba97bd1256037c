// kernel/src/hal.rs
//! Hardware collaborator seams.
//!
//! Byte-level drivers live outside the core. The core sees them only through
//! these object-safe traits, which is also how host tests replace them.

use crate::config::SerialConfig;
use crate::error::LinkError;
use crate::interp::ExecResult;
use crate::irq::{HandlerAddr, VectorId};

/// Serial link to the display/input coprocessor.
pub trait SerialLink {
    /// Configure and open the port. Called once during bring-up.
    fn open(&mut self, config: SerialConfig);

    /// Block until one byte arrives.
    ///
    /// On hardware this never returns `Err(LinkError::Interrupted)`; a host
    /// uses that variant to end a wait that would otherwise never finish.
    fn read_byte(&mut self) -> Result<u8, LinkError>;

    fn write_byte(&mut self, byte: u8);

    fn write_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }
}

/// Interrupt controller plus the fixed low-memory vector table.
///
/// `set_vector` and `enable` are driven by [`crate::irq::VectorInstaller`];
/// bring-up never calls them directly.
pub trait InterruptController {
    /// Globally mask interrupts.
    fn disable(&mut self);

    /// Write `handler` into the slot for `id`.
    fn set_vector(&mut self, id: VectorId, handler: HandlerAddr);

    /// Globally unmask interrupts.
    fn enable(&mut self);

    /// Entry point the board wants installed for `id`.
    fn entry_point(&self, id: VectorId) -> HandlerAddr;
}

pub trait RealTimeClock {
    fn init(&mut self);
}

/// Transport under the block storage (SPI to the SD card on the reference board).
pub trait StorageTransport {
    fn init(&mut self);
}

pub trait Filesystem {
    fn mount(&mut self) -> ExecResult;
}
