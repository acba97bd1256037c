// kernel/src/irq/mod.rs
//! Interrupt vectors: the closed set of sources, the two-phase installer and
//! the handler bodies the board trampolines call into.

use bitflags::bitflags;

pub mod handlers;
pub mod table;

pub use handlers::{on_frame_sync, on_serial_receive};
pub use table::{PendingEnable, VectorInstaller, VectorTable};

/// Interrupt sources this kernel relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorId {
    /// Display frame sync from the coprocessor side of the board.
    FrameSync,
    /// Byte received on the coprocessor link.
    SerialReceive,
}

impl VectorId {
    pub const ALL: [VectorId; 2] = [VectorId::FrameSync, VectorId::SerialReceive];
    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        match self {
            VectorId::FrameSync => 0,
            VectorId::SerialReceive => 1,
        }
    }

    #[inline]
    pub const fn mask(self) -> VectorSet {
        match self {
            VectorId::FrameSync => VectorSet::FRAME_SYNC,
            VectorId::SerialReceive => VectorSet::SERIAL_RECEIVE,
        }
    }
}

bitflags! {
    /// Set of installed vectors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VectorSet: u8 {
        const FRAME_SYNC     = 1 << 0;
        const SERIAL_RECEIVE = 1 << 1;
    }
}

/// Handler entry point as written into the vector table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerAddr(usize);

impl HandlerAddr {
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}
