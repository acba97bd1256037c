// kernel/src/context.rs
//! Process-wide boot context.
//!
//! One `BootContext` exists for the life of the kernel. It is created by the
//! board before bring-up and handed by reference to every component that
//! needs it; interrupt trampolines reach it through the board's static.
//!
//! Sharing model: the serial-receive handler is the only writer of the
//! keycode mailbox and the only user of the packet decoder; the main thread
//! only reads. Every shared field is a single atomic word, so no
//! read-modify-write sequence ever needs interrupts masked.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use spin::Mutex;

use crate::vdp::PacketDecoder;

/// Boot flavour, read once from the flag that survives soft resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    /// Full power cycle: handshake with the coprocessor, optional startup script.
    Cold,
    /// Soft reset: coprocessor already up, clear the screen and carry on.
    Warm,
}

impl BootMode {
    pub const fn from_flag(cold_boot: bool) -> Self {
        if cold_boot {
            BootMode::Cold
        } else {
            BootMode::Warm
        }
    }

    pub const fn is_cold(self) -> bool {
        matches!(self, BootMode::Cold)
    }
}

/// Single-slot, last-value-wins key mailbox. 0 means empty.
#[derive(Debug)]
pub struct KeycodeMailbox {
    slot: AtomicU8,
}

impl KeycodeMailbox {
    pub const fn new() -> Self {
        Self { slot: AtomicU8::new(0) }
    }

    /// Overwrite the slot unconditionally. Called from the receive ISR.
    #[inline]
    pub fn post(&self, keycode: u8) {
        self.slot.store(keycode, Ordering::Release);
    }

    /// Most recent keycode, without consuming it.
    #[inline]
    pub fn latest(&self) -> u8 {
        self.slot.load(Ordering::Acquire)
    }

    /// Consume the pending keycode, if any.
    #[inline]
    pub fn take(&self) -> Option<u8> {
        match self.slot.swap(0, Ordering::AcqRel) {
            0 => None,
            key => Some(key),
        }
    }
}

impl Default for KeycodeMailbox {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BootContext {
    mode: BootMode,
    keycode: KeycodeMailbox,
    frames: AtomicU32,
    // locked only from the receive ISR; interrupts never nest with themselves
    receiver: Mutex<PacketDecoder>,
}

impl BootContext {
    pub const fn new(mode: BootMode) -> Self {
        Self {
            mode,
            keycode: KeycodeMailbox::new(),
            frames: AtomicU32::new(0),
            receiver: Mutex::new(PacketDecoder::new()),
        }
    }

    #[inline]
    pub fn mode(&self) -> BootMode {
        self.mode
    }

    #[inline]
    pub fn is_cold_boot(&self) -> bool {
        self.mode.is_cold()
    }

    #[inline]
    pub fn keycode(&self) -> &KeycodeMailbox {
        &self.keycode
    }

    /// Frame-sync interrupts seen since boot (wraps).
    #[inline]
    pub fn frames(&self) -> u32 {
        self.frames.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn receiver(&self) -> &Mutex<PacketDecoder> {
        &self.receiver
    }
}

impl core::fmt::Debug for BootContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootContext")
            .field("mode", &self.mode)
            .field("keycode", &self.keycode.latest())
            .field("frames", &self.frames())
            .finish()
    }
}
