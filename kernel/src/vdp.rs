// kernel/src/vdp.rs
//
// VDP coprocessor protocol
// - Reserved system command codes (upper byte space 0x80..=0xFF)
// - Control bytes the core emits itself (CLS, VDU 23 prefix, ESC)
// - Outbound `VDU 23,0,<cmd>,args...` sequences
// - Inbound packet decoder fed one byte at a time from the receive ISR
//
// Bytes 0x00..=0x7F stay ordinary text/control characters.

use arrayvec::ArrayVec;

use crate::hal::SerialLink;

/// Clear screen.
pub const CLS: u8 = 0x0C;
/// `VDU 23` prefix for system/user-defined commands.
pub const VDU_SYSTEM: u8 = 23;
/// Readiness sentinel sent once by the coprocessor after its own boot.
pub const ESC: u8 = 0x1B;

/// Payload bytes kept per inbound packet; longer packets are discarded.
pub const PACKET_CAPACITY: usize = 16;

/// Sub-commands this kernel may send after `VDU 23,0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VduCommand {
    General = 0x80,
    KeyEvent = 0x81,
    Cursor = 0x82,
    CharAt = 0x83,
    PixelAt = 0x84,
    Audio = 0x85,
    Mode = 0x86,
    Clock = 0x87,
    KeyState = 0x88,
    LogicalCoords = 0xC0,
    TerminalMode = 0xFF,
}

impl VduCommand {
    pub const ALL: [VduCommand; 11] = [
        VduCommand::General,
        VduCommand::KeyEvent,
        VduCommand::Cursor,
        VduCommand::CharAt,
        VduCommand::PixelAt,
        VduCommand::Audio,
        VduCommand::Mode,
        VduCommand::Clock,
        VduCommand::KeyState,
        VduCommand::LogicalCoords,
        VduCommand::TerminalMode,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x80 => VduCommand::General,
            0x81 => VduCommand::KeyEvent,
            0x82 => VduCommand::Cursor,
            0x83 => VduCommand::CharAt,
            0x84 => VduCommand::PixelAt,
            0x85 => VduCommand::Audio,
            0x86 => VduCommand::Mode,
            0x87 => VduCommand::Clock,
            0x88 => VduCommand::KeyState,
            0xC0 => VduCommand::LogicalCoords,
            0xFF => VduCommand::TerminalMode,
            _ => return None,
        })
    }
}

/// Emit `VDU 23, 0, <cmd>, args...` on the link.
pub fn write_system_command(link: &mut dyn SerialLink, cmd: VduCommand, args: &[u8]) {
    link.write_all(&[VDU_SYSTEM, 0, cmd.code()]);
    link.write_all(args);
}

// inbound packets

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub ascii: u8,
    pub modifiers: u8,
    pub vkey: u8,
    pub down: bool,
}

/// One complete `header, length, data[length]` packet from the coprocessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: u8,
    data: ArrayVec<u8, PACKET_CAPACITY>,
}

impl Packet {
    pub fn header(&self) -> u8 {
        self.header
    }

    pub fn command(&self) -> Option<VduCommand> {
        VduCommand::from_code(self.header)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn key_event(&self) -> Option<KeyEvent> {
        match (self.command(), self.data.as_slice()) {
            (Some(VduCommand::KeyEvent), &[ascii, modifiers, vkey, down, ..]) => Some(KeyEvent {
                ascii,
                modifiers,
                vkey,
                down: down != 0,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    Idle,
    Length,
    Data { remaining: u8 },
}

/// Byte-at-a-time packet decoder. Owned by the serial-receive path only.
#[derive(Debug)]
pub struct PacketDecoder {
    state: RxState,
    header: u8,
    data: ArrayVec<u8, PACKET_CAPACITY>,
    overflowed: bool,
}

impl PacketDecoder {
    pub const fn new() -> Self {
        Self {
            state: RxState::Idle,
            header: 0,
            data: ArrayVec::new_const(),
            overflowed: false,
        }
    }

    /// Feed one received byte; returns a packet when it completes one.
    ///
    /// Bytes below 0x80 outside a packet are ignored, as is any packet
    /// whose payload exceeds [`PACKET_CAPACITY`].
    pub fn feed(&mut self, byte: u8) -> Option<Packet> {
        match self.state {
            RxState::Idle => {
                if byte & 0x80 != 0 {
                    self.header = byte;
                    self.state = RxState::Length;
                }
                None
            }
            RxState::Length => {
                self.data.clear();
                self.overflowed = false;
                if byte == 0 {
                    self.state = RxState::Idle;
                    return self.finish();
                }
                self.state = RxState::Data { remaining: byte };
                None
            }
            RxState::Data { remaining } => {
                if self.data.try_push(byte).is_err() {
                    self.overflowed = true;
                }
                if remaining > 1 {
                    self.state = RxState::Data { remaining: remaining - 1 };
                    return None;
                }
                self.state = RxState::Idle;
                self.finish()
            }
        }
    }

    fn finish(&mut self) -> Option<Packet> {
        if self.overflowed {
            return None;
        }
        Some(Packet { header: self.header, data: self.data.clone() })
    }
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new()
    }
}
