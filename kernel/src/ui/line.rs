// ui/line.rs
//
// Operator line input
// - CommandLine: fixed 256-byte buffer, never grows, cleared in place
// - Terminator: how the external line editor ended the line
// - LineEditor: the editor/history collaborator (external)

use arrayvec::ArrayVec;

use crate::error::LinkError;

pub const COMMAND_LINE_CAPACITY: usize = 256;

/// Bounded command line buffer, reused across loop iterations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    buf: ArrayVec<u8, COMMAND_LINE_CAPACITY>,
}

impl CommandLine {
    pub const fn new() -> Self {
        Self { buf: ArrayVec::new_const() }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Append one byte. Returns `false` once the buffer is full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        self.buf.try_push(byte).is_ok()
    }

    pub fn pop(&mut self) -> Option<u8> {
        self.buf.pop()
    }

    /// Append as much of `bytes` as fits; returns the number taken.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> usize {
        let take = bytes.len().min(self.buf.remaining_capacity());
        // cannot fail: length checked above
        let _ = self.buf.try_extend_from_slice(&bytes[..take]);
        take
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.buf.is_full()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        COMMAND_LINE_CAPACITY
    }
}

/// How the operator finished a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// Carriage return: run the line.
    Accept,
    /// Escape (or anything unexpected): drop the line.
    Abort,
}

impl Terminator {
    pub const ACCEPT_KEY: u8 = 13;
    pub const ABORT_KEY: u8 = 27;

    pub const fn from_keycode(key: u8) -> Self {
        match key {
            Self::ACCEPT_KEY => Terminator::Accept,
            _ => Terminator::Abort,
        }
    }
}

/// External line editor. Blocks until the operator ends the line and
/// returns the terminating key code; the terminator is not stored in `line`.
pub trait LineEditor {
    fn read_line(&mut self, line: &mut CommandLine) -> Result<u8, LinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_bounded() {
        let mut line = CommandLine::new();
        let big = [b'x'; COMMAND_LINE_CAPACITY + 10];
        assert_eq!(line.extend_from_slice(&big), COMMAND_LINE_CAPACITY);
        assert!(line.is_full());
        assert!(!line.push(b'y'));
        assert_eq!(line.len(), line.capacity());
        line.clear();
        assert!(line.is_empty());
        assert!(line.push(b'y'));
        assert_eq!(line.as_bytes(), b"y");
    }

    #[test]
    fn only_carriage_return_accepts() {
        assert_eq!(Terminator::from_keycode(13), Terminator::Accept);
        assert_eq!(Terminator::from_keycode(27), Terminator::Abort);
        assert_eq!(Terminator::from_keycode(3), Terminator::Abort);
    }
}
