// kernel/src/boot/handshake.rs
//
// Coprocessor readiness handshake
// - cold boot only; interrupts are still masked, so bytes are polled
// - read until the ESC sentinel, no timeout
// - line faults (overrun, framing) drop the byte and keep waiting

use log::{debug, trace, warn};

use crate::error::{LinkError, MosError};
use crate::hal::SerialLink;
use crate::vdp::ESC;

/// Block until the coprocessor sends ESC. Returns the number of bytes
/// consumed, sentinel included.
pub fn await_ready(link: &mut dyn SerialLink) -> Result<usize, MosError> {
    debug!("handshake: waiting for coprocessor");
    let mut consumed = 0usize;
    loop {
        match link.read_byte() {
            Ok(byte) => {
                consumed += 1;
                if byte == ESC {
                    debug!("handshake: coprocessor ready after {} byte(s)", consumed);
                    return Ok(consumed);
                }
                trace!("handshake: skipping {:#04x}", byte);
            }
            Err(LinkError::Interrupted) => return Err(MosError::Interrupted),
            Err(err) => warn!("handshake: {}", err),
        }
    }
}
