// kernel/src/irq/handlers.rs
//! Interrupt handler bodies.
//!
//! Board trampolines acknowledge the hardware and call these. They run with
//! the main thread suspended, so they stay short and never log.

use crate::context::BootContext;

/// Frame-sync tick.
#[inline]
pub fn on_frame_sync(ctx: &BootContext) {
    ctx.record_frame();
}

/// One byte from the coprocessor link. Key-down events land in the mailbox,
/// overwriting whatever the main thread has not consumed yet.
pub fn on_serial_receive(ctx: &BootContext, byte: u8) {
    let packet = ctx.receiver().lock().feed(byte);
    if let Some(key) = packet.and_then(|p| p.key_event()) {
        if key.down && key.ascii != 0 {
            ctx.keycode().post(key.ascii);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BootMode;

    fn feed(ctx: &BootContext, bytes: &[u8]) {
        for &b in bytes {
            on_serial_receive(ctx, b);
        }
    }

    #[test]
    fn frame_sync_counts_frames() {
        let ctx = BootContext::new(BootMode::Cold);
        for _ in 0..3 {
            on_frame_sync(&ctx);
        }
        assert_eq!(ctx.frames(), 3);
    }

    #[test]
    fn key_down_packet_posts_ascii() {
        let ctx = BootContext::new(BootMode::Warm);
        feed(&ctx, &[0x81, 4, b'd', 0, 0x20, 1]);
        assert_eq!(ctx.keycode().take(), Some(b'd'));
    }

    #[test]
    fn key_up_and_other_packets_leave_mailbox_alone() {
        let ctx = BootContext::new(BootMode::Warm);
        feed(&ctx, &[0x81, 4, b'd', 0, 0x20, 0]);
        feed(&ctx, &[0x82, 2, 10, 4]);
        assert_eq!(ctx.keycode().take(), None);
    }

    #[test]
    fn later_key_overwrites_unread_key() {
        let ctx = BootContext::new(BootMode::Warm);
        feed(&ctx, &[0x81, 4, b'D', 0, 0x20, 1]);
        feed(&ctx, &[0x81, 4, b'I', 0, 0x27, 1]);
        assert_eq!(ctx.keycode().take(), Some(b'I'));
    }
}
