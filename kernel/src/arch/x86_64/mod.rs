//! x86_64 board: PC hardware standing in for the single-board computer.
//!
//! - COM1 (16550) is the coprocessor link, COM2 carries the debug log
//! - the PIT at 60 Hz plays the frame-sync source on IRQ0
//! - COM1 receive is IRQ4
//! - CMOS is the real-time clock

use core::ptr;

use spin::Once;

use crate::context::{BootContext, BootMode};

pub mod idt;
pub mod pic;
pub mod rtc;
pub mod serial;

pub use pic::Pic8259Controller;
pub use rtc::CmosRtc;
pub use serial::{debug_sink, Com1Link};

// "MOS_WARM"
const WARM_MAGIC: u64 = 0x4D4F_535F_5741_524D;

// Kept out of the loaded image, so a soft reset sees whatever the last
// boot wrote and a power cycle sees noise.
#[link_section = ".noinit"]
static mut RESET_MAGIC: u64 = 0;

static CONTEXT: Once<BootContext> = Once::new();

/// Read and re-arm the warm-boot marker. Only the first call is meaningful.
pub fn detect_boot_mode() -> BootMode {
    // SAFETY: single-threaded, before interrupts are enabled
    unsafe {
        let slot = ptr::addr_of_mut!(RESET_MAGIC);
        let cold = ptr::read_volatile(slot) != WARM_MAGIC;
        ptr::write_volatile(slot, WARM_MAGIC);
        BootMode::from_flag(cold)
    }
}

/// The kernel's one boot context. Trampolines reach it through here.
pub fn context() -> &'static BootContext {
    CONTEXT.call_once(|| BootContext::new(detect_boot_mode()))
}

pub fn halt() -> ! {
    loop {
        ::x86_64::instructions::hlt();
    }
}
