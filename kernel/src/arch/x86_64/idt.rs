//! Interrupt descriptor table and the trampolines for the two MOS vectors.
//!
//! Exceptions are wired once at init. The frame-sync and serial-receive
//! gates are written later by the vector installer through
//! [`set_handler`], while interrupts are still masked.

use ::x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame};
use ::x86_64::VirtAddr;
use lazy_static::lazy_static;
use log::{error, warn};
use spin::Mutex;

use crate::irq::{on_frame_sync, on_serial_receive, HandlerAddr, VectorId};

use super::pic::{self, IRQ_COM1, IRQ_TIMER};
use super::serial::Com1Link;

lazy_static! {
    static ref IDT: Mutex<InterruptDescriptorTable> = {
        let mut idt = InterruptDescriptorTable::new();
        idt.breakpoint.set_handler_fn(breakpoint_handler);
        idt.double_fault.set_handler_fn(double_fault_handler);
        idt.general_protection_fault.set_handler_fn(gpf_handler);
        Mutex::new(idt)
    };
}

pub fn init() {
    // SAFETY: the table lives in a static and is never moved or dropped
    unsafe { IDT.lock().load_unsafe() };
}

/// IDT gate for a MOS vector.
pub const fn gate(id: VectorId) -> u8 {
    match id {
        VectorId::FrameSync => pic::PIC1_OFFSET + IRQ_TIMER,
        VectorId::SerialReceive => pic::PIC1_OFFSET + IRQ_COM1,
    }
}

pub fn entry_point(id: VectorId) -> HandlerAddr {
    let addr = match id {
        VectorId::FrameSync => frame_sync_entry as usize,
        VectorId::SerialReceive => serial_receive_entry as usize,
    };
    HandlerAddr::new(addr)
}

/// Point the gate for `id` at `handler`.
pub fn set_handler(id: VectorId, handler: HandlerAddr) {
    let mut idt = IDT.lock();
    // SAFETY: `handler` comes from `entry_point`, an x86-interrupt function
    unsafe {
        idt[gate(id) as usize].set_handler_addr(VirtAddr::new(handler.get() as u64));
    }
}

extern "x86-interrupt" fn frame_sync_entry(_frame: InterruptStackFrame) {
    on_frame_sync(super::context());
    pic::end_of_interrupt(IRQ_TIMER);
}

extern "x86-interrupt" fn serial_receive_entry(_frame: InterruptStackFrame) {
    let ctx = super::context();
    // SAFETY: the main thread is suspended while this runs
    let mut link = unsafe { Com1Link::new() };
    while let Some(rx) = link.poll() {
        if let Ok(byte) = rx {
            on_serial_receive(ctx, byte);
        }
    }
    pic::end_of_interrupt(IRQ_COM1);
}

extern "x86-interrupt" fn breakpoint_handler(frame: InterruptStackFrame) {
    warn!("trap: breakpoint at {:#x}", frame.instruction_pointer.as_u64());
}

extern "x86-interrupt" fn gpf_handler(frame: InterruptStackFrame, code: u64) {
    error!("trap: general protection ({:#x}) at {:#x}", code, frame.instruction_pointer.as_u64());
    super::halt();
}

extern "x86-interrupt" fn double_fault_handler(frame: InterruptStackFrame, _code: u64) -> ! {
    error!("trap: double fault at {:#x}", frame.instruction_pointer.as_u64());
    super::halt();
}
