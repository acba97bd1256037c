// kernel/src/arch/x86_64/pic.rs
//
// 8259 PIC pair + 8254 PIT
// - remapped to 0x20/0x28, everything masked until `enable`
// - `enable` starts the 60 Hz frame tick and unmasks IRQ0 and IRQ4 only

use ::x86_64::instructions::interrupts;
use ::x86_64::instructions::port::Port;
use log::debug;

use crate::hal::InterruptController;
use crate::irq::{HandlerAddr, VectorId};

use super::idt;

const PIC1_COMMAND: u16 = 0x20;
const PIC1_DATA: u16 = 0x21;
const PIC2_COMMAND: u16 = 0xA0;
const PIC2_DATA: u16 = 0xA1;
const PIC_EOI: u8 = 0x20;

pub const PIC1_OFFSET: u8 = 0x20;
pub const PIC2_OFFSET: u8 = 0x28;

pub const IRQ_TIMER: u8 = 0;
pub const IRQ_COM1: u8 = 4;

const PIT_COMMAND: u16 = 0x43;
const PIT_CHANNEL0: u16 = 0x40;
const PIT_HZ: u32 = 1_193_182;
pub const FRAME_HZ: u32 = 60;

#[inline]
fn outb(port: u16, value: u8) {
    unsafe { Port::<u8>::new(port).write(value) }
}

fn io_wait() {
    outb(0x80, 0);
}

pub struct Pic8259Controller {
    masks: [u8; 2],
}

impl Pic8259Controller {
    /// Remap both PICs, mask every line and load the IDT.
    ///
    /// # Safety
    /// Must run once, with interrupts disabled.
    pub unsafe fn init() -> Self {
        let init_words = [
            // ICW1: init, ICW4 follows
            (PIC1_COMMAND, 0x11),
            (PIC2_COMMAND, 0x11),
            // ICW2: offsets
            (PIC1_DATA, PIC1_OFFSET),
            (PIC2_DATA, PIC2_OFFSET),
            // ICW3: slave on IRQ2
            (PIC1_DATA, 0x04),
            (PIC2_DATA, 0x02),
            // ICW4: 8086 mode
            (PIC1_DATA, 0x01),
            (PIC2_DATA, 0x01),
        ];
        for (port, value) in init_words {
            outb(port, value);
            io_wait();
        }
        let pic = Self { masks: [0xFF, 0xFF] };
        pic.write_masks();
        idt::init();
        debug!("pic: remapped to {:#x}/{:#x}", PIC1_OFFSET, PIC2_OFFSET);
        pic
    }

    fn write_masks(&self) {
        outb(PIC1_DATA, self.masks[0]);
        outb(PIC2_DATA, self.masks[1]);
    }

    fn unmask(&mut self, irq: u8) {
        if irq < 8 {
            self.masks[0] &= !(1 << irq);
        } else {
            self.masks[1] &= !(1 << (irq - 8));
            // cascade
            self.masks[0] &= !(1 << 2);
        }
        self.write_masks();
    }

    fn start_frame_tick(&mut self) {
        let [lo, hi] = ((PIT_HZ / FRAME_HZ) as u16).to_le_bytes();
        // channel 0, lo/hi, square wave
        outb(PIT_COMMAND, 0x36);
        outb(PIT_CHANNEL0, lo);
        outb(PIT_CHANNEL0, hi);
    }
}

impl InterruptController for Pic8259Controller {
    fn disable(&mut self) {
        interrupts::disable();
    }

    fn set_vector(&mut self, id: VectorId, handler: HandlerAddr) {
        idt::set_handler(id, handler);
    }

    fn enable(&mut self) {
        self.start_frame_tick();
        self.unmask(IRQ_TIMER);
        self.unmask(IRQ_COM1);
        interrupts::enable();
    }

    fn entry_point(&self, id: VectorId) -> HandlerAddr {
        idt::entry_point(id)
    }
}

pub fn end_of_interrupt(irq: u8) {
    if irq >= 8 {
        outb(PIC2_COMMAND, PIC_EOI);
    }
    outb(PIC1_COMMAND, PIC_EOI);
}
