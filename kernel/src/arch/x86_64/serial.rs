// kernel/src/arch/x86_64/serial.rs
//! 16550 UART driver: COM1 coprocessor link and COM2 debug log.

use core::fmt;

use ::x86_64::instructions::port::Port;
use log::warn;
use spin::Mutex;

use crate::config::{Parity, SerialConfig};
use crate::error::LinkError;
use crate::hal::SerialLink;

pub const COM1: u16 = 0x3F8;
pub const COM2: u16 = 0x2F8;

/// Input clock divided down to the fastest rate the UART can run.
pub const UART_MAX_BAUD: u32 = 115_200;

const LSR_DATA_READY: u8 = 1 << 0;
const LSR_OVERRUN: u8 = 1 << 1;
const LSR_FRAMING: u8 = 1 << 3;
const LSR_THR_EMPTY: u8 = 1 << 5;

pub struct Uart16550 {
    data: Port<u8>,
    int_enable: Port<u8>,
    fifo_ctrl: Port<u8>,
    line_ctrl: Port<u8>,
    modem_ctrl: Port<u8>,
    line_status: Port<u8>,
}

impl Uart16550 {
    /// # Safety
    /// `base` must be the I/O base of a 16550-compatible UART.
    pub const unsafe fn new(base: u16) -> Self {
        Self {
            data: Port::new(base),
            int_enable: Port::new(base + 1),
            fifo_ctrl: Port::new(base + 2),
            line_ctrl: Port::new(base + 3),
            modem_ctrl: Port::new(base + 4),
            line_status: Port::new(base + 5),
        }
    }

    /// Program rate and framing. Receive interrupts are left as requested.
    pub fn configure(&mut self, config: &SerialConfig, rx_interrupt: bool) {
        if config.baud > UART_MAX_BAUD {
            warn!("serial: {} baud not reachable, running at {}", config.baud, UART_MAX_BAUD);
        }
        let [lo, hi] = divisor(config.baud).to_le_bytes();
        unsafe {
            self.int_enable.write(0x00);
            // DLAB on, write the divisor latch
            self.line_ctrl.write(0x80);
            self.data.write(lo);
            self.int_enable.write(hi);
            self.line_ctrl.write(line_control(config));
            // FIFO on, cleared, 1-byte trigger so every byte raises IRQ
            self.fifo_ctrl.write(0x07);
            // DTR, RTS, OUT2 (routes the IRQ line)
            self.modem_ctrl.write(0x0B);
            self.int_enable.write(if rx_interrupt { 0x01 } else { 0x00 });
        }
    }

    fn status(&mut self) -> u8 {
        unsafe { self.line_status.read() }
    }

    /// One received byte, if the holding register has one.
    pub fn try_read(&mut self) -> Option<Result<u8, LinkError>> {
        let status = self.status();
        if status & LSR_DATA_READY == 0 {
            return None;
        }
        let byte = unsafe { self.data.read() };
        Some(if status & LSR_OVERRUN != 0 {
            Err(LinkError::Overrun)
        } else if status & LSR_FRAMING != 0 {
            Err(LinkError::Framing)
        } else {
            Ok(byte)
        })
    }

    pub fn send(&mut self, byte: u8) {
        while self.status() & LSR_THR_EMPTY == 0 {
            core::hint::spin_loop();
        }
        unsafe { self.data.write(byte) }
    }
}

impl fmt::Write for Uart16550 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.bytes().for_each(|b| self.send(b));
        Ok(())
    }
}

fn divisor(baud: u32) -> u16 {
    let div = UART_MAX_BAUD / baud.clamp(1, UART_MAX_BAUD);
    div.min(u16::MAX as u32) as u16
}

fn line_control(config: &SerialConfig) -> u8 {
    let word = match config.data_bits {
        5 => 0b00,
        6 => 0b01,
        7 => 0b10,
        _ => 0b11,
    };
    let stop = if config.stop_bits > 1 { 1 << 2 } else { 0 };
    let parity = match config.parity {
        Parity::None => 0,
        Parity::Odd => 0b001 << 3,
        Parity::Even => 0b011 << 3,
    };
    word | stop | parity
}

/// Coprocessor link on COM1.
pub struct Com1Link {
    uart: Uart16550,
}

impl Com1Link {
    /// # Safety
    /// Only one `Com1Link` may drive the port outside the receive ISR.
    pub const unsafe fn new() -> Self {
        Self { uart: Uart16550::new(COM1) }
    }

    /// Drain path for the receive interrupt; never blocks.
    pub fn poll(&mut self) -> Option<Result<u8, LinkError>> {
        self.uart.try_read()
    }
}

impl SerialLink for Com1Link {
    fn open(&mut self, config: SerialConfig) {
        self.uart.configure(&config, true);
    }

    fn read_byte(&mut self) -> Result<u8, LinkError> {
        loop {
            if let Some(result) = self.uart.try_read() {
                return result;
            }
            core::hint::spin_loop();
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.uart.send(byte);
    }
}

static DEBUG: Mutex<Option<Uart16550>> = Mutex::new(None);

/// Bring up COM2 for the kernel log (115200 8N1, polled).
pub fn init_debug() {
    let mut uart = unsafe { Uart16550::new(COM2) };
    uart.configure(&SerialConfig { baud: UART_MAX_BAUD, ..SerialConfig::COPROCESSOR }, false);
    *DEBUG.lock() = Some(uart);
}

/// `klog` sink writing to COM2.
pub fn debug_sink(line: &str) {
    if let Some(uart) = DEBUG.lock().as_mut() {
        line.bytes().for_each(|b| uart.send(b));
    }
}
