//! MOS freestanding image (x86_64 board).
//!
//! Wires the board drivers into the core and hands control to it. The
//! storage transport, filesystem and command interpreter are placeholders
//! on this board: the volume never mounts and every non-empty line is an
//! invalid command.

#![no_main]
#![no_std]

use core::panic::PanicInfo;

use log::{debug, error, LevelFilter};
use mos_kernel_lib::arch::board::{self, serial, CmosRtc, Com1Link, Pic8259Controller};
use mos_kernel_lib::hal::{Filesystem, SerialLink, StorageTransport};
use mos_kernel_lib::{
    klog, start, Board, BootContext, CommandInterpreter, CommandLine, ErrorCode, ExecResult,
    LineEditor, LinkError, MosConfig, Terminator,
};

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

struct NullStorage;

impl StorageTransport for NullStorage {
    fn init(&mut self) {
        debug!("storage: no transport on this board");
    }
}

struct NoVolume;

impl Filesystem for NoVolume {
    fn mount(&mut self) -> ExecResult {
        Err(ErrorCode::NO_FILESYSTEM)
    }
}

/// Line input from the keycode mailbox, echoed back to the coprocessor.
struct MailboxEditor {
    ctx: &'static BootContext,
    echo: Com1Link,
}

impl MailboxEditor {
    fn next_key(&self) -> u8 {
        loop {
            if let Some(key) = self.ctx.keycode().take() {
                return key;
            }
            ::x86_64::instructions::hlt();
        }
    }
}

impl LineEditor for MailboxEditor {
    fn read_line(&mut self, line: &mut CommandLine) -> Result<u8, LinkError> {
        loop {
            match self.next_key() {
                key @ (Terminator::ACCEPT_KEY | Terminator::ABORT_KEY) => {
                    self.echo.write_all(b"\n\r");
                    return Ok(key);
                }
                BACKSPACE | DELETE => {
                    if line.pop().is_some() {
                        self.echo.write_byte(DELETE);
                    }
                }
                key if key >= 0x20 => {
                    if line.push(key) {
                        self.echo.write_byte(key);
                    }
                }
                _ => {}
            }
        }
    }
}

struct Monitor;

impl CommandInterpreter for Monitor {
    fn exec(&mut self, line: &[u8]) -> ExecResult {
        if line.iter().all(u8::is_ascii_whitespace) {
            Ok(())
        } else {
            Err(ErrorCode::INVALID_COMMAND)
        }
    }

    fn exec_script(&mut self, _path: &str, _scratch: &mut CommandLine) -> ExecResult {
        Err(ErrorCode::NO_FILE)
    }
}

#[no_mangle]
pub extern "C" fn _start() -> ! {
    serial::init_debug();
    let _ = klog::init(board::debug_sink, LevelFilter::Debug);

    let ctx = board::context();
    let config = MosConfig::new();

    // SAFETY: first code to run, interrupts are off
    let mut irq = unsafe { Pic8259Controller::init() };
    let mut rtc = CmosRtc::new();
    let mut storage = NullStorage;
    // SAFETY: the receive ISR only reads, `link` and `echo` only write once
    // the dispatch loop is running
    let mut link = unsafe { Com1Link::new() };
    let mut fs = NoVolume;
    let mut editor = MailboxEditor { ctx, echo: unsafe { Com1Link::new() } };
    let mut interp = Monitor;

    let hw = Board {
        irq: &mut irq,
        rtc: &mut rtc,
        storage: &mut storage,
        link: &mut link,
        fs: &mut fs,
    };
    match start(ctx, &config, hw, &mut editor, &mut interp) {
        Ok(never) => match never {},
        Err(err) => error!("mos: {}", err),
    }
    board::halt()
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    error!("panic: {}", info);
    board::halt()
}
