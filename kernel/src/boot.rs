// kernel/src/boot.rs
//! MOS boot sequence
//!
//! Runs once per reset: vectors, clock, storage transport, coprocessor
//! link, boot-mode branch, banner, interrupts on, mount, startup script.
//! Then control passes to the dispatch loop for good.

use core::convert::Infallible;

use log::{debug, info, warn};

use crate::config::MosConfig;
use crate::context::{BootContext, BootMode};
use crate::error::MosError;
use crate::hal::{Filesystem, InterruptController, RealTimeClock, SerialLink, StorageTransport};
use crate::interp::{CommandInterpreter, ErrorCode};
use crate::irq::{VectorId, VectorInstaller, VectorTable};
use crate::ui::cli::Shell;
use crate::ui::console::Console;
use crate::ui::line::{CommandLine, LineEditor};
use crate::vdp::CLS;

pub mod handshake;

pub use handshake::await_ready;

/// The hardware collaborators, borrowed for the life of the kernel.
pub struct Board<'a> {
    pub irq: &'a mut dyn InterruptController,
    pub rtc: &'a mut dyn RealTimeClock,
    pub storage: &'a mut dyn StorageTransport,
    pub link: &'a mut dyn SerialLink,
    pub fs: &'a mut dyn Filesystem,
}

/// Bring the board up in order. Interrupts stay masked from the first
/// vector write until the banner is out.
pub fn bring_up(
    ctx: &BootContext,
    config: &MosConfig,
    board: &mut Board<'_>,
    interp: &mut dyn CommandInterpreter,
    line: &mut CommandLine,
) -> Result<VectorTable, MosError> {
    info!("boot: {:?} boot", ctx.mode());

    // Stage 1: vectors, interrupts masked
    let entries = VectorId::ALL.map(|id| (id, board.irq.entry_point(id)));
    let mut installer = VectorInstaller::begin(&mut *board.irq);
    for (id, entry) in entries {
        installer.install(id, entry);
    }
    let pending = installer.commit()?;

    // Stage 2-4: producers of interrupt events
    board.rtc.init();
    debug!("boot: rtc ready");
    board.storage.init();
    debug!("boot: storage transport ready");
    board.link.open(config.serial);
    debug!(
        "boot: coprocessor link open at {} baud {}{:?}{}",
        config.serial.baud, config.serial.data_bits, config.serial.parity, config.serial.stop_bits
    );

    // Stage 5: cold or warm
    enter_boot_mode(ctx.mode(), &mut *board.link)?;

    // Stage 6
    Console::new(&mut *board.link).banner(config);

    // Stage 7
    let table = pending.enable();

    // Stage 8
    let mounted = match board.fs.mount() {
        Ok(()) => {
            info!("boot: filesystem mounted");
            true
        }
        Err(code) => {
            warn!("boot: mount failed: {} ({})", code, code.get());
            Console::new(&mut *board.link).report(code);
            false
        }
    };

    // Stage 9
    if ctx.is_cold_boot() && config.autoexec && mounted {
        run_startup_script(config, &mut *board.link, interp, line);
    } else {
        debug!(
            "boot: startup script skipped (cold={}, enabled={}, mounted={})",
            ctx.is_cold_boot(),
            config.autoexec,
            mounted
        );
    }

    info!("boot: ready");
    Ok(table)
}

/// Cold boot waits for the coprocessor; warm boot only clears its screen.
pub fn enter_boot_mode(mode: BootMode, link: &mut dyn SerialLink) -> Result<(), MosError> {
    match mode {
        BootMode::Cold => {
            await_ready(link)?;
        }
        BootMode::Warm => {
            debug!("boot: warm, clearing screen");
            link.write_byte(CLS);
        }
    }
    Ok(())
}

fn run_startup_script(
    config: &MosConfig,
    link: &mut dyn SerialLink,
    interp: &mut dyn CommandInterpreter,
    line: &mut CommandLine,
) {
    line.clear();
    match interp.exec_script(config.autoexec_path, line) {
        Ok(()) => info!("boot: {} done", config.autoexec_path),
        Err(code) if code == ErrorCode::NO_FILE => {
            debug!("boot: no {}", config.autoexec_path)
        }
        Err(code) => {
            warn!("boot: {} failed: {}", config.autoexec_path, code);
            Console::new(link).report(code);
        }
    }
    line.clear();
}

/// Bring the board up, then serve the operator until a wait is cancelled.
/// On hardware this never returns.
pub fn start<'a>(
    ctx: &BootContext,
    config: &MosConfig,
    mut board: Board<'a>,
    editor: &'a mut dyn LineEditor,
    interp: &'a mut dyn CommandInterpreter,
) -> Result<Infallible, MosError> {
    let mut line = CommandLine::new();
    bring_up(ctx, config, &mut board, &mut *interp, &mut line)?;
    Shell::new(config, board.link, editor, interp, line).run()
}
