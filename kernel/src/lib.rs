//! MOS monitor kernel - boot and command-dispatch core
//!
//! This crate brings a single-board computer up in a fixed order and then
//! serves one operator forever:
//! - Interrupt vector installation (two-phase: install, commit, enable)
//! - Hardware bring-up (clock, storage transport, coprocessor serial link)
//! - Coprocessor readiness handshake on cold boot, screen clear on warm boot
//! - Version banner, filesystem mount and optional `autoexec.txt`
//! - Read/execute/report loop over an external command interpreter
//!
//! Everything that touches hardware or parses commands sits behind the
//! traits in [`hal`], [`interp`] and [`ui::line`]; the core only sequences
//! them. The `bare-metal` feature adds an x86_64 board in [`arch`].

#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "bare-metal", feature(abi_x86_interrupt))]

// Subsystem modules
pub mod arch;
pub mod boot;
pub mod config;
pub mod context;
pub mod error;
pub mod hal;
pub mod interp;
pub mod irq;
pub mod klog;
pub mod ui;
pub mod vdp;

#[cfg(test)]
mod mock;

pub use boot::{bring_up, start, Board};
pub use config::{MosConfig, Parity, SerialConfig};
pub use context::{BootContext, BootMode, KeycodeMailbox};
pub use error::{LinkError, MosError};
pub use interp::{from_status, CommandInterpreter, ErrorCode, ExecResult};
pub use irq::{HandlerAddr, VectorId, VectorSet};
pub use ui::cli::{Outcome, Shell};
pub use ui::line::{CommandLine, LineEditor, Terminator};
pub use vdp::VduCommand;
