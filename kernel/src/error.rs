// kernel/src/error.rs
//! Core failure taxonomy.
//!
//! Command failures returned by the interpreter are not errors of the core:
//! they travel as [`ExecResult`](crate::interp::ExecResult) and the dispatch
//! loop survives every one of them. `MosError` only covers the conditions
//! that end [`start`](crate::boot::start).

use thiserror::Error;

use crate::irq::VectorId;

/// Faults reported by a blocking read on the coprocessor link or the
/// operator line editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The host cancelled a blocking wait. Never produced on hardware.
    #[error("wait interrupted")]
    Interrupted,
    #[error("receive overrun, byte lost")]
    Overrun,
    #[error("framing error")]
    Framing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MosError {
    #[error("blocking wait cancelled")]
    Interrupted,
    #[error("interrupt vector {0:?} not installed before commit")]
    MissingVector(VectorId),
    #[error("serial link fault: {0}")]
    Link(LinkError),
}

impl From<LinkError> for MosError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::Interrupted => MosError::Interrupted,
            other => MosError::Link(other),
        }
    }
}
