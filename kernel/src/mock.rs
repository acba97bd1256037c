// kernel/src/mock.rs
//! Host test board: every collaborator call lands in one shared, ordered
//! trace so sequencing properties can be asserted directly.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::boot::Board;
use crate::config::SerialConfig;
use crate::error::LinkError;
use crate::hal::{Filesystem, InterruptController, RealTimeClock, SerialLink, StorageTransport};
use crate::interp::{CommandInterpreter, ExecResult};
use crate::irq::{HandlerAddr, VectorId};
use crate::ui::line::{CommandLine, LineEditor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    IrqDisable,
    SetVector(VectorId, HandlerAddr),
    IrqEnable,
    RtcInit,
    StorageInit,
    LinkOpen(SerialConfig),
    LinkRead(u8),
    LinkWrite(u8),
    Mount,
    Exec(Vec<u8>),
    ExecScript(String),
    ReadLine { len_on_entry: usize },
}

pub type Trace = Rc<RefCell<Vec<Call>>>;

pub fn trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

/// Bytes written to the link, in order.
pub fn written(trace: &Trace) -> Vec<u8> {
    trace
        .borrow()
        .iter()
        .filter_map(|c| match c {
            Call::LinkWrite(b) => Some(*b),
            _ => None,
        })
        .collect()
}

/// Index of the first call matching `pred`.
pub fn position(trace: &Trace, pred: impl Fn(&Call) -> bool) -> Option<usize> {
    trace.borrow().iter().position(pred)
}

pub const FRAME_SYNC_ENTRY: HandlerAddr = HandlerAddr::new(0x0038);
pub const SERIAL_RECEIVE_ENTRY: HandlerAddr = HandlerAddr::new(0x0070);

// hardware

pub struct MockIrq {
    trace: Trace,
}

impl MockIrq {
    pub fn new(trace: &Trace) -> Self {
        Self { trace: trace.clone() }
    }
}

impl InterruptController for MockIrq {
    fn disable(&mut self) {
        self.trace.borrow_mut().push(Call::IrqDisable);
    }

    fn set_vector(&mut self, id: VectorId, handler: HandlerAddr) {
        self.trace.borrow_mut().push(Call::SetVector(id, handler));
    }

    fn enable(&mut self) {
        self.trace.borrow_mut().push(Call::IrqEnable);
    }

    fn entry_point(&self, id: VectorId) -> HandlerAddr {
        match id {
            VectorId::FrameSync => FRAME_SYNC_ENTRY,
            VectorId::SerialReceive => SERIAL_RECEIVE_ENTRY,
        }
    }
}

pub struct MockRtc {
    trace: Trace,
}

impl RealTimeClock for MockRtc {
    fn init(&mut self) {
        self.trace.borrow_mut().push(Call::RtcInit);
    }
}

pub struct MockStorage {
    trace: Trace,
}

impl StorageTransport for MockStorage {
    fn init(&mut self) {
        self.trace.borrow_mut().push(Call::StorageInit);
    }
}

/// Link fed from a script; an exhausted script cancels the wait.
pub struct MockLink {
    trace: Trace,
    rx: VecDeque<Result<u8, LinkError>>,
}

impl MockLink {
    pub fn new(trace: &Trace, rx: &[u8]) -> Self {
        Self { trace: trace.clone(), rx: rx.iter().map(|&b| Ok(b)).collect() }
    }

    pub fn scripted(trace: &Trace, rx: &[Result<u8, LinkError>]) -> Self {
        Self { trace: trace.clone(), rx: rx.iter().copied().collect() }
    }
}

impl SerialLink for MockLink {
    fn open(&mut self, config: SerialConfig) {
        self.trace.borrow_mut().push(Call::LinkOpen(config));
    }

    fn read_byte(&mut self) -> Result<u8, LinkError> {
        let next = self.rx.pop_front().unwrap_or(Err(LinkError::Interrupted));
        if let Ok(b) = next {
            self.trace.borrow_mut().push(Call::LinkRead(b));
        }
        next
    }

    fn write_byte(&mut self, byte: u8) {
        self.trace.borrow_mut().push(Call::LinkWrite(byte));
    }
}

pub struct MockFs {
    trace: Trace,
    result: ExecResult,
}

impl Filesystem for MockFs {
    fn mount(&mut self) -> ExecResult {
        self.trace.borrow_mut().push(Call::Mount);
        self.result
    }
}

pub struct MockBoard {
    pub irq: MockIrq,
    pub rtc: MockRtc,
    pub storage: MockStorage,
    pub link: MockLink,
    pub fs: MockFs,
}

impl MockBoard {
    pub fn new(trace: &Trace, rx: &[u8]) -> Self {
        Self {
            irq: MockIrq::new(trace),
            rtc: MockRtc { trace: trace.clone() },
            storage: MockStorage { trace: trace.clone() },
            link: MockLink::new(trace, rx),
            fs: MockFs { trace: trace.clone(), result: Ok(()) },
        }
    }

    pub fn with_mount_result(mut self, result: ExecResult) -> Self {
        self.fs.result = result;
        self
    }

    pub fn board(&mut self) -> Board<'_> {
        Board {
            irq: &mut self.irq,
            rtc: &mut self.rtc,
            storage: &mut self.storage,
            link: &mut self.link,
            fs: &mut self.fs,
        }
    }
}

// services

pub struct MockEditor {
    trace: Trace,
    lines: VecDeque<Result<(Vec<u8>, u8), LinkError>>,
    lengths: Vec<usize>,
}

impl MockEditor {
    pub fn new(trace: &Trace, lines: &[(&[u8], u8)]) -> Self {
        Self {
            trace: trace.clone(),
            lines: lines.iter().map(|(text, key)| Ok((text.to_vec(), *key))).collect(),
            lengths: Vec::new(),
        }
    }

    pub fn with_fault_first(mut self, err: LinkError) -> Self {
        self.lines.push_front(Err(err));
        self
    }

    /// Buffer length observed at the start of each read.
    pub fn lengths_on_entry(&self) -> Vec<usize> {
        self.lengths.clone()
    }
}

impl LineEditor for MockEditor {
    fn read_line(&mut self, line: &mut CommandLine) -> Result<u8, LinkError> {
        self.trace.borrow_mut().push(Call::ReadLine { len_on_entry: line.len() });
        self.lengths.push(line.len());
        let (text, key) = self.lines.pop_front().unwrap_or(Err(LinkError::Interrupted))?;
        line.extend_from_slice(&text);
        Ok(key)
    }
}

pub struct MockInterp {
    trace: Trace,
    results: VecDeque<ExecResult>,
    script_result: ExecResult,
    executed: Vec<Vec<u8>>,
}

impl MockInterp {
    pub fn new(trace: &Trace, results: &[ExecResult]) -> Self {
        Self {
            trace: trace.clone(),
            results: results.iter().copied().collect(),
            script_result: Ok(()),
            executed: Vec::new(),
        }
    }

    pub fn with_script_result(mut self, result: ExecResult) -> Self {
        self.script_result = result;
        self
    }

    pub fn executed(&self) -> Vec<Vec<u8>> {
        self.executed.clone()
    }
}

impl CommandInterpreter for MockInterp {
    fn exec(&mut self, line: &[u8]) -> ExecResult {
        self.trace.borrow_mut().push(Call::Exec(line.to_vec()));
        self.executed.push(line.to_vec());
        self.results.pop_front().unwrap_or(Ok(()))
    }

    fn exec_script(&mut self, path: &str, scratch: &mut CommandLine) -> ExecResult {
        self.trace.borrow_mut().push(Call::ExecScript(path.to_string()));
        scratch.extend_from_slice(b"last script line");
        self.script_result
    }
}
