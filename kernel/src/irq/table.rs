// kernel/src/irq/table.rs
//
// Two-phase vector table
// - `VectorInstaller::begin` masks interrupts and opens the table
// - `install` writes a slot (idempotent; one slot per VectorId, no duplicates)
// - `commit` checks every source is covered and hands back `PendingEnable`
// - only `PendingEnable::enable` unmasks, and it consumes the installer's
//   borrow, so nothing can be installed once interrupts are live

use log::{debug, trace};

use crate::error::MosError;
use crate::hal::InterruptController;

use super::{HandlerAddr, VectorId, VectorSet};

/// Snapshot of the installed vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorTable {
    slots: [Option<HandlerAddr>; VectorId::COUNT],
    installed: VectorSet,
}

impl VectorTable {
    const fn empty() -> Self {
        Self { slots: [None; VectorId::COUNT], installed: VectorSet::empty() }
    }

    pub fn get(&self, id: VectorId) -> Option<HandlerAddr> {
        self.slots[id.slot()]
    }

    pub fn installed(&self) -> VectorSet {
        self.installed
    }

    fn first_missing(&self) -> Option<VectorId> {
        VectorId::ALL.into_iter().find(|id| !self.installed.contains(id.mask()))
    }
}

/// Install phase: interrupts are masked for as long as this value lives.
pub struct VectorInstaller<'a> {
    irq: &'a mut dyn InterruptController,
    table: VectorTable,
}

impl<'a> VectorInstaller<'a> {
    pub fn begin(irq: &'a mut dyn InterruptController) -> Self {
        irq.disable();
        trace!("irq: masked, vector table open");
        Self { irq, table: VectorTable::empty() }
    }

    pub fn install(&mut self, id: VectorId, handler: HandlerAddr) -> &mut Self {
        if self.table.get(id) == Some(handler) {
            trace!("irq: {:?} already at {:#x}", id, handler.get());
            return self;
        }
        self.irq.set_vector(id, handler);
        self.table.slots[id.slot()] = Some(handler);
        self.table.installed |= id.mask();
        debug!("irq: {:?} -> {:#x}", id, handler.get());
        self
    }

    /// Close the table. Fails if any source has no handler.
    pub fn commit(self) -> Result<PendingEnable<'a>, MosError> {
        if let Some(id) = self.table.first_missing() {
            return Err(MosError::MissingVector(id));
        }
        Ok(PendingEnable { irq: self.irq, table: self.table })
    }
}

/// Committed table, interrupts still masked.
#[must_use = "interrupts stay masked until `enable` is called"]
pub struct PendingEnable<'a> {
    irq: &'a mut dyn InterruptController,
    table: VectorTable,
}

impl PendingEnable<'_> {
    pub fn table(&self) -> &VectorTable {
        &self.table
    }

    pub fn enable(self) -> VectorTable {
        self.irq.enable();
        debug!("irq: enabled ({:?})", self.table.installed);
        self.table
    }
}
