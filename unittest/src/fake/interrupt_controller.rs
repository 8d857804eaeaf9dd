// Licensed under the Apache-2.0 license

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use pit_hil::EntryStub;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqAccess {
    Enable(u32),
    Disable(u32),
    Priority(u32, u8),
    Bind(u32),
    Unpend(u32),
}

/// Fake nested vectored interrupt controller.
pub struct InterruptController {
    enabled: RefCell<BTreeSet<u32>>,
    priorities: RefCell<BTreeMap<u32, u8>>,
    bound: RefCell<BTreeMap<u32, EntryStub>>,
    log: RefCell<Vec<IrqAccess>>,
}

impl InterruptController {
    pub const fn new() -> Self {
        Self {
            enabled: RefCell::new(BTreeSet::new()),
            priorities: RefCell::new(BTreeMap::new()),
            bound: RefCell::new(BTreeMap::new()),
            log: RefCell::new(Vec::new()),
        }
    }

    pub fn is_enabled(&self, irq: u32) -> bool {
        self.enabled.borrow().contains(&irq)
    }

    pub fn priority(&self, irq: u32) -> Option<u8> {
        self.priorities.borrow().get(&irq).copied()
    }

    pub fn entry(&self, irq: u32) -> Option<EntryStub> {
        self.bound.borrow().get(&irq).copied()
    }

    /// Take `irq` if it is unmasked: returns the stub the hardware would jump to.
    pub fn raise(&self, irq: u32) -> Option<EntryStub> {
        if self.is_enabled(irq) {
            self.entry(irq)
        } else {
            None
        }
    }

    pub fn accesses(&self) -> Vec<IrqAccess> {
        self.log.borrow().clone()
    }

    pub fn clear_accesses(&self) {
        self.log.borrow_mut().clear();
    }

    fn record(&self, access: IrqAccess) {
        self.log.borrow_mut().push(access);
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}

impl pit_hil::InterruptController for InterruptController {
    fn enable(&self, irq: u32) {
        self.enabled.borrow_mut().insert(irq);
        self.record(IrqAccess::Enable(irq));
    }

    fn disable(&self, irq: u32) {
        self.enabled.borrow_mut().remove(&irq);
        self.record(IrqAccess::Disable(irq));
    }

    fn set_priority(&self, irq: u32, priority: u8) {
        self.priorities.borrow_mut().insert(irq, priority);
        self.record(IrqAccess::Priority(irq, priority));
    }

    fn bind(&self, irq: u32, entry: EntryStub) {
        self.bound.borrow_mut().insert(irq, entry);
        self.record(IrqAccess::Bind(irq));
    }

    fn unpend(&self, irq: u32) {
        self.record(IrqAccess::Unpend(irq));
    }
}
