// Licensed under the Apache-2.0 license

use std::cell::{Cell, RefCell};

use pit_hil::{Control, TimerRegisters};

/// One register access made by the driver, in program order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegAccess {
    ClockOn,
    ClockOff,
    Reload(usize, u32),
    Control(usize, Control),
    ClearPending(usize),
}

/// Fake block of `N` countdown channels behind one clock gate.
///
/// Touching a channel register while the clock gate is off panics, the way
/// the real part bus-faults.
pub struct TimerBlock<const N: usize> {
    clock: Cell<bool>,
    reload: [Cell<u32>; N],
    control: [Cell<Control>; N],
    pending: [Cell<bool>; N],
    log: RefCell<Vec<RegAccess>>,
}

impl<const N: usize> TimerBlock<N> {
    pub const fn new() -> Self {
        Self {
            clock: Cell::new(false),
            reload: [const { Cell::new(0) }; N],
            control: [const { Cell::new(Control::OFF) }; N],
            pending: [const { Cell::new(false) }; N],
            log: RefCell::new(Vec::new()),
        }
    }

    pub fn clock_enabled(&self) -> bool {
        self.clock.get()
    }

    pub fn reload(&self, channel: usize) -> u32 {
        self.reload[channel].get()
    }

    pub fn control(&self, channel: usize) -> Control {
        self.control[channel].get()
    }

    pub fn pending(&self, channel: usize) -> bool {
        self.pending[channel].get()
    }

    /// Count a channel down to zero. Returns true when the expiry raises the
    /// channel interrupt.
    pub fn expire(&self, channel: usize) -> bool {
        if !self.clock.get() {
            return false;
        }
        let control = self.control[channel].get();
        if !control.count {
            return false;
        }
        self.pending[channel].set(true);
        control.interrupt
    }

    /// Leave a flag set, as a previous owner of the channel might have.
    pub fn set_pending(&self, channel: usize) {
        self.pending[channel].set(true);
    }

    pub fn accesses(&self) -> Vec<RegAccess> {
        self.log.borrow().clone()
    }

    pub fn clear_accesses(&self) {
        self.log.borrow_mut().clear();
    }

    fn record(&self, access: RegAccess) {
        self.log.borrow_mut().push(access);
    }

    fn check_clock(&self, channel: usize) {
        assert!(
            self.clock.get(),
            "channel {} register access with the clock gate off",
            channel
        );
    }
}

impl<const N: usize> Default for TimerBlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TimerRegisters for TimerBlock<N> {
    fn enable_clock(&self) {
        self.clock.set(true);
        self.record(RegAccess::ClockOn);
    }

    fn disable_clock(&self) {
        self.clock.set(false);
        self.record(RegAccess::ClockOff);
    }

    fn write_reload(&self, channel: usize, reload: u32) {
        self.check_clock(channel);
        self.reload[channel].set(reload);
        self.record(RegAccess::Reload(channel, reload));
    }

    fn write_control(&self, channel: usize, control: Control) {
        self.check_clock(channel);
        self.control[channel].set(control);
        self.record(RegAccess::Control(channel, control));
    }

    fn read_control(&self, channel: usize) -> Control {
        self.check_clock(channel);
        self.control[channel].get()
    }

    fn clear_pending(&self, channel: usize) {
        self.check_clock(channel);
        self.pending[channel].set(false);
        self.record(RegAccess::ClearPending(channel));
    }

    fn is_pending(&self, channel: usize) -> bool {
        self.check_clock(channel);
        self.pending[channel].get()
    }
}
