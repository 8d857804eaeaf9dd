/*++

Licensed under the Apache-2.0 license.

File Name:

    registers.rs

Abstract:

    Hardware Interface Layer trait for a block of identical countdown timer
    channels sharing one clock gate.

--*/

/// Channel control bit pattern.
///
/// Drivers only ever write complete patterns built from these two bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Control {
    /// Counter is running.
    pub count: bool,
    /// Expiry raises the channel interrupt.
    pub interrupt: bool,
}

impl Control {
    pub const OFF: Control = Control {
        count: false,
        interrupt: false,
    };
    pub const COUNTING: Control = Control {
        count: true,
        interrupt: false,
    };
    pub const ARMED: Control = Control {
        count: true,
        interrupt: true,
    };

    pub const fn with_count(self, count: bool) -> Control {
        Control { count, ..self }
    }
}

pub trait TimerRegisters {
    /// Turn on the module clock gate and bring the timer block out of reset.
    fn enable_clock(&self);

    /// Stop the timer block and turn off its clock gate. Channel registers
    /// are not accessible afterwards.
    fn disable_clock(&self);

    /// Load the countdown start value. The channel raises its flag after
    /// `reload + 1` clock ticks.
    fn write_reload(&self, channel: usize, reload: u32);

    fn write_control(&self, channel: usize, control: Control);

    fn read_control(&self, channel: usize) -> Control;

    /// Write-1-to-clear the channel's pending flag.
    fn clear_pending(&self, channel: usize);

    fn is_pending(&self, channel: usize) -> bool;
}

impl<T: TimerRegisters + ?Sized> TimerRegisters for &T {
    fn enable_clock(&self) {
        (**self).enable_clock()
    }

    fn disable_clock(&self) {
        (**self).disable_clock()
    }

    fn write_reload(&self, channel: usize, reload: u32) {
        (**self).write_reload(channel, reload)
    }

    fn write_control(&self, channel: usize, control: Control) {
        (**self).write_control(channel, control)
    }

    fn read_control(&self, channel: usize) -> Control {
        (**self).read_control(channel)
    }

    fn clear_pending(&self, channel: usize) {
        (**self).clear_pending(channel)
    }

    fn is_pending(&self, channel: usize) -> bool {
        (**self).is_pending(channel)
    }
}
