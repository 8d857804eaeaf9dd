/*++

Licensed under the Apache-2.0 license.

File Name:

    pool.rs

Abstract:

    Bookkeeping for the fixed set of timer channels and the clock gate they
    share.

--*/

use log::debug;
use pit_hil::{Control, TimerRegisters};

/// Which of the `N` channels are claimed, and whether the block is clocked.
///
/// The pool lives inside a critical-section mutex in `Pit`; nothing here
/// masks interrupts by itself.
#[derive(Debug)]
pub struct ChannelPool<const N: usize> {
    used: [bool; N],
    clock_enabled: bool,
}

impl<const N: usize> ChannelPool<N> {
    pub const fn new() -> Self {
        Self {
            used: [false; N],
            clock_enabled: false,
        }
    }

    /// Take the lowest free channel and start it counting from `reload`.
    ///
    /// The channel's interrupt stays disabled; it is armed once a client has
    /// been installed for it. Returns `None` when every channel is claimed.
    pub fn claim<R: TimerRegisters>(&mut self, registers: &R, reload: u32) -> Option<usize> {
        if !self.clock_enabled {
            registers.enable_clock();
            self.clock_enabled = true;
            debug!("pit: clock gate enabled");
        }

        let channel = self.used.iter().position(|used| !used)?;

        registers.write_control(channel, Control::OFF);
        registers.clear_pending(channel);
        registers.write_reload(channel, reload);
        registers.write_control(channel, Control::COUNTING);
        self.used[channel] = true;

        debug!("pit: claimed channel {} reload {}", channel, reload);
        Some(channel)
    }

    /// Stop a claimed channel and give it back. The clock gate is turned off
    /// with the last channel.
    pub fn release<R: TimerRegisters>(&mut self, registers: &R, channel: usize) {
        match self.used.get_mut(channel) {
            Some(used) if *used => *used = false,
            _ => return,
        }
        registers.write_control(channel, Control::OFF);
        debug!("pit: released channel {}", channel);

        if self.in_use() == 0 {
            registers.disable_clock();
            self.clock_enabled = false;
            debug!("pit: clock gate disabled");
        }
    }

    pub fn is_claimed(&self, channel: usize) -> bool {
        self.used.get(channel).copied().unwrap_or(false)
    }

    pub fn in_use(&self) -> usize {
        self.used.iter().filter(|used| **used).count()
    }

    pub fn clock_enabled(&self) -> bool {
        self.clock_enabled
    }
}

impl<const N: usize> Default for ChannelPool<N> {
    fn default() -> Self {
        Self::new()
    }
}
