// Licensed under the Apache-2.0 license

//! The process-wide timer block: channel pool, handler table and the
//! hardware they drive.
//!
//! A board declares one `Pit` as a `static` and points each timer vector at
//! an entry stub that calls [`Pit::handle_interrupt`] (or
//! [`Pit::service_shared`] when all channels share one vector). Every
//! foreground mutation takes a [`CriticalSection`] token.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use log::{debug, warn};
use pit_hil::{Control, EntryStub, InterruptController, TimerClient, TimerRegisters};

use crate::config::PitConfig;
use crate::dispatch::Dispatcher;
use crate::error::{TimerError, TimerResult};
use crate::period::PeriodConverter;
use crate::pool::ChannelPool;

pub struct Pit<'a, R: TimerRegisters, I: InterruptController, const N: usize> {
    registers: R,
    pool: Mutex<RefCell<ChannelPool<N>>>,
    dispatcher: Dispatcher<'a, I, N>,
    converter: PeriodConverter,
    config: PitConfig,
}

// Safety: the timer block is shared between foreground code and interrupt
// handlers on a single core. The pool and handler table are only reached
// through critical-section mutexes, and register accesses are single
// volatile operations on the owning channel.
unsafe impl<R: TimerRegisters, I: InterruptController, const N: usize> Sync for Pit<'_, R, I, N> {}

impl<'a, R: TimerRegisters, I: InterruptController, const N: usize> Pit<'a, R, I, N> {
    /// Compile-time check that N fits the pool (1 through 32 channels).
    const CHECK_CHANNELS: () = {
        assert!(N >= 1 && N <= 32, "a timer block has between 1 and 32 channels");
    };

    pub const fn new(registers: R, controller: I, config: PitConfig) -> Self {
        // Trigger compile-time check
        let _ = Self::CHECK_CHANNELS;

        Self {
            registers,
            pool: Mutex::new(RefCell::new(ChannelPool::new())),
            dispatcher: Dispatcher::new(controller, config.vectors),
            converter: PeriodConverter::from_config(&config),
            config,
        }
    }

    /// Like `new`, for interrupt controllers that bind vectors at run time.
    /// With a shared vector only `stubs[0]` is bound.
    pub const fn with_entry_stubs(
        registers: R,
        controller: I,
        config: PitConfig,
        stubs: [EntryStub; N],
    ) -> Self {
        let _ = Self::CHECK_CHANNELS;

        Self {
            registers,
            pool: Mutex::new(RefCell::new(ChannelPool::new())),
            dispatcher: Dispatcher::with_entry_stubs(controller, config.vectors, stubs),
            converter: PeriodConverter::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &PitConfig {
        &self.config
    }

    pub fn converter(&self) -> &PeriodConverter {
        &self.converter
    }

    pub fn registers(&self) -> &R {
        &self.registers
    }

    pub fn controller(&self) -> &I {
        self.dispatcher.controller()
    }

    pub fn max_period_us(&self) -> u32 {
        self.converter.max_period_us()
    }

    /// Vector raised by `channel`.
    pub fn irq(&self, channel: usize) -> u32 {
        self.dispatcher.irq(channel)
    }

    /// Claim the lowest free channel and start it counting from `reload`,
    /// turning the clock gate on first if needed.
    pub fn claim(&self, cs: CriticalSection<'_>, reload: u32) -> TimerResult<usize> {
        let claimed = self.pool.borrow_ref_mut(cs).claim(&self.registers, reload);
        claimed.ok_or_else(|| {
            warn!("pit: all {} channels in use", N);
            TimerError::ChannelsExhausted
        })
    }

    /// Stop `channel`, forget its client and give it back. The clock gate is
    /// turned off with the last channel.
    pub fn release(&self, cs: CriticalSection<'_>, channel: usize) {
        self.dispatcher.clear(cs, channel);
        self.pool.borrow_ref_mut(cs).release(&self.registers, channel);
    }

    /// Route `channel`'s interrupt to `client` and arm it.
    ///
    /// The channel's interrupt-enable bit is set last, after the handler
    /// table slot and the vector have been programmed.
    pub fn install(
        &self,
        cs: CriticalSection<'_>,
        channel: usize,
        client: &'a dyn TimerClient,
        priority: u8,
    ) {
        if !self.pool.borrow_ref(cs).is_claimed(channel) {
            return;
        }
        self.dispatcher.install(cs, channel, client, priority);
        self.registers.write_control(channel, Control::ARMED);
        debug!(
            "pit: channel {} armed on irq {} priority {}",
            channel,
            self.irq(channel),
            priority
        );
    }

    /// Mask `channel`'s vector and forget its client.
    pub fn uninstall(&self, cs: CriticalSection<'_>, channel: usize) {
        self.dispatcher.uninstall(cs, channel);
    }

    pub fn set_priority(&self, cs: CriticalSection<'_>, channel: usize, priority: u8) {
        self.dispatcher.set_priority(cs, channel, priority);
    }

    /// Start or stop a claimed channel's counter, leaving its interrupt
    /// enable untouched.
    pub fn set_counting(&self, cs: CriticalSection<'_>, channel: usize, count: bool) {
        if !self.pool.borrow_ref(cs).is_claimed(channel) {
            return;
        }
        let control = self.registers.read_control(channel);
        self.registers
            .write_control(channel, control.with_count(count));
    }

    /// Entry stub body for a channel with its own vector: clear the pending
    /// flag, then run the client.
    pub fn handle_interrupt(&self, channel: usize) {
        if channel >= N {
            warn!("pit: ignoring interrupt for impossible channel {}", channel);
            return;
        }
        self.registers.clear_pending(channel);
        self.dispatcher.dispatch(channel);
    }

    /// Entry stub body for a vector shared by all channels. Channels are
    /// serviced in ascending order; scanning stops if a client ended the
    /// last timer and the clock gate went off.
    pub fn service_shared(&self) {
        for channel in 0..N {
            if !self.clock_enabled() {
                return;
            }
            if self.registers.is_pending(channel) {
                self.registers.clear_pending(channel);
                self.dispatcher.dispatch(channel);
            }
        }
    }

    pub fn claimed_count(&self) -> usize {
        critical_section::with(|cs| self.pool.borrow_ref(cs).in_use())
    }

    pub fn is_claimed(&self, channel: usize) -> bool {
        critical_section::with(|cs| self.pool.borrow_ref(cs).is_claimed(channel))
    }

    pub fn clock_enabled(&self) -> bool {
        critical_section::with(|cs| self.pool.borrow_ref(cs).clock_enabled())
    }

    pub fn is_installed(&self, channel: usize) -> bool {
        critical_section::with(|cs| self.dispatcher.is_installed(cs, channel))
    }
}
