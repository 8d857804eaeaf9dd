// Licensed under the Apache-2.0 license

use pit_hil::{InterruptController, TimerClient, TimerRegisters};

use crate::error::TimerResult;
use crate::period::Period;
use crate::pit::Pit;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Off,
    Active { channel: usize, paused: bool },
}

/// One periodic timer.
///
/// `begin` claims a channel from the shared [`Pit`] and routes its interrupt
/// to a client; `end` (or dropping the timer) gives the channel back.
/// `pause`, `resume`, `end` and `priority` are no-ops in states where they
/// have nothing to do.
pub struct IntervalTimer<'a, R: TimerRegisters, I: InterruptController, const N: usize> {
    pit: &'a Pit<'a, R, I, N>,
    state: State,
    client: Option<&'a dyn TimerClient>,
    priority: u8,
}

impl<'a, R: TimerRegisters, I: InterruptController, const N: usize> IntervalTimer<'a, R, I, N> {
    pub fn new(pit: &'a Pit<'a, R, I, N>) -> Self {
        Self {
            pit,
            state: State::Off,
            client: None,
            priority: pit.config().default_priority,
        }
    }

    /// Call `client` every `period` microseconds.
    ///
    /// A running timer is stopped first, so a failed restart leaves it off.
    pub fn begin(
        &mut self,
        client: &'a dyn TimerClient,
        period: impl Into<Period>,
    ) -> TimerResult<()> {
        self.end();
        let reload = self.pit.converter().to_reload(period)?;
        self.start(client, reload)
    }

    /// Call `client` every `reload + 1` counter ticks. The reload value is
    /// not validated.
    pub fn begin_cycles(&mut self, client: &'a dyn TimerClient, reload: u32) -> TimerResult<()> {
        self.end();
        self.start(client, reload)
    }

    fn start(&mut self, client: &'a dyn TimerClient, reload: u32) -> TimerResult<()> {
        let pit = self.pit;
        let priority = self.priority;
        let channel = critical_section::with(|cs| {
            let channel = pit.claim(cs, reload)?;
            pit.install(cs, channel, client, priority);
            TimerResult::Ok(channel)
        })?;

        self.client = Some(client);
        self.state = State::Active {
            channel,
            paused: false,
        };
        Ok(())
    }

    /// Stop counting. The channel stays claimed and its interrupt stays
    /// armed.
    pub fn pause(&mut self) {
        let State::Active { channel, paused } = &mut self.state else {
            return;
        };
        if *paused {
            return;
        }
        critical_section::with(|cs| self.pit.set_counting(cs, *channel, false));
        *paused = true;
    }

    pub fn resume(&mut self) {
        let State::Active { channel, paused } = &mut self.state else {
            return;
        };
        if !*paused {
            return;
        }
        critical_section::with(|cs| self.pit.set_counting(cs, *channel, true));
        *paused = false;
    }

    /// Stop the timer and release its channel.
    pub fn end(&mut self) {
        if let State::Active { channel, .. } = self.state {
            critical_section::with(|cs| {
                self.pit.uninstall(cs, channel);
                self.pit.release(cs, channel);
            });
        }
        self.state = State::Off;
        self.client = None;
    }

    /// Set the interrupt priority, now if running and on every later
    /// `begin`.
    pub fn priority(&mut self, priority: u8) {
        self.priority = priority;
        if let State::Active { channel, .. } = self.state {
            critical_section::with(|cs| self.pit.set_priority(cs, channel, priority));
        }
    }

    pub fn current_priority(&self) -> u8 {
        self.priority
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, State::Active { paused: true, .. })
    }

    pub fn channel(&self) -> Option<usize> {
        match self.state {
            State::Active { channel, .. } => Some(channel),
            State::Off => None,
        }
    }

    /// Vector raised by the running timer.
    pub fn irq(&self) -> Option<u32> {
        self.channel().map(|channel| self.pit.irq(channel))
    }

    pub fn client(&self) -> Option<&'a dyn TimerClient> {
        self.client
    }
}

impl<R: TimerRegisters, I: InterruptController, const N: usize> Drop
    for IntervalTimer<'_, R, I, N>
{
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PitConfig;
    use crate::error::{PeriodError, TimerError};
    use pit_hil::Control;
    use pit_unittest::fake;
    use pit_unittest::CountingClient;

    type FakePit<'a> = Pit<'a, fake::TimerBlock<4>, fake::InterruptController, 4>;

    fn pit<'a>() -> FakePit<'a> {
        Pit::new(
            fake::TimerBlock::new(),
            fake::InterruptController::new(),
            PitConfig::kinetis_k(16_000_000),
        )
    }

    #[test]
    fn test_begin_programs_reload() {
        let client = CountingClient::new();
        let pit = pit();
        let mut timer = IntervalTimer::new(&pit);

        assert_eq!(timer.begin(&client, 1000u32), Ok(()));
        assert!(timer.is_active());
        assert!(!timer.is_paused());
        assert_eq!(timer.channel(), Some(0));
        assert_eq!(timer.irq(), Some(48));
        assert_eq!(pit.registers().reload(0), 15_999);
        assert_eq!(pit.registers().control(0), Control::ARMED);
        assert_eq!(pit.controller().priority(48), Some(128));
    }

    #[test]
    fn test_begin_zero_period_stays_off() {
        let client = CountingClient::new();
        let pit = pit();
        let mut timer = IntervalTimer::new(&pit);

        assert_eq!(
            timer.begin(&client, 0u32),
            Err(TimerError::InvalidPeriod(PeriodError::Zero))
        );
        assert!(!timer.is_active());
        assert_eq!(timer.irq(), None);
        assert_eq!(pit.claimed_count(), 0);
        assert!(!pit.clock_enabled());
    }

    #[test]
    fn test_restart_with_new_period() {
        let client = CountingClient::new();
        let pit = pit();
        let mut timer = IntervalTimer::new(&pit);

        timer.begin(&client, 1000u32).unwrap();
        timer.pause();
        timer.begin(&client, 2000u32).unwrap();
        assert_eq!(timer.channel(), Some(0));
        assert!(!timer.is_paused());
        assert_eq!(pit.registers().reload(0), 31_999);
        assert_eq!(pit.claimed_count(), 1);
    }

    #[test]
    fn test_failed_restart_releases_channel() {
        let client = CountingClient::new();
        let pit = pit();
        let mut timer = IntervalTimer::new(&pit);

        timer.begin(&client, 1000u32).unwrap();
        assert!(matches!(
            timer.begin(&client, -5i32),
            Err(TimerError::InvalidPeriod(PeriodError::Negative))
        ));
        assert!(!timer.is_active());
        assert_eq!(pit.claimed_count(), 0);
        assert!(!pit.controller().is_enabled(48));
    }

    #[test]
    fn test_pause_resume() {
        let client = CountingClient::new();
        let pit = pit();
        let mut timer = IntervalTimer::new(&pit);

        // Off: nothing to do.
        timer.pause();
        timer.resume();
        assert!(!timer.is_paused());
        assert!(pit.registers().accesses().is_empty());

        timer.begin(&client, 1000u32).unwrap();
        timer.pause();
        assert!(timer.is_paused());
        assert_eq!(pit.registers().control(0), Control::ARMED.with_count(false));

        pit.registers().clear_accesses();
        timer.pause();
        assert!(timer.is_paused());
        assert!(pit.registers().accesses().is_empty());

        timer.resume();
        assert!(!timer.is_paused());
        assert_eq!(pit.registers().control(0), Control::ARMED);

        pit.registers().clear_accesses();
        timer.resume();
        assert!(pit.registers().accesses().is_empty());
    }

    #[test]
    fn test_end_twice() {
        let client = CountingClient::new();
        let pit = pit();
        let mut timer = IntervalTimer::new(&pit);

        timer.begin(&client, 1000u32).unwrap();
        timer.end();
        assert_eq!(pit.claimed_count(), 0);
        pit.registers().clear_accesses();
        pit.controller().clear_accesses();

        timer.end();
        assert!(!timer.is_active());
        assert_eq!(pit.claimed_count(), 0);
        assert!(pit.registers().accesses().is_empty());
        assert!(pit.controller().accesses().is_empty());
    }

    #[test]
    fn test_priority_cached_and_applied() {
        let client = CountingClient::new();
        let pit = pit();
        let mut timer = IntervalTimer::new(&pit);
        assert_eq!(timer.current_priority(), 128);

        timer.priority(32);
        assert!(pit.controller().accesses().is_empty());

        timer.begin(&client, 1000u32).unwrap();
        assert_eq!(pit.controller().priority(48), Some(32));

        timer.priority(200);
        assert_eq!(pit.controller().priority(48), Some(200));

        timer.end();
        timer.begin(&client, 1000u32).unwrap();
        assert_eq!(pit.controller().priority(48), Some(200));
    }

    #[test]
    fn test_drop_releases_channel() {
        let client = CountingClient::new();
        let pit = pit();
        {
            let mut timer = IntervalTimer::new(&pit);
            timer.begin(&client, 1000u32).unwrap();
            assert_eq!(pit.claimed_count(), 1);
        }
        assert_eq!(pit.claimed_count(), 0);
        assert!(!pit.clock_enabled());
        assert!(!pit.is_installed(0));
    }

    #[test]
    fn test_begin_cycles() {
        let client = CountingClient::new();
        let pit = pit();
        let mut timer = IntervalTimer::new(&pit);

        timer.begin_cycles(&client, 7).unwrap();
        assert_eq!(pit.registers().reload(0), 7);
        assert!(timer.client().is_some());
    }
}
