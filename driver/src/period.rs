/*++

Licensed under the Apache-2.0 license.

File Name:

    period.rs

Abstract:

    Conversion from a timer period in microseconds to the value loaded into a
    channel's countdown register.

--*/

use core::time::Duration;

use num_traits::float::FloatCore;

use crate::config::PitConfig;
use crate::error::PeriodError;

/// A timer period in microseconds.
///
/// Whole periods convert exactly. Fractional periods are rounded to the
/// nearest counter tick and must leave room for interrupt entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Period {
    Micros(i64),
    FractionalMicros(f64),
}

macro_rules! period_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Period {
                fn from(us: $t) -> Self {
                    Period::Micros(i64::try_from(us).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

period_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<f32> for Period {
    fn from(us: f32) -> Self {
        Period::FractionalMicros(us as f64)
    }
}

impl From<f64> for Period {
    fn from(us: f64) -> Self {
        Period::FractionalMicros(us)
    }
}

impl From<Duration> for Period {
    fn from(period: Duration) -> Self {
        if period.subsec_nanos() % 1_000 == 0 {
            Period::Micros(i64::try_from(period.as_micros()).unwrap_or(i64::MAX))
        } else {
            Period::FractionalMicros(period.as_nanos() as f64 / 1_000.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodConverter {
    ticks_per_us: u32,
    min_safe_reload: u32,
}

impl PeriodConverter {
    pub const fn new(clock_hz: u32, min_safe_reload: u32) -> Self {
        Self {
            ticks_per_us: clock_hz / 1_000_000,
            min_safe_reload,
        }
    }

    pub const fn from_config(config: &PitConfig) -> Self {
        Self {
            ticks_per_us: config.ticks_per_us(),
            min_safe_reload: config.min_safe_reload,
        }
    }

    pub const fn ticks_per_us(&self) -> u32 {
        self.ticks_per_us
    }

    /// Longest period whose tick count fits the 32-bit counter.
    pub const fn max_period_us(&self) -> u32 {
        match self.ticks_per_us {
            0 => 0,
            ticks => u32::MAX / ticks,
        }
    }

    pub fn to_reload(&self, period: impl Into<Period>) -> Result<u32, PeriodError> {
        match period.into() {
            Period::Micros(us) => self.whole_to_reload(us),
            Period::FractionalMicros(us) => self.fractional_to_reload(us),
        }
    }

    fn whole_to_reload(&self, us: i64) -> Result<u32, PeriodError> {
        let max_us = self.max_period_us();
        if us < 0 {
            return Err(PeriodError::Negative);
        }
        if us == 0 {
            return Err(PeriodError::Zero);
        }
        if us > max_us as i64 {
            return Err(PeriodError::TooLong { max_us });
        }
        // us <= u32::MAX / ticks_per_us and ticks_per_us >= 1 here
        Ok(self.ticks_per_us * us as u32 - 1)
    }

    fn fractional_to_reload(&self, us: f64) -> Result<u32, PeriodError> {
        let max_us = self.max_period_us();
        if us.is_nan() {
            return Err(PeriodError::NotANumber);
        }
        if us < 0.0 {
            return Err(PeriodError::Negative);
        }
        if us == 0.0 {
            return Err(PeriodError::Zero);
        }
        if us > max_us as f64 {
            return Err(PeriodError::TooLong { max_us });
        }
        let ticks = FloatCore::round(self.ticks_per_us as f64 * us) as u32;
        let reload = ticks.saturating_sub(1);
        if reload < self.min_safe_reload {
            return Err(PeriodError::BelowMinimumReload {
                reload,
                minimum: self.min_safe_reload,
            });
        }
        Ok(reload)
    }
}
