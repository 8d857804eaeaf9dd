// Licensed under the Apache-2.0 license

use thiserror_no_std::Error;

pub type TimerResult<T> = Result<T, TimerError>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("invalid period: {0}")]
    InvalidPeriod(#[from] PeriodError),
    #[error("all timer channels are in use")]
    ChannelsExhausted,
}

/// Reason a period was rejected by the converter.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PeriodError {
    #[error("period is zero")]
    Zero,
    #[error("period is negative")]
    Negative,
    #[error("period is not a number")]
    NotANumber,
    #[error("period exceeds {max_us} us")]
    TooLong { max_us: u32 },
    #[error("reload {reload} is below the minimum of {minimum}")]
    BelowMinimumReload { reload: u32, minimum: u32 },
}
