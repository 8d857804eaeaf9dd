/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Periodic interrupt timer driver: a fixed pool of identical countdown
    channels shared by every timer user, the conversion from periods to
    reload values, and the routing of channel interrupts to registered
    clients.

--*/

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod interval_timer;
pub mod macros;
pub mod period;
pub mod pit;
pub mod pool;

pub use config::{PitConfig, VectorLayout};
pub use error::{PeriodError, TimerError, TimerResult};
pub use interval_timer::IntervalTimer;
pub use period::{Period, PeriodConverter};
pub use pit::Pit;
pub use pit_hil::{Control, EntryStub, InterruptController, TimerClient, TimerRegisters};
