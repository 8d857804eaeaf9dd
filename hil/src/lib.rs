/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Hardware Interface Layer (HIL) for periodic interrupt timer peripherals.

--*/

#![no_std]

pub mod client;
pub mod interrupts;
pub mod registers;

pub use client::TimerClient;
pub use interrupts::{EntryStub, InterruptController};
pub use registers::{Control, TimerRegisters};
