// Licensed under the Apache-2.0 license

mod client;
mod interrupt_controller;
mod timer_block;

pub use client::CountingClient;
pub use interrupt_controller::{InterruptController, IrqAccess};
pub use timer_block::{RegAccess, TimerBlock};
