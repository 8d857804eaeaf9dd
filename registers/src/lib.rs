/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Memory-mapped register bindings for the Kinetis periodic interrupt timer
    and the Cortex-M NVIC, implementing the timer Hardware Interface Layer.

--*/

#![cfg_attr(not(test), no_std)]

pub mod kinetis_pit;
pub mod nvic;

pub use kinetis_pit::{KinetisPit, PIT_BASE, SIM_SCGC6_BASE};
pub use nvic::{Nvic, NVIC_BASE};
