// Licensed under the Apache-2.0 license

//! Host-side test support for the timer driver: a fake timer block and a
//! fake interrupt controller that record every access the driver makes.

pub mod fake;

pub use fake::CountingClient;
