// Licensed under the Apache-2.0 license

use core::sync::atomic::{AtomicU32, Ordering};
use pit_hil::TimerClient;

/// Client that counts how many times it fired. Usable from a `static`.
#[derive(Debug, Default)]
pub struct CountingClient {
    fired: AtomicU32,
}

impl CountingClient {
    pub const fn new() -> Self {
        Self {
            fired: AtomicU32::new(0),
        }
    }

    pub fn count(&self) -> u32 {
        self.fired.load(Ordering::Relaxed)
    }
}

impl TimerClient for CountingClient {
    fn fired(&self) {
        self.fired.fetch_add(1, Ordering::Relaxed);
    }
}
