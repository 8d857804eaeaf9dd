// Licensed under the Apache-2.0 license

/// Receiver of periodic timer expirations.
///
/// `fired` runs in interrupt context with the channel's own vector masked.
/// It must return within the period it was registered with.
pub trait TimerClient {
    fn fired(&self);
}

impl<F: Fn()> TimerClient for F {
    fn fired(&self) {
        self()
    }
}
