/*++

Licensed under the Apache-2.0 license.

File Name:

    dispatch.rs

Abstract:

    Fixed table from timer channel to client, and the interrupt controller
    programming that routes each channel's vector to its entry stub.

--*/

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};
use pit_hil::{EntryStub, InterruptController, TimerClient};

use crate::config::VectorLayout;

#[derive(Clone, Copy)]
struct Slot<'a> {
    client: Option<&'a dyn TimerClient>,
    priority: u8,
}

/// Handler table plus the interrupt controller it programs.
///
/// A slot is written only inside a critical section, so an entry stub never
/// observes a half-written slot. Slots are read by entry stubs, which then
/// call the client outside the critical section.
pub struct Dispatcher<'a, I: InterruptController, const N: usize> {
    controller: I,
    layout: VectorLayout,
    entry_stubs: Option<[EntryStub; N]>,
    slots: [Mutex<Cell<Slot<'a>>>; N],
}

impl<'a, I: InterruptController, const N: usize> Dispatcher<'a, I, N> {
    pub const fn new(controller: I, layout: VectorLayout) -> Self {
        Self::build(controller, layout, None)
    }

    /// Dispatcher for controllers that bind vectors at run time.
    pub const fn with_entry_stubs(
        controller: I,
        layout: VectorLayout,
        stubs: [EntryStub; N],
    ) -> Self {
        Self::build(controller, layout, Some(stubs))
    }

    const fn build(
        controller: I,
        layout: VectorLayout,
        entry_stubs: Option<[EntryStub; N]>,
    ) -> Self {
        Self {
            controller,
            layout,
            entry_stubs,
            slots: [const {
                Mutex::new(Cell::new(Slot {
                    client: None,
                    priority: 0,
                }))
            }; N],
        }
    }

    pub fn controller(&self) -> &I {
        &self.controller
    }

    pub fn irq(&self, channel: usize) -> u32 {
        self.layout.irq(channel)
    }

    /// Register `client` for `channel` and unmask the channel's vector.
    pub fn install(
        &self,
        cs: CriticalSection<'_>,
        channel: usize,
        client: &'a dyn TimerClient,
        priority: u8,
    ) {
        let Some(slot) = self.slots.get(channel) else {
            return;
        };
        let irq = self.irq(channel);
        let shared = self.layout.is_shared();

        slot.borrow(cs).set(Slot {
            client: Some(client),
            priority,
        });

        if let Some(stubs) = &self.entry_stubs {
            let stub = if shared { stubs[0] } else { stubs[channel] };
            self.controller.bind(irq, stub);
        }
        if !shared {
            self.controller.unpend(irq);
        }
        self.controller
            .set_priority(irq, self.vector_priority(cs, channel));
        self.controller.enable(irq);
    }

    /// Mask the channel's vector, then forget its client.
    ///
    /// A shared vector stays unmasked while any other channel is installed.
    pub fn uninstall(&self, cs: CriticalSection<'_>, channel: usize) {
        let Some(slot) = self.slots.get(channel) else {
            return;
        };
        let irq = self.irq(channel);

        if !self.layout.is_shared() {
            self.controller.disable(irq);
            self.clear(cs, channel);
            return;
        }

        let others = (0..N).any(|other| other != channel && self.is_installed(cs, other));
        if !others {
            self.controller.disable(irq);
        }
        let was_installed = slot.borrow(cs).get().client.is_some();
        self.clear(cs, channel);
        if others && was_installed {
            self.controller
                .set_priority(irq, self.vector_priority(cs, channel));
        }
    }

    /// Reprogram the priority of an installed channel. Channels without a
    /// client are left alone.
    pub fn set_priority(&self, cs: CriticalSection<'_>, channel: usize, priority: u8) {
        let Some(slot) = self.slots.get(channel) else {
            return;
        };
        let mut current = slot.borrow(cs).get();
        if current.client.is_none() {
            return;
        }
        current.priority = priority;
        slot.borrow(cs).set(current);
        self.controller
            .set_priority(self.irq(channel), self.vector_priority(cs, channel));
    }

    /// Drop the client for `channel` without touching the controller.
    pub fn clear(&self, cs: CriticalSection<'_>, channel: usize) {
        if let Some(slot) = self.slots.get(channel) {
            slot.borrow(cs).set(Slot {
                client: None,
                priority: 0,
            });
        }
    }

    pub fn client(&self, cs: CriticalSection<'_>, channel: usize) -> Option<&'a dyn TimerClient> {
        self.slots
            .get(channel)
            .and_then(|slot| slot.borrow(cs).get().client)
    }

    pub fn is_installed(&self, cs: CriticalSection<'_>, channel: usize) -> bool {
        self.client(cs, channel).is_some()
    }

    /// Call the client of `channel`, if any. The hardware flag must already
    /// be cleared.
    pub fn dispatch(&self, channel: usize) {
        let client = critical_section::with(|cs| self.client(cs, channel));
        if let Some(client) = client {
            client.fired();
        }
    }

    // With a shared vector, the most urgent installed priority wins.
    fn vector_priority(&self, cs: CriticalSection<'_>, channel: usize) -> u8 {
        if !self.layout.is_shared() {
            return self.slots[channel].borrow(cs).get().priority;
        }
        self.slots
            .iter()
            .map(|slot| slot.borrow(cs).get())
            .filter(|slot| slot.client.is_some())
            .map(|slot| slot.priority)
            .min()
            .unwrap_or(u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pit_unittest::fake::{self, IrqAccess};
    use pit_unittest::CountingClient;

    extern "C" fn stub0() {}
    extern "C" fn stub1() {}

    fn addr(stub: EntryStub) -> usize {
        stub as *const () as usize
    }

    const PER_CHANNEL: VectorLayout = VectorLayout::PerChannel { first_irq: 48 };
    const SHARED: VectorLayout = VectorLayout::Shared { irq: 22 };

    #[test]
    fn test_install_per_channel() {
        let client = CountingClient::new();
        let dispatcher = Dispatcher::<_, 2>::new(fake::InterruptController::new(), PER_CHANNEL);

        critical_section::with(|cs| dispatcher.install(cs, 1, &client, 64));

        let controller = dispatcher.controller();
        assert_eq!(
            controller.accesses(),
            vec![
                IrqAccess::Unpend(49),
                IrqAccess::Priority(49, 64),
                IrqAccess::Enable(49),
            ]
        );
        assert!(critical_section::with(|cs| dispatcher.is_installed(cs, 1)));
        assert!(!critical_section::with(|cs| dispatcher.is_installed(cs, 0)));

        dispatcher.dispatch(1);
        dispatcher.dispatch(0);
        assert_eq!(client.count(), 1);
    }

    #[test]
    fn test_uninstall_masks_before_clearing() {
        let client = CountingClient::new();
        let dispatcher = Dispatcher::<_, 2>::new(fake::InterruptController::new(), PER_CHANNEL);
        critical_section::with(|cs| dispatcher.install(cs, 0, &client, 128));
        dispatcher.controller().clear_accesses();

        critical_section::with(|cs| dispatcher.uninstall(cs, 0));
        assert_eq!(
            dispatcher.controller().accesses(),
            vec![IrqAccess::Disable(48)]
        );
        assert!(!dispatcher.controller().is_enabled(48));

        dispatcher.dispatch(0);
        assert_eq!(client.count(), 0);
    }

    #[test]
    fn test_binds_entry_stubs() {
        let client = CountingClient::new();
        let dispatcher = Dispatcher::<_, 2>::with_entry_stubs(
            fake::InterruptController::new(),
            PER_CHANNEL,
            [stub0, stub1],
        );
        critical_section::with(|cs| dispatcher.install(cs, 1, &client, 128));

        let bound = dispatcher.controller().entry(49).map(addr);
        assert_eq!(bound, Some(addr(stub1)));
        assert!(dispatcher.controller().entry(48).is_none());
    }

    #[test]
    fn test_set_priority_only_when_installed() {
        let client = CountingClient::new();
        let dispatcher = Dispatcher::<_, 2>::new(fake::InterruptController::new(), PER_CHANNEL);

        critical_section::with(|cs| dispatcher.set_priority(cs, 0, 16));
        assert!(dispatcher.controller().accesses().is_empty());

        critical_section::with(|cs| {
            dispatcher.install(cs, 0, &client, 128);
            dispatcher.set_priority(cs, 0, 16);
        });
        assert_eq!(dispatcher.controller().priority(48), Some(16));
    }

    #[test]
    fn test_shared_vector_priority_and_masking() {
        let first = CountingClient::new();
        let second = CountingClient::new();
        let dispatcher = Dispatcher::<_, 2>::with_entry_stubs(
            fake::InterruptController::new(),
            SHARED,
            [stub0, stub1],
        );
        let controller = dispatcher.controller();

        critical_section::with(|cs| dispatcher.install(cs, 0, &first, 128));
        assert_eq!(controller.priority(22), Some(128));
        assert_eq!(controller.entry(22).map(addr), Some(addr(stub0)));

        critical_section::with(|cs| dispatcher.install(cs, 1, &second, 32));
        assert_eq!(controller.priority(22), Some(32));
        assert_eq!(controller.entry(22).map(addr), Some(addr(stub0)));

        // Removing the more urgent channel relaxes the vector again.
        critical_section::with(|cs| dispatcher.uninstall(cs, 1));
        assert!(controller.is_enabled(22));
        assert_eq!(controller.priority(22), Some(128));

        critical_section::with(|cs| dispatcher.uninstall(cs, 0));
        assert!(!controller.is_enabled(22));
        assert!(!controller.accesses().contains(&IrqAccess::Unpend(22)));
    }

    #[test]
    fn test_out_of_range_channel_is_ignored() {
        let client = CountingClient::new();
        let dispatcher = Dispatcher::<_, 2>::new(fake::InterruptController::new(), PER_CHANNEL);
        critical_section::with(|cs| {
            dispatcher.install(cs, 5, &client, 0);
            dispatcher.uninstall(cs, 5);
            dispatcher.set_priority(cs, 5, 0);
        });
        dispatcher.dispatch(5);
        assert!(dispatcher.controller().accesses().is_empty());
        assert_eq!(client.count(), 0);
    }
}
