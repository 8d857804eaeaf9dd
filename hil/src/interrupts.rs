/*++

Licensed under the Apache-2.0 license.

File Name:

    interrupts.rs

Abstract:

    Hardware Interface Layer trait for the interrupt controller that routes
    timer channel vectors to their entry stubs.

--*/

/// Low-level interrupt entry point for one timer vector.
pub type EntryStub = extern "C" fn();

// Interrupt controller operations used by the timer dispatcher.
//
// Vector numbers are the controller's external interrupt numbers, not
// exception numbers.
pub trait InterruptController {
    // Unmask a vector.
    fn enable(&self, irq: u32);

    // Mask a vector. A vector that is already pending stays pending but will
    // not be taken until it is enabled again.
    fn disable(&self, irq: u32);

    // Program the priority of a vector. Lower values are more urgent.
    fn set_priority(&self, irq: u32, priority: u8);

    // Drop a request latched before the vector was handed to a new owner.
    fn unpend(&self, _irq: u32) {}

    // Route a vector to an entry stub.
    //
    // Controllers with a vector table fixed at link time keep the default,
    // which does nothing.
    fn bind(&self, _irq: u32, _entry: EntryStub) {}
}
