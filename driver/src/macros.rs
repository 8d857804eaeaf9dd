// Licensed under the Apache-2.0 license

//! Entry stub generators.
//!
//! Vector tables fixed at link time need one named `extern "C"` function per
//! timer vector. These macros emit them for a `static` [`Pit`](crate::Pit).

/// Emit one entry stub per channel, each forwarding to
/// [`Pit::handle_interrupt`](crate::Pit::handle_interrupt).
///
/// ```ignore
/// static PIT: Pit<'static, KinetisPit, Nvic, 4> = ...;
///
/// pit_driver::pit_entry_stubs!(PIT; pit0_isr = 0, pit1_isr = 1, pit2_isr = 2, pit3_isr = 3);
/// ```
#[macro_export]
macro_rules! pit_entry_stubs {
    ($pit:expr; $($name:ident = $channel:literal),+ $(,)?) => {
        $(
            #[no_mangle]
            pub extern "C" fn $name() {
                $pit.handle_interrupt($channel);
            }
        )+
    };
}

/// Emit the single entry stub for a block whose channels share one vector.
#[macro_export]
macro_rules! pit_shared_entry_stub {
    ($pit:expr; $name:ident) => {
        #[no_mangle]
        pub extern "C" fn $name() {
            $pit.service_shared();
        }
    };
}
