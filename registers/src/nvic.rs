/*++

Licensed under the Apache-2.0 license.

File Name:

    nvic.rs

Abstract:

    Cortex-M nested vectored interrupt controller. The vector table is fixed
    at link time, so binding entry stubs is left to the linker.

--*/

use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::StaticRef;
use pit_hil::InterruptController;
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::register_structs;

pub const NVIC_ADDR: usize = 0xE000_E100;

/// External interrupts covered by the register map.
pub const NVIC_IRQS: u32 = 240;

register_structs! {
    pub NvicRegisters {
        (0x000 => pub iser: [ReadWrite<u32>; 8]),
        (0x020 => _reserved0),
        (0x080 => pub icer: [ReadWrite<u32>; 8]),
        (0x0A0 => _reserved1),
        (0x100 => pub ispr: [ReadWrite<u32>; 8]),
        (0x120 => _reserved2),
        (0x180 => pub icpr: [ReadWrite<u32>; 8]),
        (0x1A0 => _reserved3),
        (0x200 => pub iabr: [ReadOnly<u32>; 8]),
        (0x220 => _reserved4),
        (0x300 => pub ipr: [ReadWrite<u8>; 240]),
        (0x3F0 => @END),
    }
}

pub const NVIC_BASE: StaticRef<NvicRegisters> =
    unsafe { StaticRef::new(NVIC_ADDR as *const NvicRegisters) };

pub struct Nvic {
    registers: StaticRef<NvicRegisters>,
}

impl Nvic {
    pub const fn new(registers: StaticRef<NvicRegisters>) -> Self {
        Self { registers }
    }

    // Word index and bit mask of `irq` in the set/clear banks.
    fn bank(irq: u32) -> Option<(usize, u32)> {
        if irq >= NVIC_IRQS {
            return None;
        }
        Some(((irq / 32) as usize, 1 << (irq % 32)))
    }

    pub fn is_enabled(&self, irq: u32) -> bool {
        Self::bank(irq)
            .map(|(word, bit)| self.registers.iser[word].get() & bit != 0)
            .unwrap_or(false)
    }

    pub fn is_pending(&self, irq: u32) -> bool {
        Self::bank(irq)
            .map(|(word, bit)| self.registers.ispr[word].get() & bit != 0)
            .unwrap_or(false)
    }

    pub fn is_active(&self, irq: u32) -> bool {
        Self::bank(irq)
            .map(|(word, bit)| self.registers.iabr[word].get() & bit != 0)
            .unwrap_or(false)
    }

    pub fn priority(&self, irq: u32) -> Option<u8> {
        self.registers.ipr.get(irq as usize).map(|ipr| ipr.get())
    }
}

impl InterruptController for Nvic {
    fn enable(&self, irq: u32) {
        if let Some((word, bit)) = Self::bank(irq) {
            self.registers.iser[word].set(bit);
        }
    }

    fn disable(&self, irq: u32) {
        if let Some((word, bit)) = Self::bank(irq) {
            self.registers.icer[word].set(bit);
        }
    }

    // Parts implementing fewer priority bits ignore the low ones.
    fn set_priority(&self, irq: u32, priority: u8) {
        if let Some(ipr) = self.registers.ipr.get(irq as usize) {
            ipr.set(priority);
        }
    }

    fn unpend(&self, irq: u32) {
        if let Some((word, bit)) = Self::bank(irq) {
            self.registers.icpr[word].set(bit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nvic() -> (Nvic, StaticRef<NvicRegisters>) {
        let words = vec![0u32; core::mem::size_of::<NvicRegisters>() / 4].leak();
        let registers = unsafe { StaticRef::new(words.as_ptr() as *const NvicRegisters) };
        (Nvic::new(registers), registers)
    }

    #[test]
    fn test_register_layout() {
        assert_eq!(core::mem::size_of::<NvicRegisters>(), 0x3F0);
    }

    #[test]
    fn test_enable_disable_bits() {
        let (nvic, registers) = nvic();

        nvic.enable(48);
        assert_eq!(registers.iser[1].get(), 1 << 16);
        assert!(nvic.is_enabled(48));

        nvic.disable(22);
        assert_eq!(registers.icer[0].get(), 1 << 22);

        nvic.unpend(49);
        assert_eq!(registers.icpr[1].get(), 1 << 17);
    }

    #[test]
    fn test_priority_byte() {
        let (nvic, registers) = nvic();
        nvic.set_priority(48, 128);
        nvic.set_priority(22, 16);
        assert_eq!(registers.ipr[48].get(), 128);
        assert_eq!(nvic.priority(22), Some(16));
        assert_eq!(nvic.priority(47), Some(0));
    }

    #[test]
    fn test_out_of_range_irq_is_ignored() {
        let (nvic, registers) = nvic();
        nvic.enable(NVIC_IRQS);
        nvic.set_priority(NVIC_IRQS, 1);
        assert!(registers.iser.iter().all(|iser| iser.get() == 0));
        assert_eq!(nvic.priority(NVIC_IRQS), None);
        assert!(!nvic.is_pending(NVIC_IRQS));
        assert!(!nvic.is_active(NVIC_IRQS));
    }
}
