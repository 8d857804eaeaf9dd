// Licensed under the Apache-2.0 license

// Periodic interrupt timer block and its SIM clock gate, as found on Kinetis
// K and L parts. L parts implement channels 0 and 1 only.

use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::StaticRef;
use log::trace;
use pit_hil::{Control, TimerRegisters};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

pub const PIT_ADDR: usize = 0x4003_7000;
pub const SIM_SCGC6_ADDR: usize = 0x4004_803C;

/// Number of channel blocks in the register map.
pub const PIT_CHANNELS: usize = 4;

register_bitfields![u32,
    MCR [
        MDIS OFFSET(1) NUMBITS(1) [],
        FRZ OFFSET(0) NUMBITS(1) [],
    ],
    TCTRL [
        CHN OFFSET(2) NUMBITS(1) [],
        TIE OFFSET(1) NUMBITS(1) [],
        TEN OFFSET(0) NUMBITS(1) [],
    ],
    TFLG [
        TIF OFFSET(0) NUMBITS(1) [],
    ],
    SCGC6 [
        PIT OFFSET(23) NUMBITS(1) [],
    ],
];

register_structs! {
    pub PitChannelRegisters {
        (0x00 => pub ldval: ReadWrite<u32>),
        (0x04 => pub cval: ReadOnly<u32>),
        (0x08 => pub tctrl: ReadWrite<u32, TCTRL::Register>),
        // Write 1 to clear.
        (0x0C => pub tflg: ReadWrite<u32, TFLG::Register>),
        (0x10 => @END),
    },
    pub PitRegisters {
        (0x000 => pub mcr: ReadWrite<u32, MCR::Register>),
        (0x004 => _reserved0),
        (0x0E0 => pub ltmr64h: ReadOnly<u32>),
        (0x0E4 => pub ltmr64l: ReadOnly<u32>),
        (0x0E8 => _reserved1),
        (0x100 => pub channel: [PitChannelRegisters; PIT_CHANNELS]),
        (0x140 => @END),
    },
    pub SimScgc6 {
        (0x0 => pub scgc6: ReadWrite<u32, SCGC6::Register>),
        (0x4 => @END),
    }
}

pub const PIT_BASE: StaticRef<PitRegisters> =
    unsafe { StaticRef::new(PIT_ADDR as *const PitRegisters) };
pub const SIM_SCGC6_BASE: StaticRef<SimScgc6> =
    unsafe { StaticRef::new(SIM_SCGC6_ADDR as *const SimScgc6) };

pub struct KinetisPit {
    registers: StaticRef<PitRegisters>,
    sim: StaticRef<SimScgc6>,
}

impl KinetisPit {
    pub const fn new(registers: StaticRef<PitRegisters>, sim: StaticRef<SimScgc6>) -> Self {
        Self { registers, sim }
    }

    fn channel(&self, channel: usize) -> Option<&PitChannelRegisters> {
        self.registers.channel.get(channel)
    }

    /// Current countdown value of `channel`.
    pub fn current_value(&self, channel: usize) -> Option<u32> {
        self.channel(channel).map(|regs| regs.cval.get())
    }
}

impl TimerRegisters for KinetisPit {
    fn enable_clock(&self) {
        self.sim.scgc6.modify(SCGC6::PIT::SET);
        // Module enabled, timers keep running in debug mode.
        self.registers
            .mcr
            .write(MCR::MDIS::CLEAR + MCR::FRZ::CLEAR);
        trace!("kinetis_pit: module enabled");
    }

    fn disable_clock(&self) {
        self.registers.mcr.modify(MCR::MDIS::SET);
        self.sim.scgc6.modify(SCGC6::PIT::CLEAR);
        trace!("kinetis_pit: module disabled");
    }

    fn write_reload(&self, channel: usize, reload: u32) {
        if let Some(regs) = self.channel(channel) {
            regs.ldval.set(reload);
        }
    }

    fn write_control(&self, channel: usize, control: Control) {
        if let Some(regs) = self.channel(channel) {
            regs.tctrl.write(
                TCTRL::TEN.val(control.count as u32) + TCTRL::TIE.val(control.interrupt as u32),
            );
        }
    }

    fn read_control(&self, channel: usize) -> Control {
        self.channel(channel)
            .map(|regs| Control {
                count: regs.tctrl.is_set(TCTRL::TEN),
                interrupt: regs.tctrl.is_set(TCTRL::TIE),
            })
            .unwrap_or(Control::OFF)
    }

    fn clear_pending(&self, channel: usize) {
        if let Some(regs) = self.channel(channel) {
            regs.tflg.write(TFLG::TIF::SET);
        }
    }

    fn is_pending(&self, channel: usize) -> bool {
        self.channel(channel)
            .map(|regs| regs.tflg.is_set(TFLG::TIF))
            .unwrap_or(false)
    }
}
