// Licensed under the Apache-2.0 license

/// Priority given to new timers until `IntervalTimer::priority` is called.
pub const DEFAULT_PRIORITY: u8 = 128;

/// Fewest ticks a fractional period may reload with. Below this the
/// countdown can finish before the previous interrupt has been serviced.
/// Tuned for Kinetis interrupt entry latency; retune when retargeting.
pub const DEFAULT_MIN_SAFE_RELOAD: u32 = 40;

pub const KINETIS_K_CHANNELS: usize = 4;
pub const KINETIS_L_CHANNELS: usize = 2;

/// First PIT vector on K64/K66 class parts. K20 parts start at 68.
pub const KINETIS_K_PIT_IRQ: u32 = 48;
pub const KINETIS_L_PIT_IRQ: u32 = 22;

/// How channel interrupts reach the interrupt controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorLayout {
    /// Channel `n` raises vector `first_irq + n`.
    PerChannel { first_irq: u32 },
    /// All channels raise one vector and its entry stub polls the flags.
    Shared { irq: u32 },
}

impl VectorLayout {
    pub const fn irq(&self, channel: usize) -> u32 {
        match *self {
            VectorLayout::PerChannel { first_irq } => first_irq + channel as u32,
            VectorLayout::Shared { irq } => irq,
        }
    }

    pub const fn is_shared(&self) -> bool {
        matches!(self, VectorLayout::Shared { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PitConfig {
    /// Frequency of the clock feeding the channel counters.
    pub clock_hz: u32,
    pub min_safe_reload: u32,
    pub default_priority: u8,
    pub vectors: VectorLayout,
}

impl PitConfig {
    pub const fn new(clock_hz: u32, vectors: VectorLayout) -> Self {
        Self {
            clock_hz,
            min_safe_reload: DEFAULT_MIN_SAFE_RELOAD,
            default_priority: DEFAULT_PRIORITY,
            vectors,
        }
    }

    /// Kinetis K: four channels, one vector each.
    pub const fn kinetis_k(bus_hz: u32) -> Self {
        Self::new(
            bus_hz,
            VectorLayout::PerChannel {
                first_irq: KINETIS_K_PIT_IRQ,
            },
        )
    }

    /// Kinetis L: two channels behind a single vector.
    pub const fn kinetis_l(bus_hz: u32) -> Self {
        Self::new(
            bus_hz,
            VectorLayout::Shared {
                irq: KINETIS_L_PIT_IRQ,
            },
        )
    }

    pub const fn with_min_safe_reload(mut self, min_safe_reload: u32) -> Self {
        self.min_safe_reload = min_safe_reload;
        self
    }

    pub const fn with_default_priority(mut self, priority: u8) -> Self {
        self.default_priority = priority;
        self
    }

    pub const fn with_vectors(mut self, vectors: VectorLayout) -> Self {
        self.vectors = vectors;
        self
    }

    /// Whole counter ticks per microsecond. Sub-megahertz remainders are
    /// dropped.
    pub const fn ticks_per_us(&self) -> u32 {
        self.clock_hz / 1_000_000
    }
}
