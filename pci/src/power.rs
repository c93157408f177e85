//! Registers of the PCI Power Management capability.
use core::{convert::Infallible, fmt};
use mycelium_bitfield::{bitfield, FromBits};

/// Power Management Control/Status register (word).
pub const CONTROL: u16 = 0x04;

bitfield! {
    /// The Power Management Control/Status Register (PMCSR).
    #[derive(Eq, PartialEq)]
    pub struct PowerControl<u16> {
        /// The current power state of the function.
        pub const POWER_STATE: PowerState;
        const _RES0 = 1;
        /// No Soft Reset
        ///
        /// If set, the function keeps its configuration context when
        /// transitioning from D3hot to D0.
        pub const NO_SOFT_RESET: bool;
        const _RES1 = 4;
        /// PME Enable
        pub const PME_ENABLE: bool;
        /// Data Select
        pub const DATA_SELECT = 4;
        /// Data Scale
        pub const DATA_SCALE = 2;
        /// PME Status
        pub const PME_STATUS: bool;
    }
}

/// A PCI function power state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PowerState {
    D0 = 0b00,
    D1 = 0b01,
    D2 = 0b10,
    D3 = 0b11,
}

impl FromBits<u16> for PowerState {
    // every 2-bit pattern is a power state.
    type Error = Infallible;
    const BITS: u32 = 2;

    fn try_from_bits(bits: u16) -> Result<Self, Self::Error> {
        Ok(match bits & 0b11 {
            0b00 => Self::D0,
            0b01 => Self::D1,
            0b10 => Self::D2,
            _ => Self::D3,
        })
    }

    fn into_bits(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
