//! Registers of the PCI Express capability structure.
//!
//! Register offsets are relative to the start of the capability. Field masks
//! are given against the register they belong to.
//!
//! See the PCI Express Base Specification, section 7.5.3.
use crate::error::{self, UnexpectedValue};
use core::fmt;
use mycelium_bitfield::{bitfield, FromBits};

/// PCI Express Capabilities register (word).
pub const FLAGS: u16 = 0x02;
/// Link Capabilities register (long).
pub const LINK_CAPABILITIES: u16 = 0x0c;
/// Link Status register (word).
pub const LINK_STATUS: u16 = 0x12;
/// Slot Capabilities register (long).
pub const SLOT_CAPABILITIES: u16 = 0x14;
/// Device Capabilities 2 register (long).
pub const DEVICE_CAPABILITIES_2: u16 = 0x24;
/// Device Control 2 register (word).
pub const DEVICE_CONTROL_2: u16 = 0x28;

/// Link Capabilities: Max Link Speed.
pub const LNKCAP_MAX_SPEED: u32 = 0x0000_000f;
/// Link Capabilities: Maximum Link Width.
pub const LNKCAP_MAX_WIDTH: u32 = 0x0000_03f0;

/// Link Status: Current Link Speed.
pub const LNKSTA_SPEED: u16 = 0x000f;
/// Link Status: Negotiated Link Width.
pub const LNKSTA_WIDTH: u16 = 0x03f0;

/// Slot Capabilities: Slot Power Limit Value.
pub const SLTCAP_POWER_LIMIT: u32 = 0x0000_7f80;
/// Slot Capabilities: Physical Slot Number.
pub const SLTCAP_PHYSICAL_NUMBER: u32 = 0xfff8_0000;

/// Device Capabilities 2: 32-bit AtomicOp Completer Supported.
pub const DEVCAP2_ATOMIC_COMP32: u32 = 0x0000_0080;
/// Device Capabilities 2: 64-bit AtomicOp Completer Supported.
pub const DEVCAP2_ATOMIC_COMP64: u32 = 0x0000_0100;
/// Device Capabilities 2: 128-bit CAS Completer Supported.
pub const DEVCAP2_ATOMIC_COMP128: u32 = 0x0000_0200;

/// Device Control 2: AtomicOp Requester Enable.
pub const DEVCTL2_ATOMIC_REQ: u16 = 0x0040;

bitfield! {
    /// The PCI Express Capabilities register, at offset `0x02` of the PCI
    /// Express capability.
    #[derive(Eq, PartialEq)]
    pub struct ExpressFlags<u16> {
        /// Capability Version
        ///
        /// Version 2 added the Device/Link/Slot Capabilities 2 and Control 2
        /// registers.
        pub const VERSION = 4;

        /// Device/Port Type
        pub const DEVICE_TYPE = 4;

        /// Slot Implemented
        ///
        /// Set if the link associated with this port is connected to a slot.
        pub const SLOT_IMPLEMENTED: bool;

        /// Interrupt Message Number
        pub const INTERRUPT_MESSAGE = 5;

        const _RES0 = 2;
    }
}

/// A PCI Express link speed, as encoded in the Link Capabilities and Link
/// Status registers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum LinkSpeed {
    /// 2.5 GT/s (Gen1)
    Gt2_5 = 0x1,
    /// 5 GT/s (Gen2)
    Gt5 = 0x2,
    /// 8 GT/s (Gen3)
    Gt8 = 0x3,
    /// 16 GT/s (Gen4)
    #[cfg(feature = "gen4")]
    Gt16 = 0x4,
}

/// A slot power limit, in milliwatts.
///
/// The Slot Capabilities register encodes the limit as a value and a scale.
/// Only the value is decoded here, and it is always taken to be in watts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct SlotPowerLimit {
    milliwatts: u32,
}

// === impl ExpressFlags ===

impl ExpressFlags {
    /// Returns `true` if the capability structure is version 2 or later, and
    /// so implements the "2" registers (Device Capabilities 2 and friends).
    #[must_use]
    pub fn has_v2_registers(self) -> bool {
        self.get(Self::VERSION) >= 2
    }
}

// === impl LinkSpeed ===

impl LinkSpeed {
    /// Returns this link speed in megatransfers per second.
    #[must_use]
    pub const fn megatransfers(self) -> u32 {
        match self {
            Self::Gt2_5 => 2_500,
            Self::Gt5 => 5_000,
            Self::Gt8 => 8_000,
            #[cfg(feature = "gen4")]
            Self::Gt16 => 16_000,
        }
    }
}

impl FromBits<u32> for LinkSpeed {
    type Error = UnexpectedValue;
    const BITS: u32 = 4;

    fn try_from_bits(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            bits if bits == Self::Gt2_5 as u32 => Ok(Self::Gt2_5),
            bits if bits == Self::Gt5 as u32 => Ok(Self::Gt5),
            bits if bits == Self::Gt8 as u32 => Ok(Self::Gt8),
            #[cfg(feature = "gen4")]
            bits if bits == Self::Gt16 as u32 => Ok(Self::Gt16),
            bits => Err(error::unexpected(bits).named("link speed")),
        }
    }

    fn into_bits(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for LinkSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gt2_5 => "2.5 GT/s",
            Self::Gt5 => "5 GT/s",
            Self::Gt8 => "8 GT/s",
            #[cfg(feature = "gen4")]
            Self::Gt16 => "16 GT/s",
        })
    }
}

// === impl SlotPowerLimit ===

impl SlotPowerLimit {
    /// Values above this are not a number of watts, but select one of a few
    /// fixed limits for high-power slots.
    const MAX_LINEAR: u32 = 0xef;

    #[must_use]
    pub const fn from_watts(watts: u32) -> Self {
        Self {
            milliwatts: watts * 1000,
        }
    }

    #[must_use]
    pub const fn milliwatts(self) -> u32 {
        self.milliwatts
    }
}

impl FromBits<u32> for SlotPowerLimit {
    type Error = UnexpectedValue;
    const BITS: u32 = 8;

    fn try_from_bits(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            watts @ 0..=Self::MAX_LINEAR => Ok(Self::from_watts(watts)),
            0xf0 => Ok(Self::from_watts(250)),
            0xf1 => Ok(Self::from_watts(270)),
            0xf2 => Ok(Self::from_watts(300)),
            bits => Err(error::unexpected(bits).named("slot power limit")),
        }
    }

    fn into_bits(self) -> u32 {
        match self.milliwatts / 1000 {
            250 => 0xf0,
            270 => 0xf1,
            300 => 0xf2,
            watts => watts,
        }
    }
}

impl fmt::Display for SlotPowerLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}W", self.milliwatts / 1000, self.milliwatts % 1000)
    }
}
