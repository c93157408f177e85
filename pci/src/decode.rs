//! Decoders turning capability registers into human-readable attributes.
//!
//! Each decoder looks up the capability its register lives in, reads the
//! register through a [`ConfigSpace`], and interprets one field of it. The
//! result is a [`Decoded`] value, whose [`Display`](fmt::Display)
//! implementation produces the text a hardware report would print:
//!
//! - `NOT SUPPORTED` if the device does not have the capability,
//! - a fixed placeholder (e.g. `Unknown speed`) if the field holds a value
//!   with no defined meaning,
//! - otherwise, the formatted attribute value.
use crate::{
    capability::{find_capability, CapabilityId, CapabilityType},
    config::ConfigSpace,
    error::UnexpectedValue,
    express::{self, ExpressFlags, LinkSpeed, SlotPowerLimit},
    field::extract_field,
    power::{self, PowerControl, PowerState},
    Device,
};
use core::fmt;
use mycelium_bitfield::FromBits;


/// The outcome of decoding one attribute of a device.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Decoded<T> {
    /// The attribute was decoded successfully.
    Value(T),
    /// The register field held a reserved or undefined value.
    Unrecognized(UnexpectedValue),
    /// The device does not implement the capability holding this attribute.
    NotSupported,
}

/// A value produced by a decoder.
pub trait Attribute: fmt::Display {
    /// Text printed in place of the value when the register field holds a
    /// value with no defined meaning.
    const UNRECOGNIZED: &'static str = "Unknown";
}

/// A link width, in lanes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct LinkWidth(pub u32);

/// A physical slot number.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct SlotNumber(pub u32);

/// A 64-bit device serial number (an IEEE EUI-64).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SerialNumber(pub u64);

/// A single capability bit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Flag(pub bool);

pub const NOT_SUPPORTED: &str = "NOT SUPPORTED";

/// Returns the maximum link speed the device supports.
pub fn link_cap_max_speed<C>(dev: &Device, cfg: &C) -> Decoded<LinkSpeed>
where
    C: ConfigSpace + ?Sized,
{
    with_express(dev, |offset| {
        let lnkcap = cfg.read_long(dev, reg(offset, express::LINK_CAPABILITIES));
        Decoded::from_bits(extract_field(lnkcap, express::LNKCAP_MAX_SPEED))
    })
}

/// Returns the maximum link width the device supports.
pub fn link_cap_max_width<C>(dev: &Device, cfg: &C) -> Decoded<LinkWidth>
where
    C: ConfigSpace + ?Sized,
{
    with_express(dev, |offset| {
        let lnkcap = cfg.read_long(dev, reg(offset, express::LINK_CAPABILITIES));
        Decoded::Value(LinkWidth(extract_field(lnkcap, express::LNKCAP_MAX_WIDTH)))
    })
}

/// Returns the speed the link is currently running at.
pub fn link_stat_cur_speed<C>(dev: &Device, cfg: &C) -> Decoded<LinkSpeed>
where
    C: ConfigSpace + ?Sized,
{
    with_express(dev, |offset| {
        let lnksta = cfg.read_word(dev, reg(offset, express::LINK_STATUS));
        Decoded::from_bits(extract_field(
            u32::from(lnksta),
            u32::from(express::LNKSTA_SPEED),
        ))
    })
}

/// Returns the width the link negotiated.
pub fn link_stat_neg_width<C>(dev: &Device, cfg: &C) -> Decoded<LinkWidth>
where
    C: ConfigSpace + ?Sized,
{
    with_express(dev, |offset| {
        let lnksta = cfg.read_word(dev, reg(offset, express::LINK_STATUS));
        Decoded::Value(LinkWidth(extract_field(
            u32::from(lnksta),
            u32::from(express::LNKSTA_WIDTH),
        )))
    })
}

/// Returns the upper limit on power supplied by the slot.
pub fn slot_pwr_limit_value<C>(dev: &Device, cfg: &C) -> Decoded<SlotPowerLimit>
where
    C: ConfigSpace + ?Sized,
{
    with_express(dev, |offset| {
        let sltcap = cfg.read_long(dev, reg(offset, express::SLOT_CAPABILITIES));
        Decoded::from_bits(extract_field(sltcap, express::SLTCAP_POWER_LIMIT))
    })
}

/// Returns the chassis-unique physical slot number.
pub fn slot_physical_num<C>(dev: &Device, cfg: &C) -> Decoded<SlotNumber>
where
    C: ConfigSpace + ?Sized,
{
    with_express(dev, |offset| {
        let sltcap = cfg.read_long(dev, reg(offset, express::SLOT_CAPABILITIES));
        Decoded::Value(SlotNumber(extract_field(
            sltcap,
            express::SLTCAP_PHYSICAL_NUMBER,
        )))
    })
}

/// Returns the number of the bus the device is on.
#[must_use]
pub fn pci_bus_id(dev: &Device) -> u8 {
    dev.bus
}

#[must_use]
pub fn device_id(dev: &Device) -> u16 {
    dev.id.device_id
}

#[must_use]
pub fn vendor_id(dev: &Device) -> u16 {
    dev.id.vendor_id
}

/// Returns the device's serial number, from its Device Serial Number
/// extended capability.
pub fn dev_serial_num<C>(dev: &Device, cfg: &C) -> Decoded<SerialNumber>
where
    C: ConfigSpace + ?Sized,
{
    const LOWER: u16 = 0x04;
    const UPPER: u16 = 0x08;

    with_capability(
        dev,
        CapabilityId::DEVICE_SERIAL_NUMBER,
        CapabilityType::EXTENDED,
        |offset| {
            let lower = cfg.read_long(dev, reg(offset, LOWER));
            let upper = cfg.read_long(dev, reg(offset, UPPER));
            Decoded::Value(SerialNumber(
                (u64::from(upper) << 32) | u64::from(lower),
            ))
        },
    )
}

/// Returns the device's current power state, from its Power Management
/// capability.
pub fn pwr_curr_state<C>(dev: &Device, cfg: &C) -> Decoded<PowerState>
where
    C: ConfigSpace + ?Sized,
{
    with_capability(
        dev,
        CapabilityId::POWER_MANAGEMENT,
        CapabilityType::NORMAL,
        |offset| {
            let pmcsr = PowerControl::from_bits(cfg.read_word(dev, reg(offset, power::CONTROL)));
            Decoded::Value(pmcsr.get(PowerControl::POWER_STATE))
        },
    )
}

/// Returns whether the device is allowed to initiate AtomicOp requests.
///
/// This is only reported for devices whose PCI Express capability is
/// version 2 or later.
pub fn atomic_op_routing<C>(dev: &Device, cfg: &C) -> Decoded<Flag>
where
    C: ConfigSpace + ?Sized,
{
    with_express(dev, |offset| {
        if !express_flags(dev, cfg, offset).has_v2_registers() {
            tracing::debug!(offset, "PCI Express capability predates Device Control 2");
            return Decoded::NotSupported;
        }
        let devctl2 = cfg.read_word(dev, reg(offset, express::DEVICE_CONTROL_2));
        Decoded::Value(Flag(
            extract_field(u32::from(devctl2), u32::from(express::DEVCTL2_ATOMIC_REQ)) != 0,
        ))
    })
}

/// Returns whether the device can complete 32-bit AtomicOp requests.
pub fn atomic_op_32_completer<C>(dev: &Device, cfg: &C) -> Decoded<Flag>
where
    C: ConfigSpace + ?Sized,
{
    atomic_op_completer(dev, cfg, express::DEVCAP2_ATOMIC_COMP32)
}

/// Returns whether the device can complete 64-bit AtomicOp requests.
pub fn atomic_op_64_completer<C>(dev: &Device, cfg: &C) -> Decoded<Flag>
where
    C: ConfigSpace + ?Sized,
{
    atomic_op_completer(dev, cfg, express::DEVCAP2_ATOMIC_COMP64)
}

/// Returns whether the device can complete 128-bit compare-and-swap AtomicOp
/// requests.
pub fn atomic_op_128_cas_completer<C>(dev: &Device, cfg: &C) -> Decoded<Flag>
where
    C: ConfigSpace + ?Sized,
{
    atomic_op_completer(dev, cfg, express::DEVCAP2_ATOMIC_COMP128)
}

fn atomic_op_completer<C>(dev: &Device, cfg: &C, mask: u32) -> Decoded<Flag>
where
    C: ConfigSpace + ?Sized,
{
    with_express(dev, |offset| {
        if !express_flags(dev, cfg, offset).has_v2_registers() {
            tracing::debug!(offset, "PCI Express capability predates Device Capabilities 2");
            return Decoded::NotSupported;
        }
        // completer support only matters if there is memory to complete
        // atomics against.
        if !dev.has_memory_bar() {
            tracing::debug!("device has no memory BARs");
            return Decoded::NotSupported;
        }
        let devcap2 = cfg.read_long(dev, reg(offset, express::DEVICE_CAPABILITIES_2));
        Decoded::Value(Flag(extract_field(devcap2, mask) != 0))
    })
}

fn with_express<T>(dev: &Device, decode: impl FnOnce(u16) -> Decoded<T>) -> Decoded<T> {
    with_capability(dev, CapabilityId::EXPRESS, CapabilityType::NORMAL, decode)
}

fn with_capability<T>(
    dev: &Device,
    id: CapabilityId,
    kind: CapabilityType,
    decode: impl FnOnce(u16) -> Decoded<T>,
) -> Decoded<T> {
    match find_capability(dev, id, kind) {
        Some(offset) => decode(offset),
        None => {
            tracing::debug!(
                bus = dev.bus,
                vendor_id = dev.id.vendor_id,
                device_id = dev.id.device_id,
                ?id,
                ?kind,
                "capability not supported"
            );
            Decoded::NotSupported
        }
    }
}

fn express_flags<C>(dev: &Device, cfg: &C, offset: u16) -> ExpressFlags
where
    C: ConfigSpace + ?Sized,
{
    ExpressFlags::from_bits(cfg.read_word(dev, reg(offset, express::FLAGS)))
}

#[inline]
fn reg(cap_offset: u16, register: u16) -> u16 {
    cap_offset.saturating_add(register)
}

// === impl Decoded ===

impl<T> Decoded<T> {
    /// Returns the decoded value, if there is one.
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if the device implements the capability this attribute
    /// is read from.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::NotSupported)
    }

    fn from_bits(bits: u32) -> Self
    where
        T: FromBits<u32, Error = UnexpectedValue>,
    {
        match T::try_from_bits(bits) {
            Ok(value) => Self::Value(value),
            Err(error) => {
                tracing::debug!(%error, "unrecognized register value");
                Self::Unrecognized(error)
            }
        }
    }
}

impl<T: Attribute> fmt::Display for Decoded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => fmt::Display::fmt(value, f),
            Self::Unrecognized(_) => f.write_str(T::UNRECOGNIZED),
            Self::NotSupported => f.write_str(NOT_SUPPORTED),
        }
    }
}

// === impl Attribute ===

impl Attribute for LinkSpeed {
    const UNRECOGNIZED: &'static str = "Unknown speed";
}

impl Attribute for SlotPowerLimit {
    const UNRECOGNIZED: &'static str = "-1.000W";
}

impl Attribute for PowerState {}
impl Attribute for LinkWidth {}
impl Attribute for SlotNumber {}
impl Attribute for SerialNumber {}
impl Attribute for Flag {}

impl fmt::Display for LinkWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, rest @ ..] = self.0.to_be_bytes();
        write!(f, "{first:02x}")?;
        for byte in rest {
            write!(f, "-{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "TRUE" } else { "FALSE" })
    }
}
