//! Named device properties, for report generation.
use crate::{config::ConfigSpace, decode, error::UnknownProperty, Device};
use core::{fmt, str::FromStr};

/// Every attribute this crate knows how to decode.
///
/// A reporting layer can use this to select attributes by name and print
/// them without matching on each decoder individually.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Property {
    LinkCapMaxSpeed,
    LinkCapMaxWidth,
    LinkStatCurSpeed,
    LinkStatNegWidth,
    SlotPwrLimitValue,
    SlotPhysicalNum,
    PciBusId,
    DeviceId,
    VendorId,
    DevSerialNum,
    PwrCurrState,
    AtomicOpRouting,
    AtomicOp32Completer,
    AtomicOp64Completer,
    AtomicOp128CasCompleter,
}

impl Property {
    pub const ALL: &'static [Self] = &[
        Self::LinkCapMaxSpeed,
        Self::LinkCapMaxWidth,
        Self::LinkStatCurSpeed,
        Self::LinkStatNegWidth,
        Self::SlotPwrLimitValue,
        Self::SlotPhysicalNum,
        Self::PciBusId,
        Self::DeviceId,
        Self::VendorId,
        Self::DevSerialNum,
        Self::PwrCurrState,
        Self::AtomicOpRouting,
        Self::AtomicOp32Completer,
        Self::AtomicOp64Completer,
        Self::AtomicOp128CasCompleter,
    ];

    /// Returns the name this property is reported under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LinkCapMaxSpeed => "link_cap_max_speed",
            Self::LinkCapMaxWidth => "link_cap_max_width",
            Self::LinkStatCurSpeed => "link_stat_cur_speed",
            Self::LinkStatNegWidth => "link_stat_neg_width",
            Self::SlotPwrLimitValue => "slot_pwr_limit_value",
            Self::SlotPhysicalNum => "slot_physical_num",
            Self::PciBusId => "pci_bus_id",
            Self::DeviceId => "device_id",
            Self::VendorId => "vendor_id",
            Self::DevSerialNum => "dev_serial_num",
            Self::PwrCurrState => "pwr_curr_state",
            Self::AtomicOpRouting => "atomic_op_routing",
            Self::AtomicOp32Completer => "atomic_op_32_completer",
            Self::AtomicOp64Completer => "atomic_op_64_completer",
            Self::AtomicOp128CasCompleter => "atomic_op_128_CAS_completer",
        }
    }

    /// Decodes this property of `dev` and writes its text to `out`.
    #[tracing::instrument(
        level = "trace",
        skip(dev, cfg, out),
        fields(bus = dev.bus, vendor_id = dev.id.vendor_id, device_id = dev.id.device_id),
    )]
    pub fn write_to<C, W>(self, dev: &Device, cfg: &C, out: &mut W) -> fmt::Result
    where
        C: ConfigSpace + ?Sized,
        W: fmt::Write,
    {
        match self {
            Self::LinkCapMaxSpeed => write!(out, "{}", decode::link_cap_max_speed(dev, cfg)),
            Self::LinkCapMaxWidth => write!(out, "{}", decode::link_cap_max_width(dev, cfg)),
            Self::LinkStatCurSpeed => write!(out, "{}", decode::link_stat_cur_speed(dev, cfg)),
            Self::LinkStatNegWidth => write!(out, "{}", decode::link_stat_neg_width(dev, cfg)),
            Self::SlotPwrLimitValue => write!(out, "{}", decode::slot_pwr_limit_value(dev, cfg)),
            Self::SlotPhysicalNum => write!(out, "{}", decode::slot_physical_num(dev, cfg)),
            Self::PciBusId => write!(out, "{}", decode::pci_bus_id(dev)),
            Self::DeviceId => write!(out, "{}", decode::device_id(dev)),
            Self::VendorId => write!(out, "{}", decode::vendor_id(dev)),
            Self::DevSerialNum => write!(out, "{}", decode::dev_serial_num(dev, cfg)),
            Self::PwrCurrState => write!(out, "{}", decode::pwr_curr_state(dev, cfg)),
            Self::AtomicOpRouting => write!(out, "{}", decode::atomic_op_routing(dev, cfg)),
            Self::AtomicOp32Completer => {
                write!(out, "{}", decode::atomic_op_32_completer(dev, cfg))
            }
            Self::AtomicOp64Completer => {
                write!(out, "{}", decode::atomic_op_64_completer(dev, cfg))
            }
            Self::AtomicOp128CasCompleter => {
                write!(out, "{}", decode::atomic_op_128_cas_completer(dev, cfg))
            }
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = UnknownProperty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|prop| prop.name() == s)
            .ok_or_else(|| UnknownProperty(s.into()))
    }
}
