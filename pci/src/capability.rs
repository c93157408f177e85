//! PCI capability records and lookup.
//!
//! A PCI function advertises optional features through a list of
//! *capabilities*: blocks of registers somewhere in its configuration space,
//! each tagged with an identifier. Capabilities in the first 256 bytes of
//! configuration space ("normal" capabilities) and in the extended
//! configuration space of PCI Express functions ("extended" capabilities) are
//! numbered independently, so a capability is identified by an (id, type)
//! pair.
use crate::Device;
use core::fmt;

/// A capability identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CapabilityId(pub u16);

/// Which region of configuration space a capability lives in.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CapabilityType(pub u8);

/// One entry in a device's capability list.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Capability {
    pub id: CapabilityId,
    pub kind: CapabilityType,
    /// Offset of the capability's first register in configuration space.
    pub addr: u16,
}

/// Returns the configuration space offset of the first capability of `dev`
/// matching both `id` and `kind`.
///
/// Returns `None` if no capability matches both fields. Offset 0 is never a
/// valid capability location, so a matching entry at offset 0 is also
/// reported as `None`.
pub fn find_capability(dev: &Device, id: CapabilityId, kind: CapabilityType) -> Option<u16> {
    let found = dev
        .capabilities()
        .iter()
        .find(|cap| cap.id == id && cap.kind == kind);
    match found {
        Some(cap) if cap.addr != 0 => {
            tracing::trace!(?id, ?kind, offset = cap.addr, "found capability");
            Some(cap.addr)
        }
        _ => {
            tracing::trace!(?id, ?kind, "no such capability");
            None
        }
    }
}

// === impl Capability ===

impl Capability {
    #[must_use]
    pub const fn new(id: CapabilityId, kind: CapabilityType, addr: u16) -> Self {
        Self { id, kind, addr }
    }
}

// === impl CapabilityId ===

impl CapabilityId {
    /// Power Management (normal).
    pub const POWER_MANAGEMENT: Self = Self(0x01);
    /// PCI Express (normal).
    pub const EXPRESS: Self = Self(0x10);
    /// Device Serial Number (extended).
    pub const DEVICE_SERIAL_NUMBER: Self = Self(0x03);
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityId({:#04x})", self.0)
    }
}

// === impl CapabilityType ===

impl CapabilityType {
    /// A capability in the first 256 bytes of configuration space.
    pub const NORMAL: Self = Self(1);
    /// A capability in PCI Express extended configuration space.
    pub const EXTENDED: Self = Self(2);
}

impl fmt::Debug for CapabilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NORMAL => f.write_str("Normal"),
            Self::EXTENDED => f.write_str("Extended"),
            Self(other) => write!(f, "CapabilityType({other})"),
        }
    }
}
