use crate::capability::Capability;
use alloc::vec::Vec;

pub mod bar;
pub use self::bar::Bar;

/// A single PCI function, as described by the config-space access library.
///
/// This holds the identifiers read from the function's header and the list
/// of capabilities discovered for it. Capabilities are kept in the order they
/// were discovered; lookups return the first match.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Device {
    pub bus: u8,
    pub id: Id,
    /// The function's six Base Address Registers.
    pub bars: [Bar; 6],
    capabilities: Vec<Capability>,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[repr(C)]
pub struct Id {
    pub vendor_id: u16,
    pub device_id: u16,
}

impl Device {
    #[must_use]
    pub fn new(bus: u8, device_id: u16, vendor_id: u16) -> Self {
        Self {
            bus,
            id: Id {
                vendor_id,
                device_id,
            },
            bars: [Bar::default(); 6],
            capabilities: Vec::new(),
        }
    }

    /// Appends `cap` to the end of this device's capability list.
    #[must_use]
    pub fn with_capability(mut self, cap: Capability) -> Self {
        self.push_capability(cap);
        self
    }

    #[must_use]
    pub fn with_bar(mut self, index: usize, bar: Bar) -> Self {
        self.bars[index] = bar;
        self
    }

    pub fn push_capability(&mut self, cap: Capability) -> &mut Self {
        self.capabilities.push(cap);
        self
    }

    /// Returns this device's capabilities, in discovery order.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns a mutable reference to this device's capability list.
    pub fn capabilities_mut(&mut self) -> &mut Vec<Capability> {
        &mut self.capabilities
    }

    /// Returns `true` if any of this device's BARs maps memory space.
    #[must_use]
    pub fn has_memory_bar(&self) -> bool {
        self.bars.iter().any(Bar::is_memory)
    }
}
