//! PCI Base Address Registers
use mycelium_bitfield::Pack64;

/// A PCI Base Address Register (BAR), as reported by the config-space access
/// library.
///
/// Base Address Registers (or BARs) hold either the base of a memory region
/// used by the device or a base offset for port I/O. `bits` is the raw base
/// address value, including the low flag bits; `size` is the size of the
/// region the BAR decodes, which is zero if the BAR is unimplemented.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Bar {
    pub bits: u64,
    pub size: u64,
}

impl Bar {
    /// Bit 0 is set for I/O space BARs and clear for memory BARs.
    const SPACE_IO: Pack64 = Pack64::least_significant(1);

    #[must_use]
    pub const fn new(bits: u64, size: u64) -> Self {
        Self { bits, size }
    }

    /// Returns `true` if this BAR is implemented (has both a base address and
    /// a size).
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.bits != 0 && self.size != 0
    }

    /// Returns `true` if this BAR maps I/O space.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        Self::SPACE_IO.contained_in_any(self.bits)
    }

    /// Returns `true` if this BAR is implemented and maps memory space.
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        self.is_present() && !self.is_io()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_io_is_valid() {
        Bar::SPACE_IO.assert_valid();
    }

    #[test]
    fn memory_bar() {
        let bar = Bar::new(0xfe00_0000, 0x10_0000);
        assert!(bar.is_present());
        assert!(!bar.is_io());
        assert!(bar.is_memory());
    }

    #[test]
    fn io_bar() {
        let bar = Bar::new(0xe001, 0x100);
        assert!(bar.is_io());
        assert!(!bar.is_memory());
    }

    #[test]
    fn unimplemented_bar() {
        assert!(!Bar::default().is_memory());
        assert!(!Bar::new(0xfe00_0000, 0).is_memory());
        assert!(!Bar::new(0, 0x1000).is_memory());
    }
}
