//! PCI Configuration Space access.
//!
//! This crate does not know how configuration space is actually reached
//! (port I/O, ECAM, sysfs, ...). Instead, decoders are generic over a
//! [`ConfigSpace`] implementation provided by the caller.
use crate::{error::SnapshotError, Device};

/// Read access to a PCI function's configuration space.
///
/// Reads are infallible from the point of view of this crate. An
/// implementation which fails to perform a read should return a fabricated
/// value (typically 0 or all ones) rather than panicking.
pub trait ConfigSpace {
    /// Reads the 16-bit word at `offset` in `dev`'s configuration space.
    fn read_word(&self, dev: &Device, offset: u16) -> u16;

    /// Reads the 32-bit long at `offset` in `dev`'s configuration space.
    fn read_long(&self, dev: &Device, offset: u16) -> u32;
}

/// An in-memory image of a single function's configuration space.
///
/// All reads are little-endian, regardless of the device passed in. Reads
/// which run past the end of the image return 0.
#[derive(Clone)]
pub struct Snapshot {
    bytes: [u8; Snapshot::SIZE],
}

impl<T: ConfigSpace + ?Sized> ConfigSpace for &T {
    #[inline]
    fn read_word(&self, dev: &Device, offset: u16) -> u16 {
        T::read_word(self, dev, offset)
    }

    #[inline]
    fn read_long(&self, dev: &Device, offset: u16) -> u32 {
        T::read_long(self, dev, offset)
    }
}

// === impl Snapshot ===

impl Snapshot {
    /// The size of a PCI Express extended configuration space.
    pub const SIZE: usize = 4096;

    /// Returns a new, zeroed configuration space image.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; Self::SIZE],
        }
    }

    /// Returns a configuration space image whose first bytes are `bytes`.
    ///
    /// Any bytes past the end of `bytes` are zero. Images shorter than
    /// [`Self::SIZE`] are common, e.g. 256-byte dumps of conventional PCI
    /// configuration space.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if bytes.len() > Self::SIZE {
            return Err(SnapshotError::TooLarge {
                len: bytes.len(),
                max: Self::SIZE,
            });
        }
        let mut snapshot = Self::new();
        snapshot.bytes[..bytes.len()].copy_from_slice(bytes);
        Ok(snapshot)
    }

    /// Stores `value` at `offset` in the image.
    ///
    /// Bytes that would land past the end of the image are dropped.
    pub fn write_word(&mut self, offset: u16, value: u16) -> &mut Self {
        self.store(offset, &value.to_le_bytes())
    }

    /// Stores `value` at `offset` in the image.
    ///
    /// Bytes that would land past the end of the image are dropped.
    pub fn write_long(&mut self, offset: u16, value: u32) -> &mut Self {
        self.store(offset, &value.to_le_bytes())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    fn store(&mut self, offset: u16, src: &[u8]) -> &mut Self {
        let start = usize::from(offset);
        for (i, &byte) in src.iter().enumerate() {
            if let Some(dst) = self.bytes.get_mut(start + i) {
                *dst = byte;
            }
        }
        self
    }

    fn load<const N: usize>(&self, offset: u16) -> [u8; N] {
        let start = usize::from(offset);
        let mut out = [0; N];
        match self.bytes.get(start..start + N) {
            Some(src) => out.copy_from_slice(src),
            None => {
                tracing::debug!(offset, len = N, "read past end of config space image");
            }
        }
        out
    }
}

impl ConfigSpace for Snapshot {
    fn read_word(&self, _: &Device, offset: u16) -> u16 {
        u16::from_le_bytes(self.load(offset))
    }

    fn read_long(&self, _: &Device, offset: u16) -> u32 {
        u32::from_le_bytes(self.load(offset))
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // only the header is interesting enough to print by default.
        f.debug_struct("Snapshot")
            .field("header", &&self.bytes[..0x40])
            .finish_non_exhaustive()
    }
}
