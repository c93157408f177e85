//! Fixed-capacity text buffers for decoder output.
use core::{fmt, str};

/// A stack-allocated buffer holding up to `N` bytes of UTF-8 text.
///
/// A string that does not fit in the remaining space is rejected with
/// [`fmt::Error`] instead of being truncated.
///
/// The default capacity is enough for every string produced by this crate's
/// decoders.
#[derive(Clone)]
pub struct TextBuf<const N: usize = DEFAULT_CAPACITY> {
    buf: [u8; N],
    len: usize,
}

/// Capacity of a [`TextBuf`] when none is specified.
pub const DEFAULT_CAPACITY: usize = 64;

impl<const N: usize> TextBuf<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // only whole `&str`s are ever copied into the buffer.
        str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const N: usize> fmt::Write for TextBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len.checked_add(s.len()).ok_or(fmt::Error)?;
        let dst = self.buf.get_mut(self.len..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl<const N: usize> Default for TextBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Display for TextBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for TextBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> PartialEq<str> for TextBuf<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for TextBuf<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
