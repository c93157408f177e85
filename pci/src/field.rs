//! Extracting bit fields from raw register values using bitmasks.
//!
//! Register layouts in the PCI specifications are usually given as a mask for
//! each field (e.g. the Max Link Width field of the Link Capabilities register
//! is `0x3f0`). The functions in this module work directly with those masks,
//! so that a field's definition can be copied from the register layout table
//! as-is.
//!
//! All masks are assumed to be a single contiguous run of set bits. Masks with
//! gaps are not rejected, but the values produced for them are not
//! meaningful.
//!
//! Word-sized registers are handled by widening them to `u32` first.
use core::ops::Range;

/// The shape of a bitmask: how many bits it covers and where it starts.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MaskShape {
    /// The number of set bits in the mask.
    pub bits: u32,
    /// The index of the least-significant set bit.
    ///
    /// This is 32 (one past the most significant bit of a `u32`) if the mask
    /// is zero.
    pub first_bit: u32,
    /// The number of distinct values a field of this width can hold
    /// (`2^bits`).
    pub max_value: u64,
}

/// Returns the [`MaskShape`] of `mask`.
#[must_use]
pub const fn mask_shape(mask: u32) -> MaskShape {
    let bits = mask.count_ones();
    MaskShape {
        bits,
        first_bit: mask.trailing_zeros(),
        max_value: 1 << bits,
    }
}

/// Extracts the field selected by `mask` from `value`, shifted down so that
/// its least-significant bit is bit 0.
///
/// A zero mask always extracts 0.
#[inline]
#[must_use]
pub const fn extract_field(value: u32, mask: u32) -> u32 {
    match (value & mask).checked_shr(mask.trailing_zeros()) {
        Some(field) => field,
        None => 0,
    }
}

/// Places `field` into the bits selected by `mask`.
///
/// This is the inverse of [`extract_field`]: bits of `field` which do not fit
/// in the mask are discarded.
#[inline]
#[must_use]
pub const fn insert_field(field: u32, mask: u32) -> u32 {
    match field.checked_shl(mask.trailing_zeros()) {
        Some(shifted) => shifted & mask,
        None => 0,
    }
}

impl MaskShape {
    /// Returns every value a field of this shape can encode.
    pub fn values(&self) -> Range<u64> {
        0..self.max_value
    }

    /// Returns `true` if the mask this shape was computed from was zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{prop_assert_eq, proptest};

    #[test]
    fn low_nibble() {
        assert_eq!(
            mask_shape(0xf),
            MaskShape {
                bits: 4,
                first_bit: 0,
                max_value: 16,
            }
        );
    }

    #[test]
    fn link_width_mask() {
        assert_eq!(
            mask_shape(0x3f0),
            MaskShape {
                bits: 6,
                first_bit: 4,
                max_value: 64,
            }
        );
    }

    #[test]
    fn zero_mask() {
        let shape = mask_shape(0);
        assert!(shape.is_empty());
        assert_eq!(shape.first_bit, 32);
        assert_eq!(shape.max_value, 1);
        assert_eq!(extract_field(0xffff_ffff, 0), 0);
        assert_eq!(insert_field(0xffff_ffff, 0), 0);
    }

    #[test]
    fn full_mask() {
        let shape = mask_shape(u32::MAX);
        assert_eq!(shape.bits, 32);
        assert_eq!(shape.first_bit, 0);
        assert_eq!(shape.max_value, 1 << 32);
        assert_eq!(extract_field(0xdead_beef, u32::MAX), 0xdead_beef);
    }

    #[test]
    fn extract_ignores_other_bits() {
        assert_eq!(extract_field(0xffff_fc0f, 0x3f0), 0);
        assert_eq!(extract_field(0xffff_ffff, 0x3f0), 0x3f);
        assert_eq!(extract_field(0xfff8_0000, 0xfff8_0000), 0x1fff);
    }

    #[test]
    fn every_encodable_value_round_trips() {
        for mask in [0xf, 0x3f0, 0x7f80, 0xfff8_0000] {
            let shape = mask_shape(mask);
            for v in shape.values() {
                let v = v as u32;
                assert_eq!(extract_field(v << shape.first_bit, mask), v, "mask {mask:#x}");
            }
        }
    }

    proptest! {
        #[test]
        fn contiguous_masks(first_bit in 0u32..32, len in 1u32..=32, value: u32) {
            let len = len.min(32 - first_bit);
            let mask = (u32::MAX >> (32 - len)) << first_bit;
            let shape = mask_shape(mask);
            prop_assert_eq!(shape.bits, len);
            prop_assert_eq!(shape.first_bit, first_bit);
            prop_assert_eq!(shape.max_value, 1u64 << len);

            let field = extract_field(value, mask);
            prop_assert_eq!(u64::from(field) < shape.max_value, true);
            prop_assert_eq!(extract_field(insert_field(field, mask), mask), field);
            prop_assert_eq!(insert_field(field, mask), value & mask);
        }
    }
}
