//! # BitBuffer
//!
//! Fixed-length, big-endian, unsigned-magnitude byte sequences with
//! bit-addressable access. Bit 0 is the most-significant bit of unit 0, so a
//! buffer reads left to right exactly like its binary text.
//!
//! In-place operations never change the length of a buffer; operations that
//! need a different width (multiplication, resizing, truncation) return a new
//! buffer instead.
//!
//! ```rust
//! use varfloat::BitBuffer;
//!
//! let mut buffer = BitBuffer::from_unsigned(0b1011, 1);
//! assert_eq!(buffer.to_bits_string(), "00001011");
//!
//! buffer.shift_left(4);
//! assert_eq!(buffer.to_bits_string(), "10110000");
//! assert_eq!(buffer.highest_set_bit_position(), Some(0));
//! assert_eq!(buffer.lowest_set_bit_position(), Some(3));
//! ```

#[cfg(feature = "bigint")]
use num_bigint::BigUint;

use crate::error::{Error, Result};

pub mod arithmetic;
pub mod text;

pub use arithmetic::Quotient;

/// Big-endian sequence of 8-bit units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitBuffer {
    units: Vec<u8>,
}

impl BitBuffer {
    /// Wraps `bytes`, most-significant unit first.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            units: bytes.into(),
        }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            units: vec![0; len],
        }
    }

    pub fn ones(len: usize) -> Self {
        Self {
            units: vec![u8::MAX; len],
        }
    }

    /// Buffer of `len` units holding `value` right-aligned.
    ///
    /// Units beyond the eighth are zero; when `len` is narrower than the value
    /// only the low `len` bytes are kept.
    pub fn from_unsigned(value: u64, len: usize) -> Self {
        let bytes = value.to_be_bytes();
        let mut units = vec![0; len];
        for (unit, byte) in units.iter_mut().rev().zip(bytes.iter().rev()) {
            *unit = *byte;
        }
        Self { units }
    }

    #[cfg(feature = "bigint")]
    pub fn from_biguint(value: &BigUint, len: usize) -> Self {
        Self::from_bytes(value.to_bytes_be()).resized(len)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.units
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.units
    }

    /// Number of 8-bit units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn len_bits(&self) -> usize {
        self.units.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// True when every unit is zero.
    pub fn is_zero(&self) -> bool {
        self.units.iter().all(|&unit| unit == 0)
    }

    pub fn iter_bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.units
            .iter()
            .flat_map(|&unit| (0..8).rev().map(move |bit| (unit >> bit) & 1 == 1))
    }

    pub fn get_bit(&self, pos: usize) -> Result<bool> {
        if pos >= self.len_bits() {
            return Err(Error::IndexOutOfRange {
                index: pos,
                len: self.len_bits(),
            });
        }
        Ok(self.bit(pos))
    }

    pub fn set_bit(&mut self, pos: usize, value: bool) -> Result<()> {
        if pos >= self.len_bits() {
            return Err(Error::IndexOutOfRange {
                index: pos,
                len: self.len_bits(),
            });
        }
        self.put_bit(pos, value);
        Ok(())
    }

    // Unchecked accessors for the kernel's own loops, callers keep pos in range.
    fn bit(&self, pos: usize) -> bool {
        (self.units[pos / 8] >> (7 - pos % 8)) & 1 == 1
    }

    fn put_bit(&mut self, pos: usize, value: bool) {
        let mask = 1u8 << (7 - pos % 8);
        if value {
            self.units[pos / 8] |= mask;
        } else {
            self.units[pos / 8] &= !mask;
        }
    }

    /// Position of the most-significant set bit, `None` when all zero.
    pub fn highest_set_bit_position(&self) -> Option<usize> {
        self.units
            .iter()
            .position(|&unit| unit != 0)
            .map(|index| index * 8 + self.units[index].leading_zeros() as usize)
    }

    /// Position of the least-significant set bit, `None` when all zero.
    ///
    /// The position uses the same addressing as every other accessor: 0 is
    /// the most-significant bit.
    pub fn lowest_set_bit_position(&self) -> Option<usize> {
        self.units
            .iter()
            .rposition(|&unit| unit != 0)
            .map(|index| index * 8 + 7 - self.units[index].trailing_zeros() as usize)
    }

    /// Logical shift towards bit 0, zero-filling from the low end.
    pub fn shift_left(&mut self, n: usize) {
        let len = self.units.len();
        if n >= len * 8 {
            self.units.fill(0);
            return;
        }

        let (unit_offset, bit_offset) = (n / 8, n % 8);
        if unit_offset > 0 {
            self.units.copy_within(unit_offset.., 0);
            self.units[len - unit_offset..].fill(0);
        }
        if bit_offset > 0 {
            for i in 0..len {
                let next = self.units.get(i + 1).copied().unwrap_or(0);
                self.units[i] = (self.units[i] << bit_offset) | (next >> (8 - bit_offset));
            }
        }
    }

    /// Logical shift away from bit 0, zero-filling from the high end.
    pub fn shift_right(&mut self, n: usize) {
        let len = self.units.len();
        if n >= len * 8 {
            self.units.fill(0);
            return;
        }

        let (unit_offset, bit_offset) = (n / 8, n % 8);
        if unit_offset > 0 {
            self.units.copy_within(..len - unit_offset, unit_offset);
            self.units[..unit_offset].fill(0);
        }
        if bit_offset > 0 {
            for i in (0..len).rev() {
                let previous = if i > 0 { self.units[i - 1] } else { 0 };
                self.units[i] = (self.units[i] >> bit_offset) | (previous << (8 - bit_offset));
            }
        }
    }

    /// Shifts right and ORs every bit that fell off into the last bit.
    ///
    /// Returns whether any set bit was lost.
    pub fn shift_right_sticky(&mut self, n: usize) -> bool {
        if self.is_empty() || n == 0 {
            return false;
        }
        let len_bits = self.len_bits();
        let lost = self
            .lowest_set_bit_position()
            .is_some_and(|pos| pos >= len_bits.saturating_sub(n));
        self.shift_right(n);
        if lost {
            self.put_bit(len_bits - 1, true);
        }
        lost
    }

    /// New buffer with the first `bit_count` bits, zero-padded to a whole unit.
    pub fn truncate_to_bits(&self, bit_count: usize) -> Self {
        let mut units = vec![0; bit_count.div_ceil(8)];
        let shared = units.len().min(self.units.len());
        units[..shared].copy_from_slice(&self.units[..shared]);

        let spare = units.len() * 8 - bit_count;
        if spare > 0 {
            if let Some(last) = units.last_mut() {
                *last &= u8::MAX << spare;
            }
        }
        Self { units }
    }

    /// New buffer of `len` units with the same value, zero-extended or cut on
    /// the high side.
    pub fn resized(&self, len: usize) -> Self {
        let mut units = vec![0; len];
        let shared = len.min(self.units.len());
        units[len - shared..].copy_from_slice(&self.units[self.units.len() - shared..]);
        Self { units }
    }

    /// Value of the lowest 64 bits.
    pub fn low_u64(&self) -> u64 {
        self.units
            .iter()
            .rev()
            .take(8)
            .rev()
            .fold(0, |acc, &unit| (acc << 8) | u64::from(unit))
    }

    /// The value as `u64`, `None` when it does not fit.
    pub fn to_u64(&self) -> Option<u64> {
        let high = self.units.len().saturating_sub(8);
        if self.units[..high].iter().any(|&unit| unit != 0) {
            return None;
        }
        Some(self.low_u64())
    }
}

#[cfg(feature = "bigint")]
impl From<&BitBuffer> for BigUint {
    fn from(value: &BitBuffer) -> Self {
        BigUint::from_bytes_be(value.as_bytes())
    }
}
