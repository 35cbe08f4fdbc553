//! Ripple-carry arithmetic on [`BitBuffer`] magnitudes.
//!
//! Carries and borrows are computed in a wider integer type and read back
//! from the high bits instead of relying on `u8` wraparound.
//!
//! Operands of different widths are right-aligned: the shorter one behaves as
//! if zero-extended on its high side.

use std::cmp::Ordering;

use crate::bitbuffer::BitBuffer;
use crate::error::{Error, Result};

/// Output of [`BitBuffer::divide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quotient {
    /// Quotient bits, first produced bit at position 0, zero-padded to a
    /// whole unit.
    pub bits: BitBuffer,
    /// What is left of the dividend after the last step, as wide as the
    /// divisor plus one unit.
    pub remainder: BitBuffer,
}

impl Quotient {
    /// True when the division left nothing behind.
    pub fn is_exact(&self) -> bool {
        self.remainder.is_zero()
    }
}

impl BitBuffer {
    /// Adds `rhs` into `self`, returning the carry out of the whole buffer.
    ///
    /// A carry escaping the units shared with `rhs` keeps propagating through
    /// the remaining high units of `self`. Non-zero units of `rhs` beyond the
    /// width of `self` also count as overflow.
    pub fn add_in_place(&mut self, rhs: &BitBuffer) -> bool {
        let mut carry = 0u16;
        let mut digits = rhs.units.iter().rev();
        for unit in self.units.iter_mut().rev() {
            let digit = digits.next().copied().unwrap_or(0);
            let sum = u16::from(*unit) + u16::from(digit) + carry;
            *unit = (sum & 0xff) as u8;
            carry = sum >> 8;
        }
        carry != 0 || digits.any(|&digit| digit != 0)
    }

    /// [`add_in_place`](Self::add_in_place) for operands of identical width.
    pub fn add_equal_width(&mut self, rhs: &BitBuffer) -> bool {
        if self.len() != rhs.len() {
            return self.add_in_place(rhs);
        }
        let mut carry = 0u16;
        for (unit, &digit) in self.units.iter_mut().zip(&rhs.units).rev() {
            let sum = u16::from(*unit) + u16::from(digit) + carry;
            *unit = (sum & 0xff) as u8;
            carry = sum >> 8;
        }
        carry != 0
    }

    /// Subtracts `rhs` from `self`, returning the borrow out of the whole
    /// buffer. On borrow `self` holds the difference modulo its width.
    pub fn subtract_in_place(&mut self, rhs: &BitBuffer) -> bool {
        let mut borrow = 0i16;
        let mut digits = rhs.units.iter().rev();
        for unit in self.units.iter_mut().rev() {
            let digit = digits.next().copied().unwrap_or(0);
            let difference = i16::from(*unit) - i16::from(digit) - borrow;
            borrow = i16::from(difference < 0);
            *unit = (difference + (borrow << 8)) as u8;
        }
        borrow != 0 || digits.any(|&digit| digit != 0)
    }

    /// Orders two magnitudes by subtracting them on a scratch copy.
    pub fn compare_magnitude(lhs: &BitBuffer, rhs: &BitBuffer) -> Ordering {
        let mut scratch = lhs.resized(lhs.len().max(rhs.len()));
        if scratch.subtract_in_place(rhs) {
            Ordering::Less
        } else if scratch.is_zero() {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }

    /// `self * digit`, one unit wider than `self`.
    fn scale(&self, digit: u8) -> BitBuffer {
        let mut units = vec![0; self.len() + 1];
        let mut carry = 0u16;
        for (target, &unit) in units.iter_mut().rev().zip(self.units.iter().rev()) {
            let product = u16::from(unit) * u16::from(digit) + carry;
            *target = (product & 0xff) as u8;
            carry = product >> 8;
        }
        units[0] = carry as u8;
        BitBuffer { units }
    }

    /// Schoolbook long multiplication.
    ///
    /// The product is as wide as both operands together, which always holds
    /// the full result, so the accumulation never carries out.
    pub fn multiply(lhs: &BitBuffer, rhs: &BitBuffer) -> BitBuffer {
        let mut product = BitBuffer::zeros(lhs.len() + rhs.len());
        for (position, &digit) in rhs.units.iter().rev().enumerate() {
            if digit == 0 {
                continue;
            }
            let mut partial = lhs.scale(digit).resized(product.len());
            partial.shift_left(position * 8);
            product.add_equal_width(&partial);
        }
        product
    }

    /// Restoring binary long division producing `precision_bits` quotient bits.
    ///
    /// Each step shifts the working remainder left, brings down the next
    /// dividend bit (zero once the dividend is exhausted) and keeps the
    /// trial subtraction of the divisor only when it does not borrow. The
    /// quotient is therefore `floor(dividend * 2^(precision_bits - len_bits) /
    /// divisor)` when `precision_bits` reaches past the dividend.
    pub fn divide(
        dividend: &BitBuffer,
        divisor: &BitBuffer,
        precision_bits: usize,
    ) -> Result<Quotient> {
        if divisor.is_zero() {
            return Err(Error::DivisionByZero);
        }

        let mut remainder = BitBuffer::zeros(divisor.len() + 1);
        let mut bits = BitBuffer::zeros(precision_bits.div_ceil(8));
        let last = remainder.len_bits() - 1;
        for step in 0..precision_bits {
            remainder.shift_left(1);
            if step < dividend.len_bits() && dividend.bit(step) {
                remainder.put_bit(last, true);
            }

            let mut trial = remainder.clone();
            if !trial.subtract_in_place(divisor) {
                remainder = trial;
                bits.put_bit(step, true);
            }
        }

        Ok(Quotient { bits, remainder })
    }
}
