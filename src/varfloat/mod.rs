//! # VarFloat
//!
//! Binary floating point with a fraction of `F` bits and an exponent of `E`
//! bits, laid out the IEEE 754 way:
//!
//! ```text
//! [sign: 1 bit][biased exponent: E bits][fraction: F bits, hidden bit implied]
//! ```
//!
//! Both fields live in their own [`BitBuffer`], right-aligned in whole bytes.
//! Every arithmetic result goes through the same two setters: the fraction
//! setter normalizes and rounds to nearest even, the exponent setter
//! saturates out-of-range exponents to infinity or zero. Subnormals are not
//! represented; they flush to signed zero.
//!
//! The exponent field is the one part that does not go through the
//! [`BitBuffer`] kernel: it is read into an `i64`, which is why `E` is capped
//! at 62 bits.

use crate::bitbuffer::BitBuffer;

pub mod arithmetic;
pub mod cmp;
pub mod converter;
pub mod display;

/// Half precision layout (binary16).
pub type Half = VarFloat<10, 5>;
/// Single precision layout (binary32).
pub type Single = VarFloat<23, 8>;
/// Double precision layout (binary64).
pub type Double = VarFloat<52, 11>;

/// Which of the four encodings a value holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Zero,
    Normal,
    Infinity,
    NaN,
}

#[derive(Clone)]
pub struct VarFloat<const F: usize, const E: usize> {
    sign: bool,
    exponent: BitBuffer,
    fraction: BitBuffer,
}

impl<const F: usize, const E: usize> VarFloat<F, E> {
    const VALID_LAYOUT: () = assert!(
        F >= 1 && E >= 2 && E <= 62,
        "VarFloat needs at least one fraction bit and between 2 and 62 exponent bits"
    );

    pub const FRACTION_BITS: usize = F;
    pub const EXPONENT_BITS: usize = E;
    pub const FRACTION_BYTES: usize = F.div_ceil(8);
    pub const EXPONENT_BYTES: usize = E.div_ceil(8);
    pub const BIAS: i64 = (1 << (E - 1)) - 1;
    /// Largest unbiased exponent of a finite value.
    pub const MAX_EXPONENT: i64 = Self::BIAS;
    /// Smallest unbiased exponent of a non-zero value.
    pub const MIN_EXPONENT: i64 = 1 - Self::BIAS;

    const SPECIAL_EXPONENT: u64 = (1 << E) - 1;
    const SIGNIFICAND_BYTES: usize = (F + 1).div_ceil(8);

    fn from_fields(sign: bool, exponent: BitBuffer, fraction: BitBuffer) -> Self {
        let () = Self::VALID_LAYOUT;
        Self {
            sign,
            exponent,
            fraction,
        }
    }

    pub fn zero_with_sign(sign: bool) -> Self {
        Self::from_fields(
            sign,
            BitBuffer::zeros(Self::EXPONENT_BYTES),
            BitBuffer::zeros(Self::FRACTION_BYTES),
        )
    }

    pub fn zero() -> Self {
        Self::zero_with_sign(false)
    }

    pub fn one() -> Self {
        Self::from_fields(
            false,
            BitBuffer::from_unsigned(Self::BIAS as u64, Self::EXPONENT_BYTES),
            BitBuffer::zeros(Self::FRACTION_BYTES),
        )
    }

    pub fn nan() -> Self {
        let mut fraction = BitBuffer::ones(Self::FRACTION_BYTES);
        fraction.shift_right(Self::FRACTION_BYTES * 8 - F);
        Self::from_fields(false, Self::special_exponent(), fraction)
    }

    pub fn infinity(sign: bool) -> Self {
        Self::from_fields(
            sign,
            Self::special_exponent(),
            BitBuffer::zeros(Self::FRACTION_BYTES),
        )
    }

    pub fn pos_infinity() -> Self {
        Self::infinity(false)
    }

    pub fn neg_infinity() -> Self {
        Self::infinity(true)
    }

    fn special_exponent() -> BitBuffer {
        let mut exponent = BitBuffer::ones(Self::EXPONENT_BYTES);
        exponent.shift_right(Self::EXPONENT_BYTES * 8 - E);
        exponent
    }

    /// The bias `2^(E-1) - 1` as an exponent-wide buffer.
    pub fn bias_buffer() -> BitBuffer {
        let mut bias = BitBuffer::ones(Self::EXPONENT_BYTES);
        bias.shift_right(Self::EXPONENT_BYTES * 8 - (E - 1));
        bias
    }

    pub fn category(&self) -> Category {
        let exponent = self.exponent.low_u64();
        if exponent == Self::SPECIAL_EXPONENT {
            if self.fraction.is_zero() {
                Category::Infinity
            } else {
                Category::NaN
            }
        } else if exponent == 0 && self.fraction.is_zero() {
            Category::Zero
        } else {
            Category::Normal
        }
    }

    pub fn is_nan(&self) -> bool {
        self.category() == Category::NaN
    }

    pub fn is_infinity(&self) -> bool {
        self.category() == Category::Infinity
    }

    pub fn is_positive_infinity(&self) -> bool {
        self.is_infinity() && !self.sign
    }

    pub fn is_negative_infinity(&self) -> bool {
        self.is_infinity() && self.sign
    }

    pub fn is_zero(&self) -> bool {
        self.category() == Category::Zero
    }

    /// Finite and non-zero.
    pub fn is_normal(&self) -> bool {
        self.category() == Category::Normal
    }

    pub fn sign(&self) -> bool {
        self.sign
    }

    /// The biased exponent field.
    pub fn exponent(&self) -> &BitBuffer {
        &self.exponent
    }

    /// The fraction field, without the hidden bit.
    pub fn fraction(&self) -> &BitBuffer {
        &self.fraction
    }

    /// The stored exponent with the bias removed. Only meaningful for normal
    /// values.
    pub fn unbiased_exponent(&self) -> i64 {
        self.exponent.low_u64() as i64 - Self::BIAS
    }

    pub fn exponent_hex(&self) -> String {
        self.exponent.to_hex()
    }

    pub fn fraction_hex(&self) -> String {
        self.fraction.to_hex()
    }

    /// The fraction with its hidden bit restored, right-aligned in `len`
    /// units: the integer `1.f * 2^F`.
    fn significand(&self, len: usize) -> BitBuffer {
        let mut significand = self.fraction.resized(len);
        significand
            .set_bit(len * 8 - 1 - F, true)
            .expect("significand width leaves room for the hidden bit");
        significand
    }

    /// Exponent setter.
    fn with_exponent(sign: bool, exponent: i64, fraction: BitBuffer) -> Self {
        if exponent > Self::MAX_EXPONENT {
            tracing::trace!(
                exponent,
                max = Self::MAX_EXPONENT,
                "exponent overflow, saturating to infinity"
            );
            return Self::infinity(sign);
        }
        if exponent < Self::MIN_EXPONENT {
            tracing::trace!(
                exponent,
                min = Self::MIN_EXPONENT,
                "exponent underflow, saturating to zero"
            );
            return Self::zero_with_sign(sign);
        }

        let biased = (exponent + Self::BIAS) as u64;
        Self::from_fields(
            sign,
            BitBuffer::from_unsigned(biased, Self::EXPONENT_BYTES),
            fraction,
        )
    }

    /// Fraction setter: normalizes `significand`, rounds it to `F` fraction
    /// bits (nearest, ties to even) and stores it through the exponent setter.
    ///
    /// `lead_exponent` is the binary weight of bit 0 of `significand`.
    /// `sticky` records non-zero bits the caller already dropped past its end.
    fn from_significand(
        sign: bool,
        lead_exponent: i64,
        significand: &BitBuffer,
        sticky: bool,
    ) -> Self {
        let Some(top) = significand.highest_set_bit_position() else {
            return Self::zero_with_sign(sign);
        };
        let mut exponent = lead_exponent - top as i64;

        // Drop everything up to and including the hidden bit: the fraction
        // now starts at bit 0 and the guard bit sits at F.
        let mut bits = significand.clone();
        bits.shift_left(top + 1);
        let guard = bits.get_bit(F).unwrap_or(false);
        let sticky = sticky || bits.lowest_set_bit_position().is_some_and(|pos| pos > F);
        let odd = bits.get_bit(F - 1).unwrap_or(false);

        let spare = Self::FRACTION_BYTES * 8 - F;
        let mut fraction = bits.truncate_to_bits(F);
        fraction.shift_right(spare);

        if guard && (sticky || odd) {
            let carry = fraction.add_in_place(&BitBuffer::from_unsigned(1, Self::FRACTION_BYTES));
            if carry || fraction.highest_set_bit_position().is_some_and(|pos| pos < spare) {
                fraction = BitBuffer::zeros(Self::FRACTION_BYTES);
                exponent += 1;
            }
        }

        Self::with_exponent(sign, exponent, fraction)
    }
}

impl<const F: usize, const E: usize> Default for VarFloat<F, E> {
    fn default() -> Self {
        Self::zero()
    }
}
