//! # Conversion Utilities
//!
//! Conversions between [`VarFloat`] and the native `f64`/`f32` formats,
//! between two `VarFloat` layouts, and from explicit hexadecimal fields.
//!
//! Native values are decomposed into their IEEE 754 fields, read as the
//! matching `VarFloat` layout ([`Double`] or [`Single`]) and re-encoded into
//! the target layout: the exponent is re-biased, a narrower fraction is
//! rounded to nearest even and a wider one is zero-extended. Native
//! subnormals flush to signed zero.
//!
//! ```rust
//! use varfloat::{Double, Single, VarFloat};
//!
//! let original = 3.141592653589793;
//! let value = Double::from(original);
//! let recovered: f64 = value.into();
//! assert_eq!(original, recovered);
//!
//! // Wider exponent, same fraction: still exact
//! let wide = VarFloat::<52, 15>::from(1e300);
//! assert_eq!(wide.to_f64(), 1e300);
//!
//! // Narrowing rounds like an `as` cast
//! let single: Single = Double::from(0.1).convert();
//! assert_eq!(single.to_f32(), 0.1f32);
//! ```

use crate::bitbuffer::BitBuffer;
use crate::error::{Error, Result};
use crate::varfloat::{Category, Double, Single, VarFloat};

impl<const F: usize, const E: usize> VarFloat<F, E> {
    /// Stores raw biased fields, flushing subnormal encodings to zero.
    fn from_raw_fields(sign: bool, exponent: BitBuffer, fraction: BitBuffer) -> Self {
        if exponent.is_zero() && !fraction.is_zero() {
            tracing::trace!(sign, "flushing subnormal encoding to zero");
            return Self::zero_with_sign(sign);
        }
        Self::from_fields(sign, exponent, fraction)
    }

    pub fn from_f64(value: f64) -> Self {
        let bits = value.to_bits();
        let native = Double::from_raw_fields(
            bits >> 63 == 1,
            BitBuffer::from_unsigned((bits >> 52) & 0x7ff, Double::EXPONENT_BYTES),
            BitBuffer::from_unsigned(bits & ((1 << 52) - 1), Double::FRACTION_BYTES),
        );
        tracing::trace!(value, fields = %native.to_hex_string(), "decomposed f64");
        native.convert()
    }

    pub fn from_f32(value: f32) -> Self {
        let bits = value.to_bits();
        let native = Single::from_raw_fields(
            bits >> 31 == 1,
            BitBuffer::from_unsigned(u64::from((bits >> 23) & 0xff), Single::EXPONENT_BYTES),
            BitBuffer::from_unsigned(u64::from(bits & ((1 << 23) - 1)), Single::FRACTION_BYTES),
        );
        tracing::trace!(value, fields = %native.to_hex_string(), "decomposed f32");
        native.convert()
    }

    /// Rounds to the nearest `f64`. Values outside its range saturate to
    /// infinity or signed zero.
    pub fn to_f64(&self) -> f64 {
        let double: Double = self.convert();
        let bits = (u64::from(double.sign) << 63)
            | (double.exponent.low_u64() << 52)
            | double.fraction.low_u64();
        f64::from_bits(bits)
    }

    /// Rounds to the nearest `f32`. Values outside its range saturate to
    /// infinity or signed zero.
    pub fn to_f32(&self) -> f32 {
        let single: Single = self.convert();
        let bits = (u64::from(single.sign) << 31)
            | (single.exponent.low_u64() << 23)
            | single.fraction.low_u64();
        f32::from_bits(bits as u32)
    }

    /// Re-encodes the value in another layout, rounding the fraction and
    /// saturating the exponent as needed.
    pub fn convert<const F2: usize, const E2: usize>(&self) -> VarFloat<F2, E2> {
        match self.category() {
            Category::NaN => VarFloat::nan(),
            Category::Infinity => VarFloat::infinity(self.sign),
            Category::Zero => VarFloat::zero_with_sign(self.sign),
            Category::Normal => {
                let significand = self.significand(Self::SIGNIFICAND_BYTES);
                let lead_exponent =
                    self.unbiased_exponent() - F as i64 + significand.len_bits() as i64 - 1;
                VarFloat::from_significand(self.sign, lead_exponent, &significand, false)
            }
        }
    }

    /// Builds a value from an unbiased exponent and a fraction, both in hex.
    ///
    /// The exponent is read as a two's complement number as wide as the
    /// exponent field, zero-extended on its high side; the bias is added
    /// here. The fraction is written the way [`fraction_hex`](Self::fraction_hex)
    /// prints it, two digits per byte without the hidden bit, and short text
    /// is zero-extended on its low side. Exponents outside the
    /// representable range saturate.
    ///
    /// ```rust
    /// use varfloat::Single;
    ///
    /// let x = Single::from_hex_fields(false, "01", "400000").unwrap();
    /// assert_eq!(x.to_f32(), 3.0);
    ///
    /// let y = Single::from_hex_fields(true, "FF", "4").unwrap();
    /// assert_eq!(y.to_f32(), -0.75);
    /// ```
    pub fn from_hex_fields(sign: bool, exponent_hex: &str, fraction_hex: &str) -> Result<Self> {
        let exponent = Self::parse_exponent(exponent_hex)?;
        let fraction = Self::parse_fraction(fraction_hex)?;

        let shift = 64 - Self::EXPONENT_BYTES * 8;
        let unbiased = ((exponent.low_u64() << shift) as i64) >> shift;
        tracing::trace!(sign, unbiased, fraction = %fraction.to_hex(), "parsed hex fields");
        Ok(Self::with_exponent(sign, unbiased, fraction))
    }

    /// Builds a value from the raw stored fields: a biased exponent and a
    /// fraction, both in hex, padded like [`from_hex_fields`](Self::from_hex_fields).
    ///
    /// An all-ones exponent gives infinity or NaN; a zero exponent gives zero.
    pub fn from_biased_hex_fields(
        sign: bool,
        exponent_hex: &str,
        fraction_hex: &str,
    ) -> Result<Self> {
        let exponent = Self::parse_exponent(exponent_hex)?;
        if exponent.low_u64() > Self::SPECIAL_EXPONENT {
            return Err(Error::malformed(
                exponent_hex,
                "exponent bits above the exponent width",
            ));
        }
        let fraction = Self::parse_fraction(fraction_hex)?;
        Ok(Self::from_raw_fields(sign, exponent, fraction))
    }

    fn parse_exponent(text: &str) -> Result<BitBuffer> {
        let exponent = BitBuffer::from_hex(text)?;
        if exponent.len() > Self::EXPONENT_BYTES {
            return Err(Error::malformed(text, "wider than the exponent field"));
        }
        Ok(exponent.resized(Self::EXPONENT_BYTES))
    }

    /// Reads the stored byte layout, two digits per byte, padding short text
    /// with zeros on the right.
    fn parse_fraction(text: &str) -> Result<BitBuffer> {
        let digits = Self::FRACTION_BYTES * 2;
        if text.is_empty() {
            return Err(Error::malformed(text, "empty hexadecimal text"));
        }
        if text.len() > digits {
            return Err(Error::malformed(text, "wider than the fraction field"));
        }
        let fraction = BitBuffer::from_hex(&format!("{text:0<digits$}"))?;
        let spare = Self::FRACTION_BYTES * 8 - F;
        if fraction
            .highest_set_bit_position()
            .is_some_and(|pos| pos < spare)
        {
            return Err(Error::malformed(text, "fraction bits above the fraction width"));
        }
        Ok(fraction)
    }
}

impl<const F: usize, const E: usize> From<f64> for VarFloat<F, E> {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl<const F: usize, const E: usize> From<f32> for VarFloat<F, E> {
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl<const F: usize, const E: usize> From<VarFloat<F, E>> for f64 {
    fn from(value: VarFloat<F, E>) -> Self {
        value.to_f64()
    }
}

impl<const F: usize, const E: usize> From<VarFloat<F, E>> for f32 {
    fn from(value: VarFloat<F, E>) -> Self {
        value.to_f32()
    }
}
