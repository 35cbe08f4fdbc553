//! # Arithmetic
//!
//! Addition, subtraction, multiplication, division and square root. All of
//! them restore the hidden bit, hand the significands to the [`BitBuffer`]
//! kernel and store the result through the rounding and saturating setters.
//!
//! Special operands follow IEEE 754: NaN propagates, `inf - inf`, `0 * inf`,
//! `0 / 0` and `inf / inf` are NaN, and an exact cancellation gives `+0`.
//!
//! ```rust
//! use varfloat::Single;
//!
//! let one = Single::from_biased_hex_fields(false, "7F", "000000").unwrap();
//! let two = &one + &one;
//! assert_eq!(two.exponent_hex(), "80");
//! assert_eq!(two.fraction_hex(), "000000");
//!
//! let x = Single::from(5.0f32);
//! assert!((&x / &Single::zero()).is_positive_infinity());
//! assert!((Single::zero() / Single::zero()).is_nan());
//! ```

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::bitbuffer::BitBuffer;
use crate::varfloat::{Category, VarFloat};

/// Extra bits kept below the significand while aligning addends: guard,
/// round and sticky.
const GUARD_BITS: usize = 3;

/// Quotient bits produced past the significand by the restoring division.
const DIVISION_GUARD_BITS: usize = 5;

impl<const F: usize, const E: usize> VarFloat<F, E> {
    pub fn abs(&self) -> Self {
        Self {
            sign: false,
            exponent: self.exponent.clone(),
            fraction: self.fraction.clone(),
        }
    }

    fn negated(&self) -> Self {
        Self {
            sign: !self.sign,
            exponent: self.exponent.clone(),
            fraction: self.fraction.clone(),
        }
    }

    fn add_values(&self, rhs: &Self) -> Self {
        match (self.category(), rhs.category()) {
            (Category::NaN, _) | (_, Category::NaN) => return Self::nan(),
            (Category::Infinity, Category::Infinity) if self.sign != rhs.sign => {
                return Self::nan();
            }
            (Category::Infinity, _) => return self.clone(),
            (_, Category::Infinity) => return rhs.clone(),
            (Category::Zero, Category::Zero) => return Self::zero_with_sign(self.sign && rhs.sign),
            (Category::Zero, _) => return rhs.clone(),
            (_, Category::Zero) => return self.clone(),
            (Category::Normal, Category::Normal) => {}
        }

        // [padding][carry][hidden][F fraction bits][guard bits]
        let width = (F + 2 + GUARD_BITS).div_ceil(8);
        let hidden = width * 8 - 1 - F - GUARD_BITS;
        let mut lhs = self.significand(width);
        lhs.shift_left(GUARD_BITS);
        let mut rhs_significand = rhs.significand(width);
        rhs_significand.shift_left(GUARD_BITS);

        let ordering = self
            .unbiased_exponent()
            .cmp(&rhs.unbiased_exponent())
            .then_with(|| BitBuffer::compare_magnitude(&lhs, &rhs_significand));
        if ordering == Ordering::Equal && self.sign != rhs.sign {
            return Self::zero();
        }

        let (larger, smaller) = if ordering == Ordering::Less {
            ((rhs, rhs_significand), (self, lhs))
        } else {
            ((self, lhs), (rhs, rhs_significand))
        };
        let (larger, mut sum) = larger;
        let (smaller, mut addend) = smaller;

        let distance = larger.unbiased_exponent() - smaller.unbiased_exponent();
        addend.shift_right_sticky(usize::try_from(distance).unwrap_or(usize::MAX));
        if self.sign == rhs.sign {
            sum.add_equal_width(&addend);
        } else {
            sum.subtract_in_place(&addend);
        }

        Self::from_significand(
            larger.sign,
            larger.unbiased_exponent() + hidden as i64,
            &sum,
            false,
        )
    }

    fn sub_values(&self, rhs: &Self) -> Self {
        self.add_values(&rhs.negated())
    }

    fn mul_values(&self, rhs: &Self) -> Self {
        let sign = self.sign != rhs.sign;
        match (self.category(), rhs.category()) {
            (Category::NaN, _) | (_, Category::NaN) => return Self::nan(),
            (Category::Infinity, Category::Zero) | (Category::Zero, Category::Infinity) => {
                return Self::nan();
            }
            (Category::Infinity, _) | (_, Category::Infinity) => return Self::infinity(sign),
            (Category::Zero, _) | (_, Category::Zero) => return Self::zero_with_sign(sign),
            (Category::Normal, Category::Normal) => {}
        }

        let product = BitBuffer::multiply(
            &self.significand(Self::SIGNIFICAND_BYTES),
            &rhs.significand(Self::SIGNIFICAND_BYTES),
        );
        // Both significands are integers scaled by 2^F.
        let lead_exponent = self.unbiased_exponent() + rhs.unbiased_exponent() - 2 * F as i64
            + product.len_bits() as i64
            - 1;

        Self::from_significand(sign, lead_exponent, &product, false)
    }

    fn div_values(&self, rhs: &Self) -> Self {
        let sign = self.sign != rhs.sign;
        match (self.category(), rhs.category()) {
            (Category::NaN, _) | (_, Category::NaN) => return Self::nan(),
            (Category::Zero, Category::Zero) | (Category::Infinity, Category::Infinity) => {
                return Self::nan();
            }
            (Category::Infinity, _) => return Self::infinity(sign),
            (_, Category::Infinity) => return Self::zero_with_sign(sign),
            (_, Category::Zero) => {
                tracing::trace!(sign, "division by zero");
                return Self::infinity(sign);
            }
            (Category::Zero, _) => return Self::zero_with_sign(sign),
            (Category::Normal, Category::Normal) => {}
        }

        let dividend = self.significand(Self::SIGNIFICAND_BYTES);
        let divisor = rhs.significand(Self::SIGNIFICAND_BYTES);
        let precision = dividend.len_bits() + F + DIVISION_GUARD_BITS;
        let quotient = BitBuffer::divide(&dividend, &divisor, precision)
            .expect("divisor carries the hidden bit");

        let lead_exponent =
            self.unbiased_exponent() - rhs.unbiased_exponent() + dividend.len_bits() as i64 - 1;
        Self::from_significand(sign, lead_exponent, &quotient.bits, !quotient.is_exact())
    }

    /// Square root, rounded to nearest even.
    ///
    /// `sqrt(-0)` is `-0`; negative values and NaN give NaN.
    pub fn sqrt(&self) -> Self {
        match self.category() {
            Category::NaN => return Self::nan(),
            Category::Zero => return self.clone(),
            _ if self.sign => return Self::nan(),
            Category::Infinity => return self.clone(),
            Category::Normal => {}
        }

        // Scale the significand so the exponent is even and the root keeps
        // three bits below the fraction.
        let exponent = self.unbiased_exponent();
        let odd = exponent.rem_euclid(2) as usize;
        let scale = F + 4 + odd;
        let width = (2 * F + 6).div_ceil(8);
        let mut radicand = self.significand(width);
        radicand.shift_left(scale);

        // Highest power of four not above the radicand.
        let top = width * 8 - 1 - F - scale;
        let mut bit = BitBuffer::zeros(width);
        bit.set_bit(top + odd, true)
            .expect("radicand width leaves room for the leading power of four");

        let mut root = BitBuffer::zeros(width);
        while !bit.is_zero() {
            let mut trial = root.clone();
            trial.add_in_place(&bit);
            root.shift_right(1);
            if BitBuffer::compare_magnitude(&radicand, &trial) != Ordering::Less {
                radicand.subtract_in_place(&trial);
                root.add_in_place(&bit);
            }
            bit.shift_right(2);
        }

        let root_exponent = (exponent - 2 * F as i64 - 4 - odd as i64) / 2;
        Self::from_significand(
            false,
            root_exponent + width as i64 * 8 - 1,
            &root,
            !radicand.is_zero(),
        )
    }
}

impl<const F: usize, const E: usize> Neg for VarFloat<F, E> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            sign: !self.sign,
            exponent: self.exponent,
            fraction: self.fraction,
        }
    }
}

impl<const F: usize, const E: usize> Neg for &VarFloat<F, E> {
    type Output = VarFloat<F, E>;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

macro_rules! impl_binary_op {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident, $inner:ident) => {
        impl<const F: usize, const E: usize> $op for VarFloat<F, E> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                self.$inner(&rhs)
            }
        }

        impl<const F: usize, const E: usize> $op<&VarFloat<F, E>> for &VarFloat<F, E> {
            type Output = VarFloat<F, E>;

            fn $method(self, rhs: &VarFloat<F, E>) -> Self::Output {
                self.$inner(rhs)
            }
        }

        impl<const F: usize, const E: usize> $assign_op for VarFloat<F, E> {
            fn $assign_method(&mut self, rhs: Self) {
                *self = self.$inner(&rhs);
            }
        }

        impl<const F: usize, const E: usize> $assign_op<&VarFloat<F, E>> for VarFloat<F, E> {
            fn $assign_method(&mut self, rhs: &VarFloat<F, E>) {
                *self = self.$inner(rhs);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, add_values);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, sub_values);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, mul_values);
impl_binary_op!(Div, div, DivAssign, div_assign, div_values);

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rstest::rstest;

    use super::*;
    use crate::tests::*;
    use crate::varfloat::{Double, Half, Single};

    fn assert_same_fields<const F: usize, const E: usize>(
        a: &VarFloat<F, E>,
        b: &VarFloat<F, E>,
        message: &str,
    ) {
        assert_eq!(a.to_hex_string(), b.to_hex_string(), "{message}");
    }

    #[test]
    fn test_scenario_double_one() {
        let one = Single::from_biased_hex_fields(false, "7F", "000000").unwrap();
        assert_eq!(one.to_f32(), 1.0);

        let two = &one + &one;
        assert_eq!(two.exponent_hex(), "80");
        assert_eq!(two.fraction_hex(), "000000");
        assert_eq!(two.to_f32(), 2.0);
    }

    #[test]
    fn test_scenario_one_plus_two() {
        let sum = Single::from(1.0f32) + Single::from(2.0f32);
        assert_same_fields(&sum, &Single::from(3.0f32), "1 + 2");
    }

    #[test]
    fn test_scenario_negative_product() {
        let a = Single::from_hex_fields(true, "02", "00").unwrap();
        let b = Single::from_hex_fields(true, "01", "00").unwrap();
        let product = a * b;
        assert!(!product.sign());
        assert_eq!(product.to_f32(), 8.0);
    }

    #[test]
    fn test_scenario_same_hex_division() {
        let a = Single::from_hex_fields(false, "05", "3a1b2c").unwrap();
        let b = Single::from_hex_fields(false, "05", "3a1b2c").unwrap();
        assert_same_fields(&(a / b), &Single::one(), "x / x");

        let a = Double::from_hex_fields(true, "fff0", "0123456789abcd").unwrap();
        let b = Double::from_hex_fields(true, "fff0", "0123456789abcd").unwrap();
        assert_same_fields(&(a / b), &Double::one(), "x / x");
    }

    #[rstest]
    fn test_add_matches_double(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments {
            let a = random_normal_f64(&mut rng, 60);
            let b = random_normal_f64(&mut rng, 60);
            let result = (Double::from(a) + Double::from(b)).to_f64();
            assert_eq!(result.to_bits(), (a + b).to_bits(), "{a:e} + {b:e}");

            let result = (Double::from(a) - Double::from(b)).to_f64();
            assert_eq!(result.to_bits(), (a - b).to_bits(), "{a:e} - {b:e}");
        }
    }

    #[rstest]
    fn test_add_close_values(mut rng: impl Rng, n_experiments: usize) {
        // Operands within a few ulps of each other exercise cancellation.
        for _ in 0..n_experiments {
            let a = random_normal_f64(&mut rng, 20);
            let ulps: i64 = rng.random_range(-4..=4);
            let b = f64::from_bits((a.to_bits() as i64 + ulps) as u64);
            let result = (Double::from(a) - Double::from(b)).to_f64();
            assert_eq!(result.to_bits(), (a - b).to_bits(), "{a:e} - {b:e}");
        }
    }

    #[rstest]
    fn test_mul_matches_double(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments {
            let a = random_normal_f64(&mut rng, 60);
            let b = random_normal_f64(&mut rng, 60);
            let result = (Double::from(a) * Double::from(b)).to_f64();
            assert_eq!(result.to_bits(), (a * b).to_bits(), "{a:e} * {b:e}");
        }
    }

    #[rstest]
    fn test_div_matches_double(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments {
            let a = random_normal_f64(&mut rng, 60);
            let b = random_normal_f64(&mut rng, 60);
            let result = (Double::from(a) / Double::from(b)).to_f64();
            assert_eq!(result.to_bits(), (a / b).to_bits(), "{a:e} / {b:e}");
        }
    }

    #[rstest]
    fn test_sqrt_matches_double(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments {
            let a = random_normal_f64(&mut rng, 60).abs();
            let result = Double::from(a).sqrt().to_f64();
            assert_eq!(result.to_bits(), a.sqrt().to_bits(), "sqrt({a:e})");
        }
    }

    #[rstest]
    fn test_ops_match_single(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments {
            let a = random_normal_f64(&mut rng, 30) as f32;
            let b = random_normal_f64(&mut rng, 30) as f32;
            let (fa, fb) = (Single::from(a), Single::from(b));

            assert_eq!((&fa + &fb).to_f32().to_bits(), (a + b).to_bits(), "{a:e} + {b:e}");
            assert_eq!((&fa - &fb).to_f32().to_bits(), (a - b).to_bits(), "{a:e} - {b:e}");
            assert_eq!((&fa * &fb).to_f32().to_bits(), (a * b).to_bits(), "{a:e} * {b:e}");
            assert_eq!((&fa / &fb).to_f32().to_bits(), (a / b).to_bits(), "{a:e} / {b:e}");
            assert_eq!(
                fa.abs().sqrt().to_f32().to_bits(),
                a.abs().sqrt().to_bits(),
                "sqrt({a:e})"
            );
        }
    }

    #[rstest]
    fn test_identities(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments {
            let x = Double::from(random_normal_f64(&mut rng, 300));

            assert_same_fields(&(&x + &Double::zero()), &x, "x + 0");
            assert_same_fields(&(&Double::zero() + &x), &x, "0 + x");
            assert_same_fields(&(&x * &Double::one()), &x, "x * 1");
            assert_same_fields(&(&x / &Double::one()), &x, "x / 1");
            assert_same_fields(&(&x / &x), &Double::one(), "x / x");
            assert!((&x - &x).is_zero());
            assert!(!(&x - &x).sign());
        }
    }

    #[rstest]
    fn test_add_commutes(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments {
            let a = random_normal_f64(&mut rng, 80);
            let b = if rng.random_bool(0.2) {
                -a
            } else {
                random_normal_f64(&mut rng, 80)
            };
            let (fa, fb) = (Double::from(a), Double::from(b));
            assert_same_fields(&(&fa + &fb), &(&fb + &fa), &format!("{a:e} + {b:e}"));
            assert_same_fields(&(&fa * &fb), &(&fb * &fa), &format!("{a:e} * {b:e}"));
        }
    }

    #[test]
    fn test_division_by_zero() {
        let x = Double::from(3.5);
        let result = &x / &Double::zero();
        assert!(result.is_positive_infinity());

        let result = -x / Double::zero();
        assert!(result.is_negative_infinity());

        let result = Double::from(3.5) / Double::zero_with_sign(true);
        assert!(result.is_negative_infinity());

        assert!((Double::zero() / Double::zero()).is_nan());

        let result = Double::zero_with_sign(true) / Double::from(2.0);
        assert!(result.is_zero());
        assert!(result.sign());
    }

    #[test]
    fn test_special_operands() {
        let inf = Double::pos_infinity();
        let neg_inf = Double::neg_infinity();
        let nan = Double::nan();
        let two = Double::from(2.0);
        let zero = Double::zero();

        assert!((&inf + &neg_inf).is_nan());
        assert!((&inf - &inf).is_nan());
        assert!((&inf + &inf).is_positive_infinity());
        assert!((&inf + &two).is_positive_infinity());
        assert!((&two - &inf).is_negative_infinity());
        assert!((&nan + &two).is_nan());
        assert!((&two * &nan).is_nan());
        assert!((&inf * &zero).is_nan());
        assert!((&neg_inf * &two).is_negative_infinity());
        assert!((&neg_inf * &neg_inf).is_positive_infinity());
        assert!((&inf / &inf).is_nan());
        assert!((&inf / &two).is_positive_infinity());
        assert!((&two / &neg_inf).is_zero());
        assert!((&two / &neg_inf).sign());
        assert!((&nan / &zero).is_nan());

        let neg_zero = Double::zero_with_sign(true);
        assert!((&neg_zero + &neg_zero).sign());
        assert!(!(&neg_zero + &zero).sign());
        assert!((&neg_zero * &two).sign());
    }

    #[test]
    fn test_sqrt_special() {
        assert!(Double::nan().sqrt().is_nan());
        assert!(Double::from(-4.0).sqrt().is_nan());
        assert!(Double::neg_infinity().sqrt().is_nan());
        assert!(Double::pos_infinity().sqrt().is_positive_infinity());

        let neg_zero = Double::zero_with_sign(true).sqrt();
        assert!(neg_zero.is_zero());
        assert!(neg_zero.sign());

        assert_eq!(Double::from(4.0).sqrt().to_f64(), 2.0);
        assert_eq!(Double::from(0.25).sqrt().to_f64(), 0.5);
        assert_eq!(Double::from(2.0).sqrt().to_f64(), std::f64::consts::SQRT_2);
        assert_eq!(Half::from(9.0).sqrt().to_f64(), 3.0);
    }

    #[test]
    fn test_overflow_and_underflow() {
        let max = Single::from(f32::MAX);
        assert!((&max + &max).is_positive_infinity());
        assert!((&max * &Single::from(-2.0f32)).is_negative_infinity());
        assert!((&max / &Single::from(0.5f32)).is_positive_infinity());

        let tiny = Single::from(1e-30f32);
        let product = &tiny * &tiny;
        assert!(product.is_zero());
        assert!(!product.sign());

        let quotient = Single::from(-1e-30f32) / Single::from(1e30f32);
        assert!(quotient.is_zero());
        assert!(quotient.sign());

        let half_max = Half::from(65504.0);
        assert_eq!(half_max.to_f64(), 65504.0);
        assert!((&half_max + &Half::from(16.0)).is_positive_infinity());
    }

    #[test]
    fn test_rounding_carries_into_exponent() {
        let below_two = Single::from_biased_hex_fields(false, "7F", "7FFFFF").unwrap();
        let half_ulp = Single::from(2f32.powi(-24));
        let sum = &below_two + &half_ulp;
        assert_eq!(sum.exponent_hex(), "80");
        assert_eq!(sum.fraction_hex(), "000000");
        assert_eq!(sum.to_f32(), (2.0f32 - f32::EPSILON) + 2f32.powi(-24));
    }

    #[test]
    fn test_wide_formats() {
        type Quad = VarFloat<112, 15>;

        let third = Quad::from(1.0) / Quad::from(3.0);
        assert_eq!(third.to_f64(), 1.0 / 3.0);
        assert_eq!(third.fraction_hex(), "5555555555555555555555555555");

        let sum = &third + &third + third.clone();
        assert_eq!(sum.to_f64(), 1.0);

        let big = Quad::from(1e300) * Quad::from(1e300);
        assert!(big.is_normal());
        assert!(big.to_f64().is_infinite());
        assert_eq!((big / Quad::from(1e300)).to_f64(), 1e300);
    }

    #[test]
    fn test_narrow_formats() {
        type Tiny = VarFloat<3, 4>;

        let a = Tiny::from(1.5);
        let b = Tiny::from(1.25);
        assert_eq!((&a + &b).to_f64(), 2.75);
        assert_eq!((&a * &b).to_f64(), 1.875);
        assert_eq!((&a * &a).to_f64(), 2.25);
        // 1.875 * 1.875 = 3.515625 only keeps three fraction bits
        let c = Tiny::from(1.875);
        assert_eq!((&c * &c).to_f64(), 3.5);
        assert!((Tiny::from(200.0) * Tiny::from(200.0)).is_positive_infinity());
    }

    #[test]
    fn test_assign_ops() {
        let mut x = Double::from(10.0);
        x += Double::from(5.0);
        assert_eq!(x.to_f64(), 15.0);
        x -= &Double::from(3.0);
        assert_eq!(x.to_f64(), 12.0);
        x *= Double::from(0.5);
        assert_eq!(x.to_f64(), 6.0);
        x /= &Double::from(4.0);
        assert_eq!(x.to_f64(), 1.5);

        let y = -x.clone();
        assert_eq!(y.to_f64(), -1.5);
        assert_eq!((-&y).to_f64(), 1.5);
        assert_eq!(y.abs().to_f64(), 1.5);
    }
}
