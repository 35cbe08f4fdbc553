//! Equality and ordering with IEEE semantics: NaN is unordered and unequal to
//! everything, and the two zeros compare equal.

use std::cmp::Ordering;

use crate::bitbuffer::BitBuffer;
use crate::varfloat::VarFloat;

impl<const F: usize, const E: usize> PartialEq for VarFloat<F, E> {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        if self.is_zero() && other.is_zero() {
            return true;
        }
        self.sign == other.sign
            && self.exponent == other.exponent
            && self.fraction == other.fraction
    }
}

impl<const F: usize, const E: usize> PartialOrd for VarFloat<F, E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Some(Ordering::Equal),
            (true, false) => return Some(if other.sign { Ordering::Greater } else { Ordering::Less }),
            (false, true) => return Some(if self.sign { Ordering::Less } else { Ordering::Greater }),
            (false, false) => {}
        }
        if self.sign != other.sign {
            return Some(if self.sign { Ordering::Less } else { Ordering::Greater });
        }

        let magnitude = self
            .exponent
            .low_u64()
            .cmp(&other.exponent.low_u64())
            .then_with(|| BitBuffer::compare_magnitude(&self.fraction, &other.fraction));
        Some(if self.sign { magnitude.reverse() } else { magnitude })
    }
}
