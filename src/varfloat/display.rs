//! Text renderings of [`VarFloat`].
//!
//! `Display` writes the value in binary: the sign token, then the hidden bit
//! and all `F` fraction bits with the binary point placed by the exponent.
//! When the point falls outside the significand it stays after the hidden bit
//! and a `p<exponent>` suffix is added.
//!
//! ```rust
//! use varfloat::Half;
//!
//! assert_eq!(Half::from(2.5).to_string(), "+ 10.100000000");
//! assert_eq!(Half::from(-0.75).to_string(), "- 1.1000000000p-1");
//! assert_eq!(Half::from(2.5).to_hex_string(), "+ 0x10 0x0100");
//! ```

use std::fmt;

use crate::varfloat::{Category, VarFloat};

impl<const F: usize, const E: usize> VarFloat<F, E> {
    fn sign_token(&self) -> char {
        if self.sign { '-' } else { '+' }
    }

    /// The stored fields as `"<sign> 0x<exponent> 0x<fraction>"`.
    pub fn to_hex_string(&self) -> String {
        format!(
            "{} 0x{:x} 0x{:x}",
            self.sign_token(),
            self.exponent,
            self.fraction
        )
    }
}

impl<const F: usize, const E: usize> fmt::Display for VarFloat<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category() {
            Category::NaN => return f.write_str("NaN"),
            Category::Infinity => return f.write_str(if self.sign { "-inf" } else { "inf" }),
            Category::Zero => return write!(f, "{} 0.0", self.sign_token()),
            Category::Normal => {}
        }

        let exponent = self.unbiased_exponent();
        let point = if (0..=F as i64).contains(&exponent) {
            exponent as usize + 1
        } else {
            1
        };

        let significand = self.significand(Self::SIGNIFICAND_BYTES);
        let hidden = significand.len_bits() - 1 - F;
        let text = significand
            .to_binary_text(hidden + point)
            .map_err(|_| fmt::Error)?;

        write!(f, "{} {}", self.sign_token(), &text[hidden..])?;
        if point == F + 1 {
            f.write_str("0")?;
        }
        if point == 1 && exponent != 0 {
            write!(f, "p{exponent}")?;
        }
        Ok(())
    }
}

impl<const F: usize, const E: usize> fmt::Debug for VarFloat<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarFloat")
            .field("sign", &self.sign_token())
            .field("exponent", &format_args!("0x{:x}", self.exponent))
            .field("fraction", &format_args!("0x{:x}", self.fraction))
            .finish()
    }
}
