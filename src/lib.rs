//! # VarFloat
//!
//! Software binary floating point with a compile-time choice of fraction and
//! exponent widths. A `VarFloat<F, E>` stores a sign bit, an `E` bit biased
//! exponent and an `F` bit fraction with an implied leading one, exactly like
//! the IEEE 754 interchange formats, and supports sizes the hardware does not.
//!
//! ## Overview
//!
//! VarFloat provides:
//! - **Any layout**: `F >= 1` fraction bits and `2..=62` exponent bits, fixed per type
//! - **Correct rounding**: add, subtract, multiply, divide and square root round to nearest, ties to even
//! - **IEEE special values**: signed zeros, infinities and NaN propagate the IEEE way
//! - **Saturation**: results out of range become infinity or signed zero, subnormals flush to zero
//!
//! ## Architecture
//!
//! The library is built around two main components:
//!
//! ### BitBuffer Module
//! A big-endian buffer of byte units with the arbitrary-width integer kernel:
//! - Bit access, scans and shifts, with bit 0 the most significant bit
//! - Ripple-carry addition and subtraction, schoolbook multiplication and
//!   restoring division
//! - Hexadecimal and binary text
//!
//! ### VarFloat Module
//! The floating point type built on that kernel:
//! - Sign bit (1 bit)
//! - Biased exponent (`E` bits)
//! - Fraction (`F` bits, hidden bit implied)
//!
//! ## Quick Start
//!
//! ```rust
//! use varfloat::{Double, Single, VarFloat};
//!
//! // Create from standard f64
//! let x = Double::from(1.5);
//! let y = Double::from(2.25);
//!
//! // Perform arithmetic operations
//! let sum = &x + &y;
//! let product = x * y;
//! assert_eq!(sum.to_f64(), 3.75);
//! assert_eq!(f64::from(product), 3.375);
//!
//! // Formats the hardware does not have
//! type Quad = VarFloat<112, 15>;
//! let third = Quad::one() / Quad::from(3.0);
//! assert_eq!(third.to_f64(), 1.0 / 3.0);
//!
//! // Inspect the stored fields
//! let one = Single::from_biased_hex_fields(false, "7F", "000000").unwrap();
//! assert_eq!(one.to_hex_string(), "+ 0x7f 0x000000");
//! ```
//!
//! ## Special Values
//!
//! VarFloat supports all IEEE 754 special values:
//!
//! ```rust
//! use varfloat::Half;
//!
//! let zero = Half::zero();
//! let pos_inf = Half::pos_infinity();
//! let nan = Half::nan();
//!
//! assert!(zero.is_zero());
//! assert!(pos_inf.is_infinity());
//! assert!(nan.is_nan());
//! assert!((Half::from(60000.0) * Half::from(2.0)).is_positive_infinity());
//! assert!((pos_inf.clone() - pos_inf).is_nan());
//! ```

pub mod bitbuffer;
pub mod error;
pub mod varfloat;

// Re-export the main types for convenience
pub use bitbuffer::{BitBuffer, Quotient};
pub use error::{Error, Result};
pub use varfloat::{Category, Double, Half, Single, VarFloat};

pub mod prelude {
    //! Prelude module for VarFloat.
    //!
    //! This module re-exports commonly used types from the VarFloat crate,
    //! allowing for easier imports in user code.

    pub use crate::bitbuffer::{BitBuffer, Quotient};
    pub use crate::error::{Error, Result};
    pub use crate::varfloat::{Category, Double, Half, Single, VarFloat};
}
