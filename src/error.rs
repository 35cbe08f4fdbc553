//! Error types for varfloat

use thiserror::Error;

/// Faults raised by the byte-array kernel and the field parsers.
///
/// Special floating-point values (zero, infinity, NaN) and over/underflow are
/// results, not errors, and never show up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A bit (or radix point) position outside the buffer
    #[error("index {index} out of range for a buffer of {len} bits")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Width of the buffer in bits
        len: usize,
    },

    /// Text that is not hexadecimal, or does not fit the target field
    #[error("malformed input {input:?}: {reason}")]
    MalformedInput {
        /// The offending text
        input: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Kernel division by an all-zero buffer
    #[error("division by zero")]
    DivisionByZero,
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn malformed(input: &str, reason: &'static str) -> Self {
        Error::MalformedInput {
            input: input.to_owned(),
            reason,
        }
    }
}
