//! Text conversions for [`BitBuffer`]: hexadecimal and binary renderings.

use std::fmt;
use std::str::FromStr;

use crate::bitbuffer::BitBuffer;
use crate::error::{Error, Result};

impl BitBuffer {
    /// Parses hexadecimal text two digits per unit, most-significant first.
    ///
    /// Odd-length text is read as if it had a leading `0`.
    ///
    /// ```rust
    /// use varfloat::BitBuffer;
    ///
    /// let buffer = BitBuffer::from_hex("1ff").unwrap();
    /// assert_eq!(buffer.as_bytes(), &[0x01, 0xff]);
    /// assert!(BitBuffer::from_hex("zz").is_err());
    /// ```
    pub fn from_hex(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::malformed(text, "empty hexadecimal text"));
        }

        let digits = text
            .chars()
            .map(|c| c.to_digit(16))
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(|| Error::malformed(text, "non-hexadecimal character"))?;

        let mut units = Vec::with_capacity(digits.len().div_ceil(2));
        let (head, tail) = digits.split_at(digits.len() % 2);
        if let Some(&digit) = head.first() {
            units.push(digit as u8);
        }
        for pair in tail.chunks_exact(2) {
            units.push(((pair[0] << 4) | pair[1]) as u8);
        }
        Ok(Self::from_bytes(units))
    }

    /// Two lowercase hex digits per unit.
    pub fn to_hex(&self) -> String {
        format!("{self:x}")
    }

    pub fn to_bits_string(&self) -> String {
        self.iter_bits().map(|b| if b { '1' } else { '0' }).collect()
    }

    /// Every bit as `'0'`/`'1'` with a `.` inserted before bit `point`.
    ///
    /// `point == len_bits()` puts the point after the last bit.
    pub fn to_binary_text(&self, point: usize) -> Result<String> {
        if point > self.len_bits() {
            return Err(Error::IndexOutOfRange {
                index: point,
                len: self.len_bits(),
            });
        }
        let mut text = self.to_bits_string();
        text.insert(point, '.');
        Ok(text)
    }
}

impl FromStr for BitBuffer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bits_string())
    }
}

impl fmt::LowerHex for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.units {
            write!(f, "{unit:02x}")?;
        }
        Ok(())
    }
}
