//! Four-character resource type codes.

use std::{fmt, str::FromStr};

use encoding_rs::MACINTOSH;

use crate::{Error, Result};

/// A resource type, stored on disk as a big-endian `u32` and written as four Mac Roman
/// characters (`'STR '`, `'PICT'`, `'TEXT'`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResType(u32);

impl ResType {
    /// Creates a type code from its four bytes, first character first.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        ResType(u32::from_be_bytes(bytes))
    }

    /// Creates a type code from the integer stored in the type list.
    #[must_use]
    pub const fn from_u32(code: u32) -> Self {
        ResType(code)
    }

    /// The integer value written to the type list.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The four bytes of the code, first character first.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<[u8; 4]> for ResType {
    fn from(bytes: [u8; 4]) -> Self {
        ResType::from_bytes(bytes)
    }
}

impl From<u32> for ResType {
    fn from(code: u32) -> Self {
        ResType(code)
    }
}

impl fmt::Display for ResType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        let (text, _) = MACINTOSH.decode_without_bom_handling(&bytes);
        for c in text.chars() {
            if c.is_control() {
                write!(f, "\\x{:02X}", u32::from(c))?;
            } else {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for ResType {
    type Err = Error;

    /// Parses exactly four Mac Roman characters. Trailing spaces are significant.
    fn from_str(s: &str) -> Result<Self> {
        let (encoded, _, unmappable) = MACINTOSH.encode(s);
        if unmappable {
            return Err(malformed_error!("Type code {:?} is not Mac Roman", s));
        }

        let bytes: [u8; 4] = encoded
            .as_ref()
            .try_into()
            .map_err(|_| malformed_error!("Type code {:?} is not four characters", s))?;

        Ok(ResType::from_bytes(bytes))
    }
}
