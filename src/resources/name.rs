//! Pascal-string resource names.

use std::{fmt, str::FromStr};

use encoding_rs::MACINTOSH;

use crate::{Error, Result};

/// Longest name a one-byte length prefix can describe.
pub const MAX_NAME_LEN: usize = 255;

/// A resource name as stored in the name list: up to 255 raw Mac Roman bytes.
///
/// Names are case-preserving. Lookups through [`ResourceName::matches`] ignore case but not
/// diacritics, so `"GAMMA"` finds `"Gamma"` while `"Gämma"` does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(Vec<u8>);

impl ResourceName {
    /// Wraps raw name bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `bytes` is longer than 255 bytes.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_NAME_LEN {
            return Err(malformed_error!(
                "Resource name is {} bytes, at most {} are allowed",
                bytes.len(),
                MAX_NAME_LEN
            ));
        }

        Ok(ResourceName(bytes.to_vec()))
    }

    /// The raw bytes, without the length prefix.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for a zero-length name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive, diacritic-sensitive comparison against `other`.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        let (own, _) = MACINTOSH.decode_without_bom_handling(&self.0);
        own.to_lowercase() == other.to_lowercase()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (text, _) = MACINTOSH.decode_without_bom_handling(&self.0);
        f.write_str(&text)
    }
}

impl FromStr for ResourceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (encoded, _, unmappable) = MACINTOSH.encode(s);
        if unmappable {
            return Err(malformed_error!("Resource name {:?} is not Mac Roman", s));
        }

        ResourceName::new(&encoded)
    }
}

impl AsRef<[u8]> for ResourceName {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
