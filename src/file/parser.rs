//! Bounds-checked cursor over a resource fork image.
//!
//! The map of a resource fork is not laid out in traversal order: the type list points
//! forward into reference lists, every reference points back into the data segment and
//! sideways into the name list. [`Parser`] is a cheap `(slice, position)` pair, so a
//! decoder that needs to follow such a pointer forks a second parser at the target offset
//! with [`Parser::at`] instead of seeking away and restoring its own position.
//!
//! # Examples
//!
//! ```rust,ignore
//! use rsrcfork::Parser;
//!
//! // Pascal string "Hi" followed by a big-endian u16
//! let data = [0x02, b'H', b'i', 0x01, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_pascal_bytes()?, b"Hi");
//! assert_eq!(parser.read_be::<u16>()?, 0x0100);
//! assert!(parser.read_be::<u8>().is_err());
//! # Ok::<(), rsrcfork::Error>(())
//! ```

use crate::{
    file::io::{read_be_at, BinaryIO},
    Result,
};

/// A generic parser for a byte buffer, with an explicit read position.
///
/// All reads are bounds-checked and fail with [`crate::Error::TruncatedFile`] rather than
/// panicking, so a damaged or shortened resource fork surfaces as an error from `decode`.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new Parser positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Create a new Parser over the same data, positioned at `position`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedFile`] if `position` lies beyond the end of the data.
    pub fn at(&self, position: usize) -> Result<Parser<'a>> {
        let mut parser = Parser::new(self.data);
        parser.seek(position)?;
        Ok(parser)
    }

    /// Move the position to `pos`.
    ///
    /// Seeking to exactly the end of the buffer is allowed; the next read fails.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedFile`] if `pos` lies beyond the end of the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(truncated_error!(pos, 0, self.data.len()));
        }

        self.position = pos;
        Ok(())
    }

    /// Read a big-endian value of type `T` and advance.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedFile`] if there are insufficient bytes.
    pub fn read_be<T: BinaryIO>(&mut self) -> Result<T> {
        read_be_at::<T>(self.data, &mut self.position)
    }

    /// Read `length` raw bytes and advance.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedFile`] if there are insufficient bytes.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read a byte-counted (Pascal) string: one length byte followed by that many bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedFile`] if the length byte or the string body is cut off.
    pub fn read_pascal_bytes(&mut self) -> Result<&'a [u8]> {
        let length = self.read_be::<u8>()?;
        self.read_bytes(usize::from(length))
    }

    /// Read a big-endian `u32` length prefix followed by that many bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedFile`] if the prefix or the body is cut off.
    pub fn read_length_prefixed(&mut self) -> Result<&'a [u8]> {
        let length = self.read_be::<u32>()?;
        let length = usize::try_from(length)
            .map_err(|_| truncated_error!(self.position, usize::MAX, self.data.len()))?;
        self.read_bytes(length)
    }

    fn calc_end_position(&self, length: usize) -> Result<usize> {
        let end = self
            .position
            .checked_add(length)
            .ok_or(truncated_error!(self.position, length, self.data.len()))?;

        if end > self.data.len() {
            return Err(truncated_error!(self.position, length, self.data.len()));
        }

        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn read_sequence() {
        let data = [
            0x00, 0x00, 0x01, 0x00, // u32
            0xFF, 0xFE, // i16
            0x03, b'a', b'b', b'c', // pascal string
        ];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_be::<u32>().unwrap(), 0x100);
        assert_eq!(parser.read_be::<i16>().unwrap(), -2);
        assert_eq!(parser.read_pascal_bytes().unwrap(), b"abc");
        assert!(parser.read_be::<u8>().is_err());
    }

    #[test]
    fn fork_at_offset() {
        let data = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
        let mut parser = Parser::new(&data);
        parser.seek(2).unwrap();

        let mut fork = parser.at(4).unwrap();
        assert_eq!(fork.read_be::<u16>().unwrap(), 3);

        // The original keeps its own position
        assert_eq!(parser.read_be::<u16>().unwrap(), 2);

        assert!(parser.at(7).is_err());
        assert!(parser.at(6).is_ok());
    }

    #[test]
    fn length_prefixed() {
        let data = [0x00, 0x00, 0x00, 0x02, 0xAA, 0xBB, 0xCC];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_length_prefixed().unwrap(), &[0xAA, 0xBB]);
        assert_eq!(parser.read_be::<u8>().unwrap(), 0xCC);

        let data = [0x00, 0x00, 0x00, 0x05, 0xAA];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            parser.read_length_prefixed(),
            Err(Error::TruncatedFile {
                offset: 4,
                needed: 5,
                len: 5
            })
        ));
    }

    #[test]
    fn truncated_pascal() {
        let data = [0x05, b'a', b'b'];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            parser.read_pascal_bytes(),
            Err(Error::TruncatedFile { .. })
        ));
    }

    #[test]
    fn empty() {
        let mut parser = Parser::new(&[]);
        assert!(parser.read_be::<u8>().is_err());
        assert!(parser.seek(0).is_ok());
        assert!(parser.seek(1).is_err());
        assert!(parser.at(1).is_err());
    }
}
