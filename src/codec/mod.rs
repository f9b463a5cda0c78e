//! Binary layout codec for resource forks.
//!
//! [`decode`] turns a complete resource fork image into a [`crate::ResourceMap`] whose
//! payloads live in a [`crate::BufferStore`]; [`encode`] turns a map back into a byte image
//! that [`decode`] accepts. Neither keeps state between calls.
//!
//! # Layout
//!
//! ```text
//! 0          header       data offset, map offset, data length, map length (u32 each),
//!                         112 reserved bytes, 128 bytes of application data
//! dataOffset data         (u32 length, bytes) per resource
//! mapOffset  map          header copy, next-map, file-ref, attributes, type list offset,
//!                         name list offset, type list, reference lists, name list
//! ```
//!
//! Offsets in the map are relative to different bases: the type list and name list offsets
//! to the map, reference-list offsets to the type list, name offsets to the name list and
//! data offsets to the data segment. All integers are big-endian and every count in the
//! type list is stored minus one, so `0xFFFF` means zero.
//!
//! # Key Components
//!
//! - [`decode`] / [`encode`] - The two directions of the codec
//! - [`raw`] - Fixed-size on-disk records and the packed attribute/offset word
//! - [`Record`] - Read/write trait implemented by every raw record

mod decode;
mod encode;
pub mod raw;

pub use decode::decode;
pub use encode::encode;
pub use raw::{pack_attributes_offset, unpack_attributes_offset};

use crate::Result;

/// Size of the file header, and the data offset every encoded file uses.
pub const HEADER_LEN: usize = 256;
/// Offset of the system-reserved area inside the header.
pub const SYSTEM_AREA_OFFSET: usize = 16;
/// Offset of the application data area inside the header.
pub const APP_DATA_OFFSET: usize = 128;
/// Reserved bytes at the start of the map: header copy, next-map handle and file-ref.
pub const MAP_RESERVED_LEN: usize = 22;
/// Offset of the type list from the start of the map, as written by [`encode`].
pub const TYPE_LIST_OFFSET: usize = 28;
/// Name offset marking an unnamed resource.
pub const NO_NAME: u16 = 0xFFFF;
/// Largest offset the 24-bit data offset field can hold.
pub const MAX_DATA_OFFSET: u32 = 0x00FF_FFFF;

/// A fixed-size record in the resource fork layout.
pub trait Record: Sized {
    /// Size of the record on disk.
    const SIZE: usize;

    /// Reads the record at `offset`, advancing it by [`Record::SIZE`].
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedFile`] if `data` ends inside the record.
    fn read(data: &[u8], offset: &mut usize) -> Result<Self>;

    /// Writes the record at `offset`, advancing it by [`Record::SIZE`].
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedFile`] if `data` is too short and
    /// [`crate::Error::Malformed`] if a field does not fit its on-disk width.
    fn write(&self, data: &mut [u8], offset: &mut usize) -> Result<()>;
}

/// Decodes a count stored minus one.
#[must_use]
pub fn biased_count(stored: u16) -> usize {
    usize::from(stored.wrapping_add(1))
}

/// Encodes a count as stored minus one; zero becomes `0xFFFF`.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for counts above 65535.
pub fn bias_count(count: usize) -> Result<u16> {
    let count = u16::try_from(count)
        .map_err(|_| malformed_error!("Count {} does not fit the type list", count))?;
    Ok(count.wrapping_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_bias() {
        assert_eq!(biased_count(0xFFFF), 0);
        assert_eq!(biased_count(0), 1);
        assert_eq!(biased_count(2), 3);
        assert_eq!(biased_count(0xFFFE), 0xFFFF);

        assert_eq!(bias_count(0).unwrap(), 0xFFFF);
        assert_eq!(bias_count(3).unwrap(), 2);
        assert_eq!(bias_count(0xFFFF).unwrap(), 0xFFFE);
        assert!(bias_count(0x10000).is_err());
    }
}
