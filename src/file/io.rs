//! Big-endian, bounds-checked reading and writing of primitive integers.
//!
//! Every multi-byte integer in a resource fork is stored big-endian: the four header words,
//! the map's offsets and counts, reference-list entries and the length prefix in front of
//! each payload. This module is the single place where byte order is handled; everything
//! above it works with native integers.
//!
//! # Key Components
//!
//! - [`crate::file::io::BinaryIO`] - Trait tying a primitive to its fixed-size byte array
//! - [`crate::file::io::read_be_at`] - Bounds-checked reads
//! - [`crate::file::io::write_be_at`] - Bounds-checked writes
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use rsrcfork::file::io::{read_be_at, write_be_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_be_at(&mut data, &mut offset, 0x0100_u16)?;
//! write_be_at(&mut data, &mut offset, 0xDEAD_BEEF_u32)?;
//! assert_eq!(data, [0x01, 0x00, 0xDE, 0xAD, 0xBE, 0xEF]);
//!
//! let mut offset = 0;
//! let first: u16 = read_be_at(&data, &mut offset)?;
//! let second: u32 = read_be_at(&data, &mut offset)?;
//! assert_eq!((first, second), (0x0100, 0xDEAD_BEEF));
//! # Ok::<(), rsrcfork::Error>(())
//! ```
//!
//! # Error Handling
//!
//! Reads and writes that would cross the end of the buffer return
//! [`crate::Error::TruncatedFile`] describing the offset and the number of bytes needed.

use crate::Result;

/// Trait for primitives that can be moved in and out of big-endian byte arrays.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait BinaryIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in big-endian
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_binary_io {
    ($($ty:ty),*) => {
        $(
            impl BinaryIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_binary_io!(u8, i8, u16, i16, u32, i32);

/// Safely reads a value of type `T` in big-endian byte order at `offset`, advancing it by
/// the size of `T`.
///
/// # Errors
/// Returns [`crate::Error::TruncatedFile`] if there are insufficient bytes. The offset is
/// left untouched in that case.
pub fn read_be_at<T: BinaryIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(truncated_error!(*offset, type_len, data.len()));
    };

    if end > data.len() {
        return Err(truncated_error!(*offset, type_len, data.len()));
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(truncated_error!(*offset, type_len, data.len()));
    };

    *offset = end;

    Ok(T::from_be_bytes(read))
}

/// Safely writes a value of type `T` in big-endian byte order at `offset`, advancing it by
/// the size of `T`.
///
/// # Errors
/// Returns [`crate::Error::TruncatedFile`] if the buffer is too small. The offset is left
/// untouched in that case.
pub fn write_be_at<T: BinaryIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(truncated_error!(*offset, type_len, data.len()));
    };

    if end > data.len() {
        return Err(truncated_error!(*offset, type_len, data.len()));
    }

    data[*offset..end].copy_from_slice(value.to_be_bytes().as_ref());
    *offset = end;

    Ok(())
}
