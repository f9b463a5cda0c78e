//! Fixed-size on-disk records.
//!
//! Each record mirrors one structure of the resource fork byte for byte. The decoder reads
//! them and resolves their offsets; the encoder fills them from a laid-out map and writes
//! them. Values are kept as stored, so a count field still carries its minus-one bias.

use crate::{
    codec::{Record, MAX_DATA_OFFSET},
    file::io::{read_be_at, write_be_at},
    Result,
};

/// Packs an attribute byte and a 24-bit data offset into one reference-list word.
///
/// The attributes occupy the most significant byte, the offset the low 24 bits; on disk the
/// word is big-endian, so the attribute byte comes first.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `offset` does not fit 24 bits.
pub fn pack_attributes_offset(attributes: u8, offset: u32) -> Result<u32> {
    if offset > MAX_DATA_OFFSET {
        return Err(malformed_error!(
            "Data offset {:#x} does not fit 24 bits",
            offset
        ));
    }

    Ok((u32::from(attributes) << 24) | offset)
}

/// Splits a reference-list word into its attribute byte and 24-bit data offset.
#[must_use]
pub fn unpack_attributes_offset(word: u32) -> (u8, u32) {
    let [attributes, ..] = word.to_be_bytes();
    (attributes, word & MAX_DATA_OFFSET)
}

/// The four leading header words. Also written as the first 16 bytes of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileHeaderRaw {
    /// Absolute offset of the data segment
    pub data_offset: u32,
    /// Absolute offset of the map
    pub map_offset: u32,
    /// Length of the data segment
    pub data_length: u32,
    /// Length of the map
    pub map_length: u32,
}

impl Record for FileHeaderRaw {
    #[rustfmt::skip]
    const SIZE: usize =
        /* data_offset */ 4 +
        /* map_offset */  4 +
        /* data_length */ 4 +
        /* map_length */  4;

    fn read(data: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(FileHeaderRaw {
            data_offset: read_be_at(data, offset)?,
            map_offset: read_be_at(data, offset)?,
            data_length: read_be_at(data, offset)?,
            map_length: read_be_at(data, offset)?,
        })
    }

    fn write(&self, data: &mut [u8], offset: &mut usize) -> Result<()> {
        write_be_at(data, offset, self.data_offset)?;
        write_be_at(data, offset, self.map_offset)?;
        write_be_at(data, offset, self.data_length)?;
        write_be_at(data, offset, self.map_length)?;
        Ok(())
    }
}

/// The fixed part at the start of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapHeaderRaw {
    /// Copy of the file header
    pub header_copy: FileHeaderRaw,
    /// Handle to the next map in memory, always written as zero
    pub next_map: u32,
    /// File reference number in memory, always written as zero
    pub file_ref: u16,
    /// File attributes
    pub attributes: u16,
    /// Offset of the type list from the start of the map
    pub type_list_offset: u16,
    /// Offset of the name list from the start of the map
    pub name_list_offset: u16,
}

impl Record for MapHeaderRaw {
    #[rustfmt::skip]
    const SIZE: usize =
        /* header_copy */      FileHeaderRaw::SIZE +
        /* next_map */         4 +
        /* file_ref */         2 +
        /* attributes */       2 +
        /* type_list_offset */ 2 +
        /* name_list_offset */ 2;

    fn read(data: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(MapHeaderRaw {
            header_copy: FileHeaderRaw::read(data, offset)?,
            next_map: read_be_at(data, offset)?,
            file_ref: read_be_at(data, offset)?,
            attributes: read_be_at(data, offset)?,
            type_list_offset: read_be_at(data, offset)?,
            name_list_offset: read_be_at(data, offset)?,
        })
    }

    fn write(&self, data: &mut [u8], offset: &mut usize) -> Result<()> {
        self.header_copy.write(data, offset)?;
        write_be_at(data, offset, self.next_map)?;
        write_be_at(data, offset, self.file_ref)?;
        write_be_at(data, offset, self.attributes)?;
        write_be_at(data, offset, self.type_list_offset)?;
        write_be_at(data, offset, self.name_list_offset)?;
        Ok(())
    }
}

/// One entry of the type list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRaw {
    /// Four-character type code
    pub res_type: u32,
    /// Number of resources of this type, minus one
    pub count: u16,
    /// Offset of the reference list from the start of the type list
    pub ref_list_offset: u16,
}

impl Record for TypeRaw {
    #[rustfmt::skip]
    const SIZE: usize =
        /* res_type */        4 +
        /* count */           2 +
        /* ref_list_offset */ 2;

    fn read(data: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(TypeRaw {
            res_type: read_be_at(data, offset)?,
            count: read_be_at(data, offset)?,
            ref_list_offset: read_be_at(data, offset)?,
        })
    }

    fn write(&self, data: &mut [u8], offset: &mut usize) -> Result<()> {
        write_be_at(data, offset, self.res_type)?;
        write_be_at(data, offset, self.count)?;
        write_be_at(data, offset, self.ref_list_offset)?;
        Ok(())
    }
}

/// One entry of a reference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceRaw {
    /// Resource ID
    pub id: i16,
    /// Offset of the name from the start of the name list, `0xFFFF` for none
    pub name_offset: u16,
    /// Attribute byte
    pub attributes: u8,
    /// Offset of the length-prefixed payload from the start of the data segment
    pub data_offset: u32,
    /// Handle to the loaded payload in memory, always written as zero
    pub handle: u32,
}

impl Record for ReferenceRaw {
    #[rustfmt::skip]
    const SIZE: usize =
        /* id */                     2 +
        /* name_offset */            2 +
        /* attributes, data_offset */ 4 +
        /* handle */                 4;

    fn read(data: &[u8], offset: &mut usize) -> Result<Self> {
        let id = read_be_at(data, offset)?;
        let name_offset = read_be_at(data, offset)?;
        let (attributes, data_offset) = unpack_attributes_offset(read_be_at(data, offset)?);

        Ok(ReferenceRaw {
            id,
            name_offset,
            attributes,
            data_offset,
            handle: read_be_at(data, offset)?,
        })
    }

    fn write(&self, data: &mut [u8], offset: &mut usize) -> Result<()> {
        let word = pack_attributes_offset(self.attributes, self.data_offset)?;

        write_be_at(data, offset, self.id)?;
        write_be_at(data, offset, self.name_offset)?;
        write_be_at(data, offset, word)?;
        write_be_at(data, offset, self.handle)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn packed_word() {
        assert_eq!(pack_attributes_offset(0x20, 0x12).unwrap(), 0x2000_0012);
        assert_eq!(
            pack_attributes_offset(0xFF, MAX_DATA_OFFSET).unwrap(),
            0xFFFF_FFFF
        );
        assert!(matches!(
            pack_attributes_offset(0, 0x0100_0000),
            Err(Error::Malformed { .. })
        ));

        assert_eq!(unpack_attributes_offset(0x2000_0012), (0x20, 0x12));
        assert_eq!(unpack_attributes_offset(0x00AB_CDEF), (0x00, 0x00AB_CDEF));
        assert_eq!(unpack_attributes_offset(0x8100_0000), (0x81, 0));
    }

    #[test]
    fn sizes() {
        assert_eq!(FileHeaderRaw::SIZE, 16);
        assert_eq!(MapHeaderRaw::SIZE, 28);
        assert_eq!(TypeRaw::SIZE, 8);
        assert_eq!(ReferenceRaw::SIZE, 12);
    }

    #[test]
    fn crafted_header() {
        let data = vec![
            0x00, 0x00, 0x01, 0x00, // data_offset
            0x00, 0x00, 0x01, 0x1A, // map_offset
            0x00, 0x00, 0x00, 0x1A, // data_length
            0x00, 0x00, 0x00, 0x32, // map_length
        ];

        let mut offset = 0;
        let header = FileHeaderRaw::read(&data, &mut offset).unwrap();
        assert_eq!(offset, 16);
        assert_eq!(
            header,
            FileHeaderRaw {
                data_offset: 0x100,
                map_offset: 0x11A,
                data_length: 0x1A,
                map_length: 0x32,
            }
        );

        let mut written = vec![0u8; 16];
        header.write(&mut written, &mut 0).unwrap();
        assert_eq!(written, data);

        assert!(matches!(
            FileHeaderRaw::read(&data[..15], &mut 0),
            Err(Error::TruncatedFile {
                offset: 12,
                needed: 4,
                len: 15
            })
        ));
    }

    #[test]
    fn crafted_map_header() {
        let mut data = vec![0u8; 22]; // header copy, next_map, file_ref
        data.extend_from_slice(&[
            0x00, 0x80, // attributes
            0x00, 0x1C, // type_list_offset
            0x00, 0x32, // name_list_offset
        ]);

        let mut offset = 0;
        let map = MapHeaderRaw::read(&data, &mut offset).unwrap();
        assert_eq!(offset, 28);
        assert_eq!(map.attributes, 0x80);
        assert_eq!(map.type_list_offset, 28);
        assert_eq!(map.name_list_offset, 0x32);
        assert_eq!(map.header_copy, FileHeaderRaw::default());
    }

    #[test]
    fn crafted_type() {
        let data = vec![
            0x53, 0x54, 0x52, 0x20, // res_type 'STR '
            0x00, 0x01, // count
            0x00, 0x0A, // ref_list_offset
        ];

        let entry = TypeRaw::read(&data, &mut 0).unwrap();
        assert_eq!(entry.res_type, u32::from_be_bytes(*b"STR "));
        assert_eq!(entry.count, 1);
        assert_eq!(entry.ref_list_offset, 10);
    }

    #[test]
    fn crafted_reference() {
        let data = vec![
            0x00, 0x80, // id
            0xFF, 0xFF, // name_offset
            0x22, 0x00, 0x01, 0x04, // attributes, data_offset
            0x00, 0x00, 0x00, 0x00, // handle
        ];

        let reference = ReferenceRaw::read(&data, &mut 0).unwrap();
        assert_eq!(reference.id, 128);
        assert_eq!(reference.name_offset, 0xFFFF);
        assert_eq!(reference.attributes, 0x22);
        assert_eq!(reference.data_offset, 0x104);

        let mut written = vec![0u8; ReferenceRaw::SIZE];
        reference.write(&mut written, &mut 0).unwrap();
        assert_eq!(written, data);

        let too_far = ReferenceRaw {
            data_offset: 0x0100_0000,
            ..reference
        };
        assert!(too_far.write(&mut written, &mut 0).is_err());
    }
}
