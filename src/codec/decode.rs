use log::trace;

use crate::{
    buffer::BufferStore,
    codec::{
        biased_count,
        raw::{FileHeaderRaw, MapHeaderRaw, ReferenceRaw, TypeRaw},
        Record, APP_DATA_OFFSET, NO_NAME,
    },
    file::{io::read_be_at, parser::Parser},
    resources::{
        FileAttributes, ResType, ResourceAttributes, ResourceEntry, ResourceMap, ResourceName,
        TypeEntry, APP_DATA_LEN,
    },
    Result,
};

/// Decodes a complete resource fork image.
///
/// Every payload is copied into a new buffer in `store`. On failure every buffer allocated
/// by this call is disposed again, so `store` is left as it was.
///
/// # Errors
/// - [`crate::Error::TruncatedFile`] if a header field, map field, name or payload is cut off
/// - [`crate::Error::Malformed`] if a type appears twice or a type holds two resources with
///   the same ID
/// - [`crate::Error::OutOfMemory`] if a payload buffer cannot be allocated
///
/// # Examples
///
/// ```rust
/// use rsrcfork::{codec, BufferStore, ResourceMap};
///
/// let mut store = BufferStore::new();
/// let bytes = codec::encode(&ResourceMap::new(), &store)?;
///
/// let map = codec::decode(&bytes, &mut store)?;
/// assert_eq!(map.count_types(), 0);
/// # Ok::<(), rsrcfork::Error>(())
/// ```
pub fn decode(data: &[u8], store: &mut BufferStore) -> Result<ResourceMap> {
    let mut map = ResourceMap::new();
    match decode_into(data, store, &mut map) {
        Ok(()) => Ok(map),
        Err(error) => {
            map.dispose(store);
            Err(error)
        }
    }
}

fn decode_into(data: &[u8], store: &mut BufferStore, map: &mut ResourceMap) -> Result<()> {
    let header = FileHeaderRaw::read(data, &mut 0)?;
    trace!(
        "header: data {:#x}+{:#x}, map {:#x}+{:#x}",
        header.data_offset,
        header.data_length,
        header.map_offset,
        header.map_length
    );

    if let Some(app_data) = data.get(APP_DATA_OFFSET..APP_DATA_OFFSET + APP_DATA_LEN) {
        map.app_data.copy_from_slice(app_data);
    }

    let parser = Parser::new(data);
    let map_offset = to_usize(header.map_offset, "Map offset")?;
    let data_offset = to_usize(header.data_offset, "Data offset")?;

    let mut offset = map_offset;
    let map_header = MapHeaderRaw::read(data, &mut offset)?;
    map.attributes = FileAttributes::from_bits_retain(map_header.attributes);

    let type_list = map_offset + usize::from(map_header.type_list_offset);
    let name_list = map_offset + usize::from(map_header.name_list_offset);
    let mut type_cursor = type_list;
    let type_count = biased_count(read_be_at(data, &mut type_cursor)?);

    for _ in 0..type_count {
        let type_raw = TypeRaw::read(data, &mut type_cursor)?;
        let res_type = ResType::from_u32(type_raw.res_type);
        if map.type_entry(res_type).is_some() {
            return Err(malformed_error!("Duplicate type '{}' in type list", res_type));
        }

        let resource_count = biased_count(type_raw.count);
        trace!(
            "type '{}': {} resources, reference list at {:#x}",
            res_type,
            resource_count,
            type_raw.ref_list_offset
        );

        map.types.push(TypeEntry::new(res_type));
        let position = map.types.len() - 1;

        let mut ref_cursor = type_list + usize::from(type_raw.ref_list_offset);
        for _ in 0..resource_count {
            let reference = ReferenceRaw::read(data, &mut ref_cursor)?;
            if map.types[position].find(reference.id).is_some() {
                return Err(malformed_error!(
                    "Duplicate resource '{}' {}",
                    res_type,
                    reference.id
                ));
            }

            let name = if reference.name_offset == NO_NAME {
                None
            } else {
                let mut name_parser =
                    parser.at(name_list + usize::from(reference.name_offset))?;
                Some(ResourceName::new(name_parser.read_pascal_bytes()?)?)
            };

            let payload_offset = data_offset
                .checked_add(to_usize(reference.data_offset, "Resource data offset")?)
                .ok_or(truncated_error!(data_offset, usize::MAX, data.len()))?;
            let bytes = parser.at(payload_offset)?.read_length_prefixed()?;
            trace!(
                "  {} at {:#x}: {} bytes, attributes {:#04x}",
                reference.id,
                payload_offset,
                bytes.len(),
                reference.attributes
            );

            let payload = store.allocate_from(bytes)?;
            map.types[position].entries.push(ResourceEntry {
                id: reference.id,
                attributes: ResourceAttributes::from_bits_retain(reference.attributes),
                name,
                payload,
            });
        }
    }

    Ok(())
}

fn to_usize(value: u32, field: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| malformed_error!("{} {:#x} exceeds the address space", field, value))
}
