use log::trace;

use crate::{
    buffer::BufferStore,
    codec::{
        bias_count,
        raw::{FileHeaderRaw, MapHeaderRaw, ReferenceRaw, TypeRaw},
        Record, APP_DATA_OFFSET, HEADER_LEN, NO_NAME, TYPE_LIST_OFFSET,
    },
    file::io::write_be_at,
    resources::ResourceMap,
    Result,
};

/// Encodes `map` into a complete resource fork image.
///
/// The data segment and the map are built as separate buffers, so every length and offset is
/// known before the header is written; the result is assembled once at the end. Payloads are
/// laid out in type table order, names in reference order, and the data segment always
/// starts right after the 256-byte header.
///
/// # Errors
/// - [`crate::Error::InvalidBuffer`] if an entry refers to a disposed buffer
/// - [`crate::Error::Malformed`] if the map does not fit the format: more than 65535 types or
///   resources of one type, a payload starting beyond 16 MiB into the data segment, or a map
///   too large for its 16-bit offsets
///
/// # Examples
///
/// ```rust
/// use rsrcfork::{codec, BufferStore, ResType, ResourceEntry, ResourceMap};
///
/// let mut store = BufferStore::new();
/// let mut map = ResourceMap::new();
/// let payload = store.allocate_from(b"Hello")?;
/// map.insert(ResType::from_bytes(*b"STR "), ResourceEntry::new(1, payload))?;
///
/// let bytes = codec::encode(&map, &store)?;
/// assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x01, 0x00]);
/// # Ok::<(), rsrcfork::Error>(())
/// ```
pub fn encode(map: &ResourceMap, store: &BufferStore) -> Result<Vec<u8>> {
    let type_count = map.count_types();
    let resource_count = map.resource_count();

    let references_start = TYPE_LIST_OFFSET + 2 + type_count * TypeRaw::SIZE;
    let name_list_offset = references_start + resource_count * ReferenceRaw::SIZE;

    let mut data = Vec::new();
    let mut names = Vec::new();
    let mut types = Vec::with_capacity(type_count);
    let mut references = Vec::with_capacity(resource_count);

    for type_entry in &map.types {
        let ref_list_offset =
            references_start - TYPE_LIST_OFFSET + references.len() * ReferenceRaw::SIZE;
        types.push(TypeRaw {
            res_type: type_entry.res_type.as_u32(),
            count: bias_count(type_entry.entries.len())?,
            ref_list_offset: to_u16(ref_list_offset, "Reference list offset")?,
        });
        trace!(
            "type '{}': {} resources, reference list at {:#x}",
            type_entry.res_type,
            type_entry.entries.len(),
            ref_list_offset
        );

        for entry in &type_entry.entries {
            let payload = store.get(entry.payload)?;
            let data_offset = to_u32(data.len(), "Data offset")?;
            let length = to_u32(payload.len(), "Payload length")?;

            data.extend_from_slice(&length.to_be_bytes());
            data.extend_from_slice(payload);

            let name_offset = match &entry.name {
                Some(name) => {
                    let name_offset = to_u16(names.len(), "Name offset")?;
                    if name_offset == NO_NAME {
                        return Err(malformed_error!("Name list exceeds {:#x} bytes", NO_NAME));
                    }

                    names.push(to_u8(name.len())?);
                    names.extend_from_slice(name.as_bytes());
                    name_offset
                }
                None => NO_NAME,
            };

            trace!(
                "  {} at {:#x}: {} bytes, name offset {:#x}",
                entry.id,
                data_offset,
                length,
                name_offset
            );

            references.push(ReferenceRaw {
                id: entry.id,
                name_offset,
                attributes: entry.attributes.bits(),
                data_offset,
                handle: 0,
            });
        }
    }

    let map_length = name_list_offset + names.len();
    let header = FileHeaderRaw {
        data_offset: to_u32(HEADER_LEN, "Data offset")?,
        map_offset: to_u32(HEADER_LEN + data.len(), "Map offset")?,
        data_length: to_u32(data.len(), "Data length")?,
        map_length: to_u32(map_length, "Map length")?,
    };

    let mut map_segment = vec![0u8; map_length];
    let mut offset = 0;
    MapHeaderRaw {
        header_copy: header,
        next_map: 0,
        file_ref: 0,
        attributes: map.attributes.bits(),
        type_list_offset: to_u16(TYPE_LIST_OFFSET, "Type list offset")?,
        name_list_offset: to_u16(name_list_offset, "Name list offset")?,
    }
    .write(&mut map_segment, &mut offset)?;

    write_be_at(&mut map_segment, &mut offset, bias_count(type_count)?)?;
    for type_raw in &types {
        type_raw.write(&mut map_segment, &mut offset)?;
    }
    for reference in &references {
        reference.write(&mut map_segment, &mut offset)?;
    }
    map_segment[offset..].copy_from_slice(&names);

    let mut header_segment = [0u8; HEADER_LEN];
    header.write(&mut header_segment, &mut 0)?;
    header_segment[APP_DATA_OFFSET..].copy_from_slice(&map.app_data);

    trace!(
        "encoded {} types, {} resources: data {:#x} bytes, map {:#x} bytes",
        type_count,
        resource_count,
        data.len(),
        map_length
    );

    let mut output = Vec::with_capacity(HEADER_LEN + data.len() + map_length);
    output.extend_from_slice(&header_segment);
    output.extend_from_slice(&data);
    output.extend_from_slice(&map_segment);
    Ok(output)
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| malformed_error!("{} {:#x} exceeds u32 range", what, value))
}

fn to_u16(value: usize, what: &str) -> Result<u16> {
    u16::try_from(value).map_err(|_| malformed_error!("{} {:#x} exceeds u16 range", what, value))
}

fn to_u8(len: usize) -> Result<u8> {
    u8::try_from(len).map_err(|_| malformed_error!("Resource name of {} bytes is too long", len))
}
