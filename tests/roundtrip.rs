//! Encode/decode round-trip integration tests.
//!
//! Maps are built in memory, encoded, written through temporary files where the registry is
//! involved, and decoded again. Every test compares the decoded map entry by entry against
//! the original: type order, IDs, names, attributes and payload bytes.

use rsrcfork::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

const STR: ResType = ResType::from_bytes(*b"STR ");
const PICT: ResType = ResType::from_bytes(*b"PICT");
const ICON: ResType = ResType::from_bytes(*b"ICN#");

/// Asserts that two maps hold the same resources, reading payloads from their stores.
fn assert_equivalent(
    left: &ResourceMap,
    left_store: &BufferStore,
    right: &ResourceMap,
    right_store: &BufferStore,
) -> Result<()> {
    assert_eq!(left.attributes, right.attributes);
    assert_eq!(left.app_data, right.app_data);
    assert_eq!(
        left.type_codes().collect::<Vec<_>>(),
        right.type_codes().collect::<Vec<_>>()
    );

    for (l, r) in left.types.iter().zip(&right.types) {
        assert_eq!(l.entries.len(), r.entries.len(), "type '{}'", l.res_type);
        for (a, b) in l.entries.iter().zip(&r.entries) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.attributes, b.attributes);
            assert_eq!(left_store.get(a.payload)?, right_store.get(b.payload)?);
        }
    }
    Ok(())
}

/// A map with several types, named and unnamed resources, odd IDs and empty payloads.
fn sample_map(store: &mut BufferStore) -> Result<ResourceMap> {
    let mut map = ResourceMap::new();
    map.attributes = FileAttributes::COMPACT;
    map.app_data[..4].copy_from_slice(b"APPL");

    map.insert(
        STR,
        ResourceEntry::new(1, store.allocate_from(b"Hello")?).with_name("Hello".parse()?),
    )?;
    map.insert(STR, ResourceEntry::new(2, store.allocate_from(b"World")?))?;
    map.insert(
        PICT,
        ResourceEntry::new(-4064, store.allocate_from(&[0x11; 300])?).with_attributes(
            ResourceAttributes::PURGEABLE | ResourceAttributes::from_bits_retain(0x01),
        ),
    )?;
    map.insert(
        ICON,
        ResourceEntry::new(i16::MAX, store.allocate(0)?)
            .with_name("Gämma".parse()?)
            .with_attributes(ResourceAttributes::LOCKED | ResourceAttributes::PRELOAD),
    )?;
    map.insert(
        STR,
        ResourceEntry::new(i16::MIN, store.allocate(17)?).with_name(ResourceName::new(&[])?),
    )?;
    Ok(map)
}

#[test]
fn str_resources_end_to_end() -> Result<()> {
    let mut store = BufferStore::new();
    let mut map = ResourceMap::new();
    map.insert(
        STR,
        ResourceEntry::new(1, store.allocate_from(b"Hello")?).with_name("Hello".parse()?),
    )?;
    map.insert(STR, ResourceEntry::new(2, store.allocate_from(b"World")?))?;

    let bytes = codec::encode(&map, &store)?;
    let decoded = codec::decode(&bytes, &mut store)?;

    assert_eq!(decoded.count_types(), 1);
    assert_eq!(decoded.count_resources(STR), 2);

    let hello = decoded.find(STR, 1).expect("id 1");
    let world = decoded.find(STR, 2).expect("id 2");
    assert_eq!(store.get(hello.payload)?, b"Hello");
    assert_eq!(store.get(world.payload)?, b"World");
    assert_eq!(hello.name.as_ref().map(ToString::to_string).as_deref(), Some("Hello"));
    assert!(world.name.is_none());
    Ok(())
}

#[test]
fn round_trip_law() -> Result<()> {
    let mut store = BufferStore::new();
    let original = sample_map(&mut store)?;

    let bytes = codec::encode(&original, &store)?;
    let mut decoded_store = BufferStore::new();
    let decoded = codec::decode(&bytes, &mut decoded_store)?;
    assert_equivalent(&original, &store, &decoded, &decoded_store)?;

    // A second pass is byte-identical
    let again = codec::encode(&decoded, &decoded_store)?;
    assert_eq!(bytes, again);
    Ok(())
}

#[test]
fn empty_map_encodes_biased_count() -> Result<()> {
    let store = BufferStore::new();
    let bytes = codec::encode(&ResourceMap::new(), &store)?;

    let map_offset = u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as usize;
    let type_list = map_offset + 28;
    assert_eq!(&bytes[type_list..type_list + 2], &[0xFF, 0xFF]);

    let mut store = BufferStore::new();
    assert_eq!(codec::decode(&bytes, &mut store)?.count_types(), 0);
    Ok(())
}

#[test]
fn registry_update_round_trip() -> Result<()> {
    let mut store = BufferStore::new();
    let original = sample_map(&mut store)?;

    let temp = NamedTempFile::new()?;
    fs::write(temp.path(), codec::encode(&original, &store)?)?;

    let mut registry = ResourceFileRegistry::new();
    let file = registry.open(temp.path())?;
    registry.update(file)?;
    registry.close(file)?;

    let mut reread_store = BufferStore::new();
    let reread = codec::decode(&fs::read(temp.path())?, &mut reread_store)?;
    assert_equivalent(&original, &store, &reread, &reread_store)?;
    Ok(())
}

#[test]
fn registry_edits_persist() -> Result<()> {
    let mut store = BufferStore::new();
    let original = sample_map(&mut store)?;
    let temp = NamedTempFile::new()?;
    fs::write(temp.path(), codec::encode(&original, &store)?)?;

    let mut registry = ResourceFileRegistry::new();
    let file = registry.open(temp.path())?;

    let world = registry.get_resource(STR, 2)?;
    registry.resize_payload(world, 9)?;
    registry.payload_mut(world)?.copy_from_slice(b"Worldwide");
    registry.set_resource_info(world, 3, Some("Planet".parse()?))?;
    registry.changed_resource(world)?;
    registry.update(file)?;
    registry.close(file)?;

    let file = registry.open(temp.path())?;
    let planet = registry.get_named_resource_in(file, STR, "PLANET")?;
    assert_eq!(registry.payload(planet)?, b"Worldwide");
    assert_eq!(registry.resource_info(planet)?.id, 3);
    assert!(!registry
        .resource_attributes(planet)?
        .contains(ResourceAttributes::CHANGED));
    assert!(registry.get_resource_in(file, STR, 2).is_err());
    assert_eq!(registry.count_resources_in(file, STR), 3);
    Ok(())
}
