use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rsrcfork::prelude::*;
use std::hint::black_box;

/// Builds a map with `types` types of `per_type` resources each, every third one named.
fn generate_map(types: u32, per_type: i16, store: &mut BufferStore) -> ResourceMap {
    let mut map = ResourceMap::new();
    for t in 0..types {
        let res_type = ResType::from_u32(u32::from_be_bytes(*b"RS00") + t);
        for id in 0..per_type {
            let payload = vec![(id & 0xFF) as u8; 64 + usize::from(id.unsigned_abs() % 512)];
            let mut entry = ResourceEntry::new(id, store.allocate_from(&payload).unwrap());
            if id % 3 == 0 {
                entry = entry.with_name(format!("Resource {t}/{id}").parse().unwrap());
            }
            map.insert(res_type, entry).unwrap();
        }
    }
    map
}

/// Decode and encode throughput for a fork of roughly a megabyte
fn bench_codec(c: &mut Criterion) {
    let mut store = BufferStore::new();
    let map = generate_map(16, 200, &mut store);
    let data = codec::encode(&map, &store).unwrap();

    println!(
        "Benchmarking resource fork: {} bytes ({:.2} KB), {} resources",
        data.len(),
        data.len() as f64 / 1024.0,
        map.resource_count()
    );

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("decode", |b| {
        b.iter(|| {
            let mut store = BufferStore::new();
            let decoded = codec::decode(black_box(&data), &mut store).unwrap();
            black_box((decoded, store))
        });
    });
    group.bench_function("encode", |b| {
        b.iter(|| {
            let encoded = codec::encode(black_box(&map), &store).unwrap();
            black_box(encoded)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
