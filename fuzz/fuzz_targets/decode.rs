#![no_main]

use libfuzzer_sys::fuzz_target;
use rsrcfork::{codec, BufferStore};

fuzz_target!(|data: &[u8]| {
    let mut store = BufferStore::with_budget(64 * 1024 * 1024);
    if let Ok(map) = codec::decode(data, &mut store) {
        let _ = codec::encode(&map, &store);
        map.dispose(&mut store);
    }
    assert!(store.is_empty());
});
