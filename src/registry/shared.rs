use std::sync::{Arc, Mutex};

use crate::{registry::ResourceFileRegistry, Result};

/// A [`ResourceFileRegistry`] that can be shared between threads.
///
/// Every call runs under one mutex, so lookups never observe a registry halfway through an
/// open, close, update or redirect.
///
/// # Examples
///
/// ```rust
/// use rsrcfork::{ResourceFileRegistry, SharedRegistry};
///
/// let shared = SharedRegistry::new(ResourceFileRegistry::new());
/// let worker = shared.clone();
/// std::thread::spawn(move || worker.with(|registry| Ok(registry.count_types())))
///     .join()
///     .unwrap()?;
/// # Ok::<(), rsrcfork::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<ResourceFileRegistry>>,
}

impl SharedRegistry {
    /// Wraps `registry`.
    #[must_use]
    pub fn new(registry: ResourceFileRegistry) -> Self {
        SharedRegistry {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Runs `f` with exclusive access to the registry.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if a previous caller panicked while holding the
    /// lock, otherwise whatever `f` returns.
    pub fn with<R>(&self, f: impl FnOnce(&mut ResourceFileRegistry) -> Result<R>) -> Result<R> {
        with_lock!(self.inner, f)
    }
}

impl std::fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Ok(registry) => f.debug_tuple("SharedRegistry").field(&*registry).finish(),
            Err(_) => f.write_str("SharedRegistry(<locked>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{codec, BufferStore, Error, ResType, ResourceEntry, ResourceMap};

    fn fork(id: i16) -> Vec<u8> {
        let mut store = BufferStore::new();
        let mut map = ResourceMap::new();
        let payload = store.allocate_from(&id.to_be_bytes()).unwrap();
        map.insert(ResType::from_bytes(*b"TEXT"), ResourceEntry::new(id, payload))
            .unwrap();
        codec::encode(&map, &store).unwrap()
    }

    #[test]
    fn concurrent_opens() {
        let shared = SharedRegistry::default();

        let handles: Vec<_> = (0..8)
            .map(|id| {
                let shared = shared.clone();
                thread::spawn(move || shared.with(|registry| registry.open_mem(fork(id))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let (files, resources) = shared
            .with(|registry| {
                Ok((
                    registry.files().count(),
                    registry.count_resources(ResType::from_bytes(*b"TEXT")),
                ))
            })
            .unwrap();
        assert_eq!(files, 8);
        assert_eq!(resources, 8);
    }

    #[test]
    fn poisoned_lock() {
        let shared = SharedRegistry::default();
        let worker = shared.clone();
        let _ = thread::spawn(move || {
            let _ = worker.with(|_| -> Result<()> { panic!("worker failed") });
        })
        .join();

        assert!(matches!(shared.with(|_| Ok(())), Err(Error::LockError)));
    }
}
