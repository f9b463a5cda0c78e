//! Arena of resizable byte buffers addressed by stable references.
//!
//! Every decoded resource payload lives in a [`BufferStore`] owned by the registry. Callers
//! hold a [`BufferRef`], a small copyable key that stays valid until the buffer is disposed,
//! no matter how often the buffer behind it is resized. A disposed key may be handed out
//! again by a later allocation.
//!
//! # Examples
//!
//! ```rust
//! use rsrcfork::BufferStore;
//!
//! let mut store = BufferStore::new();
//! let buffer = store.allocate_from(b"Hello")?;
//! store.resize(buffer, 8)?;
//! assert_eq!(store.get(buffer)?, b"Hello\0\0\0");
//! assert!(store.dispose(buffer));
//! assert!(store.get(buffer).is_err());
//! # Ok::<(), rsrcfork::Error>(())
//! ```

use std::fmt;

use slab::Slab;

use crate::{Error, Result};

/// Opaque, stable reference to a buffer held in a [`BufferStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferRef(usize);

impl BufferRef {
    /// Returns the raw slab index behind this reference.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BufferRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Slab-backed store of byte buffers with an optional total byte budget.
#[derive(Debug, Default)]
pub struct BufferStore {
    buffers: Slab<Vec<u8>>,
    budget: Option<usize>,
    allocated: usize,
}

impl BufferStore {
    /// Creates an empty store without a budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses to hold more than `budget` payload bytes in total.
    #[must_use]
    pub fn with_budget(budget: usize) -> Self {
        BufferStore {
            budget: Some(budget),
            ..Self::default()
        }
    }

    /// Allocates a zero-filled buffer of `size` bytes.
    ///
    /// # Errors
    /// Returns [`Error::OutOfMemory`] if the budget would be exceeded or the allocator fails.
    pub fn allocate(&mut self, size: usize) -> Result<BufferRef> {
        let mut data = Self::reserve(size)?;
        self.charge(size)?;
        data.resize(size, 0);

        Ok(BufferRef(self.buffers.insert(data)))
    }

    /// Allocates a buffer holding a copy of `bytes`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfMemory`] if the budget would be exceeded or the allocator fails.
    pub fn allocate_from(&mut self, bytes: &[u8]) -> Result<BufferRef> {
        let mut data = Self::reserve(bytes.len())?;
        self.charge(bytes.len())?;
        data.extend_from_slice(bytes);

        Ok(BufferRef(self.buffers.insert(data)))
    }

    /// Frees the buffer behind `buffer`. Returns `false` if it was not allocated.
    pub fn dispose(&mut self, buffer: BufferRef) -> bool {
        match self.buffers.try_remove(buffer.0) {
            Some(data) => {
                self.allocated -= data.len();
                true
            }
            None => false,
        }
    }

    /// Grows or shrinks the buffer to `len` bytes. New bytes are zero, the reference is kept.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] for a stale reference and [`Error::OutOfMemory`] if
    /// growing would exceed the budget or the allocator fails. The buffer is unchanged then.
    pub fn resize(&mut self, buffer: BufferRef, len: usize) -> Result<()> {
        let current = self.size_of(buffer)?;
        if len > current {
            let grow = len - current;
            if self.exceeds_budget(grow) {
                return Err(Error::OutOfMemory { requested: len });
            }

            let data = self.slot_mut(buffer)?;
            data.try_reserve_exact(grow)
                .map_err(|_| Error::OutOfMemory { requested: len })?;
            data.resize(len, 0);
            self.allocated += grow;
        } else {
            self.slot_mut(buffer)?.truncate(len);
            self.allocated -= current - len;
        }

        Ok(())
    }

    /// Returns the current length of the buffer.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] for a stale reference.
    pub fn size_of(&self, buffer: BufferRef) -> Result<usize> {
        Ok(self.get(buffer)?.len())
    }

    /// Returns the bytes behind `buffer`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] for a stale reference.
    pub fn get(&self, buffer: BufferRef) -> Result<&[u8]> {
        self.buffers
            .get(buffer.0)
            .map(Vec::as_slice)
            .ok_or(Error::InvalidBuffer(buffer))
    }

    /// Returns the bytes behind `buffer` for in-place modification.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] for a stale reference.
    pub fn get_mut(&mut self, buffer: BufferRef) -> Result<&mut [u8]> {
        Ok(self.slot_mut(buffer)?.as_mut_slice())
    }

    /// Returns true if `buffer` refers to a live allocation.
    #[must_use]
    pub fn contains(&self, buffer: BufferRef) -> bool {
        self.buffers.contains(buffer.0)
    }

    /// Number of live buffers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Returns true if no buffer is allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Total payload bytes currently held.
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.allocated
    }

    /// The configured budget, if any.
    #[must_use]
    pub fn budget(&self) -> Option<usize> {
        self.budget
    }

    fn slot_mut(&mut self, buffer: BufferRef) -> Result<&mut Vec<u8>> {
        self.buffers
            .get_mut(buffer.0)
            .ok_or(Error::InvalidBuffer(buffer))
    }

    fn reserve(size: usize) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory { requested: size })?;
        Ok(data)
    }

    fn exceeds_budget(&self, additional: usize) -> bool {
        match self.budget {
            Some(budget) => self
                .allocated
                .checked_add(additional)
                .map_or(true, |total| total > budget),
            None => false,
        }
    }

    fn charge(&mut self, size: usize) -> Result<()> {
        if self.exceeds_budget(size) {
            return Err(Error::OutOfMemory { requested: size });
        }

        self.allocated += size;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_dispose() {
        let mut store = BufferStore::new();
        let first = store.allocate(4).unwrap();
        let second = store.allocate_from(b"World").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(first).unwrap(), &[0, 0, 0, 0]);
        assert_eq!(store.get(second).unwrap(), b"World");
        assert_eq!(store.allocated_bytes(), 9);

        assert!(store.dispose(first));
        assert!(!store.dispose(first));
        assert!(matches!(store.get(first), Err(Error::InvalidBuffer(r)) if r == first));
        assert_eq!(store.allocated_bytes(), 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn resize_keeps_reference() {
        let mut store = BufferStore::new();
        let buffer = store.allocate_from(&[1, 2, 3]).unwrap();

        store.resize(buffer, 5).unwrap();
        assert_eq!(store.get(buffer).unwrap(), &[1, 2, 3, 0, 0]);
        assert_eq!(store.allocated_bytes(), 5);

        store.resize(buffer, 1).unwrap();
        assert_eq!(store.get(buffer).unwrap(), &[1]);
        assert_eq!(store.size_of(buffer).unwrap(), 1);
        assert_eq!(store.allocated_bytes(), 1);

        store.get_mut(buffer).unwrap()[0] = 0xAA;
        assert_eq!(store.get(buffer).unwrap(), &[0xAA]);
    }

    #[test]
    fn budget() {
        let mut store = BufferStore::with_budget(8);
        let buffer = store.allocate(6).unwrap();

        assert!(matches!(
            store.allocate(3),
            Err(Error::OutOfMemory { requested: 3 })
        ));
        assert!(matches!(
            store.resize(buffer, 9),
            Err(Error::OutOfMemory { requested: 9 })
        ));
        assert_eq!(store.size_of(buffer).unwrap(), 6);

        store.resize(buffer, 8).unwrap();
        assert!(store.allocate(0).is_ok());
        assert_eq!(store.budget(), Some(8));
    }

    #[test]
    fn stale_reference() {
        let mut store = BufferStore::new();
        let buffer = store.allocate(1).unwrap();
        store.dispose(buffer);

        assert!(!store.contains(buffer));
        assert!(store.resize(buffer, 2).is_err());
        assert!(store.get_mut(buffer).is_err());
        assert_eq!(buffer.to_string(), format!("#{}", buffer.index()));
    }
}
