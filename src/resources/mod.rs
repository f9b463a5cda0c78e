//! In-memory model of a decoded resource fork.
//!
//! A [`ResourceMap`] is an ordered type table of [`TypeEntry`] values, each holding an
//! ordered list of [`ResourceEntry`] values. Payload bytes are not stored here: each entry
//! carries a [`crate::BufferRef`] into the [`crate::BufferStore`] that decoded it, and the
//! map is responsible for disposing those buffers through [`ResourceMap::dispose`].
//!
//! # Key Components
//!
//! - [`ResType`] - Four-character type code
//! - [`ResourceName`] - Pascal-string name, Mac Roman
//! - [`ResourceAttributes`] / [`FileAttributes`] - Attribute bit flags
//! - [`ResourceEntry`], [`TypeEntry`], [`ResourceMap`] - The type table
//!
//! # Examples
//!
//! ```rust
//! use rsrcfork::{BufferStore, ResType, ResourceEntry, ResourceMap};
//!
//! let mut store = BufferStore::new();
//! let mut map = ResourceMap::new();
//! let str_type = ResType::from_bytes(*b"STR ");
//!
//! let payload = store.allocate_from(b"Hello")?;
//! map.insert(str_type, ResourceEntry::new(1, payload))?;
//!
//! assert_eq!(map.count_types(), 1);
//! assert_eq!(map.count_resources(str_type), 1);
//! map.dispose(&mut store);
//! assert!(store.is_empty());
//! # Ok::<(), rsrcfork::Error>(())
//! ```

mod attributes;
mod name;
mod types;

pub use attributes::{FileAttributes, ResourceAttributes};
pub use name::{ResourceName, MAX_NAME_LEN};
pub use types::ResType;

use crate::{buffer::BufferRef, BufferStore, Result};

/// Size of the application-owned area at the end of the file header.
pub const APP_DATA_LEN: usize = 128;

/// A single resource: identity within its type, attributes, optional name and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Resource ID, unique within its type
    pub id: i16,
    /// Attribute byte
    pub attributes: ResourceAttributes,
    /// Name, `None` when the reference carries the 0xFFFF marker
    pub name: Option<ResourceName>,
    /// Payload bytes in the buffer store
    pub payload: BufferRef,
}

impl ResourceEntry {
    /// Creates an unnamed entry without attributes.
    #[must_use]
    pub fn new(id: i16, payload: BufferRef) -> Self {
        ResourceEntry {
            id,
            attributes: ResourceAttributes::empty(),
            name: None,
            payload,
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: ResourceName) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the attribute byte.
    #[must_use]
    pub fn with_attributes(mut self, attributes: ResourceAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Returns true if the entry has a name that matches `name`, ignoring case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_ref().is_some_and(|own| own.matches(name))
    }
}

/// All resources of one type, in reference-list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    /// The type code
    pub res_type: ResType,
    /// Resources of this type
    pub entries: Vec<ResourceEntry>,
}

impl TypeEntry {
    /// Creates a type without resources.
    #[must_use]
    pub fn new(res_type: ResType) -> Self {
        TypeEntry {
            res_type,
            entries: Vec::new(),
        }
    }

    /// Finds the resource with `id`.
    #[must_use]
    pub fn find(&self, id: i16) -> Option<&ResourceEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Finds the first resource named `name`, ignoring case.
    #[must_use]
    pub fn find_named(&self, name: &str) -> Option<&ResourceEntry> {
        self.entries.iter().find(|entry| entry.is_named(name))
    }
}

/// The decoded contents of one resource file.
///
/// The registry pairs each map with its reference number and backing storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMap {
    /// File-level attributes
    pub attributes: FileAttributes,
    /// The type table, in on-disk order
    pub types: Vec<TypeEntry>,
    /// Application-owned area of the header, written back unchanged
    pub app_data: [u8; APP_DATA_LEN],
}

impl Default for ResourceMap {
    fn default() -> Self {
        ResourceMap {
            attributes: FileAttributes::empty(),
            types: Vec::new(),
            app_data: [0; APP_DATA_LEN],
        }
    }
}

impl ResourceMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` under `res_type`, creating the type at the end of the table if needed.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the type already holds a resource with the
    /// same ID.
    pub fn insert(&mut self, res_type: ResType, entry: ResourceEntry) -> Result<()> {
        let position = match self.position_of(res_type) {
            Some(position) => position,
            None => {
                self.types.push(TypeEntry::new(res_type));
                self.types.len() - 1
            }
        };

        let type_entry = &mut self.types[position];
        if type_entry.find(entry.id).is_some() {
            return Err(malformed_error!(
                "Duplicate resource '{}' {}",
                res_type,
                entry.id
            ));
        }

        type_entry.entries.push(entry);
        Ok(())
    }

    /// Number of types in the table.
    #[must_use]
    pub fn count_types(&self) -> usize {
        self.types.len()
    }

    /// Number of resources of `res_type`, 0 if the type is absent.
    #[must_use]
    pub fn count_resources(&self, res_type: ResType) -> usize {
        self.type_entry(res_type).map_or(0, |t| t.entries.len())
    }

    /// Total number of resources across all types.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.types.iter().map(|t| t.entries.len()).sum()
    }

    /// The entry for `res_type`.
    #[must_use]
    pub fn type_entry(&self, res_type: ResType) -> Option<&TypeEntry> {
        self.types.iter().find(|t| t.res_type == res_type)
    }

    /// Type codes in table order.
    pub fn type_codes(&self) -> impl Iterator<Item = ResType> + '_ {
        self.types.iter().map(|t| t.res_type)
    }

    /// Finds the resource with `res_type` and `id`.
    #[must_use]
    pub fn find(&self, res_type: ResType, id: i16) -> Option<&ResourceEntry> {
        self.type_entry(res_type)?.find(id)
    }

    /// Finds the first resource of `res_type` named `name`, ignoring case.
    #[must_use]
    pub fn find_named(&self, res_type: ResType, name: &str) -> Option<&ResourceEntry> {
        self.type_entry(res_type)?.find_named(name)
    }

    /// Finds the resource whose payload is `payload`, with its type.
    #[must_use]
    pub fn find_payload(&self, payload: BufferRef) -> Option<(ResType, &ResourceEntry)> {
        self.entries().find(|(_, entry)| entry.payload == payload)
    }

    /// Mutable access to the resource whose payload is `payload`, with its type.
    pub fn find_payload_mut(
        &mut self,
        payload: BufferRef,
    ) -> Option<(ResType, &mut ResourceEntry)> {
        self.types.iter_mut().find_map(|t| {
            let res_type = t.res_type;
            t.entries
                .iter_mut()
                .find(|entry| entry.payload == payload)
                .map(|entry| (res_type, entry))
        })
    }

    /// All resources with their types, in table order.
    pub fn entries(&self) -> impl Iterator<Item = (ResType, &ResourceEntry)> + '_ {
        self.types
            .iter()
            .flat_map(|t| t.entries.iter().map(move |entry| (t.res_type, entry)))
    }

    /// Clears the `CHANGED` flag on the map and on every resource.
    pub fn clear_changed(&mut self) {
        self.attributes.remove(FileAttributes::CHANGED);
        for type_entry in &mut self.types {
            for entry in &mut type_entry.entries {
                entry.attributes.remove(ResourceAttributes::CHANGED);
            }
        }
    }

    /// Releases every payload buffer held by this map.
    pub fn dispose(self, store: &mut BufferStore) {
        for type_entry in self.types {
            for entry in type_entry.entries {
                store.dispose(entry.payload);
            }
        }
    }

    fn position_of(&self, res_type: ResType) -> Option<usize> {
        self.types.iter().position(|t| t.res_type == res_type)
    }
}
