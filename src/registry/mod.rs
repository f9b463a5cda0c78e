//! The set of open resource files and the operations that search them.
//!
//! [`ResourceFileRegistry`] is an explicit context object: it owns every decoded
//! [`ResourceMap`], the [`BufferStore`] holding their payloads, and the [`TypeDirectory`]
//! counting type codes across files. Files are kept most recently opened first; that order
//! is the search order of [`ResourceFileRegistry::get_resource`] after the current file.
//!
//! # Lifecycle
//!
//! - [`ResourceFileRegistry::open`] decodes a file completely, registers it at the front
//!   and makes it current
//! - lookups hand out [`BufferRef`]s into the registry's store, valid until the owning file
//!   is closed
//! - [`ResourceFileRegistry::update`] re-encodes a file's map and writes it back
//! - [`ResourceFileRegistry::close`] disposes every payload and releases the file's types
//!
//! # Examples
//!
//! ```rust,no_run
//! use rsrcfork::{ResType, ResourceFileRegistry};
//!
//! let mut registry = ResourceFileRegistry::new();
//! let file = registry.open("Example.rsrc")?;
//!
//! let text = ResType::from_bytes(*b"TEXT");
//! let payload = registry.get_resource(text, 128)?;
//! println!("{} bytes", registry.payload(payload)?.len());
//!
//! registry.payload_mut(payload)?[0] = b'X';
//! registry.changed_resource(payload)?;
//! registry.update(file)?;
//! registry.close(file)?;
//! # Ok::<(), rsrcfork::Error>(())
//! ```

mod backing;
mod config;
mod directory;
mod shared;

pub use config::RegistryConfig;
pub use directory::TypeDirectory;
pub use shared::SharedRegistry;

use std::{collections::VecDeque, fmt, path::Path};

use log::{debug, warn};

use crate::{
    buffer::{BufferRef, BufferStore},
    codec,
    resources::{
        FileAttributes, ResType, ResourceAttributes, ResourceEntry, ResourceMap, ResourceName,
    },
    Error, Result,
};
use backing::Backing;

/// Reference number identifying an open resource file.
///
/// Numbers start at 1 and increase with every successful open; they are never reused while
/// the registry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefNum(i16);

impl RefNum {
    pub(crate) const fn new(value: i16) -> Self {
        RefNum(value)
    }

    /// The numeric value.
    #[must_use]
    pub const fn value(self) -> i16 {
        self.0
    }
}

impl fmt::Display for RefNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RefNum> for i16 {
    fn from(ref_num: RefNum) -> Self {
        ref_num.0
    }
}

/// Identity and metadata of a resource, as reported by
/// [`ResourceFileRegistry::resource_info`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// The file holding the resource
    pub file: RefNum,
    /// Type code
    pub res_type: ResType,
    /// Resource ID
    pub id: i16,
    /// Name, if any
    pub name: Option<ResourceName>,
    /// Attribute byte
    pub attributes: ResourceAttributes,
}

struct OpenFile {
    ref_num: RefNum,
    map: ResourceMap,
    backing: Backing,
}

/// Registry of open resource files.
pub struct ResourceFileRegistry {
    files: VecDeque<OpenFile>,
    current: Option<RefNum>,
    directory: TypeDirectory,
    store: BufferStore,
    next_ref: Option<i16>,
    config: RegistryConfig,
}

impl Default for ResourceFileRegistry {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl fmt::Debug for ResourceFileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceFileRegistry")
            .field("files", &self.files().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("types", &self.directory.len())
            .field("buffers", &self.store.len())
            .finish()
    }
}

impl ResourceFileRegistry {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        let store = match config.buffer_budget {
            Some(budget) => BufferStore::with_budget(budget),
            None => BufferStore::new(),
        };

        ResourceFileRegistry {
            files: VecDeque::new(),
            current: None,
            directory: TypeDirectory::new(),
            store,
            next_ref: Some(1),
            config,
        }
    }

    /// The configuration this registry was created with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Opens and decodes the resource file at `path` and makes it the current file.
    ///
    /// The file is opened read-write when possible and read-only otherwise. Nothing is
    /// registered if decoding fails.
    ///
    /// # Errors
    /// - [`Error::FileNotFound`] if the file cannot be opened at all
    /// - [`Error::TruncatedFile`], [`Error::Malformed`] if the contents do not decode
    /// - [`Error::OutOfMemory`] if a payload cannot be stored
    /// - [`Error::TooManyFiles`] if every reference number has been used
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<RefNum> {
        let path = path.as_ref();
        let backing = Backing::open(path, self.config.read_only)?;
        self.attach(backing)
    }

    /// Decodes a resource fork held in memory and makes it the current file.
    ///
    /// [`ResourceFileRegistry::update`] writes back into the same buffer, available through
    /// [`ResourceFileRegistry::file_bytes`].
    ///
    /// # Errors
    /// Same as [`ResourceFileRegistry::open`], except for [`Error::FileNotFound`].
    pub fn open_mem(&mut self, data: Vec<u8>) -> Result<RefNum> {
        self.attach(Backing::memory(data))
    }

    fn attach(&mut self, backing: Backing) -> Result<RefNum> {
        let value = self.next_ref.ok_or(Error::TooManyFiles)?;
        let ref_num = RefNum(value);

        let store = &mut self.store;
        let map = backing.with_image(|bytes| codec::decode(bytes, store))?;

        for res_type in map.type_codes() {
            self.directory.retain(res_type);
        }

        debug!(
            "Opened {} as {}: {} types, {} resources{}",
            backing
                .path()
                .map_or_else(|| "memory".to_string(), |p| p.display().to_string()),
            ref_num,
            map.count_types(),
            map.resource_count(),
            if backing.is_writable() { "" } else { ", read-only" }
        );

        self.files.push_front(OpenFile {
            ref_num,
            map,
            backing,
        });
        self.current = Some(ref_num);
        self.next_ref = value.checked_add(1);

        Ok(ref_num)
    }

    /// Closes a file: its payload buffers are disposed and its types released.
    ///
    /// If the file was current, the next file in registry order becomes current, or none if
    /// it was the last one.
    ///
    /// # Errors
    /// Returns [`Error::FileNotOpen`] if `ref_num` is not open.
    pub fn close(&mut self, ref_num: RefNum) -> Result<()> {
        let position = self.position(ref_num)?;
        let Some(file) = self.files.remove(position) else {
            return Err(Error::FileNotOpen(ref_num));
        };

        for res_type in file.map.type_codes() {
            self.directory.release(res_type);
        }

        if self.current == Some(ref_num) {
            self.current = self.files.get(position).map(|f| f.ref_num);
        }

        debug!(
            "Closed {}: released {} resources",
            ref_num,
            file.map.resource_count()
        );
        file.map.dispose(&mut self.store);

        Ok(())
    }

    /// Makes `ref_num` the current file.
    ///
    /// For an unknown reference number the head of the registry becomes current, unless
    /// [`RegistryConfig::strict_use_file`] is set.
    ///
    /// # Errors
    /// Returns [`Error::FileNotOpen`] for an unknown reference number in strict mode.
    pub fn use_file(&mut self, ref_num: RefNum) -> Result<()> {
        if self.contains(ref_num) {
            self.current = Some(ref_num);
            return Ok(());
        }

        if self.config.strict_use_file {
            return Err(Error::FileNotOpen(ref_num));
        }

        self.current = self.files.front().map(|f| f.ref_num);
        warn!(
            "Resource file {} is not open, using {} instead",
            ref_num,
            self.current
                .map_or_else(|| "none".to_string(), |r| r.to_string())
        );
        Ok(())
    }

    /// The current file.
    #[must_use]
    pub fn current(&self) -> Option<RefNum> {
        self.current
    }

    /// Open files, most recently opened first.
    pub fn files(&self) -> impl Iterator<Item = RefNum> + '_ {
        self.files.iter().map(|f| f.ref_num)
    }

    /// Returns true if `ref_num` is open.
    #[must_use]
    pub fn contains(&self, ref_num: RefNum) -> bool {
        self.files.iter().any(|f| f.ref_num == ref_num)
    }

    /// The decoded map of an open file.
    ///
    /// # Errors
    /// Returns [`Error::FileNotOpen`] if `ref_num` is not open.
    pub fn resource_map(&self, ref_num: RefNum) -> Result<&ResourceMap> {
        Ok(&self.file(ref_num)?.map)
    }

    /// The path an open file is backed by, `None` for in-memory files.
    ///
    /// # Errors
    /// Returns [`Error::FileNotOpen`] if `ref_num` is not open.
    pub fn path(&self, ref_num: RefNum) -> Result<Option<&Path>> {
        Ok(self.file(ref_num)?.backing.path())
    }

    /// The bytes behind an in-memory file, `None` for files on disk.
    ///
    /// # Errors
    /// Returns [`Error::FileNotOpen`] if `ref_num` is not open.
    pub fn file_bytes(&self, ref_num: RefNum) -> Result<Option<&[u8]>> {
        Ok(self.file(ref_num)?.backing.bytes())
    }

    /// The open file holding `payload`.
    #[must_use]
    pub fn find_owner(&self, payload: BufferRef) -> Option<RefNum> {
        self.files
            .iter()
            .find(|f| f.map.find_payload(payload).is_some())
            .map(|f| f.ref_num)
    }

    /// The open file holding `payload`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if no open file holds `payload`.
    pub fn home_file(&self, payload: BufferRef) -> Result<RefNum> {
        self.find_owner(payload).ok_or(Error::InvalidBuffer(payload))
    }

    /// Looks up a resource in one file only.
    ///
    /// # Errors
    /// - [`Error::FileNotOpen`] if `ref_num` is not open
    /// - [`Error::ResourceNotFound`] if the file has no such resource
    pub fn get_resource_in(
        &self,
        ref_num: RefNum,
        res_type: ResType,
        id: i16,
    ) -> Result<BufferRef> {
        self.file(ref_num)?
            .map
            .find(res_type, id)
            .map(|entry| entry.payload)
            .ok_or(Error::ResourceNotFound { res_type, id })
    }

    /// Looks up a resource in the current file, then in the other open files, most recently
    /// opened first.
    ///
    /// # Errors
    /// Returns [`Error::ResourceNotFound`] if no open file has the resource.
    pub fn get_resource(&self, res_type: ResType, id: i16) -> Result<BufferRef> {
        self.search_order()
            .find_map(|f| f.map.find(res_type, id))
            .map(|entry| entry.payload)
            .ok_or(Error::ResourceNotFound { res_type, id })
    }

    /// Looks up a resource by name in one file only, ignoring case.
    ///
    /// # Errors
    /// - [`Error::FileNotOpen`] if `ref_num` is not open
    /// - [`Error::NamedResourceNotFound`] if the file has no such resource
    pub fn get_named_resource_in(
        &self,
        ref_num: RefNum,
        res_type: ResType,
        name: &str,
    ) -> Result<BufferRef> {
        self.file(ref_num)?
            .map
            .find_named(res_type, name)
            .map(|entry| entry.payload)
            .ok_or_else(|| Error::NamedResourceNotFound {
                res_type,
                name: name.to_string(),
            })
    }

    /// Looks up a resource by name in the same order as [`ResourceFileRegistry::get_resource`].
    ///
    /// # Errors
    /// Returns [`Error::NamedResourceNotFound`] if no open file has the resource.
    pub fn get_named_resource(&self, res_type: ResType, name: &str) -> Result<BufferRef> {
        self.search_order()
            .find_map(|f| f.map.find_named(res_type, name))
            .map(|entry| entry.payload)
            .ok_or_else(|| Error::NamedResourceNotFound {
                res_type,
                name: name.to_string(),
            })
    }

    /// Number of distinct types across all open files.
    #[must_use]
    pub fn count_types(&self) -> usize {
        self.directory.len()
    }

    /// Number of types in one file, 0 if it is not open.
    #[must_use]
    pub fn count_types_in(&self, ref_num: RefNum) -> usize {
        self.file(ref_num).map_or(0, |f| f.map.count_types())
    }

    /// Number of resources of `res_type` across all open files.
    #[must_use]
    pub fn count_resources(&self, res_type: ResType) -> usize {
        self.files
            .iter()
            .map(|f| f.map.count_resources(res_type))
            .sum()
    }

    /// Number of resources of `res_type` in one file, 0 if the file or type is absent.
    #[must_use]
    pub fn count_resources_in(&self, ref_num: RefNum, res_type: ResType) -> usize {
        self.file(ref_num)
            .map_or(0, |f| f.map.count_resources(res_type))
    }

    /// The type at `index` among all open files' types, in code order.
    #[must_use]
    pub fn ind_type(&self, index: usize) -> Option<ResType> {
        self.directory.get(index)
    }

    /// The type at `index` in one file's type table.
    #[must_use]
    pub fn ind_type_in(&self, ref_num: RefNum, index: usize) -> Option<ResType> {
        let file = self.file(ref_num).ok()?;
        file.map.types.get(index).map(|t| t.res_type)
    }

    /// The resource at `index` among one file's resources of `res_type`.
    #[must_use]
    pub fn ind_resource_in(
        &self,
        ref_num: RefNum,
        res_type: ResType,
        index: usize,
    ) -> Option<BufferRef> {
        let file = self.file(ref_num).ok()?;
        let entry = file.map.type_entry(res_type)?.entries.get(index)?;
        Some(entry.payload)
    }

    /// Number of open files holding `res_type`.
    #[must_use]
    pub fn type_retain_count(&self, res_type: ResType) -> usize {
        self.directory.retain_count(res_type)
    }

    /// Type, ID, name and attributes of the resource holding `payload`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if no open file holds `payload`.
    pub fn resource_info(&self, payload: BufferRef) -> Result<ResourceInfo> {
        for file in &self.files {
            if let Some((res_type, entry)) = file.map.find_payload(payload) {
                return Ok(ResourceInfo {
                    file: file.ref_num,
                    res_type,
                    id: entry.id,
                    name: entry.name.clone(),
                    attributes: entry.attributes,
                });
            }
        }

        Err(Error::InvalidBuffer(payload))
    }

    /// Attributes of the resource holding `payload`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if no open file holds `payload`.
    pub fn resource_attributes(&self, payload: BufferRef) -> Result<ResourceAttributes> {
        Ok(self.resource_info(payload)?.attributes)
    }

    /// Replaces the attributes of the resource holding `payload`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if no open file holds `payload`.
    pub fn set_resource_attributes(
        &mut self,
        payload: BufferRef,
        attributes: ResourceAttributes,
    ) -> Result<()> {
        let (_, _, entry) = self.entry_mut(payload)?;
        entry.attributes = attributes;
        Ok(())
    }

    /// Changes the ID and name of the resource holding `payload`.
    ///
    /// # Errors
    /// - [`Error::InvalidBuffer`] if no open file holds `payload`
    /// - [`Error::Malformed`] if another resource of the same type in the same file already
    ///   uses `id`
    pub fn set_resource_info(
        &mut self,
        payload: BufferRef,
        id: i16,
        name: Option<ResourceName>,
    ) -> Result<()> {
        let (map, res_type) = {
            let ref_num = self.home_file(payload)?;
            let file = self.file_mut(ref_num)?;
            let res_type = file
                .map
                .find_payload(payload)
                .map(|(res_type, _)| res_type)
                .ok_or(Error::InvalidBuffer(payload))?;
            (&mut file.map, res_type)
        };

        if map
            .find(res_type, id)
            .is_some_and(|other| other.payload != payload)
        {
            return Err(malformed_error!("Resource '{}' {} already exists", res_type, id));
        }

        if let Some((_, entry)) = map.find_payload_mut(payload) {
            entry.id = id;
            entry.name = name;
        }
        Ok(())
    }

    /// Marks the resource holding `payload` and its file as changed.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if no open file holds `payload`.
    pub fn changed_resource(&mut self, payload: BufferRef) -> Result<()> {
        let (file_attributes, _, entry) = self.entry_mut(payload)?;
        entry.attributes.insert(ResourceAttributes::CHANGED);
        file_attributes.insert(FileAttributes::CHANGED);
        Ok(())
    }

    /// Attributes of an open file's map.
    ///
    /// # Errors
    /// Returns [`Error::FileNotOpen`] if `ref_num` is not open.
    pub fn file_attributes(&self, ref_num: RefNum) -> Result<FileAttributes> {
        Ok(self.file(ref_num)?.map.attributes)
    }

    /// Replaces the attributes of an open file's map.
    ///
    /// # Errors
    /// Returns [`Error::FileNotOpen`] if `ref_num` is not open.
    pub fn set_file_attributes(
        &mut self,
        ref_num: RefNum,
        attributes: FileAttributes,
    ) -> Result<()> {
        self.file_mut(ref_num)?.map.attributes = attributes;
        Ok(())
    }

    /// The bytes of a payload.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if `payload` has been disposed.
    pub fn payload(&self, payload: BufferRef) -> Result<&[u8]> {
        self.store.get(payload)
    }

    /// The bytes of a payload, for in-place modification.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if `payload` has been disposed.
    pub fn payload_mut(&mut self, payload: BufferRef) -> Result<&mut [u8]> {
        self.store.get_mut(payload)
    }

    /// Grows or shrinks a payload; the reference stays valid.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if `payload` has been disposed and
    /// [`Error::OutOfMemory`] if it cannot grow.
    pub fn resize_payload(&mut self, payload: BufferRef, len: usize) -> Result<()> {
        self.store.resize(payload, len)
    }

    /// The store holding every payload.
    #[must_use]
    pub fn store(&self) -> &BufferStore {
        &self.store
    }

    /// Re-encodes a file's map and writes it to its backing storage.
    ///
    /// Reference number and current file are unchanged. On success the `CHANGED` flags of
    /// the map and its resources are cleared; on failure nothing in memory changes.
    ///
    /// # Errors
    /// - [`Error::FileNotOpen`] if `ref_num` is not open
    /// - [`Error::WriteFailed`] if writing fails, including for files opened read-only
    /// - [`Error::Malformed`] if the map no longer fits the format
    pub fn update(&mut self, ref_num: RefNum) -> Result<()> {
        let position = self.position(ref_num)?;
        let file = &mut self.files[position];

        // The written image carries no CHANGED flags; the live map keeps them until the
        // write succeeds
        let mut image = file.map.clone();
        image.clear_changed();
        let bytes = codec::encode(&image, &self.store)?;
        file.backing.write(&bytes, self.config.atomic_update)?;
        file.map = image;

        debug!(
            "Updated {} ({} bytes{})",
            ref_num,
            bytes.len(),
            file.backing
                .path()
                .map_or_else(String::new, |p| format!(" to {}", p.display()))
        );
        Ok(())
    }

    /// Points an open file at a new path for later updates; the map is not re-read.
    ///
    /// The new file is opened read-write and created if missing. Its contents only change
    /// on the next [`ResourceFileRegistry::update`].
    ///
    /// # Errors
    /// - [`Error::FileNotOpen`] if `ref_num` is not open
    /// - [`Error::FileNotFound`] if the new file cannot be opened; the old backing is kept
    pub fn redirect(&mut self, ref_num: RefNum, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.file_mut(ref_num)?.backing.redirect(path)?;
        debug!("Redirected {} to {}", ref_num, path.display());
        Ok(())
    }

    fn position(&self, ref_num: RefNum) -> Result<usize> {
        self.files
            .iter()
            .position(|f| f.ref_num == ref_num)
            .ok_or(Error::FileNotOpen(ref_num))
    }

    fn file(&self, ref_num: RefNum) -> Result<&OpenFile> {
        self.files
            .iter()
            .find(|f| f.ref_num == ref_num)
            .ok_or(Error::FileNotOpen(ref_num))
    }

    fn file_mut(&mut self, ref_num: RefNum) -> Result<&mut OpenFile> {
        self.files
            .iter_mut()
            .find(|f| f.ref_num == ref_num)
            .ok_or(Error::FileNotOpen(ref_num))
    }

    fn entry_mut(
        &mut self,
        payload: BufferRef,
    ) -> Result<(&mut FileAttributes, ResType, &mut ResourceEntry)> {
        for file in &mut self.files {
            let ResourceMap {
                attributes, types, ..
            } = &mut file.map;

            for type_entry in types.iter_mut() {
                let res_type = type_entry.res_type;
                if let Some(entry) = type_entry.entries.iter_mut().find(|e| e.payload == payload) {
                    return Ok((attributes, res_type, entry));
                }
            }
        }

        Err(Error::InvalidBuffer(payload))
    }

    fn search_order(&self) -> impl Iterator<Item = &OpenFile> + '_ {
        let current = self.current;
        let first = current.and_then(|r| self.files.iter().find(|f| f.ref_num == r));
        first
            .into_iter()
            .chain(self.files.iter().filter(move |f| Some(f.ref_num) != current))
    }
}
