// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # rsrcfork
//!
//! Reader and writer for classic Macintosh resource forks.
//!
//! A resource fork is a single binary container: a 256-byte header, a data segment of
//! length-prefixed blobs and a map that addresses every blob by a four-character type code
//! plus a 16-bit ID, or by name. `rsrcfork` decodes such a file completely into memory,
//! lets callers look up, inspect and edit resources, and re-encodes the result into a file
//! that decodes back to the same resources.
//!
//! ## Features
//!
//! - **Complete codec** - Every offset base, the minus-one counts and the packed
//!   attribute/offset word of the on-disk format, in both directions
//! - **Registry of open files** - Search order, current file, type enumeration across files
//! - **Stable payload references** - Payloads live in an arena and keep their reference
//!   across resizes until the owning file is closed
//! - **Safe updates** - Updates go through a temporary file and a rename by default
//! - **Classic result codes** - [`Error::os_err`] maps every error onto its Resource Manager
//!   or Memory Manager code
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rsrcfork::prelude::*;
//!
//! let mut registry = ResourceFileRegistry::new();
//! let file = registry.open("Example.rsrc")?;
//!
//! for index in 0..registry.count_types_in(file) {
//!     let Some(res_type) = registry.ind_type_in(file, index) else { continue };
//!     println!("'{}': {} resources", res_type, registry.count_resources_in(file, res_type));
//! }
//!
//! let text = registry.get_resource(ResType::from_bytes(*b"TEXT"), 128)?;
//! println!("{}", String::from_utf8_lossy(registry.payload(text)?));
//!
//! registry.close(file)?;
//! # Ok::<(), rsrcfork::Error>(())
//! ```
//!
//! ## Working without files
//!
//! The codec can be used on its own. [`codec::encode`] and [`codec::decode`] convert between
//! a [`ResourceMap`] and bytes; payloads are kept in a [`BufferStore`].
//!
//! ```rust
//! use rsrcfork::prelude::*;
//!
//! let mut store = BufferStore::new();
//! let mut map = ResourceMap::new();
//! let str_type = ResType::from_bytes(*b"STR ");
//!
//! let hello = store.allocate_from(b"Hello")?;
//! map.insert(str_type, ResourceEntry::new(1, hello).with_name("Greeting".parse()?))?;
//!
//! let bytes = codec::encode(&map, &store)?;
//! let decoded = codec::decode(&bytes, &mut store)?;
//! assert_eq!(decoded.count_resources(str_type), 1);
//! # Ok::<(), rsrcfork::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. Lookup misses are reported as
//! [`Error::ResourceNotFound`] or [`Error::NamedResourceNotFound`] and never change the
//! registry; [`Error::is_not_found`] tells them apart from real failures.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;
pub(crate) mod buffer;
pub(crate) mod file;
pub(crate) mod registry;
pub(crate) mod resources;

#[cfg(test)]
pub(crate) mod test;

pub mod codec;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

/// `rsrcfork` Result type
pub type Result<T> = std::result::Result<T, Error>;

/// `rsrcfork` Error type
pub use error::Error;

/// Byte buffers holding resource payloads
pub use buffer::{BufferRef, BufferStore};

/// Raw input access
pub use file::parser::Parser;

/// The in-memory model of a resource fork
pub use resources::{
    FileAttributes, ResType, ResourceAttributes, ResourceEntry, ResourceMap, ResourceName,
    TypeEntry, APP_DATA_LEN, MAX_NAME_LEN,
};

/// The registry of open resource files
pub use registry::{
    RefNum, RegistryConfig, ResourceFileRegistry, ResourceInfo, SharedRegistry, TypeDirectory,
};
