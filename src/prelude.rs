//! # rsrcfork Prelude
//!
//! Imports the types needed for most work with resource files.
//!
//! ```rust
//! use rsrcfork::prelude::*;
//!
//! let registry = ResourceFileRegistry::with_config(RegistryConfig::read_only());
//! assert_eq!(registry.count_types(), 0);
//! ```

pub use crate::Error;

pub use crate::Result;

pub use crate::codec;

pub use crate::{BufferRef, BufferStore};

pub use crate::Parser;

pub use crate::{
    FileAttributes, ResType, ResourceAttributes, ResourceEntry, ResourceMap, ResourceName,
    TypeEntry,
};

pub use crate::{
    RefNum, RegistryConfig, ResourceFileRegistry, ResourceInfo, SharedRegistry, TypeDirectory,
};
