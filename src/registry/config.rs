//! Behaviour switches for a [`crate::ResourceFileRegistry`].
//!
//! # Presets
//!
//! - [`RegistryConfig::default`] - Read-write opens, atomic updates, legacy `use_file`
//! - [`RegistryConfig::strict`] - Like the default, but `use_file` rejects unknown files
//! - [`RegistryConfig::read_only`] - Never opens files for writing
//!
//! # Examples
//!
//! ```rust
//! use rsrcfork::{RegistryConfig, ResourceFileRegistry};
//!
//! let config = RegistryConfig {
//!     buffer_budget: Some(64 * 1024 * 1024),
//!     ..RegistryConfig::strict()
//! };
//! let registry = ResourceFileRegistry::with_config(config);
//! assert!(registry.config().strict_use_file);
//! ```

/// Configuration of a [`crate::ResourceFileRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Open files read-only right away instead of trying read-write first.
    pub read_only: bool,

    /// Write updates to a temporary file next to the target and rename it over the target.
    ///
    /// When disabled the backing file is truncated and rewritten in place; a failed write
    /// leaves it in an indeterminate state.
    pub atomic_update: bool,

    /// Make `use_file` fail with [`crate::Error::FileNotOpen`] for an unknown reference
    /// number. When disabled the head of the registry becomes current instead.
    pub strict_use_file: bool,

    /// Upper bound for the total payload bytes held by the registry's buffer store.
    pub buffer_budget: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            atomic_update: true,
            strict_use_file: false,
            buffer_budget: None,
        }
    }
}

impl RegistryConfig {
    /// Default configuration with strict reference number checks in `use_file`.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_use_file: true,
            ..Self::default()
        }
    }

    /// Configuration for inspecting files without ever writing to them.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }
}
