//! Memory-mapped view of an open resource file.
//!
//! The map is read-only and lives only as long as a decode. Every mutation goes through the
//! registry's in-memory model and is re-emitted by `update`.

use std::fs;

use memmap2::Mmap;

use crate::Result;

/// A read-only memory map of an open file.
///
/// Empty files cannot be mapped and are represented without one.
#[derive(Debug)]
pub(crate) struct MappedFile {
    map: Option<Mmap>,
}

impl MappedFile {
    /// Maps an already opened handle.
    ///
    /// The registry keeps the handle it opened (read-write when possible) and maps a view of
    /// it here.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the metadata cannot be read or mapping fails.
    pub(crate) fn from_std_file(handle: &fs::File) -> Result<MappedFile> {
        if handle.metadata()?.len() == 0 {
            return Ok(MappedFile { map: None });
        }

        // Safety: the map is only read during decode and dropped right after; a concurrent
        // truncation by another process is outside of what a resource file reader can guard.
        let map = unsafe { Mmap::map(handle) }?;
        Ok(MappedFile { map: Some(map) })
    }

    pub(crate) fn data(&self) -> &[u8] {
        self.map.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn maps_handle() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(&[0x00, 0x00, 0x01, 0x00, 0xAA, 0xBB]).unwrap();
        temp.flush().unwrap();

        let handle = temp.reopen().unwrap();
        let mapped = MappedFile::from_std_file(&handle).unwrap();
        assert_eq!(mapped.data(), &[0x00, 0x00, 0x01, 0x00, 0xAA, 0xBB]);
    }

    #[test]
    fn empty_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let handle = temp.reopen().unwrap();

        let mapped = MappedFile::from_std_file(&handle).unwrap();
        assert!(mapped.data().is_empty());
    }
}
