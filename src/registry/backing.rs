//! Storage behind an open resource file.
//!
//! A registry entry is either backed by a file on disk, kept open for the lifetime of the
//! entry, or by a byte vector for forks that were handed over in memory. `update` writes
//! the re-encoded image through [`Backing::write`]; `redirect` swaps the file for another
//! one through [`Backing::redirect`].

use std::{
    fs::{self, OpenOptions},
    io::{self, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use log::warn;
use tempfile::NamedTempFile;

use crate::{file::MappedFile, Error, Result};

pub(crate) enum Backing {
    File {
        handle: fs::File,
        path: PathBuf,
        writable: bool,
    },
    Memory {
        data: Vec<u8>,
    },
}

impl Backing {
    /// Opens `path` read-write, falling back to read-only. With `read_only` set only the
    /// read-only attempt is made.
    pub(crate) fn open(path: &Path, read_only: bool) -> Result<Backing> {
        if !read_only {
            match OpenOptions::new().read(true).write(true).open(path) {
                Ok(handle) => {
                    return Ok(Backing::File {
                        handle,
                        path: path.to_path_buf(),
                        writable: true,
                    })
                }
                Err(error) => warn!(
                    "Opening {} read-write failed ({error}), retrying read-only",
                    path.display()
                ),
            }
        }

        match fs::File::open(path) {
            Ok(handle) => Ok(Backing::File {
                handle,
                path: path.to_path_buf(),
                writable: false,
            }),
            Err(source) => Err(Error::FileNotFound {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub(crate) fn memory(data: Vec<u8>) -> Backing {
        Backing::Memory { data }
    }

    /// Runs `f` over the current contents: a memory map for files, the buffer itself for
    /// in-memory forks.
    pub(crate) fn with_image<R>(&self, f: impl FnOnce(&[u8]) -> Result<R>) -> Result<R> {
        match self {
            Backing::File { handle, .. } => {
                let mapped = MappedFile::from_std_file(handle)?;
                f(mapped.data())
            }
            Backing::Memory { data } => f(data),
        }
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        match self {
            Backing::File { path, .. } => Some(path),
            Backing::Memory { .. } => None,
        }
    }

    pub(crate) fn bytes(&self) -> Option<&[u8]> {
        match self {
            Backing::File { .. } => None,
            Backing::Memory { data } => Some(data),
        }
    }

    pub(crate) fn is_writable(&self) -> bool {
        match self {
            Backing::File { writable, .. } => *writable,
            Backing::Memory { .. } => true,
        }
    }

    /// Replaces the contents with `bytes`.
    ///
    /// With `atomic` set the image goes to a temporary file in the same directory, which is
    /// then renamed over the target and becomes the new handle; otherwise the open handle is
    /// truncated and rewritten. Every failure is reported as [`Error::WriteFailed`], and the
    /// handle is only replaced once the rename has succeeded.
    pub(crate) fn write(&mut self, bytes: &[u8], atomic: bool) -> Result<()> {
        match self {
            Backing::Memory { data } => {
                data.clear();
                data.extend_from_slice(bytes);
                Ok(())
            }
            Backing::File { writable: false, path, .. } => Err(Error::WriteFailed(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is open read-only", path.display()),
            ))),
            Backing::File { handle, path, .. } => {
                if atomic {
                    *handle = replace_atomic(handle, path, bytes).map_err(Error::WriteFailed)?;
                } else {
                    rewrite_in_place(handle, bytes).map_err(Error::WriteFailed)?;
                }
                Ok(())
            }
        }
    }

    /// Opens `path` read-write, creating it if needed, and makes it the new backing.
    ///
    /// The current backing is only released once the new file is open.
    pub(crate) fn redirect(&mut self, path: &Path) -> Result<()> {
        let handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| Error::FileNotFound {
                path: path.to_path_buf(),
                source,
            })?;

        *self = Backing::File {
            handle,
            path: path.to_path_buf(),
            writable: true,
        };
        Ok(())
    }
}

fn replace_atomic(handle: &fs::File, path: &Path, bytes: &[u8]) -> io::Result<fs::File> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(directory)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), handle.metadata()?.permissions())?;

    // The temporary file's own read-write handle follows it through the rename
    temp.persist(path).map_err(|error| error.error)
}

fn rewrite_in_place(handle: &mut fs::File, bytes: &[u8]) -> io::Result<()> {
    handle.set_len(0)?;
    handle.seek(SeekFrom::Start(0))?;
    handle.write_all(bytes)?;
    handle.flush()?;
    handle.sync_all()
}
