use std::path::PathBuf;

use thiserror::Error;

use crate::{buffer::BufferRef, registry::RefNum, resources::ResType};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! truncated_error {
    ($offset:expr, $needed:expr, $len:expr) => {
        crate::Error::TruncatedFile {
            offset: $offset,
            needed: $needed,
            len: $len,
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Each variant maps onto one of the classic Resource Manager / Memory Manager result codes,
/// available through [`Error::os_err`], so that code which used to poll `ResError()` or
/// `MemError()` can keep reporting the same numbers.
///
/// # Error Categories
///
/// ## Decoding
/// - [`Error::TruncatedFile`] - A header field, map field or payload ran past the end of input
/// - [`Error::Malformed`] - The map is internally inconsistent (duplicate types or IDs, offsets
///   that do not fit their on-disk fields)
///
/// ## Lookup
/// - [`Error::ResourceNotFound`] / [`Error::NamedResourceNotFound`] - Lookup missed
/// - [`Error::FileNotOpen`] - The reference number does not belong to an open file
///
/// ## Storage and I/O
/// - [`Error::FileNotFound`] - The file could neither be opened read-write nor read-only
/// - [`Error::OutOfMemory`] - The buffer store could not satisfy an allocation
/// - [`Error::InvalidBuffer`] - A disposed buffer reference was used
/// - [`Error::WriteFailed`] - Re-emitting a resource file failed
///
/// # Examples
///
/// ```rust,no_run
/// use rsrcfork::{Error, ResourceFileRegistry};
///
/// let mut registry = ResourceFileRegistry::new();
/// match registry.open("Example.rsrc") {
///     Ok(ref_num) => println!("opened as {ref_num}"),
///     Err(Error::FileNotFound { path, .. }) => eprintln!("no such file: {}", path.display()),
///     Err(Error::TruncatedFile { offset, .. }) => eprintln!("file ends early at {offset:#x}"),
///     Err(e) => eprintln!("other error ({}): {e}", e.os_err()),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file could not be opened, neither for reading and writing nor for reading only.
    #[error("Resource file not found - {}", .path.display())]
    FileNotFound {
        /// The path that was passed to `open`
        path: PathBuf,
        /// The error reported by the read-only attempt
        #[source]
        source: std::io::Error,
    },

    /// A read ran past the end of the input.
    ///
    /// Raised for the 16-byte header, every map and reference-list field, names and the
    /// length-prefixed payloads in the data segment.
    #[error("Truncated file - needed {needed} bytes at offset {offset:#x}, input has {len}")]
    TruncatedFile {
        /// Offset at which the read started
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
        /// Total length of the input
        len: usize,
    },

    /// The resource map is structurally inconsistent.
    ///
    /// The error includes the source location where the inconsistency was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// No resource with the requested type and ID.
    #[error("Resource not found - '{res_type}' {id}")]
    ResourceNotFound {
        /// The requested resource type
        res_type: ResType,
        /// The requested resource ID
        id: i16,
    },

    /// No resource with the requested type and name.
    #[error("Resource not found - '{res_type}' \"{name}\"")]
    NamedResourceNotFound {
        /// The requested resource type
        res_type: ResType,
        /// The requested name
        name: String,
    },

    /// The reference number does not belong to an open resource file.
    #[error("Resource file {0} is not open")]
    FileNotOpen(RefNum),

    /// Every reference number has been handed out.
    #[error("Too many resource files opened")]
    TooManyFiles,

    /// The buffer store could not allocate or grow a buffer.
    #[error("Out of memory - could not provide {requested} bytes")]
    OutOfMemory {
        /// Size of the failed request in bytes
        requested: usize,
    },

    /// A buffer reference that was disposed (or never allocated) was used.
    #[error("Invalid buffer reference - {0}")]
    InvalidBuffer(BufferRef),

    /// Writing a re-encoded resource file failed.
    ///
    /// The in-memory map is left unchanged; the target may be in an indeterminate state when
    /// atomic updates are disabled.
    #[error("Write failed - {0}")]
    WriteFailed(#[source] std::io::Error),

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Failed to lock target.
    #[error("Failed to lock target")]
    LockError,
}

impl Error {
    /// Returns the classic Mac OS result code corresponding to this error.
    ///
    /// `resNotFound` (-192), `resFNotFound` (-193), `eofErr` (-39), `fnfErr` (-43),
    /// `memFulErr` (-108), `nilHandleErr` (-109), `mapReadErr` (-199), `tmfoErr` (-42) and
    /// `ioErr` (-36). Lock failures have no classic counterpart and report `ioErr`.
    #[must_use]
    pub fn os_err(&self) -> i16 {
        match self {
            Error::FileNotFound { .. } => -43,
            Error::TruncatedFile { .. } => -39,
            Error::Malformed { .. } => -199,
            Error::ResourceNotFound { .. } | Error::NamedResourceNotFound { .. } => -192,
            Error::FileNotOpen(_) => -193,
            Error::TooManyFiles => -42,
            Error::OutOfMemory { .. } => -108,
            Error::InvalidBuffer(_) => -109,
            Error::WriteFailed(_) | Error::FileError(_) | Error::LockError => -36,
        }
    }

    /// Returns `true` for the two lookup-miss variants.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ResourceNotFound { .. } | Error::NamedResourceNotFound { .. }
        )
    }
}
