use core::fmt;

use alloc::string::String;

/// Base error type
///
/// Stands in for [`core::error::Error`] so that the crate stays usable in a `no_std` context
pub trait Error: fmt::Debug + fmt::Display {}

#[cfg(feature = "std")]
impl Error for std::io::Error {}

/// Base IO error type, as returned by the storage backing a source or destination
pub trait IOError: Error {
    /// The type of the kind of this [`IOError`]
    type Kind: IOErrorKind;

    /// Get the kind of this [`IOError`]
    fn kind(&self) -> Self::Kind;
}

#[cfg(feature = "std")]
impl IOError for std::io::Error {
    type Kind = std::io::ErrorKind;

    #[inline]
    fn kind(&self) -> Self::Kind {
        self.kind()
    }
}

/// The kind of an [`IOError`]
pub trait IOErrorKind: PartialEq + Sized {
    /// Create a new `Interrupted` [`IOErrorKind`]
    fn new_interrupted() -> Self;

    /// Check whether this [`IOErrorKind`] is of kind `Interrupted`
    #[inline]
    fn is_interrupted(&self) -> bool {
        self == &Self::new_interrupted()
    }
}

#[cfg(feature = "std")]
impl IOErrorKind for std::io::ErrorKind {
    #[inline]
    fn new_interrupted() -> Self {
        std::io::ErrorKind::Interrupted
    }
}

/// An error indicating that placing sections onto the destination has failed
#[derive(Debug, displaydoc::Display)]
pub enum ScatterError<I>
where
    I: IOError,
{
    /// Unable to open {path}: {error}
    MissingFile {
        /// The path that couldn't be opened
        path: String,
        /// The underlying error returned when opening `path`
        error: I,
    },
    /// Section '{name}' ({length} bytes) does not fit in a {sector_size}-byte sector
    OversizedSection {
        /// The name of the offending section
        name: String,
        /// The declared length of the section
        length: u64,
        /// The sector size in effect
        sector_size: u32,
    },
    /// The sector size must be a positive number of bytes
    InvalidSectorSize,
    /// Sector {sector} lies beyond the addressable range of the destination
    SectorOutOfRange {
        /// The sector that couldn't be addressed
        sector: u64,
    },
    /// Writing sector {sector} needs a destination of at least {required} bytes, but it is only {available} bytes long
    DestinationTooSmall {
        /// The sector being written
        sector: u64,
        /// The destination length that write would have required
        required: u64,
        /// The destination length at the time of the write
        available: u64,
    },
    /// An IO error occured
    #[displaydoc("An IO error occured: {0}")]
    IOError(I),
}

impl<I> Error for ScatterError<I> where I: IOError {}

impl<I> From<I> for ScatterError<I>
where
    I: IOError,
{
    #[inline]
    fn from(value: I) -> Self {
        ScatterError::IOError(value)
    }
}

/// An alias for a [`Result`] with a [`ScatterError`] error type
pub type ScatterResult<T, E> = Result<T, ScatterError<E>>;
