use crate::error::IOError;

pub mod prelude {
    pub use super::{IOBase, Read, Seek, SeekFrom, Write};
}

// The trait shapes mirror the Rust Standard Library so that `std` types can be used directly

/// Shared base of [`Read`], [`Write`] and [`Seek`]
///
/// A source and a destination must agree on this error type to be scattered between
pub trait IOBase {
    /// The error type
    type Error: IOError;
}

/// A byte source, reduced to what reading a section needs
pub trait Read: IOBase {
    /// Pull some bytes from this source into the specified buffer, returning how many bytes were read.
    ///
    /// A return value of `0` means the end of the source has been reached
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// A byte sink, reduced to what writing a sector needs
pub trait Write: IOBase {
    /// Write the whole of `data`, blocking until it has been written
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush this output stream, ensuring that all intermediately buffered contents reach their destination.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A position within a seekable stream, equivalent to `std::io::SeekFrom`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    /// That many bytes from the start of the stream
    Start(u64),
    /// The size of the stream plus that many bytes
    End(i64),
    /// The current position plus that many bytes
    Current(i64),
}

#[cfg(feature = "std")]
impl From<SeekFrom> for std::io::SeekFrom {
    fn from(value: SeekFrom) -> Self {
        match value {
            SeekFrom::Start(offset) => std::io::SeekFrom::Start(offset),
            SeekFrom::Current(offset) => std::io::SeekFrom::Current(offset),
            SeekFrom::End(offset) => std::io::SeekFrom::End(offset),
        }
    }
}

/// A stream with a movable cursor
pub trait Seek: IOBase {
    /// Seek to an offset, in bytes, in a stream, returning the new position from its start.
    ///
    /// Seeking past the end of a destination and then writing extends it,
    /// if the underlying medium supports it.
    ///
    /// # Errors
    /// Seeking to a negative offset is considered an error.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error>;

    /// Returns the length of the stream, leaving the cursor at its end
    fn seek_end(&mut self) -> Result<u64, Self::Error> {
        self.seek(SeekFrom::End(0))
    }
}

// every std stream we scatter between is seekable, so that's what we key the blanket impls on
#[cfg(feature = "std")]
impl<T> IOBase for T
where
    T: std::io::Seek,
{
    type Error = std::io::Error;
}

#[cfg(feature = "std")]
impl<T> Read for T
where
    T: std::io::Read + IOBase<Error = std::io::Error>,
{
    #[inline]
    fn read(&mut self, data: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(self, data)
    }
}

#[cfg(feature = "std")]
impl<T> Write for T
where
    T: std::io::Write + IOBase<Error = std::io::Error>,
{
    #[inline]
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        std::io::Write::write_all(self, data)
    }

    #[inline]
    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(self)
    }
}

#[cfg(feature = "std")]
impl<T> Seek for T
where
    T: std::io::Seek + IOBase<Error = std::io::Error>,
{
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        std::io::Seek::seek(self, pos.into())
    }
}

// without std, let borrowed storage be handed to a scatterer as well
#[cfg(not(feature = "std"))]
impl<T> IOBase for &mut T
where
    T: IOBase,
{
    type Error = T::Error;
}

#[cfg(not(feature = "std"))]
impl<R: Read> Read for &mut R {
    #[inline]
    fn read(&mut self, data: &mut [u8]) -> Result<usize, R::Error> {
        (**self).read(data)
    }
}

#[cfg(not(feature = "std"))]
impl<W: Write> Write for &mut W {
    #[inline]
    fn write_all(&mut self, data: &[u8]) -> Result<(), W::Error> {
        (**self).write_all(data)
    }

    #[inline]
    fn flush(&mut self) -> Result<(), W::Error> {
        (**self).flush()
    }
}

#[cfg(not(feature = "std"))]
impl<S: Seek> Seek for &mut S {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, S::Error> {
        (**self).seek(pos)
    }
}
