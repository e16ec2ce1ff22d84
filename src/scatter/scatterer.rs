use super::*;

use crate::{error::*, io::prelude::*, utils};

use alloc::{string::String, vec, vec::Vec};

/// Settings controlling how sections are placed onto the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterOptions {
    /// The size (in bytes) of a destination sector, and the largest section accepted
    pub sector_size: u32,
    /// Whether writes past the current end of the destination may extend it
    ///
    /// When `false`, such a write fails with [`ScatterError::DestinationTooSmall`]
    pub grow: bool,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        ScatterOptions {
            sector_size: SECTOR_SIZE,
            grow: false,
        }
    }
}

impl ScatterOptions {
    /// Use `sector_size`-byte sectors instead of the default [`SECTOR_SIZE`]
    #[inline]
    pub fn sector_size(mut self, sector_size: u32) -> Self {
        self.sector_size = sector_size;
        self
    }

    /// Allow or forbid extending the destination
    #[inline]
    pub fn grow(mut self, grow: bool) -> Self {
        self.grow = grow;
        self
    }
}

/// Section '{name}' written to sector {sector}
#[derive(Debug, Clone, PartialEq, Eq, displaydoc::Display)]
pub struct Placement {
    /// The name of the section
    pub name: String,
    /// The sector it was written to
    pub sector: u64,
    /// The byte offset in the destination where the section begins
    pub dest_offset: u64,
    /// How many bytes were written
    ///
    /// Anything less than a full sector leaves the rest of that sector untouched
    pub len: usize,
}

/// Copies sections of a source stream to fixed sectors of a destination stream
///
/// Both streams are owned for as long as the scatterer lives,
/// so they are released on every exit path once it is dropped.
#[derive(Debug)]
pub struct SectorScatterer<R, W>
where
    R: Read + Seek,
    W: Write + Seek + IOBase<Error = R::Error>,
{
    source: R,
    dest: W,
    options: ScatterOptions,

    /// The sector size, as a buffer length
    sector_len: usize,
    /// The current length of the destination
    dest_len: u64,
    /// Holds one chunk, plus a byte to detect oversized sections
    chunk_buffer: Vec<u8>,
}

impl<R, W> SectorScatterer<R, W>
where
    R: Read + Seek,
    W: Write + Seek + IOBase<Error = R::Error>,
{
    /// Create a new [`SectorScatterer`] between a `source` and a `dest`
    ///
    /// The length of `dest` is measured here, so nothing else should
    /// write to it while this scatterer is alive
    pub fn new(source: R, mut dest: W, options: ScatterOptions) -> ScatterResult<Self, R::Error> {
        // one extra byte is needed to detect oversized sections
        let sector_len = match usize::try_from(options.sector_size) {
            Ok(len) if len > 0 && len < usize::MAX => len,
            _ => {
                log::error!(
                    "Refusing to scatter onto {}-byte sectors",
                    options.sector_size
                );
                return Err(ScatterError::InvalidSectorSize);
            }
        };

        let dest_len = dest.seek_end()?;
        log::trace!("destination is {} bytes long", dest_len);

        Ok(SectorScatterer {
            source,
            dest,
            options,
            sector_len,
            dest_len,
            chunk_buffer: vec![0_u8; sector_len + 1],
        })
    }

    /// The [`ScatterOptions`] of this scatterer
    #[inline]
    pub fn options(&self) -> &ScatterOptions {
        &self.options
    }

    /// Get back the source and destination streams
    #[inline]
    pub fn into_parts(self) -> (R, W) {
        (self.source, self.dest)
    }

    /// Write every entry of `map` to the destination, in ascending sector order
    ///
    /// Stops at the first failing entry. Sectors written before the
    /// failure stay written: there is no rollback.
    pub fn scatter(&mut self, map: &SectorMap) -> ScatterResult<Vec<Placement>, R::Error> {
        let mut placements = Vec::with_capacity(map.len());

        self.scatter_with(map, |placement| placements.push(placement.clone()))?;

        Ok(placements)
    }

    /// Like [`scatter`](SectorScatterer::scatter), but hands every [`Placement`]
    /// to `on_placed` as soon as its section has been written
    ///
    /// If an entry fails, `on_placed` has already seen every sector written before it
    pub fn scatter_with<F>(&mut self, map: &SectorMap, mut on_placed: F) -> ScatterResult<(), R::Error>
    where
        F: FnMut(&Placement),
    {
        for entry in map {
            let placement = self.place(entry)?;
            on_placed(&placement);
        }

        self.dest.flush()?;

        Ok(())
    }

    /// Read the chunk of a single entry and write it to its sector
    pub fn place(&mut self, entry: &SectorMapEntry) -> ScatterResult<Placement, R::Error> {
        let sector_size = self.options.sector_size;

        let chunk_len = self.read_chunk(entry)?;

        if chunk_len > self.sector_len {
            log::error!(
                "Section '{}' is larger than a {}-byte sector",
                entry.name,
                sector_size
            );
            return Err(ScatterError::OversizedSection {
                name: entry.name.clone(),
                length: entry.length.unwrap_or(chunk_len as u64),
                sector_size,
            });
        }

        let dest_offset = self.sector_offset(entry.sector)?;
        let required = dest_offset
            .checked_add(chunk_len as u64)
            .ok_or(ScatterError::SectorOutOfRange {
                sector: entry.sector,
            })?;

        if required > self.dest_len {
            if !self.options.grow {
                log::error!(
                    "Section '{}' would end past the destination ({} > {} bytes)",
                    entry.name,
                    required,
                    self.dest_len
                );
                return Err(ScatterError::DestinationTooSmall {
                    sector: entry.sector,
                    required,
                    available: self.dest_len,
                });
            }

            log::debug!(
                "extending the destination from {} to {} bytes",
                self.dest_len,
                required
            );
        }

        self.dest.seek(SeekFrom::Start(dest_offset))?;
        self.dest.write_all(&self.chunk_buffer[..chunk_len])?;
        self.dest_len = self.dest_len.max(required);

        if chunk_len < self.sector_len {
            log::debug!(
                "Section '{}' is {} bytes long, the last {} bytes of sector {} were left untouched",
                entry.name,
                chunk_len,
                self.sector_len - chunk_len,
                entry.sector
            );
        }
        log::info!("Section '{}' written to sector {}", entry.name, entry.sector);

        Ok(Placement {
            name: entry.name.clone(),
            sector: entry.sector,
            dest_offset,
            len: chunk_len,
        })
    }

    /// Fill the chunk buffer with the section an `entry` points to, returning its length
    ///
    /// At most one byte more than a sector is ever read, which is enough to tell an oversized section apart
    fn read_chunk(&mut self, entry: &SectorMapEntry) -> Result<usize, R::Error> {
        let limit = match entry.length {
            Some(length) => usize::try_from(length)
                .unwrap_or(usize::MAX)
                .min(self.chunk_buffer.len()),
            None => self.sector_len,
        };

        log::trace!(
            "reading up to {} bytes of section '{}' at offset {}",
            limit,
            entry.name,
            entry.offset
        );

        self.source.seek(SeekFrom::Start(entry.offset))?;
        utils::io::read_up_to(&mut self.source, &mut self.chunk_buffer[..limit])
    }

    /// The byte offset of `sector` in the destination
    #[inline]
    fn sector_offset(&self, sector: u64) -> ScatterResult<u64, R::Error> {
        sector
            .checked_mul(u64::from(self.options.sector_size))
            .ok_or(ScatterError::SectorOutOfRange { sector })
    }
}

/// Scatter the sections of `map` from `source` onto `dest`
///
/// This is a shorthand for creating a [`SectorScatterer`] and calling [`SectorScatterer::scatter`] on it once
pub fn scatter<R, W>(
    source: R,
    dest: W,
    map: &SectorMap,
    options: ScatterOptions,
) -> ScatterResult<Vec<Placement>, R::Error>
where
    R: Read + Seek,
    W: Write + Seek + IOBase<Error = R::Error>,
{
    SectorScatterer::new(source, dest, options)?.scatter(map)
}
