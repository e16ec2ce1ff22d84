use core::{num::ParseIntError, str::FromStr};

use alloc::{
    collections::{btree_map, BTreeMap},
    string::{String, ToString},
};

/// A single placement directive: copy the section found at `offset`
/// in the source to the start of `sector` in the destination
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
pub struct SectorMapEntry {
    /// The destination sector (not byte offset)
    pub sector: u64,
    /// A human-readable name for the section, used when reporting
    pub name: String,
    /// The byte offset of the section within the source
    pub offset: u64,
    /// The declared length of the section
    ///
    /// When [`None`], the section is assumed to span up to a single sector
    #[cfg_attr(feature = "std", serde(default))]
    pub length: Option<u64>,
}

impl SectorMapEntry {
    /// Create a new [`SectorMapEntry`] with no declared length
    pub fn new<N>(sector: u64, name: N, offset: u64) -> Self
    where
        N: ToString,
    {
        SectorMapEntry {
            sector,
            name: name.to_string(),
            offset,
            length: None,
        }
    }

    /// Declare the length of this section
    #[inline]
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }
}

/// An error produced while parsing a [`SectorMapEntry`] from a string
#[derive(Debug, Clone, PartialEq, Eq, displaydoc::Display)]
pub enum ParseEntryError {
    /// Expected SECTOR:NAME:OFFSET[:LENGTH], found {0} field(s)
    FieldCount(usize),
    /// The section name is empty
    EmptyName,
    /// Invalid {field} "{value}": {error}
    InvalidNumber {
        /// Which field failed to parse
        field: &'static str,
        /// The offending text
        value: String,
        /// Why it failed to parse
        error: ParseIntError,
    },
}

impl crate::error::Error for ParseEntryError {}

#[cfg(feature = "std")]
impl std::error::Error for ParseEntryError {}

/// Parse a decimal or `0x`-prefixed hexadecimal number
fn parse_number(field: &'static str, value: &str) -> Result<u64, ParseEntryError> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };

    parsed.map_err(|error| ParseEntryError::InvalidNumber {
        field,
        value: value.to_string(),
        error,
    })
}

impl FromStr for SectorMapEntry {
    type Err = ParseEntryError;

    /// Parse a `SECTOR:NAME:OFFSET[:LENGTH]` directive, e.g. `2:section1:0` or `4:text:0x400:512`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: alloc::vec::Vec<&str> = s.split(':').collect();

        let (sector, name, offset, length) = match fields.as_slice() {
            [sector, name, offset] => (sector, name, offset, None),
            [sector, name, offset, length] => (sector, name, offset, Some(length)),
            _ => return Err(ParseEntryError::FieldCount(fields.len())),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(ParseEntryError::EmptyName);
        }

        let mut entry = SectorMapEntry::new(
            parse_number("sector", sector)?,
            name,
            parse_number("offset", offset)?,
        );
        if let Some(length) = length {
            entry = entry.with_length(parse_number("length", length)?);
        }

        Ok(entry)
    }
}

/// The set of [`SectorMapEntry`]s to scatter, keyed and iterated by destination sector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorMap {
    entries: BTreeMap<u64, SectorMapEntry>,
}

impl SectorMap {
    /// Create an empty [`SectorMap`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the map, returning the entry previously placed at the same sector, if any
    pub fn insert(&mut self, entry: SectorMapEntry) -> Option<SectorMapEntry> {
        let replaced = self.entries.insert(entry.sector, entry);

        if let Some(old) = &replaced {
            log::debug!(
                "Section '{}' no longer placed at sector {}: replaced by a later entry",
                old.name,
                old.sector
            );
        }

        replaced
    }

    /// Get the entry placed at `sector`
    #[inline]
    pub fn get(&self, sector: u64) -> Option<&SectorMapEntry> {
        self.entries.get(&sector)
    }

    /// How many sectors this map writes to
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    /// Whether this map writes nothing at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in ascending sector order
    #[inline]
    pub fn iter(&self) -> btree_map::Values<'_, u64, SectorMapEntry> {
        self.entries.values()
    }
}

impl Extend<SectorMapEntry> for SectorMap {
    fn extend<T: IntoIterator<Item = SectorMapEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl FromIterator<SectorMapEntry> for SectorMap {
    fn from_iter<T: IntoIterator<Item = SectorMapEntry>>(iter: T) -> Self {
        let mut map = SectorMap::new();
        map.extend(iter);
        map
    }
}

impl<'a> IntoIterator for &'a SectorMap {
    type Item = &'a SectorMapEntry;
    type IntoIter = btree_map::Values<'a, u64, SectorMapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
