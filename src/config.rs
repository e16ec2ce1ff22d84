//! Loading a [`SectorMap`] (and optionally its [`ScatterOptions`]) from a JSON file
//!
//! ```json
//! {
//!     "sector_size": 512,
//!     "sections": [
//!         { "sector": 2, "name": "section1", "offset": 0 },
//!         { "sector": 3, "name": "section2", "offset": 512 },
//!         { "sector": 4, "name": "section3", "offset": 1024, "length": 512 }
//!     ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::scatter::*;

/// An error indicating that a sector map file couldn't be loaded
#[derive(Debug, displaydoc::Display)]
pub enum ConfigError {
    /// Unable to read the sector map file: {0}
    Io(std::io::Error),
    /// Malformed sector map file: {0}
    Parse(serde_json::Error),
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    #[inline]
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    #[inline]
    fn from(value: serde_json::Error) -> Self {
        ConfigError::Parse(value)
    }
}

/// The contents of a sector map file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScatterConfig {
    /// Overrides the default [`SECTOR_SIZE`]
    #[serde(default)]
    pub sector_size: Option<u32>,
    /// See [`ScatterOptions::grow`]
    #[serde(default)]
    pub grow: bool,
    /// The placement directives, in any order
    pub sections: Vec<SectorMapEntry>,
}

impl ScatterConfig {
    /// Parse a [`ScatterConfig`] out of a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse the sector map file at `path`
    pub fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::debug!("loading sector map from {}", path.display());

        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The [`ScatterOptions`] described by this file
    pub fn options(&self) -> ScatterOptions {
        let options = ScatterOptions::default().grow(self.grow);

        match self.sector_size {
            Some(sector_size) => options.sector_size(sector_size),
            None => options,
        }
    }

    /// Build the [`SectorMap`] described by this file
    ///
    /// Entries sharing a sector replace the ones listed before them
    pub fn sector_map(&self) -> SectorMap {
        self.sections.iter().cloned().collect()
    }
}
