use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::error::*;
use crate::scatter::*;

fn missing_file(path: &Path, error: std::io::Error) -> ScatterError<std::io::Error> {
    log::error!("Unable to open {}: {}", path.display(), error);

    ScatterError::MissingFile {
        path: path.display().to_string(),
        error,
    }
}

/// Open the file at `source_path` and the file at `dest_path`, ready to be scattered between
///
/// The destination must already exist: it is opened for reading and writing,
/// never created nor truncated. Both files are opened before anything is read or written,
/// so failing to open either one leaves the destination untouched.
pub fn open_files<P, Q>(
    source_path: P,
    dest_path: Q,
    options: ScatterOptions,
) -> ScatterResult<SectorScatterer<File, File>, std::io::Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source_path = source_path.as_ref();
    let dest_path = dest_path.as_ref();

    let source = File::open(source_path).map_err(|e| missing_file(source_path, e))?;
    let dest = OpenOptions::new()
        .read(true)
        .write(true)
        .open(dest_path)
        .map_err(|e| missing_file(dest_path, e))?;

    log::debug!(
        "scattering from {} onto {}",
        source_path.display(),
        dest_path.display()
    );

    SectorScatterer::new(source, dest, options)
}

/// Scatter the sections of `map` from the file at `source_path` onto the file at `dest_path`
///
/// See [`open_files`] for how the two files are opened
pub fn scatter_files<P, Q>(
    source_path: P,
    dest_path: Q,
    map: &SectorMap,
    options: ScatterOptions,
) -> ScatterResult<Vec<Placement>, std::io::Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    open_files(source_path, dest_path, options)?.scatter(map)
}
