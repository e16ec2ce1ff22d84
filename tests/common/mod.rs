use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const SECTOR: usize = 512;
pub const IMAGE_SECTORS: usize = 8;

/// A scratch directory holding a program binary and a blank floppy image
pub struct Workspace {
    // keeps the directory alive until the test ends
    dir: TempDir,
    pub program: PathBuf,
    pub image: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("bubble_sort.bin");
        let image = dir.path().join("floppy.img");

        fs::write(&program, program_bytes()).unwrap();
        fs::write(&image, vec![0_u8; IMAGE_SECTORS * SECTOR]).unwrap();

        Workspace {
            dir,
            program,
            image,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// "AAAA..." then "BBBB..." then "CCCC...", one sector each
pub fn program_bytes() -> Vec<u8> {
    [b"AAAA", b"BBBB", b"CCCC"]
        .iter()
        .flat_map(|pattern| pattern.repeat(SECTOR / 4))
        .collect()
}

pub fn read_sector(image: &Path, n: usize) -> Vec<u8> {
    fs::read(image).unwrap()[n * SECTOR..(n + 1) * SECTOR].to_vec()
}

#[test]
fn workspace_is_populated() {
    let workspace = Workspace::new();

    assert_eq!(fs::read(&workspace.program).unwrap().len(), 3 * SECTOR);
    assert_eq!(
        fs::read(&workspace.image).unwrap().len(),
        IMAGE_SECTORS * SECTOR
    );
}
