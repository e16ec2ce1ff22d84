/// The size (in bytes) of a floppy disk sector, used unless told otherwise
pub const SECTOR_SIZE: u32 = 512;
