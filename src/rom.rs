/*!
rom.rs - Space Invaders ROM set loader.

Out of scope for the core (spec §1): loading bytes into memory at fixed
offsets has no opcode-level subtlety. Kept as a small collaborator with
the same `Result<Self, _>`-over-a-`Display`-enum shape the teacher crate
uses for cartridge parsing, rather than a bare `String` error.
*/

use std::fmt;
use std::fs;
use std::path::Path;

use crate::memory::Memory;

/// invaders.h/g/f/e, each 2 KiB, loaded back to back starting at 0x0000.
pub const ROM_FILE_OFFSETS: [u16; 4] = [0x0000, 0x0800, 0x1000, 0x1800];
pub const ROM_FILE_SIZE: usize = 0x0800;
pub const ROM_TOTAL_SIZE: usize = ROM_FILE_SIZE * ROM_FILE_OFFSETS.len();

#[derive(Debug)]
pub enum RomError {
    Io { path: String, source: std::io::Error },
    WrongSize { path: String, expected: usize, got: usize },
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RomError::Io { path, source } => write!(f, "failed to read '{path}': {source}"),
            RomError::WrongSize { path, expected, got } => write!(
                f,
                "'{path}' is {got} bytes, expected exactly {expected}"
            ),
        }
    }
}

impl std::error::Error for RomError {}

/// Load four fixed-size ROM blobs from `paths` (in `h, g, f, e` order) into
/// `mem` at the four fixed offsets the original arcade board maps them to.
pub fn load_rom_files(paths: &[impl AsRef<Path>; 4], mem: &mut Memory) -> Result<(), RomError> {
    for (path, &offset) in paths.iter().zip(ROM_FILE_OFFSETS.iter()) {
        let path = path.as_ref();
        let display_path = path.display().to_string();
        let bytes = fs::read(path).map_err(|source| RomError::Io {
            path: display_path.clone(),
            source,
        })?;
        if bytes.len() != ROM_FILE_SIZE {
            return Err(RomError::WrongSize {
                path: display_path,
                expected: ROM_FILE_SIZE,
                got: bytes.len(),
            });
        }
        mem.load(offset, &bytes);
    }
    Ok(())
}

/// Load a single already-concatenated 8 KiB ROM image (as used by the
/// `--disassemble` driver mode, which reads one flat file) at address 0.
pub fn load_rom_image(bytes: &[u8], mem: &mut Memory) {
    mem.load(0x0000, bytes);
}
