use super::{EResult, EmuError};

/// Size of the Z80's address space.
pub const SRAM_SIZE: usize = 0x10000;

/// The machine's static RAM, covering the whole 64K address space.
pub struct Sram {
    pub memory: Box<[u8]>,
}

impl Sram {
    /// Creates a new [`Sram`] instance, allocating and initializing its memory to [0u8; 65536].
    pub fn new() -> Self {
        Self {
            memory: vec![0u8; SRAM_SIZE].into_boxed_slice(),
        }
    }

    /// Copies `image` into memory starting at `address`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the image would run past the top of memory. Memory is left untouched in that case.
    pub fn load(&mut self, address: u16, image: &[u8]) -> EResult<()> {
        let start = address as usize;
        let end = start + image.len();
        if end > SRAM_SIZE {
            return Err(EmuError::Overrun {
                address,
                len: image.len(),
            });
        }
        self.memory[start..end].copy_from_slice(image);
        Ok(())
    }

    pub fn read(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }
}

impl Default for Sram {
    fn default() -> Self {
        Self::new()
    }
}
