//! The built-in ROM images offered by `loadrom`.

use std::{fs, path::Path};

/// One of the ROM images the supervisor knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomKind {
    Basic,
    Monitor,
}

impl RomKind {
    /// Looks up a ROM by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("basic") {
            Some(Self::Basic)
        } else if name.eq_ignore_ascii_case("monitor") {
            Some(Self::Monitor)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Monitor => "monitor",
        }
    }

    /// Where the image is placed in memory.
    pub fn address(self) -> u16 {
        match self {
            Self::Basic => 0x0000,
            Self::Monitor => 0xf000,
        }
    }

    /// Where execution starts after loading.
    pub fn start(self) -> u16 {
        self.address()
    }

    /// The largest number of bytes copied from the image.
    pub fn window(self) -> usize {
        match self {
            Self::Basic => 16 * 1024,
            Self::Monitor => 0x10000 - 0xf000,
        }
    }
}

/// The set of ROM images available to this session.
#[derive(Debug, Clone, Default)]
pub struct RomSet {
    basic: Option<Vec<u8>>,
    monitor: Option<Vec<u8>>,
}

impl RomSet {
    pub fn new(basic: Option<Vec<u8>>, monitor: Option<Vec<u8>>) -> Self {
        Self { basic, monitor }
    }

    /// Reads the images from disk. An image that can't be read is left out with a warning.
    pub fn load(basic: Option<&Path>, monitor: Option<&Path>) -> Self {
        Self {
            basic: basic.and_then(|path| read_image(RomKind::Basic, path)),
            monitor: monitor.and_then(|path| read_image(RomKind::Monitor, path)),
        }
    }

    /// The bytes to load for `kind`, clipped to its window.
    pub fn image(&self, kind: RomKind) -> Option<&[u8]> {
        let image = match kind {
            RomKind::Basic => self.basic.as_deref(),
            RomKind::Monitor => self.monitor.as_deref(),
        }?;
        Some(&image[..image.len().min(kind.window())])
    }
}

fn read_image(kind: RomKind, path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(image) => {
            log::info!(
                "{} rom: {} bytes from {}",
                kind.name(),
                image.len(),
                path.display()
            );
            Some(image)
        }
        Err(e) => {
            log::warn!("{} rom: can't read {}: {}", kind.name(), path.display(), e);
            None
        }
    }
}
