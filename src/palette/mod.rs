// Palette module - Palette sources and the index-to-color cache
//
// This module provides:
// - PaletteEntry, one slot of an authoritative palette
// - PaletteSource, the boundary contract the compositor reads palettes through
// - Palette, a concrete source with a dirty-bit handshake
// - PaletteCache, the lazily refreshed index -> color lookup
// - The built-in master palette and .pal file loading

mod cache;
mod master;

pub use cache::PaletteCache;
pub use master::{is_unused_slot, master_entries, MASTER_PALETTE, MASTER_PALETTE_SIZE};

use crate::color::Color;
use std::fs;
use std::io;
use std::path::Path;

/// Errors that can occur while loading a palette
#[derive(Debug)]
pub enum PaletteError {
    /// I/O error
    Io(io::Error),

    /// Palette data is not a whole number of RGB triplets, or is empty
    Malformed { len: usize },
}

impl std::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::Io(e) => write!(f, "I/O error: {}", e),
            PaletteError::Malformed { len } => {
                write!(f, "Malformed palette data: {} bytes is not whole RGB triplets", len)
            }
        }
    }
}

impl std::error::Error for PaletteError {}

impl From<io::Error> for PaletteError {
    fn from(e: io::Error) -> Self {
        PaletteError::Io(e)
    }
}

/// A single palette slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    /// Slot index this entry resolves
    pub index: usize,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Inactive entries are unused slots and are never written into a cache
    pub active: bool,
}

impl PaletteEntry {
    /// Create an active entry
    pub fn new(index: usize, r: f32, g: f32, b: f32) -> Self {
        Self {
            index,
            r,
            g,
            b,
            active: true,
        }
    }

    /// The opaque color this entry resolves to
    #[inline]
    pub fn color(&self) -> Color {
        Color::rgb(self.r, self.g, self.b)
    }
}

/// Authoritative palette consumed by the compositor
///
/// The invalid flag is a dirty bit owned by the source: the source sets it
/// whenever it mutates, the compositor only reads it, and after a successful
/// cache refresh the compositor calls [`PaletteSource::acknowledge_refresh`]
/// so the source can clear it.
pub trait PaletteSource {
    /// All palette entries, active or not
    fn entries(&self) -> &[PaletteEntry];

    /// Number of slots the cache must hold
    fn len(&self) -> usize;

    /// Whether the palette has no slots
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cache must be rebuilt before the next read
    fn is_invalid(&self) -> bool;

    /// Index that transparent pixels are substituted with
    fn background_index(&self) -> i32;

    /// Called once a cache refresh from this source has completed
    fn acknowledge_refresh(&mut self);
}

/// Concrete palette source
///
/// Every mutation through its methods marks the palette invalid. A new palette
/// starts invalid so the first frame always populates the cache.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
    len: usize,
    invalid: bool,
    background_index: i32,
}

impl Palette {
    /// Create a palette from explicit entries
    ///
    /// The palette length is one past the highest entry index.
    pub fn from_entries(entries: Vec<PaletteEntry>, background_index: i32) -> Self {
        let len = entries.iter().map(|e| e.index + 1).max().unwrap_or(0);
        Self {
            entries,
            len,
            invalid: true,
            background_index,
        }
    }

    /// Create the built-in 64-entry master palette
    pub fn master() -> Self {
        Self::from_entries(master_entries(), 0x0F)
    }

    /// Parse raw .pal data (consecutive RGB byte triplets)
    ///
    /// Files holding the 512-entry emphasis variant are accepted as is; every
    /// entry is active.
    pub fn from_pal_bytes(data: &[u8], background_index: i32) -> Result<Self, PaletteError> {
        if data.is_empty() || data.len() % 3 != 0 {
            return Err(PaletteError::Malformed { len: data.len() });
        }

        let entries = data
            .chunks_exact(3)
            .enumerate()
            .map(|(index, rgb)| {
                let color = Color::from_rgb8(rgb[0], rgb[1], rgb[2]);
                PaletteEntry::new(index, color.r, color.g, color.b)
            })
            .collect();

        Ok(Self::from_entries(entries, background_index))
    }

    /// Load a .pal file from disk
    pub fn load<P: AsRef<Path>>(path: P, background_index: i32) -> Result<Self, PaletteError> {
        let data = fs::read(path)?;
        Self::from_pal_bytes(&data, background_index)
    }

    /// Replace the color of a slot, adding the entry if the slot has none
    pub fn set_entry(&mut self, index: usize, color: Color) {
        match self.entries.iter_mut().find(|e| e.index == index) {
            Some(entry) => {
                entry.r = color.r;
                entry.g = color.g;
                entry.b = color.b;
            }
            None => self
                .entries
                .push(PaletteEntry::new(index, color.r, color.g, color.b)),
        }
        self.len = self.len.max(index + 1);
        self.invalid = true;
    }

    /// Mark a slot used or unused
    pub fn set_active(&mut self, index: usize, active: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.index == index) {
            entry.active = active;
            self.invalid = true;
        }
    }

    /// Change the number of slots, dropping entries that no longer fit
    pub fn resize(&mut self, len: usize) {
        self.entries.retain(|e| e.index < len);
        self.len = len;
        self.invalid = true;
    }

    /// Change the background index
    ///
    /// The background is read fresh every frame, so this does not invalidate
    /// the palette.
    pub fn set_background_index(&mut self, index: i32) {
        self.background_index = index;
    }

    /// Force a cache rebuild on the next frame
    pub fn invalidate(&mut self) {
        self.invalid = true;
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::master()
    }
}

impl PaletteSource for Palette {
    fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    fn len(&self) -> usize {
        self.len
    }

    fn is_invalid(&self) -> bool {
        self.invalid
    }

    fn background_index(&self) -> i32 {
        self.background_index
    }

    fn acknowledge_refresh(&mut self) {
        self.invalid = false;
    }
}
