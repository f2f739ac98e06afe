// Palette cache - Index to color lookup kept in sync with a palette source
//
// The cache is rebuilt in place, never replaced, and only when the source
// reports itself invalid. Inactive entries leave their slot untouched, so a
// slot keeps whatever color it last resolved to.

use super::PaletteSource;
use crate::color::Color;

/// Lazily refreshed index -> color lookup
#[derive(Debug, Clone, Default)]
pub struct PaletteCache {
    colors: Vec<Color>,
}

impl PaletteCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Rebuild the cache from the source if the source is invalid
    ///
    /// Returns `true` if a refresh took place. Clearing the source's invalid
    /// flag is left to the source.
    pub fn refresh<S: PaletteSource + ?Sized>(&mut self, source: &S) -> bool {
        if !source.is_invalid() {
            return false;
        }

        let len = source.len();
        if self.colors.len() != len {
            self.colors.resize(len, Color::BLACK);
        }

        for entry in source.entries().iter().filter(|e| e.active) {
            match self.colors.get_mut(entry.index) {
                Some(slot) => *slot = entry.color(),
                None => log::debug!(
                    "Palette entry {} outside cache of {} slots, skipped",
                    entry.index,
                    len
                ),
            }
        }

        log::debug!("Palette cache refreshed ({} slots)", len);
        true
    }

    /// Bounds-checked lookup
    ///
    /// Returns `None` for negative indices and indices past the cache length.
    #[inline]
    pub fn lookup(&self, index: i32) -> Option<Color> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get(i).copied())
    }

    /// Resolve an index, falling back to `fallback` when it is out of range
    #[inline]
    pub fn resolve_or(&self, index: i32, fallback: Color) -> Color {
        self.lookup(index).unwrap_or(fallback)
    }

    /// Number of cached slots
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the cache holds no slots
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Cached colors in index order
    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }
}
