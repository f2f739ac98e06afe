// Frame buffers - Indexed input and resolved output
//
// An IndexedFrame holds one palette index per pixel, row-major, at the
// producer's internal resolution. TRANSPARENT (-1) marks pixels that take the
// background color. A ResolvedFrame holds the matching opaque colors and is
// reused across frames; it only changes size on a resolution reset.

use crate::color::Color;

/// Sentinel index for transparent pixels
pub const TRANSPARENT: i32 = -1;

/// Indexed pixel buffer written by a frame producer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    width: usize,
    height: usize,
    pixels: Vec<i32>,
}

impl IndexedFrame {
    /// Create a frame filled with transparent pixels
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width * height],
        }
    }

    /// Create a frame from existing pixel data
    ///
    /// # Panics
    /// Panics if `pixels.len() != width * height`
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<i32>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "Pixel data must hold exactly width×height indices"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Change the frame dimensions, clearing it to transparent
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, TRANSPARENT);
    }

    /// Set a pixel at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, index: i32) {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);

        self.pixels[y * self.width + x] = index;
    }

    /// Get a pixel at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> i32 {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);

        self.pixels[y * self.width + x]
    }

    /// Fill the frame with a single index
    pub fn clear(&mut self, index: i32) {
        self.pixels.fill(index);
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.pixels
    }

    /// Rewrite every transparent pixel to `background_index`, in place
    ///
    /// The rewrite persists in the producer's buffer: after this call the frame
    /// holds no TRANSPARENT pixels, and running it again is a no-op. Returns
    /// the number of pixels rewritten.
    pub fn substitute_transparent(&mut self, background_index: i32) -> usize {
        let mut substituted = 0;
        for pixel in self.pixels.iter_mut().filter(|p| **p == TRANSPARENT) {
            *pixel = background_index;
            substituted += 1;
        }
        substituted
    }
}

/// Resolved color buffer handed to the presentation surface
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedFrame {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl ResolvedFrame {
    /// Create an opaque black frame
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Resize to `width * height`
    ///
    /// Existing slots keep their colors; new slots are opaque black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height, Color::BLACK);
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Get the color at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);

        self.pixels[y * self.width + x]
    }

    /// Write the frame as RGBA bytes
    ///
    /// # Panics
    /// Panics if output buffer is too small
    pub fn to_rgba(&self, output: &mut [u8]) {
        assert!(
            output.len() >= self.pixels.len() * 4,
            "Output buffer too small for RGBA conversion"
        );

        for (color, out) in self.pixels.iter().zip(output.chunks_exact_mut(4)) {
            out.copy_from_slice(&color.to_rgba8());
        }
    }
}
