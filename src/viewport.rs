// Viewport - Aspect ratio and overscan crop derived from a resolution
//
// The crop rectangle is normalized to the full resolved frame with the origin
// at the bottom-left, matching texture UV conventions. Overscan columns are
// trimmed from the right and overscan rows from the top of UV space.

/// Normalized crop rectangle (all fields in 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    /// The whole frame
    pub const FULL: CropRect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Convert to a pixel rectangle in a top-left-origin, row-major buffer
    ///
    /// The result is clamped to the frame.
    pub fn to_pixels(&self, frame_width: usize, frame_height: usize) -> PixelRect {
        let fw = frame_width as f32;
        let fh = frame_height as f32;

        let x = ((self.x * fw).round() as usize).min(frame_width);
        let width = ((self.width * fw).round() as usize).min(frame_width - x);

        // Flip from bottom-left to top-left origin
        let top = 1.0 - (self.y + self.height);
        let y = ((top * fh).round().max(0.0) as usize).min(frame_height);
        let height = ((self.height * fh).round() as usize).min(frame_height - y);

        PixelRect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// Pixel-space rectangle with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Visible region of the resolved frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f32,
    pub crop: CropRect,
}

impl Viewport {
    /// Compute the viewport for a resolution and its overscan margins
    ///
    /// Callers validate that the resolution is non-zero and that the overscan
    /// leaves a visible area.
    pub fn new(width: u32, height: u32, overscan_x: u32, overscan_y: u32) -> Self {
        let w = width as f32;
        let h = height as f32;

        let crop_x = (w - overscan_x as f32) / w;
        let crop_y = (h - overscan_y as f32) / h;

        Self {
            width,
            height,
            aspect_ratio: w / h,
            crop: CropRect {
                x: 0.0,
                y: 1.0 - crop_y,
                width: crop_x,
                height: crop_y,
            },
        }
    }

    /// Visible area in pixels
    pub fn visible_pixels(&self) -> PixelRect {
        self.crop.to_pixels(self.width as usize, self.height as usize)
    }
}
