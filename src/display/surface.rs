// Presentation surface - Where resolved frames end up
//
// The compositor talks to surfaces only through PresentationSurface. A surface
// receives its scaling configuration and crop on every resolution reset, and a
// set_pixels + apply pair on every drawn frame.

use crate::compositor::CompositorError;
use crate::frame::ResolvedFrame;
use crate::viewport::CropRect;

/// Scaling configuration propagated on resolution reset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    /// Width divided by height of the internal resolution
    pub aspect_ratio: f32,
    /// Internal resolution width in pixels
    pub reference_width: u32,
    /// Internal resolution height in pixels
    pub reference_height: u32,
}

/// Receiver of resolved frames
pub trait PresentationSurface {
    /// Apply aspect ratio and reference resolution
    fn configure(&mut self, config: SurfaceConfig) -> Result<(), CompositorError>;

    /// Set the normalized region of the frame to display
    fn set_crop(&mut self, crop: CropRect) -> Result<(), CompositorError>;

    /// Upload a resolved frame
    fn set_pixels(&mut self, frame: &ResolvedFrame) -> Result<(), CompositorError>;

    /// Flush the uploaded frame to the display
    fn apply(&mut self) -> Result<(), CompositorError>;
}

/// Headless surface that keeps the last presented frame in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    config: Option<SurfaceConfig>,
    crop: CropRect,
    pending: ResolvedFrame,
    presented: ResolvedFrame,
    apply_count: u64,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration from the most recent resolution reset
    pub fn config(&self) -> Option<SurfaceConfig> {
        self.config
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    /// Frame made visible by the last `apply`
    pub fn presented(&self) -> &ResolvedFrame {
        &self.presented
    }

    /// Number of frames flushed so far
    pub fn apply_count(&self) -> u64 {
        self.apply_count
    }
}

impl PresentationSurface for MemorySurface {
    fn configure(&mut self, config: SurfaceConfig) -> Result<(), CompositorError> {
        self.config = Some(config);
        Ok(())
    }

    fn set_crop(&mut self, crop: CropRect) -> Result<(), CompositorError> {
        self.crop = crop;
        Ok(())
    }

    fn set_pixels(&mut self, frame: &ResolvedFrame) -> Result<(), CompositorError> {
        self.pending.clone_from(frame);
        Ok(())
    }

    fn apply(&mut self) -> Result<(), CompositorError> {
        self.presented.clone_from(&self.pending);
        self.apply_count += 1;
        Ok(())
    }
}
