// Display module - Presentation surfaces for resolved frames
//
// This module provides:
// - The PresentationSurface contract the compositor draws into
// - A headless in-memory surface
// - A winit + pixels window surface showing only the overscan-cropped area
// - The windowed application loop (update -> draw per frame)

pub mod surface;
pub mod window;

pub use surface::{MemorySurface, PresentationSurface, SurfaceConfig};
pub use window::{run_display, CompositorWindow, PixelsSurface, WindowConfig};
