// Indexed Compositor Library
// Resolves indexed-color frames into presentable RGB frames every tick

// Public modules
pub mod color;
pub mod compositor;
pub mod config;
pub mod display;
pub mod frame;
pub mod palette;
pub mod producer;
pub mod snapshot;
pub mod viewport;

// Re-export main types for convenience
pub use color::Color;
pub use compositor::{Compositor, CompositorError, DrawOutcome, EngineState, FrameStats};
pub use config::{CompositorConfig, ConfigError};
pub use display::{MemorySurface, PresentationSurface, SurfaceConfig, WindowConfig};
pub use frame::{IndexedFrame, ResolvedFrame, TRANSPARENT};
pub use palette::{Palette, PaletteCache, PaletteEntry, PaletteError, PaletteSource};
pub use producer::{FrameProducer, PatternProducer};
pub use snapshot::{save_snapshot, SnapshotError};
pub use viewport::{CropRect, PixelRect, Viewport};
