// Compositor errors
//
// Out-of-range color indices are never errors; they render in the diagnostic
// color. Errors here are configuration problems and surface failures.

/// Errors that can occur during resolution resets and presentation
#[derive(Debug)]
pub enum CompositorError {
    /// Width or height is zero
    InvalidResolution { width: u32, height: u32 },

    /// Overscan margins leave no visible area
    OverscanTooLarge {
        width: u32,
        height: u32,
        overscan_x: u32,
        overscan_y: u32,
    },

    /// The presentation surface has no target to draw into yet
    SurfaceUnavailable,

    /// The presentation surface failed to upload or render
    Surface(String),

    /// The producer's frame does not match the configured resolution
    FrameSizeMismatch { expected: usize, found: usize },
}

impl std::fmt::Display for CompositorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositorError::InvalidResolution { width, height } => {
                write!(f, "Invalid resolution: {}x{}", width, height)
            }
            CompositorError::OverscanTooLarge {
                width,
                height,
                overscan_x,
                overscan_y,
            } => write!(
                f,
                "Overscan {}x{} leaves no visible area at {}x{}",
                overscan_x, overscan_y, width, height
            ),
            CompositorError::SurfaceUnavailable => write!(f, "Presentation surface unavailable"),
            CompositorError::Surface(msg) => write!(f, "Presentation surface error: {}", msg),
            CompositorError::FrameSizeMismatch { expected, found } => write!(
                f,
                "Frame size mismatch: expected {} pixels, found {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for CompositorError {}

impl CompositorError {
    /// Whether this error came from bad configuration rather than the surface
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CompositorError::InvalidResolution { .. }
                | CompositorError::OverscanTooLarge { .. }
                | CompositorError::SurfaceUnavailable
        )
    }
}
