// Compositor module - Resolves indexed frames into presentable color frames
//
// Each tick runs `update` (the producer writes its IndexedFrame) followed by
// `draw` (the compositor refreshes the palette cache if needed, substitutes
// transparent pixels, resolves every index and hands the result to the
// presentation surface). Both are no-ops unless the engine is Running.

mod error;


pub use error::CompositorError;

use crate::color::Color;
use crate::config::CompositorConfig;
use crate::display::{PresentationSurface, SurfaceConfig};
use crate::frame::ResolvedFrame;
use crate::palette::{PaletteCache, PaletteSource};
use crate::producer::FrameProducer;
use crate::viewport::Viewport;

/// Lifecycle of the engine feeding the compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No producer loaded
    Uninitialized,
    /// Producer loaded but not running
    Loaded,
    /// Producer running; ticks do work
    Running,
}

/// Per-frame counters from a completed draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Transparent pixels rewritten to the background index
    pub substituted: usize,
    /// Pixels whose index fell outside the palette cache
    pub unresolved: usize,
}

/// Result of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Engine not running; the surface still shows the previous frame
    Skipped,
    /// A new frame was presented
    Presented(FrameStats),
}

/// Indexed-color frame compositor
///
/// Owns the palette cache and the reusable resolved frame. The producer is
/// loaded into the compositor; palette sources and presentation surfaces are
/// borrowed per call.
pub struct Compositor<P: FrameProducer> {
    /// Loaded producer (None while Uninitialized)
    producer: Option<P>,

    /// Index -> color cache
    cache: PaletteCache,

    /// Output buffer, resized only on resolution reset
    resolved: ResolvedFrame,

    /// Viewport from the last successful resolution reset
    viewport: Option<Viewport>,

    /// Internal resolution
    width: u32,
    height: u32,

    /// Color for indices that cannot be resolved
    diagnostic_color: Color,

    /// Whether the last draw had an unresolvable background index
    background_diagnostic: bool,

    /// Frames presented so far
    frames_drawn: u64,
}

impl<P: FrameProducer> Compositor<P> {
    /// Create a compositor at the given internal resolution
    ///
    /// The surface is not touched until [`Compositor::reset_resolution`].
    pub fn new(width: u32, height: u32) -> Result<Self, CompositorError> {
        check_resolution(width, height)?;

        Ok(Compositor {
            producer: None,
            cache: PaletteCache::new(),
            resolved: ResolvedFrame::new(width as usize, height as usize),
            viewport: None,
            width,
            height,
            diagnostic_color: Color::MAGENTA,
            background_diagnostic: false,
            frames_drawn: 0,
        })
    }

    /// Create a compositor from configuration
    pub fn from_config(config: &CompositorConfig) -> Result<Self, CompositorError> {
        let compositor = Self::new(config.resolution.width, config.resolution.height)?;
        Ok(compositor.with_diagnostic_color(config.palette.diagnostic_color))
    }

    /// Replace the diagnostic color (magenta by default)
    pub fn with_diagnostic_color(mut self, color: Color) -> Self {
        self.diagnostic_color = Color { a: 1.0, ..color };
        self
    }

    /// Load a producer, resizing it to the current internal resolution
    ///
    /// If the surface was already configured by an earlier
    /// [`Compositor::reset_resolution`], the crop is recomputed from the
    /// producer's overscan and pushed to the surface. On error the producer
    /// is dropped and the compositor stays Uninitialized.
    pub fn load<S>(&mut self, mut producer: P, surface: &mut S) -> Result<(), CompositorError>
    where
        S: PresentationSurface + ?Sized,
    {
        let (width, height) = (self.width, self.height);
        producer.reset_resolution(width, height);

        if self.viewport.is_some() {
            let (overscan_x, overscan_y) = (producer.overscan_x(), producer.overscan_y());
            self.apply_resolution(width, height, overscan_x, overscan_y, surface)?;
        }

        self.producer = Some(producer);
        log::info!("Producer loaded at {}x{}", width, height);
        Ok(())
    }

    /// Remove the producer, returning the compositor to Uninitialized
    pub fn unload(&mut self) -> Option<P> {
        self.producer.take()
    }

    /// Current engine state
    pub fn state(&self) -> EngineState {
        match &self.producer {
            None => EngineState::Uninitialized,
            Some(p) if p.is_running() => EngineState::Running,
            Some(_) => EngineState::Loaded,
        }
    }

    pub fn producer(&self) -> Option<&P> {
        self.producer.as_ref()
    }

    pub fn producer_mut(&mut self) -> Option<&mut P> {
        self.producer.as_mut()
    }

    pub fn palette_cache(&self) -> &PaletteCache {
        &self.cache
    }

    pub fn resolved_frame(&self) -> &ResolvedFrame {
        &self.resolved
    }

    /// Viewport from the last resolution reset, if any
    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// Internal resolution as (width, height)
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn diagnostic_color(&self) -> Color {
        self.diagnostic_color
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Change the internal resolution
    ///
    /// Resizes the producer's frame and the resolved frame, then pushes the
    /// new aspect ratio, reference resolution and overscan crop to the
    /// surface. On error the producer is restored to the previous resolution
    /// and the compositor is left unchanged.
    pub fn reset_resolution<S>(
        &mut self,
        width: u32,
        height: u32,
        surface: &mut S,
    ) -> Result<(), CompositorError>
    where
        S: PresentationSurface + ?Sized,
    {
        check_resolution(width, height)?;

        let (old_width, old_height) = (self.width, self.height);
        let (overscan_x, overscan_y) = match self.producer.as_mut() {
            Some(producer) => {
                producer.reset_resolution(width, height);
                (producer.overscan_x(), producer.overscan_y())
            }
            None => (0, 0),
        };

        let result = self.apply_resolution(width, height, overscan_x, overscan_y, surface);
        if result.is_err() {
            if let Some(producer) = self.producer.as_mut() {
                producer.reset_resolution(old_width, old_height);
            }
        }
        result
    }

    fn apply_resolution<S>(
        &mut self,
        width: u32,
        height: u32,
        overscan_x: u32,
        overscan_y: u32,
        surface: &mut S,
    ) -> Result<(), CompositorError>
    where
        S: PresentationSurface + ?Sized,
    {
        if overscan_x >= width || overscan_y >= height {
            return Err(CompositorError::OverscanTooLarge {
                width,
                height,
                overscan_x,
                overscan_y,
            });
        }

        let viewport = Viewport::new(width, height, overscan_x, overscan_y);

        let previous = self
            .viewport
            .unwrap_or_else(|| Viewport::new(self.width, self.height, 0, 0));

        surface.configure(surface_config(&viewport))?;

        if let Err(err) = surface.set_crop(viewport.crop) {
            // Put the surface back on the resolution the compositor keeps
            if surface.configure(surface_config(&previous)).is_ok() {
                let _ = surface.set_crop(previous.crop);
            }
            return Err(err);
        }

        self.resolved.resize(width as usize, height as usize);
        self.width = width;
        self.height = height;
        self.viewport = Some(viewport);

        log::info!(
            "Resolution reset to {}x{} (overscan {}x{}, aspect {:.3})",
            width,
            height,
            overscan_x,
            overscan_y,
            viewport.aspect_ratio
        );
        Ok(())
    }

    /// Logic tick: let the producer write its next frame
    pub fn update(&mut self) {
        if let Some(producer) = self.producer.as_mut() {
            if producer.is_running() {
                producer.update();
            }
        }
    }

    /// Render tick: resolve the producer's frame and present it
    pub fn draw<S, T>(
        &mut self,
        palette: &mut S,
        surface: &mut T,
    ) -> Result<DrawOutcome, CompositorError>
    where
        S: PaletteSource + ?Sized,
        T: PresentationSurface + ?Sized,
    {
        if self.state() != EngineState::Running {
            return Ok(DrawOutcome::Skipped);
        }

        if palette.is_invalid() && self.cache.refresh(&*palette) {
            palette.acknowledge_refresh();
        }

        let background_index = palette.background_index();
        let transparent_color = self.transparent_color(background_index);

        let Some(producer) = self.producer.as_mut() else {
            return Ok(DrawOutcome::Skipped);
        };
        let frame = producer.frame_mut();

        if frame.len() != self.resolved.len() {
            return Err(CompositorError::FrameSizeMismatch {
                expected: self.resolved.len(),
                found: frame.len(),
            });
        }

        let substituted = frame.substitute_transparent(background_index);

        let mut unresolved = 0;
        for (out, &index) in self
            .resolved
            .as_mut_slice()
            .iter_mut()
            .zip(frame.as_slice())
        {
            *out = match self.cache.lookup(index) {
                Some(color) => color,
                None => {
                    unresolved += 1;
                    transparent_color
                }
            };
        }

        surface.set_pixels(&self.resolved)?;
        surface.apply()?;
        self.frames_drawn += 1;

        Ok(DrawOutcome::Presented(FrameStats {
            substituted,
            unresolved,
        }))
    }

    /// Run one update followed by one draw
    pub fn tick<S, T>(
        &mut self,
        palette: &mut S,
        surface: &mut T,
    ) -> Result<DrawOutcome, CompositorError>
    where
        S: PaletteSource + ?Sized,
        T: PresentationSurface + ?Sized,
    {
        self.update();
        self.draw(palette, surface)
    }

    /// Color used for transparent and unresolvable pixels this frame
    fn transparent_color(&mut self, background_index: i32) -> Color {
        match self.cache.lookup(background_index) {
            Some(color) => {
                self.background_diagnostic = false;
                color
            }
            None => {
                if !self.background_diagnostic {
                    log::warn!(
                        "Background index {} outside palette of {} slots, using diagnostic color",
                        background_index,
                        self.cache.len()
                    );
                    self.background_diagnostic = true;
                }
                self.diagnostic_color
            }
        }
    }
}

fn surface_config(viewport: &Viewport) -> SurfaceConfig {
    SurfaceConfig {
        aspect_ratio: viewport.aspect_ratio,
        reference_width: viewport.width,
        reference_height: viewport.height,
    }
}

fn check_resolution(width: u32, height: u32) -> Result<(), CompositorError> {
    if width == 0 || height == 0 {
        return Err(CompositorError::InvalidResolution { width, height });
    }
    Ok(())
}
