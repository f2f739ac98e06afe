// Window module - Presents composited frames in a window
//
// The window surface uploads only the visible (overscan-cropped) rectangle of
// each resolved frame into a pixels buffer sized to that rectangle.

use super::surface::{PresentationSurface, SurfaceConfig};
use crate::compositor::{Compositor, CompositorError};
use crate::config::CompositorConfig;
use crate::frame::ResolvedFrame;
use crate::palette::{Palette, PaletteSource};
use crate::producer::{FrameProducer, PatternProducer};
use crate::snapshot::save_snapshot;
use crate::viewport::{CropRect, PixelRect};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// Scale factor (1x, 2x, 3x, 4x, etc.)
    pub scale: u32,
    /// Target frame rate in Hz
    pub target_fps: u32,
    /// Whether to enable VSync
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a new window configuration with default values
    ///
    /// Default: 3x scale, 60 FPS, VSync enabled
    pub fn new() -> Self {
        Self {
            scale: 3,
            target_fps: 60,
            vsync: true,
        }
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8);
        self
    }

    /// Set the target frame rate
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    /// Set VSync enabled or disabled
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Window size in logical pixels for a visible area
    pub fn window_size(&self, visible_width: u32, visible_height: u32) -> (u32, u32) {
        (visible_width * self.scale, visible_height * self.scale)
    }

    /// Get the frame duration for the target FPS
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.target_fps as u64)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Presentation surface backed by a pixels buffer
#[derive(Default)]
pub struct PixelsSurface {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    scale: u32,
    reference_width: usize,
    reference_height: usize,
    visible: Option<PixelRect>,
}

impl PixelsSurface {
    /// Create a surface with no window attached
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
            ..Self::default()
        }
    }

    /// Attach the window and its pixels buffer
    pub fn attach(&mut self, window: Arc<Window>, pixels: Pixels<'static>) {
        self.window = Some(window);
        self.pixels = Some(pixels);
    }

    pub fn is_attached(&self) -> bool {
        self.pixels.is_some()
    }

    /// Resize the presentation surface to match the window
    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), CompositorError> {
        match self.pixels.as_mut() {
            Some(pixels) => pixels
                .resize_surface(width, height)
                .map_err(|e| CompositorError::Surface(e.to_string())),
            None => Err(CompositorError::SurfaceUnavailable),
        }
    }
}

impl PresentationSurface for PixelsSurface {
    fn configure(&mut self, config: SurfaceConfig) -> Result<(), CompositorError> {
        if self.pixels.is_none() {
            return Err(CompositorError::SurfaceUnavailable);
        }

        self.reference_width = config.reference_width as usize;
        self.reference_height = config.reference_height as usize;
        Ok(())
    }

    fn set_crop(&mut self, crop: CropRect) -> Result<(), CompositorError> {
        let Some(pixels) = self.pixels.as_mut() else {
            return Err(CompositorError::SurfaceUnavailable);
        };

        let rect = crop.to_pixels(self.reference_width, self.reference_height);
        pixels
            .resize_buffer(rect.width as u32, rect.height as u32)
            .map_err(|e| CompositorError::Surface(e.to_string()))?;

        if let Some(window) = &self.window {
            let width = rect.width as u32 * self.scale;
            let height = rect.height as u32 * self.scale;
            let _ = window.request_inner_size(LogicalSize::new(width, height));
            window.set_title(&format!(
                "Indexed Compositor - {}x{} ({}x{} visible)",
                self.reference_width, self.reference_height, rect.width, rect.height
            ));
        }

        self.visible = Some(rect);
        Ok(())
    }

    fn set_pixels(&mut self, frame: &ResolvedFrame) -> Result<(), CompositorError> {
        let (Some(pixels), Some(rect)) = (self.pixels.as_mut(), self.visible) else {
            return Err(CompositorError::SurfaceUnavailable);
        };

        if frame.width() != self.reference_width || frame.height() != self.reference_height {
            return Err(CompositorError::Surface(format!(
                "Frame is {}x{}, surface expects {}x{}",
                frame.width(),
                frame.height(),
                self.reference_width,
                self.reference_height
            )));
        }

        let source = frame.as_slice();
        let output = pixels.frame_mut();
        let row_bytes = rect.width * 4;

        for (row, out_row) in output.chunks_exact_mut(row_bytes).take(rect.height).enumerate() {
            let start = (rect.y + row) * frame.width() + rect.x;
            let line = &source[start..start + rect.width];
            for (color, out) in line.iter().zip(out_row.chunks_exact_mut(4)) {
                out.copy_from_slice(&color.to_rgba8());
            }
        }

        Ok(())
    }

    fn apply(&mut self) -> Result<(), CompositorError> {
        match &self.pixels {
            Some(pixels) => pixels
                .render()
                .map_err(|e| CompositorError::Surface(e.to_string())),
            None => Err(CompositorError::SurfaceUnavailable),
        }
    }
}

/// Windowed front-end driving a compositor with the pattern producer
pub struct CompositorWindow {
    config: CompositorConfig,
    window_config: WindowConfig,
    compositor: Compositor<PatternProducer>,
    palette: Palette,
    surface: PixelsSurface,
    last_frame_time: Instant,
    half_resolution: bool,
}

impl CompositorWindow {
    /// Create the front-end (the window is created when the event loop starts)
    pub fn new(
        config: CompositorConfig,
        compositor: Compositor<PatternProducer>,
        palette: Palette,
    ) -> Self {
        let window_config = config.window_config();
        Self {
            config,
            window_config,
            compositor,
            palette,
            surface: PixelsSurface::new(window_config.scale),
            last_frame_time: Instant::now(),
            half_resolution: false,
        }
    }

    /// Check if enough time has passed for the next frame
    fn should_render_frame(&mut self) -> bool {
        let elapsed = self.last_frame_time.elapsed();
        let frame_duration = self.window_config.frame_duration();

        if elapsed >= frame_duration {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }

    fn target_resolution(&self) -> (u32, u32) {
        let (width, height) = (self.config.resolution.width, self.config.resolution.height);
        if self.half_resolution {
            ((width / 2).max(1), (height / 2).max(1))
        } else {
            (width, height)
        }
    }

    fn toggle_pause(&mut self) {
        if let Some(producer) = self.compositor.producer_mut() {
            let running = !producer.is_running();
            producer.set_running(running);
            log::info!("{}", if running { "Resumed" } else { "Paused" });
        }
    }

    fn toggle_resolution(&mut self) {
        self.half_resolution = !self.half_resolution;
        let (width, height) = self.target_resolution();
        if let Err(err) = self
            .compositor
            .reset_resolution(width, height, &mut self.surface)
        {
            log::error!("Resolution change failed: {}", err);
            self.half_resolution = !self.half_resolution;
        }
    }

    fn take_snapshot(&self) {
        let Some(viewport) = self.compositor.viewport() else {
            return;
        };
        match save_snapshot(
            self.compositor.resolved_frame(),
            viewport.crop,
            &self.config.snapshot,
        ) {
            Ok(path) => log::info!("Snapshot saved to {}", path.display()),
            Err(err) => log::error!("Snapshot failed: {}", err),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => self.toggle_pause(),
            KeyCode::KeyR => self.toggle_resolution(),
            KeyCode::F9 => self.take_snapshot(),
            _ => {}
        }
    }
}

impl ApplicationHandler for CompositorWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_attached() {
            return;
        }

        let (width, height) = self.target_resolution();
        let (window_width, window_height) = self.window_config.window_size(width, height);
        let window_attributes = Window::default_attributes()
            .with_title("Indexed Compositor")
            .with_inner_size(LogicalSize::new(window_width, window_height))
            .with_resizable(false);

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());

        let pixels = match Pixels::new(width, height, surface_texture) {
            Ok(pixels) => pixels,
            Err(err) => {
                log::error!("Failed to create pixel buffer: {}", err);
                event_loop.exit();
                return;
            }
        };

        self.surface.attach(window.clone(), pixels);

        if let Err(err) = self
            .compositor
            .reset_resolution(width, height, &mut self.surface)
        {
            log::error!("Failed to configure display: {}", err);
            event_loop.exit();
            return;
        }

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Err(err) = self.surface.resize_surface(size.width, size.height) {
                    log::error!("Surface resize failed: {}", err);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::RedrawRequested => {
                if self.should_render_frame() {
                    if let Err(err) = self.compositor.tick(&mut self.palette, &mut self.surface) {
                        log::error!("Render error: {}", err);
                        event_loop.exit();
                    }
                }

                if let Some(window) = &self.surface.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.surface.window {
            window.request_redraw();
        }
    }
}

/// Create and run the compositor window
pub fn run_display(config: CompositorConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let palette = config.load_palette()?;
    let producer = PatternProducer::new(config.resolution.width, config.resolution.height)
        .with_overscan(config.resolution.overscan_x, config.resolution.overscan_y)
        .with_palette_len(palette.len() as i32);

    let compositor = Compositor::from_config(&config)?;

    let event_loop = EventLoop::new()?;
    if config.video.vsync {
        event_loop.set_control_flow(ControlFlow::Wait);
    } else {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    let window_config = config.window_config();
    println!("Starting compositor...");
    println!(
        "  Resolution: {}x{}",
        config.resolution.width, config.resolution.height
    );
    println!(
        "  Overscan: {}x{}",
        config.resolution.overscan_x, config.resolution.overscan_y
    );
    println!("  Palette: {} entries", palette.len());
    println!("  Scale: {}x", window_config.scale);
    println!("  Target FPS: {}", window_config.target_fps);
    println!("  VSync: {}", window_config.vsync);

    let mut display = CompositorWindow::new(config, compositor, palette);
    // The surface is configured once the window exists
    display.compositor.load(producer, &mut display.surface)?;
    event_loop.run_app(&mut display)?;

    Ok(())
}
