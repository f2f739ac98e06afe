// Frame producer - The collaborator that writes indexed frames
//
// A producer owns the IndexedFrame. It writes the frame during `update`, and
// the compositor borrows it mutably during `draw` to substitute transparent
// pixels; that rewrite is what the producer sees on its next `update`.

use crate::frame::{IndexedFrame, TRANSPARENT};

/// Source of indexed frames
pub trait FrameProducer {
    /// The current indexed frame
    fn frame(&self) -> &IndexedFrame;

    /// Mutable access for in-place transparent substitution
    fn frame_mut(&mut self) -> &mut IndexedFrame;

    /// Regenerate the indexed frame at a new internal resolution
    fn reset_resolution(&mut self, width: u32, height: u32);

    /// Columns of the frame hidden by overscan
    fn overscan_x(&self) -> u32;

    /// Rows of the frame hidden by overscan
    fn overscan_y(&self) -> u32;

    /// Whether the producer is generating frames
    fn is_running(&self) -> bool;

    /// Produce the next frame
    fn update(&mut self);
}

/// Size of one pattern cell in pixels
const CELL_SIZE: usize = 16;

/// Index written into the last cell to exercise the diagnostic color
pub const OUT_OF_RANGE_INDEX: i32 = 0x7FFF;

/// Producer that paints a scrolling palette sweep
///
/// Cells whose index falls in a problematic-black column ($xD) are left
/// transparent and the bottom-right cell holds an out-of-range index, so the
/// background and diagnostic paths are always visible.
#[derive(Debug, Clone)]
pub struct PatternProducer {
    frame: IndexedFrame,
    running: bool,
    base_width: u32,
    base_height: u32,
    base_overscan_x: u32,
    base_overscan_y: u32,
    overscan_x: u32,
    overscan_y: u32,
    palette_len: i32,
    frame_count: u64,
}

impl PatternProducer {
    /// Create a running producer at the given resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: IndexedFrame::new(width as usize, height as usize),
            running: true,
            base_width: width.max(1),
            base_height: height.max(1),
            base_overscan_x: 0,
            base_overscan_y: 0,
            overscan_x: 0,
            overscan_y: 0,
            palette_len: 64,
            frame_count: 0,
        }
    }

    /// Set the overscan margins at the creation resolution
    ///
    /// Margins scale proportionally when the resolution changes.
    pub fn with_overscan(mut self, overscan_x: u32, overscan_y: u32) -> Self {
        self.base_overscan_x = overscan_x;
        self.base_overscan_y = overscan_y;
        self.overscan_x = overscan_x;
        self.overscan_y = overscan_y;
        self
    }

    /// Set how many palette slots the sweep cycles through
    pub fn with_palette_len(mut self, len: i32) -> Self {
        self.palette_len = len.max(1);
        self
    }

    /// Pause or resume frame generation
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Number of frames produced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn paint(&mut self) {
        let width = self.frame.width();
        let height = self.frame.height();
        let columns = width.div_ceil(CELL_SIZE);
        let rows = height.div_ceil(CELL_SIZE);
        let shift = (self.frame_count / 8) as usize;

        for y in 0..height {
            let cy = y / CELL_SIZE;
            for x in 0..width {
                let cx = x / CELL_SIZE;
                let index = if cx + 1 == columns && cy + 1 == rows {
                    OUT_OF_RANGE_INDEX
                } else {
                    let index = ((cx + cy * columns + shift) % self.palette_len as usize) as i32;
                    if (index & 0x0F) == 0x0D {
                        TRANSPARENT
                    } else {
                        index
                    }
                };
                self.frame.set_pixel(x, y, index);
            }
        }
    }
}

impl FrameProducer for PatternProducer {
    fn frame(&self) -> &IndexedFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut IndexedFrame {
        &mut self.frame
    }

    fn reset_resolution(&mut self, width: u32, height: u32) {
        self.frame.resize(width as usize, height as usize);
        self.overscan_x = scale_margin(self.base_overscan_x, width, self.base_width);
        self.overscan_y = scale_margin(self.base_overscan_y, height, self.base_height);
        self.paint();
    }

    fn overscan_x(&self) -> u32 {
        self.overscan_x
    }

    fn overscan_y(&self) -> u32 {
        self.overscan_y
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn update(&mut self) {
        self.paint();
        self.frame_count += 1;
    }
}

fn scale_margin(margin: u32, size: u32, base: u32) -> u32 {
    (u64::from(margin) * u64::from(size) / u64::from(base)) as u32
}
