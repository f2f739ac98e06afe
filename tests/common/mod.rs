// Common test utilities for compositor integration tests
//
// Provides a palette source and a producer with plain public fields so tests
// can poke at collaborator state the way a host engine would.

#![allow(dead_code)]

use indexed_compositor::{Color, FrameProducer, IndexedFrame, PaletteEntry, PaletteSource};

pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

/// Palette source whose dirty bit is only touched when a test says so
pub struct TestPalette {
    pub entries: Vec<PaletteEntry>,
    pub length: usize,
    pub invalid: bool,
    pub background_index: i32,
    pub acknowledgements: u32,
}

impl TestPalette {
    /// Four slots: red, green, blue and an inactive black
    pub fn rgb(background_index: i32) -> Self {
        Self {
            entries: vec![
                PaletteEntry::new(0, 1.0, 0.0, 0.0),
                PaletteEntry::new(1, 0.0, 1.0, 0.0),
                PaletteEntry::new(2, 0.0, 0.0, 1.0),
                PaletteEntry {
                    index: 3,
                    r: 0.0,
                    g: 0.0,
                    b: 0.0,
                    active: false,
                },
            ],
            length: 4,
            invalid: true,
            background_index,
            acknowledgements: 0,
        }
    }
}

impl PaletteSource for TestPalette {
    fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    fn len(&self) -> usize {
        self.length
    }

    fn is_invalid(&self) -> bool {
        self.invalid
    }

    fn background_index(&self) -> i32 {
        self.background_index
    }

    fn acknowledge_refresh(&mut self) {
        self.invalid = false;
        self.acknowledgements += 1;
    }
}

/// Producer that keeps whatever pixels it is given
pub struct TestProducer {
    pub frame: IndexedFrame,
    pub running: bool,
    pub overscan_x: u32,
    pub overscan_y: u32,
}

impl TestProducer {
    pub fn new(width: usize, height: usize, pixels: Vec<i32>) -> Self {
        Self {
            frame: IndexedFrame::from_pixels(width, height, pixels),
            running: true,
            overscan_x: 0,
            overscan_y: 0,
        }
    }
}

impl FrameProducer for TestProducer {
    fn frame(&self) -> &IndexedFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut IndexedFrame {
        &mut self.frame
    }

    fn reset_resolution(&mut self, width: u32, height: u32) {
        if self.frame.width() != width as usize || self.frame.height() != height as usize {
            self.frame.resize(width as usize, height as usize);
        }
        // Overscan of one sixteenth of each axis
        self.overscan_x = width / 16;
        self.overscan_y = height / 16;
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

    fn update(&mut self) {}
}
