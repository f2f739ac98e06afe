// Snapshot functionality
//
// Saves the visible (overscan-cropped) part of a resolved frame as a PNG file.

use crate::config::SnapshotConfig;
use crate::frame::ResolvedFrame;
use crate::viewport::CropRect;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during snapshot operations
#[derive(Debug)]
pub enum SnapshotError {
    /// I/O error
    Io(io::Error),

    /// PNG encoding error
    PngEncoding(png::EncodingError),

    /// The crop leaves nothing to save
    EmptyFrame,
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "I/O error: {}", e),
            SnapshotError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
            SnapshotError::EmptyFrame => write!(f, "Nothing visible to save"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<png::EncodingError> for SnapshotError {
    fn from(e: png::EncodingError) -> Self {
        SnapshotError::PngEncoding(e)
    }
}

/// Save the visible part of a frame into the configured directory
///
/// Returns the path of the written file.
pub fn save_snapshot(
    frame: &ResolvedFrame,
    crop: CropRect,
    config: &SnapshotConfig,
) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(&config.directory)?;

    let filename = if config.include_timestamp {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
        format!("snapshot_{}.png", timestamp)
    } else {
        "snapshot.png".to_string()
    };
    let file_path = config.directory.join(filename);

    let (rgb, width, height) = crop_to_rgb(frame, crop);
    if width == 0 || height == 0 {
        return Err(SnapshotError::EmptyFrame);
    }

    save_png(&file_path, &rgb, width, height)?;
    log::debug!("Wrote {}x{} snapshot", width, height);

    Ok(file_path)
}

/// Extract the cropped region of a frame as RGB888 bytes
///
/// Returns the bytes with the region's width and height.
pub fn crop_to_rgb(frame: &ResolvedFrame, crop: CropRect) -> (Vec<u8>, u32, u32) {
    let rect = crop.to_pixels(frame.width(), frame.height());
    let mut rgb = Vec::with_capacity(rect.width * rect.height * 3);

    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            rgb.extend_from_slice(&frame.get_pixel(x, y).to_rgb8());
        }
    }

    (rgb, rect.width as u32, rect.height as u32)
}

/// Save RGB data as a PNG file
fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), SnapshotError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}
