// Configuration management
//
// Handles compositor configuration and settings persistence.

use crate::color::Color;
use crate::display::WindowConfig;
use crate::palette::{Palette, PaletteError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default configuration file path
pub const CONFIG_FILE: &str = "compositor_config.toml";

/// Errors that can occur while loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error
    Io(io::Error),

    /// TOML parse error
    Parse(toml::de::Error),

    /// TOML serialization error
    Serialize(toml::ser::Error),

    /// A setting is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialization error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Compositor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositorConfig {
    /// Video settings
    pub video: VideoConfig,

    /// Internal resolution and overscan
    pub resolution: ResolutionConfig,

    /// Palette settings
    pub palette: PaletteConfig,

    /// Snapshot settings
    pub snapshot: SnapshotConfig,
}

/// Video configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Window scale (1-8)
    pub scale: u32,

    /// Enable VSync
    pub vsync: bool,

    /// Target FPS (usually 60 for NTSC)
    pub fps: u32,
}

/// Resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Internal width in pixels
    pub width: u32,

    /// Internal height in pixels
    pub height: u32,

    /// Columns hidden by overscan
    pub overscan_x: u32,

    /// Rows hidden by overscan
    pub overscan_y: u32,
}

/// Palette configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Optional .pal file; the built-in master palette is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Index transparent pixels are substituted with
    pub background_index: i32,

    /// Color for indices that cannot be resolved
    pub diagnostic_color: Color,
}

/// Snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot directory
    pub directory: PathBuf,

    /// Include timestamp in filename
    pub include_timestamp: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        CompositorConfig {
            video: VideoConfig {
                scale: 3,
                vsync: true,
                fps: 60,
            },
            resolution: ResolutionConfig {
                width: 256,
                height: 240,
                overscan_x: 0,
                overscan_y: 16,
            },
            palette: PaletteConfig {
                file: None,
                background_index: 0x0F,
                diagnostic_color: Color::MAGENTA,
            },
            snapshot: SnapshotConfig {
                directory: PathBuf::from("snapshots"),
                include_timestamp: true,
            },
        }
    }
}

impl CompositorConfig {
    /// Load configuration from file or create default
    ///
    /// If the file doesn't exist or can't be parsed, the default configuration
    /// is returned and an attempt is made to write it out.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!(
                    "Using default configuration ({}): {}",
                    path.display(),
                    err
                );
                let config = Self::default();
                if let Err(err) = config.save(path) {
                    log::debug!("Could not write default configuration: {}", err);
                }
                config
            }
        }
    }

    /// Load and validate configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check settings the compositor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let res = &self.resolution;
        if res.width == 0 || res.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                res.width, res.height
            )));
        }
        if res.overscan_x >= res.width || res.overscan_y >= res.height {
            return Err(ConfigError::Invalid(format!(
                "overscan {}x{} leaves no visible area at {}x{}",
                res.overscan_x, res.overscan_y, res.width, res.height
            )));
        }
        if self.video.fps == 0 {
            return Err(ConfigError::Invalid("fps must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Window settings derived from the video section
    pub fn window_config(&self) -> WindowConfig {
        WindowConfig::new()
            .with_scale(self.video.scale)
            .with_fps(self.video.fps)
            .with_vsync(self.video.vsync)
    }

    /// Build the palette source described by this configuration
    pub fn load_palette(&self) -> Result<Palette, PaletteError> {
        let background = self.palette.background_index;
        match &self.palette.file {
            Some(path) => Palette::load(path, background),
            None => {
                let mut palette = Palette::master();
                palette.set_background_index(background);
                Ok(palette)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteSource;

    #[test]
    fn test_default_config() {
        let config = CompositorConfig::default();
        assert_eq!(config.video.scale, 3);
        assert_eq!(config.video.fps, 60);
        assert_eq!(config.resolution.width, 256);
        assert_eq!(config.resolution.height, 240);
        assert_eq!(config.palette.diagnostic_color, Color::MAGENTA);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = CompositorConfig::default();
        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        let deserialized: CompositorConfig =
            toml::from_str(&toml_str).expect("Failed to deserialize");

        assert_eq!(config.resolution.overscan_y, deserialized.resolution.overscan_y);
        assert_eq!(config.palette.diagnostic_color, deserialized.palette.diagnostic_color);
        assert!(deserialized.palette.file.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_resolution() {
        let mut config = CompositorConfig::default();
        config.resolution.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_overscan() {
        let mut config = CompositorConfig::default();
        config.resolution.overscan_y = 240;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_window_config() {
        let mut config = CompositorConfig::default();
        config.video.scale = 2;
        config.video.vsync = false;

        let window = config.window_config();
        assert_eq!(window.scale, 2);
        assert!(!window.vsync);
    }

    #[test]
    fn test_load_palette_master() {
        let mut config = CompositorConfig::default();
        config.palette.background_index = 0x21;

        let palette = config.load_palette().expect("master palette");
        assert_eq!(palette.len(), 64);
        assert_eq!(palette.background_index(), 0x21);
    }

    #[test]
    fn test_load_missing_file() {
        let result = CompositorConfig::load("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
