use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::SketchError;
use crate::export::DEFAULT_JPEG_QUALITY;
use crate::style::{ToolSettings, ToolType};

/// Environment variable naming an optional JSON configuration file
pub const CONFIG_ENV_VAR: &str = "SKETCH_CONFIG";

/// Hard floor for the logical surface size on either axis
pub const MIN_LOGICAL_SIZE: u32 = 240;

/// Startup settings for the sketch surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Smallest logical size of the surface on either axis, never below 240
    pub min_logical_size: u32,
    /// JPEG quality, 1..=100
    pub jpeg_quality: u8,
    /// Grid spacing in logical pixels
    pub grid_spacing: f32,
    pub grid_color: [u8; 3],
    pub default_color: [u8; 3],
    pub default_brush_size: f32,
    pub default_tool: ToolType,
    /// Where native builds write exported files
    pub output_dir: PathBuf,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            min_logical_size: MIN_LOGICAL_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            grid_spacing: 25.0,
            grid_color: [0xe0, 0xe0, 0xe0],
            default_color: [0, 0, 0],
            default_brush_size: 5.0,
            default_tool: ToolType::Pen,
            output_dir: PathBuf::from("."),
        }
    }
}

impl SketchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SketchError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn from_file(path: &Path) -> Result<Self, SketchError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load from the file named by `SKETCH_CONFIG`, falling back to defaults
    pub fn load() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path);
                config
            }
            Err(err) => {
                log::warn!("Failed to load configuration from {}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn grid_color32(&self) -> Color32 {
        let [r, g, b] = self.grid_color;
        Color32::from_rgb(r, g, b)
    }

    pub fn initial_settings(&self) -> ToolSettings {
        let [r, g, b] = self.default_color;
        ToolSettings::new(
            self.default_tool,
            Color32::from_rgb(r, g, b),
            self.default_brush_size,
        )
    }

    fn sanitized(mut self) -> Self {
        if self.min_logical_size < MIN_LOGICAL_SIZE {
            log::warn!(
                "Minimum surface size {} is below {}, raising it",
                self.min_logical_size,
                MIN_LOGICAL_SIZE
            );
            self.min_logical_size = MIN_LOGICAL_SIZE;
        }
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        if !(self.grid_spacing.is_finite() && self.grid_spacing >= 2.0) {
            log::warn!("Invalid grid spacing {}, using 25", self.grid_spacing);
            self.grid_spacing = 25.0;
        }
        self
    }
}
