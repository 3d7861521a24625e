use egui::Color32;
use serde::{Deserialize, Serialize};

/// The drawing tools offered by the control panel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    #[default]
    #[serde(rename = "pen")]
    Pen,
    #[serde(rename = "eraser")]
    Eraser,
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "rect")]
    Rectangle,
    #[serde(rename = "circle")]
    Circle,
}

impl ToolType {
    pub const ALL: [ToolType; 5] = [
        ToolType::Pen,
        ToolType::Eraser,
        ToolType::Line,
        ToolType::Rectangle,
        ToolType::Circle,
    ];

    /// Stable identifier, matching the serialized name
    pub fn id(self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Eraser => "eraser",
            Self::Line => "line",
            Self::Rectangle => "rect",
            Self::Circle => "circle",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pen => "🖊 Pen",
            Self::Eraser => "⌫ Eraser",
            Self::Line => "╱ Line",
            Self::Rectangle => "◻ Rectangle",
            Self::Circle => "◯ Circle",
        }
    }

    /// Freehand tools lay ink down while the pointer moves
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pen | Self::Eraser)
    }

    pub fn composite_mode(self) -> CompositeMode {
        match self {
            Self::Eraser => CompositeMode::Erase,
            _ => CompositeMode::Draw,
        }
    }
}

/// How new pixels combine with the raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Paint over existing content
    Draw,
    /// Remove existing content, down to full transparency
    Erase,
}

impl CompositeMode {
    pub fn blend_mode(self) -> tiny_skia::BlendMode {
        match self {
            Self::Draw => tiny_skia::BlendMode::SourceOver,
            Self::Erase => tiny_skia::BlendMode::DestinationOut,
        }
    }
}

/// Style applied to every primitive the renderer issues
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStyle {
    pub color: Color32,
    pub width: f32,
    pub mode: CompositeMode,
}

/// Active tool plus brush settings, passed explicitly to every draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    pub tool: ToolType,
    pub color: Color32,
    width: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolType::Pen,
            color: Color32::BLACK,
            width: 5.0,
        }
    }
}

impl ToolSettings {
    pub fn new(tool: ToolType, color: Color32, width: f32) -> Self {
        let mut settings = Self {
            tool,
            color,
            ..Default::default()
        };
        settings.set_width(width);
        settings
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Non-positive or non-finite widths are ignored; the previous width stays.
    pub fn set_width(&mut self, width: f32) -> bool {
        if width.is_finite() && width > 0.0 {
            self.width = width;
            true
        } else {
            log::warn!("Ignoring invalid brush width: {}", width);
            false
        }
    }

    pub fn style(&self) -> PaintStyle {
        PaintStyle {
            color: self.color,
            width: self.width,
            mode: self.tool.composite_mode(),
        }
    }
}
