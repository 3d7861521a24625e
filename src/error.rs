use thiserror::Error;

/// Errors raised by the drawing surface, exporter and configuration loader
#[derive(Error, Debug)]
pub enum SketchError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("download failed: {0}")]
    Download(String),
}

/// Errors that can occur during tool state transitions
#[derive(Error, Debug, PartialEq)]
pub enum TransitionError {
    /// Tool is busy and cannot transition
    #[error("Tool busy: {0}")]
    ToolBusy(String),
}
