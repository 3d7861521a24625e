#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod download;
pub mod error;
pub mod export;
pub mod gesture;
pub mod grid;
pub mod input;
pub mod layout;
pub mod renderer;
pub mod sketch;
pub mod style;
pub mod surface;

pub use app::SketchApp;
pub use config::SketchConfig;
pub use error::{SketchError, TransitionError};
pub use export::ExportFormat;
pub use gesture::{GestureState, ToolMachine};
pub use input::{InputEvent, InputHandler};
pub use layout::{LayoutEvent, LayoutListener, SidePanelState};
pub use renderer::{Primitive, Renderer};
pub use sketch::Sketchpad;
pub use style::{CompositeMode, PaintStyle, ToolSettings, ToolType};
pub use surface::{Snapshot, Surface, SurfaceSize};
