use egui::Color32;

use crate::config::SketchConfig;
use crate::download;
use crate::error::{SketchError, TransitionError};
use crate::export::{self, ExportFormat};
use crate::gesture::ToolMachine;
use crate::input::InputEvent;
use crate::layout::{LayoutEvent, LayoutListener};
use crate::style::{ToolSettings, ToolType};
use crate::surface::Surface;

/// The drawing surface together with its tool state and settings
#[derive(Debug)]
pub struct Sketchpad {
    surface: Surface,
    machine: ToolMachine,
    settings: ToolSettings,
    grid: bool,
    layout_dirty: bool,
    config: SketchConfig,
}

impl Sketchpad {
    /// Creates a sketchpad with a blank surface sized for the given layout area
    ///
    /// Args:
    ///     config (SketchConfig): Startup settings, including the minimum surface size
    ///     width, height (f32): Layout area in logical pixels
    ///     scale (f32): Device pixel ratio
    ///
    /// Returns:
    ///     Result<Self, SketchError>: Fails only if the raster cannot be allocated
    pub fn new(
        config: SketchConfig,
        width: f32,
        height: f32,
        scale: f32,
    ) -> Result<Self, SketchError> {
        let surface = Surface::new(width, height, scale, config.min_logical_size)?;
        Ok(Self {
            surface,
            machine: ToolMachine::new(),
            settings: config.initial_settings(),
            grid: false,
            layout_dirty: false,
            config,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn machine(&self) -> &ToolMachine {
        &self.machine
    }

    pub fn grid_enabled(&self) -> bool {
        self.grid
    }

    /// Route one canvas input event through the tool state machine.
    ///
    /// Returns true when the raster changed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown(pos) => {
                self.machine.pointer_down(pos, &self.settings);
                false
            }
            InputEvent::PointerMove(pos) => {
                self.machine
                    .pointer_move(pos, &self.settings, &mut self.surface)
            }
            InputEvent::PointerUp(pos) => {
                self.machine
                    .pointer_up(pos, &self.settings, &mut self.surface)
            }
            InputEvent::PointerCancel => {
                self.machine.cancel();
                false
            }
            // Panel toggling belongs to the layout owner
            InputEvent::TogglePanel => false,
        }
    }

    /// Select a tool. Rejected while a gesture is in progress.
    pub fn set_tool(&mut self, tool: ToolType) -> Result<(), TransitionError> {
        if tool == self.settings.tool {
            return Ok(());
        }
        if self.machine.is_dragging() {
            log::warn!(
                "Ignoring tool change to {} while dragging with {}",
                tool.id(),
                self.settings.tool.id()
            );
            return Err(TransitionError::ToolBusy(format!(
                "{} gesture in progress",
                self.settings.tool.id()
            )));
        }
        log::info!("Tool selected: {}", tool.id());
        self.settings.tool = tool;
        Ok(())
    }

    pub fn set_color(&mut self, color: Color32) {
        self.settings.color = color;
    }

    pub fn set_width(&mut self, width: f32) -> bool {
        self.settings.set_width(width)
    }

    /// Toggle the cosmetic grid background
    pub fn set_grid(&mut self, on: bool) {
        self.grid = on;
    }

    pub fn clear(&mut self) {
        log::info!("Clearing surface");
        self.surface.clear();
    }

    /// Grid parameters for the background painter, if the grid is on
    pub fn grid_style(&self) -> Option<(f32, Color32)> {
        self.grid
            .then(|| (self.config.grid_spacing, self.config.grid_color32()))
    }

    /// Resize the surface when the layout area, scale or panel state changed.
    ///
    /// Returns true if a resize happened.
    pub fn sync_layout(
        &mut self,
        width: f32,
        height: f32,
        scale: f32,
    ) -> Result<bool, SketchError> {
        if !self.layout_dirty && !self.surface.needs_resize(width, height, scale) {
            return Ok(false);
        }
        self.surface.resize(width, height, scale)?;
        self.layout_dirty = false;
        Ok(true)
    }

    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>, SketchError> {
        export::encode(&self.surface, format, self.config.jpeg_quality)
    }

    /// Encode and deliver the drawing. Failures are logged and otherwise ignored.
    pub fn export(&self, format: ExportFormat) {
        let result = self.encode(format).and_then(|bytes| {
            download::deliver(
                format.file_name(),
                format.mime_type(),
                &bytes,
                &self.config.output_dir,
            )
        });
        if let Err(err) = result {
            log::error!("Failed to export {}: {}", format.file_name(), err);
        }
    }
}

impl LayoutListener for Sketchpad {
    fn on_layout_change(&mut self, event: &LayoutEvent) {
        log::debug!("Layout changed: {:?}", event);
        self.layout_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn sketchpad() -> Sketchpad {
        Sketchpad::new(SketchConfig::default(), 300.0, 300.0, 1.0).unwrap()
    }

    #[test]
    fn test_tool_change_rejected_while_dragging() {
        let mut pad = sketchpad();
        pad.set_tool(ToolType::Line).unwrap();
        pad.handle_input(InputEvent::PointerDown(pos2(10.0, 10.0)));
        assert!(matches!(
            pad.set_tool(ToolType::Circle),
            Err(TransitionError::ToolBusy(_))
        ));
        assert_eq!(pad.settings().tool, ToolType::Line);

        pad.handle_input(InputEvent::PointerUp(Some(pos2(50.0, 10.0))));
        assert!(pad.set_tool(ToolType::Circle).is_ok());
        assert_eq!(pad.settings().tool, ToolType::Circle);
    }

    #[test]
    fn test_layout_change_forces_resize() {
        let mut pad = sketchpad();
        assert!(!pad.sync_layout(300.0, 300.0, 1.0).unwrap());
        pad.on_layout_change(&LayoutEvent::PanelClosed);
        assert!(pad.sync_layout(300.0, 300.0, 1.0).unwrap());
        assert!(!pad.sync_layout(300.0, 300.0, 1.0).unwrap());
    }

    #[test]
    fn test_failed_resize_keeps_pending_layout_change() {
        let mut pad = sketchpad();
        pad.on_layout_change(&LayoutEvent::PanelOpened);
        assert!(pad.sync_layout(40000.0, 300.0, 1.0).is_err());
        assert_eq!(pad.surface().physical_size(), [300, 300]);
        // The unchanged area still resizes because the panel change is pending
        assert!(pad.sync_layout(300.0, 300.0, 1.0).unwrap());
        assert!(!pad.sync_layout(300.0, 300.0, 1.0).unwrap());
    }

    #[test]
    fn test_grid_has_no_raster_effect() {
        let mut pad = sketchpad();
        let revision = pad.surface().revision();
        pad.set_grid(true);
        assert_eq!(pad.grid_style().map(|(spacing, _)| spacing), Some(25.0));
        assert_eq!(pad.surface().revision(), revision);
        pad.set_grid(false);
        assert!(pad.grid_style().is_none());
    }

    #[test]
    fn test_clear_wipes_raster() {
        let mut pad = sketchpad();
        pad.handle_input(InputEvent::PointerDown(pos2(10.0, 10.0)));
        assert!(pad.handle_input(InputEvent::PointerMove(Some(pos2(100.0, 100.0)))));
        pad.handle_input(InputEvent::PointerUp(None));
        pad.clear();
        assert!(pad.surface().pixmap().data().iter().all(|&b| b == 0));
    }
}
