//! The tool state machine driving a single pointer gesture.
//!
//! ```text
//!            pointer-down                 pointer-up
//!   ┌──────┐ ──────────────► ┌──────────┐ ─────────► ┌──────┐
//!   │ Idle │                 │ Dragging │            │ Idle │
//!   └──────┘ ◄────────────── └──────────┘            └──────┘
//!                 cancel        │    ▲
//!                               └────┘ pointer-move
//! ```
//!
//! Freehand tools (pen, eraser) ink each move as it arrives. Shape tools (line,
//! rectangle, circle) draw nothing until release, then commit from the anchor to
//! the release point.
use egui::Pos2;

use crate::renderer::{Primitive, Renderer};
use crate::style::{ToolSettings, ToolType};
use crate::surface::Surface;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position at pointer-down
        anchor: Pos2,
        /// Last known pointer position
        last: Pos2,
    },
}

#[derive(Debug, Default)]
pub struct ToolMachine {
    state: GestureState,
    renderer: Renderer,
}

impl ToolMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Start a gesture at `pos`. A second pointer-down restarts the gesture.
    pub fn pointer_down(&mut self, pos: Pos2, settings: &ToolSettings) {
        if self.is_dragging() {
            log::debug!("Pointer down while dragging, restarting gesture at {:?}", pos);
        } else {
            log::trace!("{} gesture started at {:?}", settings.tool.id(), pos);
        }
        self.state = GestureState::Dragging {
            anchor: pos,
            last: pos,
        };
    }

    /// Extend a freehand path. Returns true if anything was drawn.
    pub fn pointer_move(
        &mut self,
        pos: Option<Pos2>,
        settings: &ToolSettings,
        surface: &mut Surface,
    ) -> bool {
        let GestureState::Dragging { anchor, last } = self.state else {
            return false;
        };
        // Missing coordinates count as no movement
        let Some(pos) = pos else {
            return false;
        };
        self.state = GestureState::Dragging { anchor, last: pos };

        if !settings.tool.is_freehand() || pos == last {
            return false;
        }
        self.renderer.apply_style_and_draw(
            surface,
            &settings.style(),
            Primitive::Segment { from: last, to: pos },
        )
    }

    /// Finish the gesture, committing shape tools. A release while idle is ignored.
    pub fn pointer_up(
        &mut self,
        pos: Option<Pos2>,
        settings: &ToolSettings,
        surface: &mut Surface,
    ) -> bool {
        let GestureState::Dragging { anchor, last } = std::mem::take(&mut self.state) else {
            log::trace!("Pointer up without a gesture, ignoring");
            return false;
        };
        let end = pos.unwrap_or(last);

        let primitive = match settings.tool {
            ToolType::Pen | ToolType::Eraser => return false,
            ToolType::Line => Primitive::Line {
                from: anchor,
                to: end,
            },
            ToolType::Rectangle => Primitive::Rectangle {
                corner_a: anchor,
                corner_b: end,
            },
            ToolType::Circle => Primitive::Circle {
                center: anchor,
                radius: anchor.distance(end),
            },
        };
        log::debug!("Committing {} from {:?} to {:?}", settings.tool.id(), anchor, end);
        self.renderer
            .apply_style_and_draw(surface, &settings.style(), primitive)
    }

    /// Abandon the current gesture without committing anything
    pub fn cancel(&mut self) -> bool {
        if self.is_dragging() {
            log::debug!("Gesture cancelled");
            self.state = GestureState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, pos2};

    fn setup(tool: ToolType) -> (ToolMachine, ToolSettings, Surface) {
        (
            ToolMachine::new(),
            ToolSettings::new(tool, Color32::BLACK, 4.0),
            Surface::new(300.0, 300.0, 1.0, 240).unwrap(),
        )
    }

    fn is_blank(surface: &Surface) -> bool {
        surface.pixmap().data().iter().all(|&b| b == 0)
    }

    #[test]
    fn test_pointer_up_while_idle_is_a_no_op() {
        let (mut machine, settings, mut surface) = setup(ToolType::Line);
        let revision = surface.revision();
        assert!(!machine.pointer_up(Some(pos2(40.0, 40.0)), &settings, &mut surface));
        assert_eq!(surface.revision(), revision);
        assert!(is_blank(&surface));
    }

    #[test]
    fn test_shape_tools_do_not_preview() {
        let (mut machine, settings, mut surface) = setup(ToolType::Rectangle);
        machine.pointer_down(pos2(20.0, 20.0), &settings);
        assert!(!machine.pointer_move(Some(pos2(80.0, 80.0)), &settings, &mut surface));
        assert!(is_blank(&surface));
        assert!(machine.pointer_up(Some(pos2(80.0, 80.0)), &settings, &mut surface));
        assert!(!is_blank(&surface));
        assert_eq!(machine.state(), GestureState::Idle);
    }

    #[test]
    fn test_pen_inks_on_move() {
        let (mut machine, settings, mut surface) = setup(ToolType::Pen);
        machine.pointer_down(pos2(20.0, 20.0), &settings);
        assert!(machine.pointer_move(Some(pos2(60.0, 20.0)), &settings, &mut surface));
        assert!(!is_blank(&surface));
        assert!(!machine.pointer_up(Some(pos2(60.0, 20.0)), &settings, &mut surface));
    }

    #[test]
    fn test_missing_move_coordinate_is_no_movement() {
        let (mut machine, settings, mut surface) = setup(ToolType::Pen);
        machine.pointer_down(pos2(20.0, 20.0), &settings);
        assert!(!machine.pointer_move(None, &settings, &mut surface));
        assert_eq!(
            machine.state(),
            GestureState::Dragging {
                anchor: pos2(20.0, 20.0),
                last: pos2(20.0, 20.0)
            }
        );
    }

    #[test]
    fn test_missing_release_coordinate_uses_last_position() {
        let (mut machine, settings, mut surface) = setup(ToolType::Line);
        machine.pointer_down(pos2(20.0, 50.0), &settings);
        machine.pointer_move(Some(pos2(120.0, 50.0)), &settings, &mut surface);
        assert!(machine.pointer_up(None, &settings, &mut surface));
        let alpha = surface.pixmap().pixel(100, 50).map(|p| p.alpha()).unwrap_or(0);
        assert!(alpha > 200);
    }

    #[test]
    fn test_cancel_discards_pending_shape() {
        let (mut machine, settings, mut surface) = setup(ToolType::Circle);
        machine.pointer_down(pos2(100.0, 100.0), &settings);
        assert!(machine.cancel());
        assert!(!machine.pointer_up(Some(pos2(150.0, 100.0)), &settings, &mut surface));
        assert!(is_blank(&surface));
        assert!(!machine.cancel());
    }

    #[test]
    fn test_second_pointer_down_moves_anchor() {
        let (mut machine, settings, _surface) = setup(ToolType::Line);
        machine.pointer_down(pos2(10.0, 10.0), &settings);
        machine.pointer_down(pos2(30.0, 30.0), &settings);
        assert!(matches!(
            machine.state(),
            GestureState::Dragging { anchor, .. } if anchor == pos2(30.0, 30.0)
        ));
    }
}
