// src/renderer.rs
use egui::Pos2;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Stroke};

use crate::style::{CompositeMode, PaintStyle};
use crate::surface::Surface;

/// A single outline primitive, in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// One incremental piece of a freehand path
    Segment { from: Pos2, to: Pos2 },
    Line { from: Pos2, to: Pos2 },
    /// Axis-aligned outline through two opposite corners, in any order
    Rectangle { corner_a: Pos2, corner_b: Pos2 },
    Circle { center: Pos2, radius: f32 },
}

impl Primitive {
    fn path(&self) -> Option<tiny_skia::Path> {
        match *self {
            Primitive::Segment { from, to } | Primitive::Line { from, to } => {
                let mut pb = PathBuilder::new();
                pb.move_to(from.x, from.y);
                pb.line_to(to.x, to.y);
                pb.finish()
            }
            Primitive::Rectangle { corner_a, corner_b } => {
                let (left, right) = (corner_a.x.min(corner_b.x), corner_a.x.max(corner_b.x));
                let (top, bottom) = (corner_a.y.min(corner_b.y), corner_a.y.max(corner_b.y));
                let mut pb = PathBuilder::new();
                pb.move_to(left, top);
                pb.line_to(right, top);
                pb.line_to(right, bottom);
                pb.line_to(left, bottom);
                pb.close();
                pb.finish()
            }
            Primitive::Circle { center, radius } => {
                if radius.is_finite() && radius > 0.0 {
                    PathBuilder::from_circle(center.x, center.y, radius)
                } else {
                    None
                }
            }
        }
    }
}

/// Issues stroked primitives against the surface raster
#[derive(Debug, Default, Clone, Copy)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Apply the paint style and stroke one primitive.
    ///
    /// Returns false when the primitive is degenerate and nothing was drawn.
    pub fn apply_style_and_draw(
        &self,
        surface: &mut Surface,
        style: &PaintStyle,
        primitive: Primitive,
    ) -> bool {
        let Some(path) = primitive.path() else {
            log::trace!("Skipping degenerate primitive {:?}", primitive);
            return false;
        };

        let mut paint = Paint {
            anti_alias: true,
            blend_mode: style.mode.blend_mode(),
            ..Default::default()
        };
        let [r, g, b, a] = style.color.to_srgba_unmultiplied();
        match style.mode {
            CompositeMode::Draw => paint.set_color_rgba8(r, g, b, a),
            // Only the source alpha matters for destination-out
            CompositeMode::Erase => paint.set_color_rgba8(0, 0, 0, 255),
        }

        let stroke = Stroke {
            width: style.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        let transform = surface.transform();
        surface
            .pixmap_mut()
            .stroke_path(&path, &paint, &stroke, transform, None);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, pos2};

    fn draw_style(width: f32) -> PaintStyle {
        PaintStyle {
            color: Color32::BLACK,
            width,
            mode: CompositeMode::Draw,
        }
    }

    fn alpha_at(surface: &Surface, x: u32, y: u32) -> u8 {
        surface.pixmap().pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    #[test]
    fn test_zero_radius_circle_is_a_no_op() {
        let mut surface = Surface::new(300.0, 300.0, 1.0, 240).unwrap();
        let drawn = Renderer::new().apply_style_and_draw(
            &mut surface,
            &draw_style(3.0),
            Primitive::Circle {
                center: pos2(50.0, 50.0),
                radius: 0.0,
            },
        );
        assert!(!drawn);
        assert!(surface.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_segment_uses_round_caps() {
        let mut surface = Surface::new(300.0, 300.0, 1.0, 240).unwrap();
        Renderer::new().apply_style_and_draw(
            &mut surface,
            &draw_style(10.0),
            Primitive::Segment {
                from: pos2(50.0, 50.0),
                to: pos2(100.0, 50.0),
            },
        );
        // Round cap extends past the end point by half the width
        assert!(alpha_at(&surface, 47, 50) > 200);
        assert!(alpha_at(&surface, 102, 50) > 200);
        assert_eq!(alpha_at(&surface, 110, 50), 0);
    }

    #[test]
    fn test_draws_in_logical_units() {
        let mut surface = Surface::new(300.0, 300.0, 2.0, 240).unwrap();
        Renderer::new().apply_style_and_draw(
            &mut surface,
            &draw_style(4.0),
            Primitive::Line {
                from: pos2(10.0, 20.0),
                to: pos2(110.0, 20.0),
            },
        );
        assert!(alpha_at(&surface, 120, 40) > 200);
        assert_eq!(alpha_at(&surface, 120, 20), 0);
    }
}
