use egui::{Color32, Painter, Pos2, Rect, Stroke, pos2};

/// Vertical then horizontal grid lines covering `rect`, `spacing` apart
pub fn grid_lines(rect: Rect, spacing: f32) -> Vec<[Pos2; 2]> {
    if !(spacing.is_finite() && spacing > 0.0) || !rect.is_positive() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut x = rect.min.x;
    while x <= rect.max.x {
        lines.push([pos2(x, rect.min.y), pos2(x, rect.max.y)]);
        x += spacing;
    }
    let mut y = rect.min.y;
    while y <= rect.max.y {
        lines.push([pos2(rect.min.x, y), pos2(rect.max.x, y)]);
        y += spacing;
    }
    lines
}

/// Paint the white page, plus the grid when enabled. Never touches the raster.
pub fn paint_background(painter: &Painter, rect: Rect, grid: Option<(f32, Color32)>) {
    painter.rect_filled(rect, 0.0, Color32::WHITE);
    if let Some((spacing, color)) = grid {
        let stroke = Stroke::new(1.0, color);
        for line in grid_lines(rect, spacing) {
            painter.line_segment(line, stroke);
        }
    }
}
