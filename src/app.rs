use egui::{Color32, Rect, TextureOptions, pos2, vec2};

use crate::config::SketchConfig;
use crate::error::SketchError;
use crate::export::ExportFormat;
use crate::grid;
use crate::input::{InputEvent, InputHandler};
use crate::layout::{LayoutEvent, LayoutListener, SidePanelState};
use crate::sketch::Sketchpad;
use crate::style::ToolType;

pub struct SketchApp {
    sketch: Sketchpad,
    panel: SidePanelState,
    input: InputHandler,
    texture: Option<egui::TextureHandle>,
    uploaded_revision: Option<u64>,
    last_screen_rect: Option<Rect>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: SketchConfig,
    ) -> Result<Self, SketchError> {
        // The first frame resizes the surface to the real layout area
        let min = config.min_logical_size as f32;
        let sketch = Sketchpad::new(config, min, min, cc.egui_ctx.pixels_per_point())?;
        Ok(Self::with_sketchpad(sketch))
    }

    fn with_sketchpad(sketch: Sketchpad) -> Self {
        Self {
            sketch,
            panel: SidePanelState::default(),
            input: InputHandler::new(),
            texture: None,
            uploaded_revision: None,
            last_screen_rect: None,
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button("☰")
                    .on_hover_text("Toggle panel (Ctrl/Cmd+B)")
                    .clicked()
                {
                    self.panel.toggle(&mut self.sketch);
                }
                ui.heading("Sketch");
            });
        });
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        ui.separator();

        let mut tool = self.sketch.settings().tool;
        egui::ComboBox::from_label("Tool")
            .selected_text(tool.label())
            .show_ui(ui, |ui| {
                for candidate in ToolType::ALL {
                    ui.selectable_value(&mut tool, candidate, candidate.label());
                }
            });
        if tool != self.sketch.settings().tool {
            if let Err(err) = self.sketch.set_tool(tool) {
                log::debug!("Tool change rejected: {}", err);
            }
        }

        ui.horizontal(|ui| {
            ui.label("Color:");
            let mut color = self.sketch.settings().color;
            if egui::color_picker::color_edit_button_srgba(
                ui,
                &mut color,
                egui::color_picker::Alpha::Opaque,
            )
            .changed()
            {
                self.sketch.set_color(color);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Size:");
            let mut width = self.sketch.settings().width();
            if ui.add(egui::Slider::new(&mut width, 1.0..=50.0)).changed() {
                self.sketch.set_width(width);
            }
        });

        let mut grid = self.sketch.grid_enabled();
        if ui.checkbox(&mut grid, "Grid").changed() {
            self.sketch.set_grid(grid);
        }

        ui.separator();
        if ui.button("Clear").clicked() {
            self.sketch.clear();
        }
        ui.horizontal(|ui| {
            if ui.button("Save PNG").clicked() {
                self.sketch.export(ExportFormat::Png);
            }
            if ui.button("Save JPEG").clicked() {
                self.sketch.export(ExportFormat::Jpeg);
            }
        });
    }

    /// Re-upload the raster only when it changed since the last frame
    fn update_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let revision = self.sketch.surface().revision();
        if self.texture.is_none() || self.uploaded_revision != Some(revision) {
            let image = self.sketch.surface().to_color_image();
            match &mut self.texture {
                Some(texture) => texture.set(image, TextureOptions::LINEAR),
                None => {
                    self.texture =
                        Some(ctx.load_texture("sketch_surface", image, TextureOptions::LINEAR));
                }
            }
            self.uploaded_revision = Some(revision);
        }
        self.texture.as_ref().map(|texture| texture.id())
    }

    fn canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let area = response.rect;

        let screen_rect = ctx.screen_rect();
        if self.last_screen_rect.is_some_and(|last| last != screen_rect) {
            self.sketch.on_layout_change(&LayoutEvent::WindowResized);
        }
        self.last_screen_rect = Some(screen_rect);

        if let Err(err) = self
            .sketch
            .sync_layout(area.width(), area.height(), ctx.pixels_per_point())
        {
            log::error!("Failed to resize surface: {}", err);
        }

        // Presses under a popup or window belong to that layer
        let canvas_layer = ui.layer_id();
        let accepts_press =
            |pos: egui::Pos2| ctx.layer_id_at(pos).is_none_or(|layer| layer == canvas_layer);

        let events = ctx.input(|i| i.events.clone());
        for event in self.input.process_events(&events, area, accepts_press) {
            match event {
                InputEvent::TogglePanel => self.panel.toggle(&mut self.sketch),
                other => {
                    self.sketch.handle_input(other);
                }
            }
        }

        let [width, height] = self.sketch.surface().logical_size();
        let canvas_rect = Rect::from_min_size(area.min, vec2(width as f32, height as f32));
        grid::paint_background(&painter, canvas_rect, self.sketch.grid_style());
        if let Some(texture_id) = self.update_texture(ctx) {
            painter.image(
                texture_id,
                canvas_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    fn ui(&mut self, ctx: &egui::Context) {
        self.top_bar(ctx);

        egui::SidePanel::left("controls_panel")
            .resizable(false)
            .default_width(220.0)
            .show_animated(ctx, self.panel.is_open(), |ui| self.controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ctx, ui));
    }
}

impl eframe::App for SketchApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, RawInput};

    fn app() -> SketchApp {
        let mut sketch = Sketchpad::new(SketchConfig::default(), 240.0, 240.0, 1.0).unwrap();
        sketch.set_tool(ToolType::Rectangle).unwrap();
        SketchApp::with_sketchpad(sketch)
    }

    fn run_frame(
        app: &mut SketchApp,
        ctx: &egui::Context,
        events: Vec<egui::Event>,
        popup: bool,
    ) {
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            app.ui(ctx);
            if popup {
                egui::Area::new(egui::Id::new("popup"))
                    .order(egui::Order::Foreground)
                    .fixed_pos(pos2(300.0, 300.0))
                    .show(ctx, |ui| {
                        ui.set_min_size(vec2(300.0, 200.0));
                        ui.label("popup");
                    });
            }
        });
    }

    fn rectangle_gesture(app: &mut SketchApp, ctx: &egui::Context, popup: bool) {
        for _ in 0..3 {
            run_frame(app, ctx, Vec::new(), popup);
        }
        let button = |pos, pressed| egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        };
        let press = vec![
            egui::Event::PointerMoved(pos2(400.0, 350.0)),
            button(pos2(400.0, 350.0), true),
        ];
        run_frame(app, ctx, press, popup);
        run_frame(app, ctx, vec![egui::Event::PointerMoved(pos2(450.0, 380.0))], popup);
        run_frame(app, ctx, vec![button(pos2(450.0, 380.0), false)], popup);
    }

    fn inked_pixels(app: &SketchApp) -> usize {
        app.sketch
            .surface()
            .pixmap()
            .pixels()
            .iter()
            .filter(|p| p.alpha() > 0)
            .count()
    }

    #[test]
    fn test_drag_on_canvas_commits_rectangle() {
        let ctx = egui::Context::default();
        let mut app = app();
        rectangle_gesture(&mut app, &ctx, false);
        assert!(inked_pixels(&app) > 0);
    }

    #[test]
    fn test_drag_on_foreground_area_leaves_raster_untouched() {
        let ctx = egui::Context::default();
        let mut app = app();
        rectangle_gesture(&mut app, &ctx, true);
        assert!(ctx.layer_id_at(pos2(400.0, 350.0)).is_some());
        assert!(!app.sketch.machine().is_dragging());
        assert_eq!(inked_pixels(&app), 0);
    }
}
