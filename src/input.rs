use egui::{Key, PointerButton, Pos2, Rect};

/// Canvas-level input, with positions in logical surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed inside the canvas
    PointerDown(Pos2),
    /// Pointer moved over the canvas; `None` when the position is unknown
    PointerMove(Option<Pos2>),
    /// Primary button released anywhere in the window
    PointerUp(Option<Pos2>),
    /// The pointer left the window or the window lost focus
    PointerCancel,
    /// Ctrl/Cmd+B
    TogglePanel,
}

/// Translate a screen position into coordinates relative to the canvas top-left
pub fn to_logical(pos: Pos2, canvas_rect: Rect) -> Pos2 {
    (pos - canvas_rect.min).to_pos2()
}

/// Converts raw egui events into [`InputEvent`]s for the sketch surface
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn finite(pos: Pos2) -> Option<Pos2> {
        (pos.x.is_finite() && pos.y.is_finite()).then_some(pos)
    }

    /// Process one frame of raw events against the current canvas rectangle
    ///
    /// Args:
    ///     events (&[egui::Event]): Raw events for this frame
    ///     canvas_rect (Rect): Screen rectangle of the drawing surface
    ///     accepts_press (Fn(Pos2) -> bool): Whether a press at a screen position lands on
    ///         the canvas rather than on a popup or window layered above it
    ///
    /// Returns:
    ///     Vec<InputEvent>: Canvas events in logical surface coordinates
    pub fn process_events(
        &mut self,
        events: &[egui::Event],
        canvas_rect: Rect,
        accepts_press: impl Fn(Pos2) -> bool,
    ) -> Vec<InputEvent> {
        let mut out = Vec::new();

        for event in events {
            match event {
                egui::Event::PointerMoved(pos) => {
                    let pos = Self::finite(*pos);
                    if let Some(pos) = pos {
                        self.last_pointer_pos = Some(pos);
                        if canvas_rect.contains(pos) {
                            out.push(InputEvent::PointerMove(Some(to_logical(pos, canvas_rect))));
                        }
                    } else {
                        out.push(InputEvent::PointerMove(None));
                    }
                }
                egui::Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    let pos = Self::finite(*pos).or(self.last_pointer_pos);
                    if *pressed {
                        if let Some(pos) =
                            pos.filter(|p| canvas_rect.contains(*p) && accepts_press(*p))
                        {
                            self.last_pointer_pos = Some(pos);
                            out.push(InputEvent::PointerDown(to_logical(pos, canvas_rect)));
                        }
                    } else {
                        out.push(InputEvent::PointerUp(
                            pos.map(|p| to_logical(p, canvas_rect)),
                        ));
                    }
                }
                egui::Event::PointerGone | egui::Event::WindowFocused(false) => {
                    self.last_pointer_pos = None;
                    out.push(InputEvent::PointerCancel);
                }
                egui::Event::Key {
                    key: Key::B,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } if modifiers.command => {
                    out.push(InputEvent::TogglePanel);
                }
                _ => {}
            }
        }

        out
    }
}
