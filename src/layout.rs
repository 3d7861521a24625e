/// Changes to the area available to the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    PanelOpened,
    PanelClosed,
    WindowResized,
}

/// Anything that reacts to layout changes, typically by resizing its surface
pub trait LayoutListener {
    fn on_layout_change(&mut self, event: &LayoutEvent);
}

/// Open/closed state of the collapsible control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidePanelState {
    open: bool,
}

impl Default for SidePanelState {
    fn default() -> Self {
        Self { open: true }
    }
}

impl SidePanelState {
    pub fn new(open: bool) -> Self {
        Self { open }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, listener: &mut dyn LayoutListener) {
        if !self.open {
            self.open = true;
            listener.on_layout_change(&LayoutEvent::PanelOpened);
        }
    }

    pub fn close(&mut self, listener: &mut dyn LayoutListener) {
        if self.open {
            self.open = false;
            listener.on_layout_change(&LayoutEvent::PanelClosed);
        }
    }

    pub fn toggle(&mut self, listener: &mut dyn LayoutListener) {
        if self.open {
            self.close(listener);
        } else {
            self.open(listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<LayoutEvent>);

    impl LayoutListener for Recorder {
        fn on_layout_change(&mut self, event: &LayoutEvent) {
            self.0.push(*event);
        }
    }

    #[test]
    fn test_every_transition_notifies() {
        let mut panel = SidePanelState::default();
        let mut recorder = Recorder::default();
        panel.toggle(&mut recorder);
        panel.toggle(&mut recorder);
        assert!(panel.is_open());
        assert_eq!(recorder.0, vec![LayoutEvent::PanelClosed, LayoutEvent::PanelOpened]);
    }

    #[test]
    fn test_redundant_open_is_silent() {
        let mut panel = SidePanelState::new(true);
        let mut recorder = Recorder::default();
        panel.open(&mut recorder);
        assert!(recorder.0.is_empty());
    }
}
