use glam::Vec2;

/// Turns raw pointer events into discrete clicks in canvas-local pixels.
pub struct ClickState {
    left_was_down: bool,
    /// Last cursor position, window-local.
    cursor: Option<Vec2>,
    /// Canvas top-left inside the window.
    canvas_origin: Vec2,
}

impl ClickState {
    pub fn new(canvas_origin: Vec2) -> Self {
        Self {
            left_was_down: false,
            cursor: None,
            canvas_origin,
        }
    }

    pub fn cursor_moved(&mut self, window_pos: Vec2) {
        self.cursor = Some(window_pos);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Feed the left button state. Returns the canvas-local click point on
    /// the press edge only, so holding the button clicks once.
    pub fn left_button(&mut self, down: bool) -> Option<Vec2> {
        let pressed = down && !self.left_was_down;
        self.left_was_down = down;
        if !pressed {
            return None;
        }
        self.cursor.map(|p| self.to_canvas(p))
    }

    pub fn to_canvas(&self, window_pos: Vec2) -> Vec2 {
        window_pos - self.canvas_origin
    }
}
