// renderer/input.rs
// Maps raw window events (keys, pointer pixels) to SimCommands

use crate::commands::SimCommand;
use ultraviolet::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// Pointer position in canvas pixels
    PointerMoved { x: f32, y: f32 },
    PointerPressed { x: f32, y: f32 },
    PointerLeft,
}

/// Canvas-to-box mapping. The canvas keeps the box aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub box_width: f32,
    pub box_height: f32,
}

impl Viewport {
    /// Size the canvas height from its width and the box aspect ratio.
    pub fn for_box(canvas_width: f32, box_width: f32, box_height: f32) -> Self {
        Self {
            canvas_width,
            canvas_height: canvas_width * box_height / box_width,
            box_width,
            box_height,
        }
    }

    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            self.canvas_width / self.box_width,
            self.canvas_height / self.box_height,
        )
    }

    pub fn to_sim(&self, x: f32, y: f32) -> Vec2 {
        let s = self.scale();
        Vec2::new(x / s.x, y / s.y)
    }

    pub fn to_canvas(&self, pos: Vec2) -> (f32, f32) {
        let s = self.scale();
        (pos.x * s.x, pos.y * s.y)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..self.canvas_width).contains(&x) && (0.0..self.canvas_height).contains(&y)
    }
}

/// Translate one event. Unbound keys yield `None`; a pointer moving off the
/// canvas counts as leaving it.
pub fn translate(event: InputEvent, viewport: &Viewport) -> Option<SimCommand> {
    match event {
        InputEvent::Key(key) => match key {
            ' ' => Some(SimCommand::TogglePause),
            't' | 'T' => Some(SimCommand::ToggleThermostat),
            'm' | 'M' => Some(SimCommand::CycleThermostatMode),
            '+' | '=' => Some(SimCommand::AdjustSpeed(1)),
            '-' | '_' => Some(SimCommand::AdjustSpeed(-1)),
            'r' | 'R' => Some(SimCommand::Reset),
            _ => None,
        },
        InputEvent::PointerMoved { x, y } => {
            if viewport.contains(x, y) {
                let p = viewport.to_sim(x, y);
                Some(SimCommand::PointerMoved { x: p.x, y: p.y })
            } else {
                Some(SimCommand::PointerLeft)
            }
        }
        InputEvent::PointerPressed { x, y } => {
            let p = viewport.to_sim(x, y);
            Some(SimCommand::AddParticle { x: p.x, y: p.y })
        }
        InputEvent::PointerLeft => Some(SimCommand::PointerLeft),
    }
}

/// Parse a line of terminal input into key events. The word `space`
/// stands for the space bar; every other character is its own key.
pub fn parse_keys(line: &str) -> Vec<InputEvent> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim().eq_ignore_ascii_case("space") {
        return vec![InputEvent::Key(' ')];
    }
    trimmed.chars().map(InputEvent::Key).collect()
}
