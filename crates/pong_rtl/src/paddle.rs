//! Paddle register and movement.

use serde::Serialize;

use crate::geometry::PaddleBounds;

/// Requested paddle movement for the current tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Move toward the top of the screen.
    Up,
    /// Move toward the bottom of the screen.
    Down,
    /// Stay put.
    #[default]
    None,
}

impl Intent {
    /// Decodes a button pair. Pressing both cancels out.
    pub fn from_buttons(up: bool, down: bool) -> Self {
        match (up, down) {
            (true, false) => Intent::Up,
            (false, true) => Intent::Down,
            _ => Intent::None,
        }
    }
}

/// One paddle: its top edge and the intent latched on the last tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Paddle {
    /// Top edge, in lines from the top of the screen.
    pub y: i32,
    /// Movement applied on the most recent paddle tick.
    pub intent: Intent,
}

impl Paddle {
    /// A paddle centred vertically with no intent.
    pub fn centered(bounds: &PaddleBounds) -> Self {
        Self {
            y: bounds.center(),
            intent: Intent::None,
        }
    }

    /// Applies one movement tick, clamped to `bounds`.
    pub fn step(self, intent: Intent, step: i32, bounds: &PaddleBounds) -> Self {
        let y = match intent {
            Intent::Up => bounds.clamp(self.y - step),
            Intent::Down => bounds.clamp(self.y + step),
            Intent::None => self.y,
        };
        Self { y, intent }
    }

    /// Intent that moves this paddle's centre toward `target` line.
    ///
    /// Holds when already within one step, so the paddle never oscillates.
    pub fn track(&self, target: i32, height: i32, step: i32) -> Intent {
        let center = self.y + height / 2;
        let diff = target - center;
        if diff.abs() < step.max(1) {
            Intent::None
        } else if diff < 0 {
            Intent::Up
        } else {
            Intent::Down
        }
    }

    /// Whether a span `[y, y + size)` overlaps this paddle vertically.
    pub fn overlaps(&self, y: i32, size: i32, height: i32) -> bool {
        y + size > self.y && y < self.y + height
    }
}
