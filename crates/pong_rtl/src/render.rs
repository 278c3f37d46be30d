//! Per-pixel object decision.
//!
//! Evaluated every clock from the current counters and the latched game
//! registers. Objects are tested in a fixed priority order and the first
//! hit wins.

use serde::Serialize;

use crate::game::GameState;
use crate::geometry::Geometry;
use crate::timing::TimingGenerator;

/// Width of the centre net in pixels.
const NET_WIDTH: i32 = 2;
/// Lines per net dash (and per gap).
const NET_DASH: i32 = 16;

/// What the beam is drawing at the current pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Object {
    /// Outside the visible region.
    Blank,
    /// Empty playfield.
    Background,
    /// The dashed centre line.
    Net,
    /// Top or bottom border band.
    Border,
    /// The right paddle.
    RightPaddle,
    /// The left paddle.
    LeftPaddle,
    /// The ball.
    Ball,
}

#[derive(Clone, Copy, Debug)]
struct Rect {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl Rect {
    fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Decides which object covers the pixel addressed by `timing`.
pub fn object_at(geo: &Geometry, timing: &TimingGenerator, state: &GameState) -> Object {
    if !timing.visible(&geo.timing) {
        return Object::Blank;
    }
    let px = timing.h_count() as i32;
    let py = timing.v_count() as i32;
    let pf = &geo.playfield;

    let ball = Rect {
        x: state.ball.x,
        y: state.ball.y,
        w: pf.ball_size,
        h: pf.ball_size,
    };
    let left = Rect {
        x: geo.left_paddle_x(),
        y: state.left.y,
        w: geo.paddle_width,
        h: pf.paddle_height,
    };
    let right = Rect {
        x: geo.right_paddle_x(),
        y: state.right.y,
        w: geo.paddle_width,
        h: pf.paddle_height,
    };

    if ball.contains(px, py) {
        Object::Ball
    } else if left.contains(px, py) {
        Object::LeftPaddle
    } else if right.contains(px, py) {
        Object::RightPaddle
    } else if py < pf.top || py >= pf.bottom {
        Object::Border
    } else if on_net(px, py, pf.width) {
        Object::Net
    } else {
        Object::Background
    }
}

fn on_net(px: i32, py: i32, width: i32) -> bool {
    let left = width / 2 - NET_WIDTH / 2;
    (left..left + NET_WIDTH).contains(&px) && (py / NET_DASH) % 2 == 0
}
