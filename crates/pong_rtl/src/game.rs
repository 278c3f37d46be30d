//! Game engine registers: both paddles, the ball and the score.
//!
//! [`GameState::next`] is the engine's only step function. It reads the
//! timing generator's *current* counters to decide whether this clock is a
//! paddle tick or a frame tick, and reads the current paddle registers when
//! moving the ball, so a paddle tick and a ball update landing on the same
//! clock never see each other's results.

use pong_config::RightPaddleMode;
use serde::Serialize;

use crate::ball::{Ball, BallEvent, Side};
use crate::geometry::Geometry;
use crate::paddle::{Intent, Paddle};
use crate::pins::{UI_DOWN, UI_RIGHT_DOWN, UI_RIGHT_UP, UI_UP};
use crate::timing::TimingGenerator;

/// Per-player point counters, 4 bits each, wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Points scored by the left player.
    pub left: u8,
    /// Points scored by the right player.
    pub right: u8,
}

impl Score {
    fn credit(self, scorer: Side) -> Self {
        match scorer {
            Side::Left => Self {
                left: (self.left + 1) & 0x0F,
                ..self
            },
            Side::Right => Self {
                right: (self.right + 1) & 0x0F,
                ..self
            },
        }
    }
}

/// All game registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Left paddle, driven by `ui_in` bits 0 and 1.
    pub left: Paddle,
    /// Right paddle, tracking the ball or driven by bits 2 and 3.
    pub right: Paddle,
    /// The ball.
    pub ball: Ball,
    /// Points so far.
    pub score: Score,
    /// Frames since the last ball update, modulo the frame divider.
    pub frame_phase: u32,
}

impl GameState {
    /// Register values forced by reset: paddles centred, ball served right.
    pub fn initial(geo: &Geometry) -> Self {
        Self {
            left: Paddle::centered(&geo.paddle_bounds),
            right: Paddle::centered(&geo.paddle_bounds),
            ball: Ball::serve(&geo.playfield, geo.ball_dx, geo.ball_dy),
            score: Score::default(),
            frame_phase: 0,
        }
    }

    /// Computes the registers for the next clock.
    pub fn next(&self, geo: &Geometry, timing: &TimingGenerator, ui_in: u8) -> Self {
        let mut next = *self;

        if timing.every_lines(geo.paddle_tick_lines) {
            let left = Intent::from_buttons(ui_in & UI_UP != 0, ui_in & UI_DOWN != 0);
            let right = match geo.right_paddle {
                RightPaddleMode::Track => self.right.track(
                    self.ball.y + geo.playfield.ball_size / 2,
                    geo.playfield.paddle_height,
                    geo.paddle_step,
                ),
                RightPaddleMode::Buttons => Intent::from_buttons(
                    ui_in & UI_RIGHT_UP != 0,
                    ui_in & UI_RIGHT_DOWN != 0,
                ),
            };
            next.left = self.left.step(left, geo.paddle_step, &geo.paddle_bounds);
            next.right = self.right.step(right, geo.paddle_step, &geo.paddle_bounds);
        }

        if timing.frame_tick(&geo.timing) {
            next.frame_phase = (self.frame_phase + 1) % geo.frame_divider.max(1);
            if next.frame_phase == 0 {
                let (ball, event) = self.ball.advance(&geo.playfield, &self.left, &self.right);
                next.ball = ball;
                match event {
                    BallEvent::Miss(missed) => {
                        let scorer = match missed {
                            Side::Left => Side::Right,
                            Side::Right => Side::Left,
                        };
                        next.score = self.score.credit(scorer);
                        log::debug!(
                            "{missed:?} player missed; score {}:{}",
                            next.score.left,
                            next.score.right
                        );
                    }
                    BallEvent::PaddleHit(side) => log::trace!("ball hit {side:?} paddle"),
                    BallEvent::WallBounce => log::trace!("ball bounced at y={}", ball.y),
                    BallEvent::Moved => {}
                }
            }
        }

        next
    }
}
