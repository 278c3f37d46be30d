//! Fixed playfield geometry derived once from the design configuration.

use pong_config::{DesignConfig, RightPaddleMode, TimingConfig};

/// Vertical range a paddle's top edge may occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddleBounds {
    /// Smallest allowed top edge (just below the top border).
    pub top: i32,
    /// Largest allowed top edge (paddle resting on the bottom border).
    pub bottom: i32,
}

impl PaddleBounds {
    /// Clamps a candidate top edge into range.
    pub fn clamp(&self, y: i32) -> i32 {
        y.clamp(self.top, self.bottom)
    }

    /// The centred starting position.
    pub fn center(&self) -> i32 {
        (self.top + self.bottom) / 2
    }
}

/// Ball-relevant dimensions of the playfield, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playfield {
    /// Visible width; the ball's right edge must stay below it.
    pub width: i32,
    /// First line below the top border.
    pub top: i32,
    /// First line of the bottom border.
    pub bottom: i32,
    /// Ball edge length.
    pub ball_size: i32,
    /// x of the left paddle's inner (right-hand) face.
    pub left_face: i32,
    /// x of the right paddle's inner (left-hand) face.
    pub right_face: i32,
    /// Paddle height.
    pub paddle_height: i32,
}

impl Playfield {
    /// Largest allowed ball x.
    pub fn max_x(&self) -> i32 {
        self.width - self.ball_size
    }

    /// Largest allowed ball y.
    pub fn max_y(&self) -> i32 {
        self.bottom - self.ball_size
    }

    /// Whether a ball at `(x, y)` lies wholly inside the playfield.
    pub fn contains_ball(&self, x: i32, y: i32) -> bool {
        (0..=self.max_x()).contains(&x) && (self.top..=self.max_y()).contains(&y)
    }
}

/// Everything the game engine and renderer need, precomputed.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// Video timing.
    pub timing: TimingConfig,
    /// Ball playfield.
    pub playfield: Playfield,
    /// Paddle travel range.
    pub paddle_bounds: PaddleBounds,
    /// Paddle width.
    pub paddle_width: i32,
    /// Gap between screen edge and paddle.
    pub paddle_margin: i32,
    /// Pixels per paddle tick.
    pub paddle_step: i32,
    /// Lines between paddle ticks.
    pub paddle_tick_lines: u32,
    /// Horizontal ball speed magnitude.
    pub ball_dx: i32,
    /// Vertical ball speed magnitude.
    pub ball_dy: i32,
    /// Height of the top and bottom borders.
    pub border: i32,
    /// Frames between ball updates.
    pub frame_divider: u32,
    /// Right paddle control source.
    pub right_paddle: RightPaddleMode,
}

/// Validation keeps every size within the 12-bit counters.
fn px(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl Geometry {
    /// Derives the geometry from a validated configuration.
    pub fn from_config(config: &DesignConfig) -> Self {
        let t = &config.timing;
        let g = &config.game;
        let width = px(t.h_visible);
        let height = px(t.v_visible);
        let border = px(g.border);
        let paddle_height = px(g.paddle_height);
        let paddle_width = px(g.paddle_width);
        let paddle_margin = px(g.paddle_margin);
        Self {
            timing: t.clone(),
            playfield: Playfield {
                width,
                top: border,
                bottom: height - border,
                ball_size: px(g.ball_size),
                left_face: paddle_margin + paddle_width,
                right_face: width - paddle_margin - paddle_width,
                paddle_height,
            },
            paddle_bounds: PaddleBounds {
                top: border,
                bottom: height - border - paddle_height,
            },
            paddle_width,
            paddle_margin,
            paddle_step: px(g.paddle_step),
            paddle_tick_lines: g.paddle_tick_lines,
            ball_dx: px(g.ball_dx),
            ball_dy: px(g.ball_dy),
            border,
            frame_divider: g.frame_divider,
            right_paddle: g.right_paddle,
        }
    }

    /// x of the left paddle's outer edge.
    pub fn left_paddle_x(&self) -> i32 {
        self.paddle_margin
    }

    /// x of the right paddle's outer-left edge (its inner face).
    pub fn right_paddle_x(&self) -> i32 {
        self.playfield.right_face
    }
}
