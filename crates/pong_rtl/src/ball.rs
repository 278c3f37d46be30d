//! Ball register, wall and paddle reflection, and misses.

use serde::Serialize;

use crate::geometry::Playfield;
use crate::paddle::Paddle;

/// A side of the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The left player's side.
    Left,
    /// The right player's side.
    Right,
}

/// What happened to the ball during one update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallEvent {
    /// Plain movement.
    Moved,
    /// Reflected off the top or bottom border.
    WallBounce,
    /// Reflected off a paddle face.
    PaddleHit(Side),
    /// Reached a side edge without a paddle in the way; re-served from
    /// the centre. The side is the player who missed.
    Miss(Side),
}

/// Ball position (top-left corner) and per-update velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Ball {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal velocity; sign is direction.
    pub dx: i32,
    /// Vertical velocity; sign is direction.
    pub dy: i32,
}

impl Ball {
    /// A ball at the centre of the playfield with the given velocity.
    pub fn serve(pf: &Playfield, dx: i32, dy: i32) -> Self {
        Self {
            x: pf.max_x() / 2,
            y: (pf.top + pf.max_y()) / 2,
            dx,
            dy,
        }
    }

    /// Advances the ball by one update.
    ///
    /// The result always satisfies [`Playfield::contains_ball`]: vertical
    /// motion is clamped at the borders, a paddle hit places the ball flush
    /// against the face, and a miss re-serves from the centre toward the
    /// player who missed.
    pub fn advance(self, pf: &Playfield, left: &Paddle, right: &Paddle) -> (Self, BallEvent) {
        let size = pf.ball_size;
        let mut event = BallEvent::Moved;

        let mut dy = self.dy;
        let mut y = self.y + dy;
        if y <= pf.top && dy < 0 {
            y = pf.top;
            dy = -dy;
            event = BallEvent::WallBounce;
        } else if y >= pf.max_y() && dy > 0 {
            y = pf.max_y();
            dy = -dy;
            event = BallEvent::WallBounce;
        }
        let y = y.clamp(pf.top, pf.max_y());

        let mut dx = self.dx;
        let mut x = self.x + dx;
        if dx < 0
            && self.x >= pf.left_face
            && x <= pf.left_face
            && left.overlaps(y, size, pf.paddle_height)
        {
            x = pf.left_face;
            dx = -dx;
            event = BallEvent::PaddleHit(Side::Left);
        } else if dx > 0
            && self.x + size <= pf.right_face
            && x + size >= pf.right_face
            && right.overlaps(y, size, pf.paddle_height)
        {
            x = pf.right_face - size;
            dx = -dx;
            event = BallEvent::PaddleHit(Side::Right);
        } else if x <= 0 {
            return (Self::serve(pf, dx, dy), BallEvent::Miss(Side::Left));
        } else if x >= pf.max_x() {
            return (Self::serve(pf, dx, dy), BallEvent::Miss(Side::Right));
        }

        (Self { x, y, dx, dy }, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::paddle::Intent;
    use pong_config::DesignConfig;

    fn playfield() -> Playfield {
        Geometry::from_config(&DesignConfig::default()).playfield
    }

    fn paddle(y: i32) -> Paddle {
        Paddle {
            y,
            intent: Intent::None,
        }
    }

    /// Paddles parked where they cannot be hit.
    fn far_paddles() -> (Paddle, Paddle) {
        (paddle(408), paddle(408))
    }

    #[test]
    fn serve_is_centered() {
        let pf = playfield();
        let b = Ball::serve(&pf, 2, 1);
        assert_eq!((b.x, b.y), (316, 236));
        assert!(pf.contains_ball(b.x, b.y));
    }

    #[test]
    fn free_flight() {
        let pf = playfield();
        let (l, r) = far_paddles();
        let b = Ball { x: 300, y: 100, dx: 2, dy: 1 };
        let (n, ev) = b.advance(&pf, &l, &r);
        assert_eq!((n.x, n.y, n.dx, n.dy), (302, 101, 2, 1));
        assert_eq!(ev, BallEvent::Moved);
    }

    #[test]
    fn top_wall_flips_dy() {
        let pf = playfield();
        let (l, r) = far_paddles();
        let b = Ball { x: 300, y: 9, dx: 2, dy: -3 };
        let (n, ev) = b.advance(&pf, &l, &r);
        assert_eq!(n.y, 8);
        assert_eq!(n.dy, 3);
        assert_eq!(ev, BallEvent::WallBounce);
    }

    #[test]
    fn bottom_wall_flips_dy() {
        let pf = playfield();
        let (l, r) = far_paddles();
        let b = Ball { x: 300, y: 463, dx: 2, dy: 1 };
        let (n, ev) = b.advance(&pf, &l, &r);
        assert_eq!(n.y, 464);
        assert_eq!(n.dy, -1);
        assert_eq!(ev, BallEvent::WallBounce);
    }

    #[test]
    fn left_paddle_reflects() {
        let pf = playfield();
        let b = Ball { x: 25, y: 220, dx: -2, dy: 1 };
        let (n, ev) = b.advance(&pf, &paddle(208), &paddle(8));
        assert_eq!(n.x, pf.left_face);
        assert_eq!(n.dx, 2);
        assert_eq!(ev, BallEvent::PaddleHit(Side::Left));
    }

    #[test]
    fn right_paddle_reflects() {
        let pf = playfield();
        let b = Ball { x: 607, y: 220, dx: 2, dy: -1 };
        let (n, ev) = b.advance(&pf, &paddle(8), &paddle(208));
        assert_eq!(n.x, pf.right_face - 8);
        assert_eq!(n.dx, -2);
        assert_eq!(ev, BallEvent::PaddleHit(Side::Right));
    }

    #[test]
    fn passes_paddle_without_overlap() {
        let pf = playfield();
        let b = Ball { x: 25, y: 100, dx: -2, dy: 0 };
        let (n, ev) = b.advance(&pf, &paddle(208), &paddle(208));
        assert_eq!(n.x, 23);
        assert_eq!(ev, BallEvent::Moved);
    }

    #[test]
    fn behind_the_face_does_not_reflect() {
        let pf = playfield();
        // Already past the face: sliding into the paddle's side is a miss path.
        let b = Ball { x: 20, y: 220, dx: -2, dy: 0 };
        let (n, ev) = b.advance(&pf, &paddle(208), &paddle(208));
        assert_eq!(n.x, 18);
        assert_eq!(ev, BallEvent::Moved);
    }

    #[test]
    fn left_miss_reserves_toward_left() {
        let pf = playfield();
        let (l, r) = far_paddles();
        let b = Ball { x: 1, y: 100, dx: -2, dy: 1 };
        let (n, ev) = b.advance(&pf, &l, &r);
        assert_eq!(ev, BallEvent::Miss(Side::Left));
        assert_eq!((n.x, n.y), (316, 236));
        assert_eq!(n.dx, -2);
        assert_eq!(n.dy, 1);
    }

    #[test]
    fn right_miss_reserves_toward_right() {
        let pf = playfield();
        let (l, r) = far_paddles();
        let b = Ball { x: 631, y: 100, dx: 2, dy: -1 };
        let (n, ev) = b.advance(&pf, &l, &r);
        assert_eq!(ev, BallEvent::Miss(Side::Right));
        assert_eq!(n.dx, 2);
    }

    #[test]
    fn never_leaves_playfield() {
        let pf = playfield();
        let mut b = Ball::serve(&pf, 3, 5);
        let l = paddle(208);
        let r = paddle(100);
        for _ in 0..10_000 {
            b = b.advance(&pf, &l, &r).0;
            assert!(pf.contains_ball(b.x, b.y), "escaped at ({}, {})", b.x, b.y);
        }
    }
}
