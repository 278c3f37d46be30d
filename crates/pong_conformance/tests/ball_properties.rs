//! Ball motion, reflection and scoring.

use pong_conformance::{config_from_toml, observe, run_until, small_config, started, vga_config};
use pong_rtl::Score;
use pong_sim::Button;

const SMALL_FRAME: u64 = 1_632;

#[test]
fn ball_stays_inside_playfield() {
    let mut tb = started(&small_config());
    let pf = tb.top().geometry().playfield;
    let mut outside = Vec::new();
    observe(&mut tb, 120 * SMALL_FRAME, |cycle, _, s| {
        if !pf.contains_ball(s.ball_x, s.ball_y) && outside.len() < 4 {
            outside.push((cycle, s.ball_x, s.ball_y));
        }
    });
    assert!(outside.is_empty(), "ball left the playfield: {outside:?}");
}

#[test]
fn first_update_lands_on_first_frame_tick() {
    let mut tb = started(&vga_config());
    // The edge that sees line 480, pixel 0 is edge 480 * 800 + 1.
    tb.clock(384_000);
    let s = tb.probe();
    assert_eq!((s.ball_x, s.ball_y), (316, 236));
    tb.clock(1);
    let s = tb.probe();
    assert_eq!((s.ball_x, s.ball_y), (318, 237));
    assert_eq!((s.h_count, s.v_count), (1, 480));
}

#[test]
fn ball_moves_once_per_frame() {
    let mut tb = started(&small_config());
    let v_visible = tb.top().geometry().timing.v_visible;
    let mut last = tb.probe();
    let mut moves = 0;
    observe(&mut tb, 10 * SMALL_FRAME, |_, _, s| {
        if (s.ball_x, s.ball_y) != (last.ball_x, last.ball_y) {
            assert_eq!((s.h_count, s.v_count), (1, v_visible), "moved mid-frame");
            moves += 1;
        }
        last = *s;
    });
    assert_eq!(moves, 10);
}

#[test]
fn bounces_off_walls() {
    let mut tb = started(&small_config());
    let pf = tb.top().geometry().playfield;
    // Served downward; the bottom wall flips it.
    assert_eq!(tb.probe().ball_dy, 1);
    let spent = run_until(&mut tb, 40 * SMALL_FRAME, |s| s.ball_dy < 0);
    assert!(spent.is_some());
    assert_eq!(tb.probe().ball_y, pf.max_y());
}

#[test]
fn reflects_off_tracking_paddle() {
    let mut tb = started(&small_config());
    let pf = tb.top().geometry().playfield;
    let spent = run_until(&mut tb, 40 * SMALL_FRAME, |s| s.ball_dx < 0);
    assert!(spent.is_some(), "ball never came back");
    let s = tb.probe();
    assert_eq!(s.ball_x, pf.right_face - pf.ball_size);
    assert_eq!(s.score, Score::default());
}

#[test]
fn miss_credits_the_other_player() {
    let config = config_from_toml(
        "[timing]\nh_visible = 40\nh_front_porch = 2\nh_sync = 4\nh_back_porch = 2\n\
         v_visible = 30\nv_front_porch = 1\nv_sync = 2\nv_back_porch = 1\n\
         [game]\npaddle_width = 2\npaddle_height = 8\npaddle_margin = 2\n\
         paddle_tick_lines = 2\nball_size = 2\nball_dx = 1\nborder = 2\n\
         right_paddle = \"buttons\"\n",
    );
    let mut tb = started(&config);
    let serve = tb.probe();
    // Park the right paddle at the top, out of the ball's path.
    tb.press(Button::RightUp);
    let spent = run_until(&mut tb, 40 * SMALL_FRAME, |s| s.score != Score::default());
    assert!(spent.is_some(), "no point scored");

    let s = tb.probe();
    assert_eq!(s.score, Score { left: 1, right: 0 });
    assert_eq!((s.ball_x, s.ball_y), (serve.ball_x, serve.ball_y));
    assert!(s.ball_dx > 0, "re-served toward the player who missed");
}

#[test]
fn frame_divider_slows_the_ball() {
    let config = config_from_toml("[game]\nframe_divider = 2\n");
    let mut tb = started(&config);
    let start = tb.probe();
    tb.clock(420_000);
    assert_eq!(tb.probe().ball_x, start.ball_x);
    tb.clock(420_000);
    assert_eq!(tb.probe().ball_x, start.ball_x + 2);
}
