//! Built-in conformance checks.
//!
//! Each check builds a fresh [`Testbench`], drives it from reset the way an
//! external test driver would, and either returns a [`CheckOutcome`] or an
//! [`SimError::AssertionFailed`] stamped with the simulation time of the
//! violation. Cycle counts are the VGA figures, stretched when a
//! configuration's lines or paddle ticks are longer.

use pong_config::DesignConfig;
use pong_rtl::{Phase, Snapshot};

use crate::error::SimError;
use crate::monitor::SignalMonitor;
use crate::testbench::{Button, Testbench, DEFAULT_RESET_CYCLES};
use crate::time::SimTime;

/// Clocks a button is held in the movement checks.
pub const PRESS_CYCLES: u64 = 10_000;
/// Clocks the scenario idles after releasing the buttons.
pub const RELEASE_CYCLES: u64 = 1_000;
/// Clocks within which HSYNC must have toggled after reset.
pub const HSYNC_CYCLES: u64 = 2_000;
/// Clocks within which VSYNC must have toggled after reset.
pub const VSYNC_CYCLES: u64 = 420_000;
/// Fewest ball updates [`ball_stays_in_bounds`] follows.
pub const BALL_FRAMES: u64 = 3;

/// What a passing check observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Clocks applied, including reset.
    pub cycles: u64,
    /// Simulation time at the end of the check.
    pub final_time: SimTime,
    /// One-line summary of what was seen.
    pub detail: String,
}

/// Signature shared by every check.
pub type CheckFn = fn(&DesignConfig) -> Result<CheckOutcome, SimError>;

/// Every built-in check, in the order [`run_all`] runs them.
pub const CHECKS: [(&str, CheckFn); 8] = [
    ("hsync_toggles", hsync_toggles),
    ("vsync_toggles", vsync_toggles),
    ("paddle_moves_up", paddle_moves_up),
    ("paddle_moves_down", paddle_moves_down),
    ("paddle_holds_when_released", paddle_holds_when_released),
    ("ball_stays_in_bounds", ball_stays_in_bounds),
    ("reset_is_absorbing", reset_is_absorbing),
    ("up_down_scenario", up_down_scenario),
];

/// The result of one named check.
#[derive(Debug)]
pub struct CheckReport {
    /// Check name.
    pub name: &'static str,
    /// Outcome or the violation.
    pub result: Result<CheckOutcome, SimError>,
}

impl CheckReport {
    /// Whether the check passed.
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs every check.
pub fn run_all(config: &DesignConfig) -> Vec<CheckReport> {
    run_matching(config, None)
}

/// Runs the checks whose name contains `filter`, or all of them.
pub fn run_matching(config: &DesignConfig, filter: Option<&str>) -> Vec<CheckReport> {
    CHECKS
        .iter()
        .filter(|(name, _)| filter.is_none_or(|f| name.contains(f)))
        .map(|&(name, check)| {
            log::info!("running {name}");
            let result = check(config);
            if let Err(e) = &result {
                log::debug!("{name} failed: {e}");
            }
            CheckReport { name, result }
        })
        .collect()
}

fn bench(config: &DesignConfig) -> Result<Testbench, SimError> {
    let mut tb = Testbench::new(config)?;
    tb.reset_sequence(DEFAULT_RESET_CYCLES);
    Ok(tb)
}

fn outcome(tb: &Testbench, detail: String) -> CheckOutcome {
    CheckOutcome {
        cycles: tb.cycles(),
        final_time: tb.time(),
        detail,
    }
}

fn line_clocks(config: &DesignConfig) -> u64 {
    u64::from(config.timing.h_total())
}

/// Clocks a button must be held to guarantee at least one paddle tick.
fn press_cycles(config: &DesignConfig) -> u64 {
    let tick = u64::from(config.game.paddle_tick_lines) * line_clocks(config);
    PRESS_CYCLES.max(tick + 1)
}

fn sync_monitors(tb: &Testbench) -> (SignalMonitor, SignalMonitor) {
    let mux = tb.top().mux();
    (
        SignalMonitor::new(mux.hsync_bit()),
        SignalMonitor::new(mux.vsync_bit()),
    )
}

/// HSYNC takes both levels within the first 2000 clocks after reset and in
/// every line-length window.
pub fn hsync_toggles(config: &DesignConfig) -> Result<CheckOutcome, SimError> {
    let mut tb = bench(config)?;
    let line = line_clocks(config);
    let (mut hsync, _) = sync_monitors(&tb);

    tb.clock_sampling(HSYNC_CYCLES, |_, out| hsync.sample(out));
    if !hsync.toggled() {
        return Err(tb.fail(format!("hsync did not toggle within {HSYNC_CYCLES} clocks")));
    }
    tb.clock_sampling(2 * line, |_, out| hsync.sample(out));
    if !hsync.toggles_within(line) {
        return Err(tb.fail(format!(
            "hsync held one level for {} clocks (line is {line})",
            hsync.longest_run()
        )));
    }
    Ok(outcome(
        &tb,
        format!(
            "{} transitions, longest run {}",
            hsync.transitions(),
            hsync.longest_run()
        ),
    ))
}

/// VSYNC takes both levels within 420000 clocks and in every frame-length
/// window.
pub fn vsync_toggles(config: &DesignConfig) -> Result<CheckOutcome, SimError> {
    let mut tb = bench(config)?;
    let frame = config.timing.frame_clocks();
    let (_, mut vsync) = sync_monitors(&tb);

    tb.clock_sampling(VSYNC_CYCLES.min(frame), |_, out| vsync.sample(out));
    if !vsync.toggled() {
        return Err(tb.fail(format!("vsync did not toggle within {frame} clocks")));
    }
    tb.clock_sampling(frame, |_, out| vsync.sample(out));
    if !vsync.toggles_within(frame) {
        return Err(tb.fail(format!(
            "vsync held one level for {} clocks (frame is {frame})",
            vsync.longest_run()
        )));
    }
    Ok(outcome(
        &tb,
        format!("{} transitions over two frames", vsync.transitions()),
    ))
}

fn paddle_moves(config: &DesignConfig, button: Button) -> Result<CheckOutcome, SimError> {
    let mut tb = bench(config)?;
    tb.clock(line_clocks(config));
    let before = tb.probe().left_y;
    let bounds = tb.top().geometry().paddle_bounds;

    tb.press(button);
    tb.clock(press_cycles(config));
    let after = tb.probe().left_y;

    let (moved, at_clamp) = match button {
        Button::Down => (after > before, after == bounds.bottom),
        _ => (after < before, after == bounds.top),
    };
    if !moved && !at_clamp {
        return Err(tb.fail(format!(
            "{button:?} held for {} clocks but left_y stayed at {after}",
            press_cycles(config)
        )));
    }
    Ok(outcome(&tb, format!("left_y {before} -> {after}")))
}

/// Holding up moves the left paddle up, or leaves it at the top clamp.
pub fn paddle_moves_up(config: &DesignConfig) -> Result<CheckOutcome, SimError> {
    paddle_moves(config, Button::Up)
}

/// Holding down moves the left paddle down, or leaves it at the bottom clamp.
pub fn paddle_moves_down(config: &DesignConfig) -> Result<CheckOutcome, SimError> {
    paddle_moves(config, Button::Down)
}

/// After any movement, releasing both buttons freezes the left paddle.
pub fn paddle_holds_when_released(config: &DesignConfig) -> Result<CheckOutcome, SimError> {
    let mut tb = bench(config)?;
    let press = press_cycles(config);
    tb.press(Button::Up);
    tb.clock(press);
    tb.release_all();
    tb.press(Button::Down);
    tb.clock(press / 2);
    tb.release_all();

    let held = tb.probe().left_y;
    for _ in 0..2 * press {
        tb.clock(1);
        let y = tb.probe().left_y;
        if y != held {
            return Err(tb.fail(format!("left_y drifted from {held} to {y} with no button")));
        }
    }
    Ok(outcome(&tb, format!("left_y held at {held}")))
}

/// Frames long enough for the ball to cross the playfield once in each
/// direction, so a followed ball meets a wall and a paddle face.
fn ball_frames(config: &DesignConfig) -> u64 {
    let t = &config.timing;
    let g = &config.game;
    let across = t.h_visible.checked_div(g.ball_dx).unwrap_or(0);
    let inner = t.v_visible.saturating_sub(g.border.saturating_mul(2));
    let down = inner.checked_div(g.ball_dy).unwrap_or(0);
    let updates = BALL_FRAMES.max(u64::from(across) + u64::from(down) + 2);
    updates * u64::from(g.frame_divider)
}

/// The ball and both paddles stay inside their bounds at every clock while
/// the ball bounces off a wall and reaches a paddle face.
pub fn ball_stays_in_bounds(config: &DesignConfig) -> Result<CheckOutcome, SimError> {
    let mut tb = bench(config)?;
    let geo = tb.top().geometry().clone();
    let cycles = ball_frames(config) * config.timing.frame_clocks();

    let mut last = tb.probe();
    let mut moves = 0u64;
    let mut walls = 0u64;
    let mut faces = 0u64;
    for _ in 0..cycles {
        tb.clock(1);
        let s = tb.probe();
        if !geo.playfield.contains_ball(s.ball_x, s.ball_y) {
            return Err(tb.fail(format!("ball escaped to ({}, {})", s.ball_x, s.ball_y)));
        }
        for y in [s.left_y, s.right_y] {
            if y != geo.paddle_bounds.clamp(y) {
                return Err(tb.fail(format!("paddle at y={y} outside its bounds")));
            }
        }
        if (s.ball_x, s.ball_y) != (last.ball_x, last.ball_y) {
            moves += 1;
        }
        if s.ball_dy.signum() == -last.ball_dy.signum() && s.ball_dy != 0 {
            walls += 1;
        }
        // A miss re-serves without turning, so it shows up in the score.
        if s.ball_dx.signum() == -last.ball_dx.signum() || s.score != last.score {
            faces += 1;
        }
        last = s;
        if faces > 0 && (walls > 0 || geo.ball_dy == 0) {
            break;
        }
    }
    Ok(outcome(
        &tb,
        format!(
            "{moves} ball moves, {walls} wall and {faces} side contacts, ended at ({}, {})",
            last.ball_x, last.ball_y
        ),
    ))
}

/// One reset edge from anywhere in RUN restores every initial value and
/// idles the outputs.
pub fn reset_is_absorbing(config: &DesignConfig) -> Result<CheckOutcome, SimError> {
    let mut tb = bench(config)?;
    let initial = tb.probe();
    let idle = tb.outputs();
    let spacing = config.timing.frame_clocks() / 3 + 7;

    for round in 1..=4u64 {
        tb.set_ui_in(if round % 2 == 0 { 0x01 } else { 0x0A });
        tb.clock(round * spacing);
        if tb.probe().phase != Phase::Run {
            return Err(tb.fail("design did not leave reset"));
        }
        tb.set_reset(true);
        tb.clock(1);
        let s = tb.probe();
        if s != initial {
            return Err(tb.fail(format!("state after reset differs: {}", diff(&initial, &s))));
        }
        if tb.outputs() != idle {
            return Err(tb.fail(format!(
                "outputs after reset are {:#04x}, expected {:#04x}",
                tb.outputs().uo_out,
                idle.uo_out
            )));
        }
        tb.set_reset(false);
    }
    Ok(outcome(&tb, "4 resets from RUN".to_string()))
}

fn diff(a: &Snapshot, b: &Snapshot) -> String {
    let fields = [
        ("h_count", i64::from(a.h_count), i64::from(b.h_count)),
        ("v_count", i64::from(a.v_count), i64::from(b.v_count)),
        ("left_y", i64::from(a.left_y), i64::from(b.left_y)),
        ("right_y", i64::from(a.right_y), i64::from(b.right_y)),
        ("ball_x", i64::from(a.ball_x), i64::from(b.ball_x)),
        ("ball_y", i64::from(a.ball_y), i64::from(b.ball_y)),
    ];
    let changed: Vec<String> = fields
        .iter()
        .filter(|(_, x, y)| x != y)
        .map(|(name, x, y)| format!("{name} {x} -> {y}"))
        .collect();
    if changed.is_empty() {
        "intent, velocity or score".to_string()
    } else {
        changed.join(", ")
    }
}

/// Runs `tb` for `n` clocks while watching both sync bits.
fn run_watching(
    tb: &mut Testbench,
    n: u64,
    hsync: &mut SignalMonitor,
    vsync: &mut SignalMonitor,
) {
    tb.clock_sampling(n, |_, out| {
        hsync.sample(out);
        vsync.sample(out);
    });
}

/// Reset, sync bring-up, then up, down and release with live sync; the
/// up-then-down trajectory must differ from holding up throughout.
pub fn up_down_scenario(config: &DesignConfig) -> Result<CheckOutcome, SimError> {
    let line = line_clocks(config);
    let frame = config.timing.frame_clocks();
    let press = press_cycles(config);

    let mut tb = bench(config)?;
    let (mut hsync, mut vsync) = sync_monitors(&tb);

    run_watching(&mut tb, HSYNC_CYCLES.max(2 * line), &mut hsync, &mut vsync);
    if !hsync.toggled() {
        return Err(tb.fail("hsync idle after bring-up"));
    }
    run_watching(&mut tb, VSYNC_CYCLES.max(frame), &mut hsync, &mut vsync);
    if !vsync.toggled() {
        return Err(tb.fail("vsync idle after bring-up"));
    }

    let mut reference = Testbench::new(config)?;
    reference.reset_sequence(DEFAULT_RESET_CYCLES);
    reference.clock(tb.cycles() - DEFAULT_RESET_CYCLES);

    let (mut h_live, mut v_live) = sync_monitors(&tb);
    tb.press(Button::Up);
    run_watching(&mut tb, press, &mut h_live, &mut v_live);
    tb.release_all();
    tb.press(Button::Down);
    run_watching(&mut tb, press, &mut h_live, &mut v_live);
    tb.release_all();
    run_watching(&mut tb, RELEASE_CYCLES, &mut h_live, &mut v_live);

    if !h_live.toggles_within(line) {
        return Err(tb.fail(format!(
            "hsync stalled for {} clocks during button activity",
            h_live.longest_run()
        )));
    }
    if h_live.samples() >= frame && !v_live.toggles_within(frame) {
        return Err(tb.fail("vsync stalled during button activity"));
    }

    reference.press(Button::Up);
    reference.clock(2 * press);
    reference.release_all();
    reference.clock(RELEASE_CYCLES);

    let up_down = tb.probe().left_y;
    let up_only = reference.probe().left_y;
    if up_down == up_only {
        return Err(tb.fail(format!(
            "up-then-down ended at left_y {up_down}, same as holding up"
        )));
    }
    Ok(outcome(
        &tb,
        format!("left_y {up_down} after up/down, {up_only} after up only"),
    ))
}
