//! Top-level wrapper: pins in, registers, pins out.
//!
//! [`PongTop`] owns every register in the design and commits them once per
//! [`PongTop::tick`]. Outputs are a pure function of the registers, so an
//! observer sampling [`PongTop::outputs`] between ticks sees exactly what a
//! pin sampler would see after the corresponding rising edge.

use pong_config::{validate, ConfigError, DesignConfig};
use serde::Serialize;

use crate::game::{GameState, Score};
use crate::geometry::Geometry;
use crate::mux::{OutputMux, Rgb222};
use crate::paddle::Intent;
use crate::pins::{InputPins, OutputPins};
use crate::render::{self, Object};
use crate::timing::{sync_level, TimingGenerator};

/// The design's two macro-states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Registers held at their initial values; outputs idle.
    Reset,
    /// Free-running timing and game updates.
    Run,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Registers {
    phase: Phase,
    timing: TimingGenerator,
    game: GameState,
}

impl Registers {
    fn initial(geo: &Geometry) -> Self {
        Self {
            phase: Phase::Reset,
            timing: TimingGenerator::reset(),
            game: GameState::initial(geo),
        }
    }
}

/// A read-only view of every register, for waveform dumps and checks.
///
/// Nothing in the design reads it; the pins remain the design's only
/// interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Macro-state.
    pub phase: Phase,
    /// Pixel counter.
    pub h_count: u32,
    /// Line counter.
    pub v_count: u32,
    /// Left paddle top edge.
    pub left_y: i32,
    /// Left paddle latched intent.
    pub left_intent: Intent,
    /// Right paddle top edge.
    pub right_y: i32,
    /// Right paddle latched intent.
    pub right_intent: Intent,
    /// Ball left edge.
    pub ball_x: i32,
    /// Ball top edge.
    pub ball_y: i32,
    /// Ball horizontal velocity.
    pub ball_dx: i32,
    /// Ball vertical velocity.
    pub ball_dy: i32,
    /// Points so far.
    pub score: Score,
}

/// The complete design.
#[derive(Clone, Debug)]
pub struct PongTop {
    geometry: Geometry,
    mux: OutputMux,
    regs: Registers,
}

impl PongTop {
    /// Builds the design from a configuration, validating it first.
    ///
    /// The design starts in [`Phase::Reset`] with initial register values.
    pub fn new(config: &DesignConfig) -> Result<Self, ConfigError> {
        validate(config)?;
        let geometry = Geometry::from_config(config);
        let regs = Registers::initial(&geometry);
        Ok(Self {
            mux: OutputMux::new(&config.pins),
            geometry,
            regs,
        })
    }

    /// Derived geometry the design was built with.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Output bit assignment.
    pub fn mux(&self) -> &OutputMux {
        &self.mux
    }

    /// Current macro-state.
    pub fn phase(&self) -> Phase {
        self.regs.phase
    }

    /// Applies one rising clock edge.
    ///
    /// Reset has priority over everything, including `ena`.
    pub fn tick(&mut self, inputs: &InputPins) {
        if !inputs.rst_n {
            if self.regs.phase == Phase::Run {
                log::debug!("reset asserted");
            }
            self.regs = Registers::initial(&self.geometry);
            return;
        }
        if !inputs.ena {
            return;
        }
        if self.regs.phase == Phase::Reset {
            log::debug!("reset released");
        }

        let timing = self.regs.timing;
        self.regs = Registers {
            phase: Phase::Run,
            timing: timing.next(&self.geometry.timing),
            game: self.regs.game.next(&self.geometry, &timing, inputs.ui_in),
        };
    }

    /// What the beam is drawing this cycle.
    pub fn current_object(&self) -> Object {
        match self.regs.phase {
            Phase::Reset => Object::Blank,
            Phase::Run => render::object_at(&self.geometry, &self.regs.timing, &self.regs.game),
        }
    }

    /// Current output pins.
    pub fn outputs(&self) -> OutputPins {
        let t = &self.geometry.timing;
        let uo_out = match self.regs.phase {
            Phase::Reset => {
                let idle = sync_level(false, t.sync_active_low);
                self.mux.compose(idle, idle, Rgb222::BLACK)
            }
            Phase::Run => {
                let timing = &self.regs.timing;
                self.mux.compose(
                    timing.hsync(t),
                    timing.vsync(t),
                    self.current_object().color(),
                )
            }
        };
        OutputPins {
            uo_out,
            uio_out: 0,
            uio_oe: 0,
        }
    }

    /// Copies out every register.
    pub fn probe(&self) -> Snapshot {
        let r = &self.regs;
        Snapshot {
            phase: r.phase,
            h_count: r.timing.h_count(),
            v_count: r.timing.v_count(),
            left_y: r.game.left.y,
            left_intent: r.game.left.intent,
            right_y: r.game.right.y,
            right_intent: r.game.right.intent,
            ball_x: r.game.ball.x,
            ball_y: r.game.ball.y,
            ball_dx: r.game.ball.dx,
            ball_dy: r.game.ball.dy,
            score: r.game.score,
        }
    }
}
