//! Cycle-accurate model of the VGA Pong design.
//!
//! The design is a layered Moore pipeline sharing one pixel clock:
//!
//! - `timing`: horizontal/vertical counters and sync pulses
//! - `game`: paddle and ball registers, advanced on line and frame ticks
//! - `render`: per-pixel object decision from counters and game state
//! - `mux`: packing sync and color into the `uo_out` pin word
//! - `top`: the pin-level wrapper with the RESET/RUN macro-state
//!
//! Every register set is a plain value type with a `next` function taking
//! the current cycle's values and returning the next cycle's; only
//! [`PongTop::tick`] commits them.
//!
//! ```ignore
//! use pong_rtl::{InputPins, PongTop};
//!
//! let mut top = PongTop::new(&pong_config::DesignConfig::default())?;
//! top.tick(&InputPins::reset());
//! top.tick(&InputPins::running(0));
//! let uo_out = top.outputs().uo_out;
//! ```

#![warn(missing_docs)]

pub mod ball;
pub mod game;
pub mod geometry;
pub mod mux;
pub mod paddle;
pub mod pins;
pub mod render;
pub mod timing;
pub mod top;

pub use ball::{Ball, BallEvent, Side};
pub use game::{GameState, Score};
pub use geometry::{Geometry, PaddleBounds, Playfield};
pub use mux::{OutputMux, PinLevels, Rgb222};
pub use paddle::{Intent, Paddle};
pub use pins::{InputPins, OutputPins};
pub use render::Object;
pub use timing::TimingGenerator;
pub use top::{Phase, PongTop, Snapshot};
