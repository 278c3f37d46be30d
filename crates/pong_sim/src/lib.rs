//! Cycle-level testbench for the VGA Pong design.
//!
//! This crate drives a [`pong_rtl::PongTop`] through its pins the way an
//! external test driver would: one rising edge per call, reset and buttons
//! as plain input levels, outputs sampled after every edge.
//!
//! # Usage
//!
//! ```ignore
//! use pong_sim::{Button, Testbench};
//!
//! let mut tb = Testbench::new(&pong_config::DesignConfig::default())?;
//! tb.reset_sequence(10);
//! tb.press(Button::Up);
//! tb.clock(10_000);
//! println!("paddle at {} after {}", tb.probe().left_y, tb.time());
//! ```
//!
//! # Modules
//!
//! - `testbench`: pin driver with optional waveform dump
//! - `waveform`: VCD recording, gzip-compressed for `.gz` paths
//! - `monitor`: per-bit toggle and run-length tracking
//! - `frame`: frame capture from the pins, PNG and ASCII output
//! - `checks`: the built-in conformance checks

#![warn(missing_docs)]

pub mod checks;
pub mod error;
pub mod frame;
pub mod monitor;
pub mod testbench;
pub mod time;
pub mod waveform;

pub use checks::{run_all, run_matching, CheckOutcome, CheckReport, CHECKS};
pub use error::SimError;
pub use frame::{capture_frame, run_to_frame_start, Frame, Rect};
pub use monitor::SignalMonitor;
pub use testbench::{Button, Testbench, DEFAULT_RESET_CYCLES};
pub use time::SimTime;
pub use waveform::{TraceId, VcdFile, VcdRecorder, WaveformRecorder};
