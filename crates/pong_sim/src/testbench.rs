//! Cycle-level driver for the design.
//!
//! A [`Testbench`] plays the role of the external test driver: it owns the
//! input pins, applies rising clock edges, and samples the output pins. It
//! can also dump every edge to a waveform recorder.

use pong_config::DesignConfig;
use pong_rtl::pins::{UI_DOWN, UI_RIGHT_DOWN, UI_RIGHT_UP, UI_UP};
use pong_rtl::{InputPins, OutputPins, PongTop, Snapshot};

use crate::error::SimError;
use crate::time::{SimTime, FS_PER_PS};
use crate::waveform::{TraceId, WaveformRecorder};

/// Number of cycles [`Testbench::reset_sequence`] holds reset by default.
pub const DEFAULT_RESET_CYCLES: u64 = 10;

/// A push button wired to `ui_in`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Left paddle up (bit 0).
    Up,
    /// Left paddle down (bit 1).
    Down,
    /// Right paddle up (bit 2), `buttons` mode only.
    RightUp,
    /// Right paddle down (bit 3), `buttons` mode only.
    RightDown,
}

impl Button {
    /// The `ui_in` bit this button drives.
    pub fn mask(self) -> u8 {
        match self {
            Button::Up => UI_UP,
            Button::Down => UI_DOWN,
            Button::RightUp => UI_RIGHT_UP,
            Button::RightDown => UI_RIGHT_DOWN,
        }
    }
}

/// Signals dumped to a waveform, with their bit widths.
const TRACED: [(&str, u32); 13] = [
    ("clk", 1),
    ("rst_n", 1),
    ("ena", 1),
    ("ui_in", 8),
    ("uo_out", 8),
    ("hsync", 1),
    ("vsync", 1),
    ("h_count", 12),
    ("v_count", 12),
    ("left_y", 12),
    ("right_y", 12),
    ("ball_x", 12),
    ("ball_y", 12),
];

struct Trace {
    recorder: Box<dyn WaveformRecorder>,
    last: [Option<u64>; TRACED.len()],
    error: Option<SimError>,
}

impl Trace {
    fn record(&mut self, time_fs: u64, values: [u64; TRACED.len()]) {
        if self.error.is_some() {
            return;
        }
        for (i, &value) in values.iter().enumerate() {
            let masked = value & ((1u64 << TRACED[i].1) - 1);
            if self.last[i] == Some(masked) {
                continue;
            }
            if let Err(e) = self.recorder.record_change(time_fs, TraceId(i as u32), masked) {
                log::warn!("waveform recording stopped: {e}");
                self.error = Some(e);
                return;
            }
            self.last[i] = Some(masked);
        }
    }
}

/// Drives a [`PongTop`] one clock edge at a time.
pub struct Testbench {
    top: PongTop,
    inputs: InputPins,
    period_fs: u64,
    cycles: u64,
    trace: Option<Trace>,
}

impl Testbench {
    /// Builds the design and a driver with reset released and no buttons
    /// pressed. The design itself still powers up in reset until the first
    /// edge.
    pub fn new(config: &DesignConfig) -> Result<Self, SimError> {
        let top = PongTop::new(config)?;
        Ok(Self {
            top,
            inputs: InputPins::default(),
            period_fs: config.clock.frequency.period_ps() * FS_PER_PS,
            cycles: 0,
            trace: None,
        })
    }

    /// Drives `rst_n` low while `asserted`.
    pub fn set_reset(&mut self, asserted: bool) {
        self.inputs.rst_n = !asserted;
    }

    /// Drives `ena`.
    pub fn set_enable(&mut self, enabled: bool) {
        self.inputs.ena = enabled;
    }

    /// Drives the whole `ui_in` word.
    pub fn set_ui_in(&mut self, ui_in: u8) {
        self.inputs.ui_in = ui_in;
    }

    /// Presses a button, leaving the others as they are.
    pub fn press(&mut self, button: Button) {
        self.inputs.ui_in |= button.mask();
    }

    /// Releases a single button.
    pub fn release(&mut self, button: Button) {
        self.inputs.ui_in &= !button.mask();
    }

    /// Releases every button.
    pub fn release_all(&mut self) {
        self.inputs.ui_in = 0;
    }

    /// Current input pin levels.
    pub fn inputs(&self) -> InputPins {
        self.inputs
    }

    /// Applies `n` rising edges.
    pub fn clock(&mut self, n: u64) {
        for _ in 0..n {
            self.edge();
        }
    }

    /// Applies `n` rising edges, calling `f` with the cycle count and the
    /// output pins after each one.
    pub fn clock_sampling<F>(&mut self, n: u64, mut f: F)
    where
        F: FnMut(u64, &OutputPins),
    {
        for _ in 0..n {
            self.edge();
            f(self.cycles, &self.top.outputs());
        }
    }

    /// Holds reset for `cycles` edges, then releases it.
    pub fn reset_sequence(&mut self, cycles: u64) {
        log::debug!("holding reset for {cycles} cycles");
        self.set_reset(true);
        self.clock(cycles);
        self.set_reset(false);
    }

    /// Current output pins.
    pub fn outputs(&self) -> OutputPins {
        self.top.outputs()
    }

    /// Current register values.
    pub fn probe(&self) -> Snapshot {
        self.top.probe()
    }

    /// The design under test.
    pub fn top(&self) -> &PongTop {
        &self.top
    }

    /// Rising edges applied so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Clock period in femtoseconds.
    pub fn period_fs(&self) -> u64 {
        self.period_fs
    }

    /// Simulation time at the end of the most recent clock period.
    pub fn time(&self) -> SimTime {
        SimTime::from_fs(self.cycles * self.period_fs)
    }

    /// Builds an assertion failure stamped with the current time.
    pub fn fail(&self, message: impl Into<String>) -> SimError {
        SimError::AssertionFailed {
            time_fs: self.time().fs,
            message: message.into(),
        }
    }

    /// Starts dumping every edge to `recorder`.
    ///
    /// Write errors do not interrupt the run; the first one is returned by
    /// [`Testbench::finish_trace`].
    pub fn attach_recorder(
        &mut self,
        mut recorder: Box<dyn WaveformRecorder>,
    ) -> Result<(), SimError> {
        recorder.begin_scope("pong_top")?;
        for (i, (name, width)) in TRACED.iter().enumerate() {
            recorder.register_signal(TraceId(i as u32), name, *width)?;
        }
        recorder.end_scope()?;
        let mut trace = Trace {
            recorder,
            last: [None; TRACED.len()],
            error: None,
        };
        trace.record(self.time().fs, self.sample(false));
        self.trace = Some(trace);
        Ok(())
    }

    /// Stops dumping and finalizes the recorder.
    pub fn finish_trace(&mut self) -> Result<(), SimError> {
        let Some(mut trace) = self.trace.take() else {
            return Ok(());
        };
        if let Some(e) = trace.error.take() {
            return Err(e);
        }
        trace.recorder.finalize()
    }

    fn edge(&mut self) {
        self.top.tick(&self.inputs);
        self.cycles += 1;
        if self.trace.is_some() {
            // clk is low for the first half of each period.
            let fall = self.time().fs;
            let rise = fall - self.period_fs / 2;
            let high = self.sample(true);
            let low = self.sample(false);
            if let Some(trace) = self.trace.as_mut() {
                trace.record(rise, high);
                trace.record(fall, low);
            }
        }
    }

    fn sample(&self, clk: bool) -> [u64; TRACED.len()] {
        let out = self.top.outputs();
        let s = self.top.probe();
        let mux = self.top.mux();
        [
            u64::from(clk),
            u64::from(self.inputs.rst_n),
            u64::from(self.inputs.ena),
            u64::from(self.inputs.ui_in),
            u64::from(out.uo_out),
            u64::from(out.bit(mux.hsync_bit())),
            u64::from(out.bit(mux.vsync_bit())),
            u64::from(s.h_count),
            u64::from(s.v_count),
            s.left_y as u64,
            s.right_y as u64,
            s.ball_x as u64,
            s.ball_y as u64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::VcdRecorder;
    use pong_rtl::Phase;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    /// A writer whose buffer stays readable after the recorder is boxed.
    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn small() -> Testbench {
        Testbench::new(&DesignConfig::small()).unwrap()
    }

    #[test]
    fn period_from_clock_frequency() {
        let tb = Testbench::new(&DesignConfig::default()).unwrap();
        assert_eq!(tb.period_fs(), 40_000_000);
    }

    #[test]
    fn time_tracks_cycles() {
        let mut tb = Testbench::new(&DesignConfig::default()).unwrap();
        tb.clock(25);
        assert_eq!(tb.cycles(), 25);
        assert_eq!(tb.time().to_string(), "1 us");
    }

    #[test]
    fn reset_sequence_leaves_design_ready() {
        let mut tb = small();
        tb.reset_sequence(DEFAULT_RESET_CYCLES);
        assert_eq!(tb.cycles(), 10);
        assert_eq!(tb.probe().phase, Phase::Reset);
        assert!(tb.inputs().rst_n);
        tb.clock(1);
        assert_eq!(tb.probe().phase, Phase::Run);
    }

    #[test]
    fn buttons_set_and_clear_bits() {
        let mut tb = small();
        tb.press(Button::Up);
        tb.press(Button::RightDown);
        assert_eq!(tb.inputs().ui_in, 0b1001);
        tb.release(Button::Up);
        assert_eq!(tb.inputs().ui_in, 0b1000);
        tb.release_all();
        assert_eq!(tb.inputs().ui_in, 0);
    }

    #[test]
    fn clock_sampling_sees_every_cycle() {
        let mut tb = small();
        tb.reset_sequence(DEFAULT_RESET_CYCLES);
        let mut seen = Vec::new();
        tb.clock_sampling(5, |cycle, _| seen.push(cycle));
        assert_eq!(seen, vec![11, 12, 13, 14, 15]);
    }

    #[test]
    fn enable_low_freezes_counters() {
        let mut tb = small();
        tb.reset_sequence(DEFAULT_RESET_CYCLES);
        tb.clock(7);
        tb.set_enable(false);
        tb.clock(100);
        assert_eq!(tb.probe().h_count, 7);
    }

    #[test]
    fn fail_is_time_stamped() {
        let mut tb = Testbench::new(&DesignConfig::default()).unwrap();
        tb.clock(2);
        let e = tb.fail("boom");
        assert_eq!(e.to_string(), "assertion failed at 80000000 fs: boom");
    }

    #[test]
    fn trace_dumps_only_changes() {
        let buf = Shared::default();
        let mut tb = small();
        tb.attach_recorder(Box::new(VcdRecorder::new(buf.clone())))
            .unwrap();
        tb.reset_sequence(2);
        tb.clock(3);
        tb.finish_trace().unwrap();

        let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
        assert!(text.contains("$var wire 12 ( h_count $end"));
        // clk toggles on every edge: 5 rises, 5 falls, plus the initial value.
        let clk_changes = text
            .lines()
            .filter(|l| *l == "0!" || *l == "1!")
            .count();
        assert_eq!(clk_changes, 11);
        assert!(text.contains("#20000000"));
    }

    #[test]
    fn finish_without_trace_is_noop() {
        let mut tb = small();
        tb.finish_trace().unwrap();
    }
}
