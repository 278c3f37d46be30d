//! Pin-bit activity monitor.
//!
//! A [`SignalMonitor`] watches one `uo_out` bit and remembers which levels
//! it took and how long it stayed constant. "Every window of N consecutive
//! samples contains both levels" is equivalent to "the longest constant run
//! is shorter than N", which is what [`SignalMonitor::toggles_within`]
//! checks.

use pong_rtl::OutputPins;

/// Tracks the levels and run lengths of one output bit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalMonitor {
    bit: u8,
    samples: u64,
    seen_low: bool,
    seen_high: bool,
    transitions: u64,
    last: Option<bool>,
    run: u64,
    longest_run: u64,
}

impl SignalMonitor {
    /// Monitors `uo_out` bit `bit`.
    pub fn new(bit: u8) -> Self {
        Self {
            bit,
            samples: 0,
            seen_low: false,
            seen_high: false,
            transitions: 0,
            last: None,
            run: 0,
            longest_run: 0,
        }
    }

    /// Records one sample of the output pins.
    pub fn sample(&mut self, outputs: &OutputPins) {
        self.sample_level(outputs.bit(self.bit));
    }

    /// Records one sample of a raw level.
    pub fn sample_level(&mut self, level: bool) {
        self.samples += 1;
        if level {
            self.seen_high = true;
        } else {
            self.seen_low = true;
        }
        if self.last == Some(level) {
            self.run += 1;
        } else {
            if self.last.is_some() {
                self.transitions += 1;
            }
            self.run = 1;
            self.last = Some(level);
        }
        self.longest_run = self.longest_run.max(self.run);
    }

    /// Whether both levels were observed.
    pub fn toggled(&self) -> bool {
        self.seen_low && self.seen_high
    }

    /// Whether every `window` consecutive samples contained both levels.
    ///
    /// False if fewer than `window` samples were taken.
    pub fn toggles_within(&self, window: u64) -> bool {
        self.samples >= window && self.longest_run < window
    }

    /// Samples taken.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Level changes observed.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Longest stretch of identical samples.
    pub fn longest_run(&self) -> u64 {
        self.longest_run
    }

    /// Forgets everything observed so far.
    pub fn clear(&mut self) {
        *self = Self::new(self.bit);
    }
}
