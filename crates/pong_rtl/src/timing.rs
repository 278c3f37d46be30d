//! Horizontal and vertical timing generator.
//!
//! [`TimingGenerator`] holds the only two counters in the design that
//! advance every clock. Sync pulses, the visible-region flag and the
//! game's update ticks are all pure functions of those counters.

use pong_config::TimingConfig;
use serde::Serialize;

/// The pixel and line counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TimingGenerator {
    h_count: u32,
    v_count: u32,
}

impl TimingGenerator {
    /// Counter values forced by reset.
    pub fn reset() -> Self {
        Self::default()
    }

    /// Builds a generator at an arbitrary position, for tests and probes.
    pub fn at(h_count: u32, v_count: u32) -> Self {
        Self { h_count, v_count }
    }

    /// Current pixel within the line, `0..H_TOTAL`.
    pub fn h_count(&self) -> u32 {
        self.h_count
    }

    /// Current line within the frame, `0..V_TOTAL`.
    pub fn v_count(&self) -> u32 {
        self.v_count
    }

    /// Returns the counter values for the next clock.
    ///
    /// `h_count` wraps after `H_TOTAL - 1` and carries into `v_count`,
    /// which wraps after `V_TOTAL - 1`.
    pub fn next(&self, t: &TimingConfig) -> Self {
        debug_assert!(self.h_count < t.h_total(), "h_count past modulus");
        debug_assert!(self.v_count < t.v_total(), "v_count past modulus");
        if self.h_count + 1 < t.h_total() {
            return Self {
                h_count: self.h_count + 1,
                v_count: self.v_count,
            };
        }
        let v_count = if self.v_count + 1 < t.v_total() {
            self.v_count + 1
        } else {
            0
        };
        Self { h_count: 0, v_count }
    }

    /// Whether the horizontal sync pulse is asserted (logical, not pin level).
    pub fn hsync_active(&self, t: &TimingConfig) -> bool {
        (t.h_sync_start()..t.h_sync_end()).contains(&self.h_count)
    }

    /// Whether the vertical sync pulse is asserted (logical, not pin level).
    pub fn vsync_active(&self, t: &TimingConfig) -> bool {
        (t.v_sync_start()..t.v_sync_end()).contains(&self.v_count)
    }

    /// HSYNC pin level.
    pub fn hsync(&self, t: &TimingConfig) -> bool {
        sync_level(self.hsync_active(t), t.sync_active_low)
    }

    /// VSYNC pin level.
    pub fn vsync(&self, t: &TimingConfig) -> bool {
        sync_level(self.vsync_active(t), t.sync_active_low)
    }

    /// Whether the counters address a visible pixel.
    pub fn visible(&self, t: &TimingConfig) -> bool {
        self.h_count < t.h_visible && self.v_count < t.v_visible
    }

    /// First clock of each line.
    pub fn line_tick(&self) -> bool {
        self.h_count == 0
    }

    /// First clock of vertical blanking, once per frame.
    ///
    /// Game objects only move here, so nothing shifts mid-scan.
    pub fn frame_tick(&self, t: &TimingConfig) -> bool {
        self.h_count == 0 && self.v_count == t.v_visible
    }

    /// First clock of every `lines`-th line.
    pub fn every_lines(&self, lines: u32) -> bool {
        self.line_tick() && lines != 0 && self.v_count % lines == 0
    }
}

/// Converts a logical sync assertion to its pin level.
pub fn sync_level(active: bool, active_low: bool) -> bool {
    active != active_low
}
