//! Conformance test helpers for the VGA Pong design.
//!
//! Provides shared setup for the integration tests: configurations, a
//! testbench already taken through reset, and loops that observe pins and
//! registers on every clock.

#![warn(missing_docs)]

use pong_config::DesignConfig;
use pong_rtl::{OutputPins, Snapshot};
use pong_sim::{Button, SignalMonitor, Testbench, DEFAULT_RESET_CYCLES};

/// The canonical 640x480@60 design.
pub fn vga_config() -> DesignConfig {
    DesignConfig::default()
}

/// The reduced 40x30 design.
pub fn small_config() -> DesignConfig {
    DesignConfig::small()
}

/// Parses and validates a configuration, panicking with the error on
/// failure.
pub fn config_from_toml(toml: &str) -> DesignConfig {
    match pong_config::load_config_from_str(toml) {
        Ok(c) => c,
        Err(e) => panic!("invalid test configuration: {e}"),
    }
}

/// A testbench that has just completed the standard reset sequence.
pub fn started(config: &DesignConfig) -> Testbench {
    let mut tb = match Testbench::new(config) {
        Ok(tb) => tb,
        Err(e) => panic!("cannot build design: {e}"),
    };
    tb.reset_sequence(DEFAULT_RESET_CYCLES);
    tb
}

/// Holds `button` alone for `cycles` clocks, then releases everything.
pub fn hold(tb: &mut Testbench, button: Button, cycles: u64) {
    tb.release_all();
    tb.press(button);
    tb.clock(cycles);
    tb.release_all();
}

/// Clocks `n` times, calling `f` with the cycle count, pins and registers
/// after each edge.
pub fn observe<F>(tb: &mut Testbench, n: u64, mut f: F)
where
    F: FnMut(u64, &OutputPins, &Snapshot),
{
    for _ in 0..n {
        tb.clock(1);
        f(tb.cycles(), &tb.outputs(), &tb.probe());
    }
}

/// Monitors for the HSYNC and VSYNC bits of `tb`'s design.
pub fn sync_monitors(tb: &Testbench) -> (SignalMonitor, SignalMonitor) {
    let mux = tb.top().mux();
    (
        SignalMonitor::new(mux.hsync_bit()),
        SignalMonitor::new(mux.vsync_bit()),
    )
}

/// Clocks `n` times while feeding both sync monitors.
pub fn watch_sync(tb: &mut Testbench, n: u64, hsync: &mut SignalMonitor, vsync: &mut SignalMonitor) {
    tb.clock_sampling(n, |_, out| {
        hsync.sample(out);
        vsync.sample(out);
    });
}

/// Clocks until `pred` holds on the registers, up to `limit` clocks.
/// Returns the clocks spent, or `None` if the limit was reached.
pub fn run_until<P>(tb: &mut Testbench, limit: u64, mut pred: P) -> Option<u64>
where
    P: FnMut(&Snapshot) -> bool,
{
    for spent in 0..=limit {
        if pred(&tb.probe()) {
            return Some(spent);
        }
        tb.clock(1);
    }
    None
}
