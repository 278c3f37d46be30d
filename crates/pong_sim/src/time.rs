//! Simulation time with femtosecond precision.
//!
//! The testbench advances time in whole clock periods, so [`SimTime`] is a
//! plain timestamp; there are no delta cycles in a single-clock design.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;
/// Femtoseconds per second.
pub const FS_PER_S: u64 = 1_000_000_000_000_000;

/// A simulation time point in femtoseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime {
    /// Simulation time in femtoseconds.
    pub fs: u64,
}

impl SimTime {
    /// Time zero.
    pub fn zero() -> Self {
        Self { fs: 0 }
    }

    /// Creates a time from nanoseconds.
    pub fn from_ns(ns: u64) -> Self {
        Self { fs: ns * FS_PER_NS }
    }

    /// Creates a time from picoseconds.
    pub fn from_ps(ps: u64) -> Self {
        Self { fs: ps * FS_PER_PS }
    }

    /// Creates a time from femtoseconds.
    pub fn from_fs(fs: u64) -> Self {
        Self { fs }
    }

    /// Converts to nanoseconds (truncated).
    pub fn to_ns(&self) -> u64 {
        self.fs / FS_PER_NS
    }

    /// Number of whole clock periods that fit in this duration.
    pub fn cycles_at(&self, period_fs: u64) -> u64 {
        if period_fs == 0 {
            return 0;
        }
        self.fs / period_fs
    }
}

impl Add for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> SimTime {
        SimTime {
            fs: self.fs + rhs.fs,
        }
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.fs;
        if fs == 0 {
            write!(f, "0 fs")
        } else if fs >= FS_PER_S && fs.is_multiple_of(FS_PER_S) {
            write!(f, "{} s", fs / FS_PER_S)
        } else if fs >= FS_PER_MS && fs.is_multiple_of(FS_PER_MS) {
            write!(f, "{} ms", fs / FS_PER_MS)
        } else if fs >= FS_PER_US && fs.is_multiple_of(FS_PER_US) {
            write!(f, "{} us", fs / FS_PER_US)
        } else if fs >= FS_PER_NS && fs.is_multiple_of(FS_PER_NS) {
            write!(f, "{} ns", fs / FS_PER_NS)
        } else if fs >= FS_PER_PS && fs.is_multiple_of(FS_PER_PS) {
            write!(f, "{} ps", fs / FS_PER_PS)
        } else {
            write!(f, "{fs} fs")
        }
    }
}
