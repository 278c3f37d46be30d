//! Pixel clock frequencies with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A clock frequency stored in whole Hertz.
///
/// Parses strings like `"25MHz"`, `"25.175MHz"`, `"100KHz"` and bare
/// numbers (interpreted as Hz). Fractional inputs are rounded to the
/// nearest Hertz. Serialized as its display string so it reads naturally
/// in `pong.toml`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency(u64);

impl Frequency {
    /// Creates a frequency from a value in Hertz.
    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    /// Creates a frequency from a value in megahertz.
    pub const fn from_mhz(mhz: u64) -> Self {
        Self(mhz * 1_000_000)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> u64 {
        self.0
    }

    /// Returns the clock period in nanoseconds, rounded to the nearest ns.
    ///
    /// Returns 0 for a zero frequency or for anything above 2 GHz.
    pub fn period_ns(&self) -> u64 {
        if self.0 == 0 {
            return 0;
        }
        (1_000_000_000 + self.0 / 2) / self.0
    }

    /// Returns the clock period in picoseconds, rounded to the nearest ps.
    pub fn period_ps(&self) -> u64 {
        if self.0 == 0 {
            return 0;
        }
        (1_000_000_000_000 + self.0 / 2) / self.0
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::from_mhz(25)
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000 && hz % 1_000_000 == 0 {
            write!(f, "{}GHz", hz as f64 / 1e9)
        } else if hz >= 1_000_000 && hz % 1_000 == 0 {
            write!(f, "{}MHz", hz as f64 / 1e6)
        } else if hz >= 1_000 && hz % 1_000 == 0 {
            write!(f, "{}KHz", hz / 1_000)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1e9)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1e6)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1e3)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        if !val.is_finite() || val < 0.0 {
            return Err(err());
        }
        Ok(Frequency((val * scale).round() as u64))
    }
}

impl TryFrom<String> for Frequency {
    type Error = ParseFrequencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mhz() {
        let f: Frequency = "25MHz".parse().unwrap();
        assert_eq!(f.hz(), 25_000_000);
    }

    #[test]
    fn parse_fractional_mhz() {
        let f: Frequency = "25.175MHz".parse().unwrap();
        assert_eq!(f.hz(), 25_175_000);
    }

    #[test]
    fn parse_khz_and_bare() {
        assert_eq!("100KHz".parse::<Frequency>().unwrap().hz(), 100_000);
        assert_eq!("48000".parse::<Frequency>().unwrap().hz(), 48_000);
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("50mhz".parse::<Frequency>().unwrap().hz(), 50_000_000);
    }

    #[test]
    fn parse_rejects_garbage_and_negative() {
        assert!("fast".parse::<Frequency>().is_err());
        assert!("-5MHz".parse::<Frequency>().is_err());
    }

    #[test]
    fn vga_pixel_clock_period() {
        let f = Frequency::from_mhz(25);
        assert_eq!(f.period_ns(), 40);
        assert_eq!(f.period_ps(), 40_000);
    }

    #[test]
    fn period_rounds() {
        let f: Frequency = "25.175MHz".parse().unwrap();
        assert_eq!(f.period_ns(), 40);
        assert_eq!(f.period_ps(), 39_722);
    }

    #[test]
    fn zero_has_no_period() {
        assert_eq!(Frequency::from_hz(0).period_ns(), 0);
    }

    #[test]
    fn display_selects_unit() {
        assert_eq!(Frequency::from_mhz(25).to_string(), "25MHz");
        assert_eq!(Frequency::from_hz(25_175_000).to_string(), "25.175MHz");
        assert_eq!(Frequency::from_hz(100_000).to_string(), "100KHz");
        assert_eq!(Frequency::from_hz(500).to_string(), "500Hz");
    }

    #[test]
    fn display_parse_agree() {
        let f = Frequency::from_hz(25_175_000);
        assert_eq!(f.to_string().parse::<Frequency>().unwrap(), f);
    }
}
