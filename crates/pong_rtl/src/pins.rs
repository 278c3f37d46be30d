//! Pin-level interface of the design.

use serde::Serialize;

/// `ui_in` bit: left paddle up.
pub const UI_UP: u8 = 0x01;
/// `ui_in` bit: left paddle down.
pub const UI_DOWN: u8 = 0x02;
/// `ui_in` bit: right paddle up (only in `buttons` mode).
pub const UI_RIGHT_UP: u8 = 0x04;
/// `ui_in` bit: right paddle down (only in `buttons` mode).
pub const UI_RIGHT_DOWN: u8 = 0x08;

/// Inputs sampled on each rising clock edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InputPins {
    /// Active-low synchronous reset.
    pub rst_n: bool,
    /// Clock enable; state holds while low.
    pub ena: bool,
    /// General input word (bit 0 up, bit 1 down).
    pub ui_in: u8,
    /// Bidirectional inputs; unused by this design.
    pub uio_in: u8,
}

impl InputPins {
    /// Reset asserted, everything else idle.
    pub fn reset() -> Self {
        Self {
            rst_n: false,
            ena: true,
            ui_in: 0,
            uio_in: 0,
        }
    }

    /// Reset released with the given button word.
    pub fn running(ui_in: u8) -> Self {
        Self {
            rst_n: true,
            ena: true,
            ui_in,
            uio_in: 0,
        }
    }
}

impl Default for InputPins {
    fn default() -> Self {
        Self::running(0)
    }
}

/// Outputs driven by the design.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutputPins {
    /// Sync and color word.
    pub uo_out: u8,
    /// Bidirectional outputs; always 0.
    pub uio_out: u8,
    /// Bidirectional output enables; always 0 (all inputs).
    pub uio_oe: u8,
}

impl OutputPins {
    /// Reads one bit of `uo_out`.
    pub fn bit(&self, bit: u8) -> bool {
        (self.uo_out >> bit) & 1 != 0
    }
}
