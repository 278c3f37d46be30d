//! Output mux: packs sync levels and pixel color into `uo_out`.

use pong_config::PinConfig;
use serde::Serialize;

use crate::render::Object;

/// A 2-bit-per-channel color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb222 {
    /// Red, 0..=3.
    pub r: u8,
    /// Green, 0..=3.
    pub g: u8,
    /// Blue, 0..=3.
    pub b: u8,
}

impl Rgb222 {
    /// Black.
    pub const BLACK: Rgb222 = Rgb222::new(0, 0, 0);
    /// White.
    pub const WHITE: Rgb222 = Rgb222::new(3, 3, 3);

    /// Builds a color, masking each channel to two bits.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r & 3,
            g: g & 3,
            b: b & 3,
        }
    }

    /// Expands to 8-bit-per-channel RGB.
    pub fn to_rgb8(self) -> [u8; 3] {
        [self.r * 85, self.g * 85, self.b * 85]
    }
}

impl Object {
    /// The fixed palette entry for this object.
    pub fn color(self) -> Rgb222 {
        match self {
            Object::Blank | Object::Background => Rgb222::BLACK,
            Object::Net => Rgb222::new(1, 1, 1),
            Object::Border => Rgb222::new(2, 2, 2),
            Object::RightPaddle => Rgb222::new(0, 3, 3),
            Object::LeftPaddle => Rgb222::new(0, 3, 0),
            Object::Ball => Rgb222::WHITE,
        }
    }
}

/// Decoded contents of one `uo_out` word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinLevels {
    /// HSYNC pin level.
    pub hsync: bool,
    /// VSYNC pin level.
    pub vsync: bool,
    /// Pixel color.
    pub color: Rgb222,
}

/// The fixed `uo_out` bit assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputMux {
    hsync_bit: u8,
    vsync_bit: u8,
    /// R0, R1, G0, G1, B0, B1.
    color_bits: [u8; 6],
}

impl OutputMux {
    /// Builds the mux for a pin assignment.
    pub fn new(pins: &PinConfig) -> Self {
        Self {
            hsync_bit: pins.hsync_bit,
            vsync_bit: pins.vsync_bit,
            color_bits: pins.color_bits(),
        }
    }

    /// Bit carrying HSYNC.
    pub fn hsync_bit(&self) -> u8 {
        self.hsync_bit
    }

    /// Bit carrying VSYNC.
    pub fn vsync_bit(&self) -> u8 {
        self.vsync_bit
    }

    /// Packs sync levels and a color into an output word.
    pub fn compose(&self, hsync: bool, vsync: bool, color: Rgb222) -> u8 {
        let channels = [color.r, color.g, color.b];
        let mut word = (u8::from(hsync) << self.hsync_bit) | (u8::from(vsync) << self.vsync_bit);
        for (i, &bit) in self.color_bits.iter().enumerate() {
            let level = (channels[i / 2] >> (i % 2)) & 1;
            word |= level << bit;
        }
        word
    }

    /// Unpacks an output word; the inverse of [`OutputMux::compose`].
    pub fn decode(&self, word: u8) -> PinLevels {
        let bit = |n: u8| (word >> n) & 1;
        let mut channels = [0u8; 3];
        for (i, &n) in self.color_bits.iter().enumerate() {
            channels[i / 2] |= bit(n) << (i % 2);
        }
        PinLevels {
            hsync: bit(self.hsync_bit) != 0,
            vsync: bit(self.vsync_bit) != 0,
            color: Rgb222::new(channels[0], channels[1], channels[2]),
        }
    }
}
