//! Configuration types deserialized from `pong.toml`.

use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;

/// The complete design configuration.
///
/// Shared read-only by every component of the design. All sections are
/// optional in `pong.toml`; a missing section takes its default, and the
/// defaults describe the canonical 640x480@60 design.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignConfig {
    /// Pixel clock settings.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Video timing constants.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Playfield and object geometry.
    #[serde(default)]
    pub game: GameConfig,
    /// Output pin assignment.
    #[serde(default)]
    pub pins: PinConfig,
}

impl DesignConfig {
    /// A reduced configuration (40x30 visible, 48x34 total) for fast tests.
    ///
    /// Keeps every structural relationship of the full design so the same
    /// invariants hold, with a frame period of only 1632 clocks.
    pub fn small() -> Self {
        Self {
            clock: ClockConfig::default(),
            timing: TimingConfig {
                h_visible: 40,
                h_front_porch: 2,
                h_sync: 4,
                h_back_porch: 2,
                v_visible: 30,
                v_front_porch: 1,
                v_sync: 2,
                v_back_porch: 1,
                sync_active_low: true,
            },
            game: GameConfig {
                paddle_width: 2,
                paddle_height: 8,
                paddle_margin: 2,
                paddle_step: 1,
                paddle_tick_lines: 2,
                ball_size: 2,
                ball_dx: 1,
                ball_dy: 1,
                border: 2,
                frame_divider: 1,
                right_paddle: RightPaddleMode::Track,
            },
            pins: PinConfig::default(),
        }
    }

    /// Clock period in nanoseconds.
    pub fn clock_period_ns(&self) -> u64 {
        self.clock.frequency.period_ns()
    }
}

/// Pixel clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockConfig {
    /// Pixel clock frequency (e.g. `"25MHz"`).
    #[serde(default)]
    pub frequency: Frequency,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::from_mhz(25),
        }
    }
}

/// Horizontal and vertical video timing, in clocks and lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Visible pixels per line.
    pub h_visible: u32,
    /// Clocks between the end of the visible line and the sync pulse.
    pub h_front_porch: u32,
    /// Width of the horizontal sync pulse in clocks.
    pub h_sync: u32,
    /// Clocks between the sync pulse and the next visible line.
    pub h_back_porch: u32,
    /// Visible lines per frame.
    pub v_visible: u32,
    /// Lines between the last visible line and the sync pulse.
    pub v_front_porch: u32,
    /// Width of the vertical sync pulse in lines.
    pub v_sync: u32,
    /// Lines between the sync pulse and the first visible line.
    pub v_back_porch: u32,
    /// Whether both sync pulses are asserted low.
    pub sync_active_low: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            h_visible: 640,
            h_front_porch: 16,
            h_sync: 96,
            h_back_porch: 48,
            v_visible: 480,
            v_front_porch: 10,
            v_sync: 2,
            v_back_porch: 33,
            sync_active_low: true,
        }
    }
}

impl TimingConfig {
    /// Clocks per scanline (`H_TOTAL`).
    pub fn h_total(&self) -> u32 {
        self.h_visible + self.h_front_porch + self.h_sync + self.h_back_porch
    }

    /// Lines per frame (`V_TOTAL`).
    pub fn v_total(&self) -> u32 {
        self.v_visible + self.v_front_porch + self.v_sync + self.v_back_porch
    }

    /// Clocks per frame (`H_TOTAL * V_TOTAL`).
    pub fn frame_clocks(&self) -> u64 {
        u64::from(self.h_total()) * u64::from(self.v_total())
    }

    /// First `h_count` of the horizontal sync pulse.
    pub fn h_sync_start(&self) -> u32 {
        self.h_visible + self.h_front_porch
    }

    /// First `h_count` after the horizontal sync pulse.
    pub fn h_sync_end(&self) -> u32 {
        self.h_sync_start() + self.h_sync
    }

    /// First `v_count` of the vertical sync pulse.
    pub fn v_sync_start(&self) -> u32 {
        self.v_visible + self.v_front_porch
    }

    /// First `v_count` after the vertical sync pulse.
    pub fn v_sync_end(&self) -> u32 {
        self.v_sync_start() + self.v_sync
    }
}

/// How the right-hand paddle is driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RightPaddleMode {
    /// Follows the ball's vertical centre one step per paddle tick.
    #[default]
    Track,
    /// Driven by input bits 2 (up) and 3 (down).
    Buttons,
}

/// Playfield and object geometry, in pixels, plus update rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Paddle width.
    pub paddle_width: u32,
    /// Paddle height.
    pub paddle_height: u32,
    /// Gap between the screen edge and each paddle.
    pub paddle_margin: u32,
    /// Pixels moved per paddle tick.
    pub paddle_step: u32,
    /// Lines between paddle ticks.
    pub paddle_tick_lines: u32,
    /// Ball edge length (the ball is square).
    pub ball_size: u32,
    /// Horizontal ball speed in pixels per ball update.
    pub ball_dx: u32,
    /// Vertical ball speed in pixels per ball update.
    pub ball_dy: u32,
    /// Height of the top and bottom border bands.
    pub border: u32,
    /// Frames between ball updates.
    pub frame_divider: u32,
    /// Right paddle control source.
    pub right_paddle: RightPaddleMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            paddle_width: 8,
            paddle_height: 64,
            paddle_margin: 16,
            paddle_step: 1,
            paddle_tick_lines: 8,
            ball_size: 8,
            ball_dx: 2,
            ball_dy: 1,
            border: 8,
            frame_divider: 1,
            right_paddle: RightPaddleMode::Track,
        }
    }
}

/// Output word bit assignment.
///
/// The two sync bits are placed where configured; the remaining six bit
/// positions, in ascending order, carry R0 R1 G0 G1 B0 B1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinConfig {
    /// Bit of `uo_out` carrying HSYNC.
    pub hsync_bit: u8,
    /// Bit of `uo_out` carrying VSYNC.
    pub vsync_bit: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            hsync_bit: 0,
            vsync_bit: 1,
        }
    }
}

impl PinConfig {
    /// The six `uo_out` bit positions carrying color, lowest first:
    /// R0, R1, G0, G1, B0, B1.
    pub fn color_bits(&self) -> [u8; 6] {
        let mut bits = [0u8; 6];
        let mut n = 0;
        for bit in 0..8u8 {
            if bit != self.hsync_bit && bit != self.vsync_bit && n < bits.len() {
                bits[n] = bit;
                n += 1;
            }
        }
        bits
    }
}
