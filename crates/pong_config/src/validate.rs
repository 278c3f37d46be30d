//! Structural validation of a [`DesignConfig`].
//!
//! The design never reports errors at runtime, so every relationship its
//! clamping and wraparound logic relies on is checked here, once, before a
//! design is built.

use crate::error::ConfigError;
use crate::types::{DesignConfig, GameConfig, PinConfig, TimingConfig};

/// Largest line or frame length the 12-bit counters can hold.
const COUNTER_LIMIT: u32 = 4096;

/// Checks that a configuration describes a buildable design.
pub fn validate(config: &DesignConfig) -> Result<(), ConfigError> {
    let period = config.clock_period_ns();
    if period == 0 {
        return Err(ConfigError::ValidationError(format!(
            "clock frequency {} has no whole-nanosecond period",
            config.clock.frequency
        )));
    }
    validate_timing(&config.timing)?;
    validate_game(&config.game, &config.timing)?;
    validate_pins(&config.pins)
}

fn require_nonzero(value: u32, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroField(field.to_string()));
    }
    Ok(())
}

fn validate_timing(t: &TimingConfig) -> Result<(), ConfigError> {
    require_nonzero(t.h_visible, "timing.h_visible")?;
    require_nonzero(t.h_sync, "timing.h_sync")?;
    require_nonzero(t.v_visible, "timing.v_visible")?;
    require_nonzero(t.v_sync, "timing.v_sync")?;
    let fields = [
        ("timing.h_visible", t.h_visible),
        ("timing.h_front_porch", t.h_front_porch),
        ("timing.h_sync", t.h_sync),
        ("timing.h_back_porch", t.h_back_porch),
        ("timing.v_visible", t.v_visible),
        ("timing.v_front_porch", t.v_front_porch),
        ("timing.v_sync", t.v_sync),
        ("timing.v_back_porch", t.v_back_porch),
    ];
    for (field, value) in fields {
        if value > COUNTER_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "{field} {value} exceeds the 12-bit counters"
            )));
        }
    }
    // Each part is bounded above, so the sums cannot wrap.
    if t.h_total() > COUNTER_LIMIT || t.v_total() > COUNTER_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "timing {}x{} exceeds the 12-bit counters",
            t.h_total(),
            t.v_total()
        )));
    }
    Ok(())
}

fn validate_game(g: &GameConfig, t: &TimingConfig) -> Result<(), ConfigError> {
    require_nonzero(g.paddle_width, "game.paddle_width")?;
    require_nonzero(g.paddle_height, "game.paddle_height")?;
    require_nonzero(g.paddle_step, "game.paddle_step")?;
    require_nonzero(g.paddle_tick_lines, "game.paddle_tick_lines")?;
    require_nonzero(g.ball_size, "game.ball_size")?;
    require_nonzero(g.ball_dx, "game.ball_dx")?;
    require_nonzero(g.frame_divider, "game.frame_divider")?;

    let inner_height = match g.border.checked_mul(2) {
        Some(both) if both < t.v_visible => t.v_visible - both,
        _ => {
            return Err(ConfigError::ValidationError(format!(
                "border {} leaves no rows of a {}-line screen",
                g.border, t.v_visible
            )))
        }
    };
    if g.paddle_height > inner_height {
        return Err(ConfigError::ValidationError(format!(
            "paddle height {} does not fit between borders ({inner_height} lines)",
            g.paddle_height
        )));
    }
    if g.ball_size > inner_height {
        return Err(ConfigError::ValidationError(format!(
            "ball size {} does not fit between borders ({inner_height} lines)",
            g.ball_size
        )));
    }

    if g.paddle_step > inner_height {
        return Err(ConfigError::ValidationError(format!(
            "paddle_step {} exceeds the {inner_height}-line playfield",
            g.paddle_step
        )));
    }
    if g.ball_dy > inner_height {
        return Err(ConfigError::ValidationError(format!(
            "ball_dy {} exceeds the {inner_height}-line playfield",
            g.ball_dy
        )));
    }

    // Both paddles plus a ball-width gap must fit across the line.
    let lanes = g
        .paddle_margin
        .checked_add(g.paddle_width)
        .and_then(|side| side.checked_mul(2))
        .and_then(|both| both.checked_add(g.ball_size))
        .filter(|&lanes| lanes < t.h_visible);
    if lanes.is_none() {
        return Err(ConfigError::ValidationError(format!(
            "paddles (margin {}, width {}) and ball {} do not fit a {}-pixel line",
            g.paddle_margin, g.paddle_width, g.ball_size, t.h_visible
        )));
    }
    if g.ball_dx >= t.h_visible / 2 {
        return Err(ConfigError::ValidationError(format!(
            "ball_dx {} must be less than half the visible width",
            g.ball_dx
        )));
    }
    if g.paddle_tick_lines > t.v_total() {
        return Err(ConfigError::ValidationError(format!(
            "paddle_tick_lines {} exceeds the {} lines in a frame",
            g.paddle_tick_lines,
            t.v_total()
        )));
    }
    Ok(())
}

fn validate_pins(p: &PinConfig) -> Result<(), ConfigError> {
    if p.hsync_bit > 7 || p.vsync_bit > 7 {
        return Err(ConfigError::ValidationError(format!(
            "sync bits must be 0..=7 (hsync {}, vsync {})",
            p.hsync_bit, p.vsync_bit
        )));
    }
    if p.hsync_bit == p.vsync_bit {
        return Err(ConfigError::PinConflict(p.hsync_bit));
    }
    Ok(())
}
