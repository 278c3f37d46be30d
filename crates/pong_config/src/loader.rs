//! Configuration file loading.

use crate::error::ConfigError;
use crate::types::DesignConfig;
use crate::validate::validate;
use std::path::Path;

/// File name looked up inside a project directory.
pub const CONFIG_FILE_NAME: &str = "pong.toml";

/// Commented configuration written by `vgapong init`.
///
/// Parses to exactly [`DesignConfig::default()`].
pub const DEFAULT_CONFIG_TOML: &str = r#"# VGA Pong design configuration.
# Every section is optional; omitted values take these defaults.

[clock]
frequency = "25MHz"

# 640x480@60: 800 clocks per line, 525 lines per frame.
[timing]
h_visible = 640
h_front_porch = 16
h_sync = 96
h_back_porch = 48
v_visible = 480
v_front_porch = 10
v_sync = 2
v_back_porch = 33
sync_active_low = true

[game]
paddle_width = 8
paddle_height = 64
paddle_margin = 16
paddle_step = 1
# Paddles move every 8 lines (6400 clocks).
paddle_tick_lines = 8
ball_size = 8
ball_dx = 2
ball_dy = 1
border = 8
frame_divider = 1
# "track" follows the ball; "buttons" reads ui_in bits 2 and 3.
right_paddle = "track"

# uo_out bits for the sync pulses; color fills the other six bits.
[pins]
hsync_bit = 0
vsync_bit = 1
"#;

/// Loads and validates `pong.toml` from a project directory.
///
/// A directory without `pong.toml` yields the default configuration.
pub fn load_config(project_dir: &Path) -> Result<DesignConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(DesignConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<DesignConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<DesignConfig, ConfigError> {
    let config: DesignConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RightPaddleMode;
    use tempfile::TempDir;

    #[test]
    fn empty_file_is_default() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, DesignConfig::default());
    }

    #[test]
    fn default_template_matches_default() {
        let config = load_config_from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config, DesignConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml = r#"
[game]
paddle_height = 48
right_paddle = "buttons"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.game.paddle_height, 48);
        assert_eq!(config.game.right_paddle, RightPaddleMode::Buttons);
        assert_eq!(config.game.paddle_width, 8);
        assert_eq!(config.timing.h_total(), 800);
    }

    #[test]
    fn clock_frequency_parsed() {
        let config = load_config_from_str("[clock]\nfrequency = \"25.175MHz\"\n").unwrap();
        assert_eq!(config.clock.frequency.hz(), 25_175_000);
    }

    #[test]
    fn bad_frequency_is_parse_error() {
        let err = load_config_from_str("[clock]\nfrequency = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let err = load_config_from_str("[timing]\nh_visibel = 640\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn validation_runs_after_parse() {
        let err = load_config_from_str("[pins]\nhsync_bit = 1\nvsync_bit = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::PinConflict(1)));
    }

    #[test]
    fn out_of_range_motion_rejected_at_load() {
        for content in [
            "[game]\nball_dy = 2147483647\n",
            "[game]\npaddle_step = 2147483648\n",
            "[game]\nborder = 2147483648\n",
            "[game]\npaddle_margin = 4294967295\n",
        ] {
            let err = load_config_from_str(content).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)), "{content}: {err}");
        }
    }

    #[test]
    fn missing_file_in_dir_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, DesignConfig::default());
    }

    #[test]
    fn loads_file_from_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "[game]\nball_dx = 3\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.game.ball_dx, 3);
    }

    #[test]
    fn io_error_from_missing_file() {
        let err = load_config_file(Path::new("/nonexistent/dir/pong.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
