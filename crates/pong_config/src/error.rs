//! Errors reported while reading and checking `pong.toml`.

/// Why a design configuration could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A size, width or rate that the design divides or counts by is zero.
    #[error("{0} must be non-zero")]
    ZeroField(String),

    /// HSYNC and VSYNC were assigned the same `uo_out` bit.
    #[error("hsync and vsync share bit {0}")]
    PinConflict(u8),

    /// The values parse but do not describe a buildable design.
    #[error("invalid design: {0}")]
    ValidationError(String),
}
