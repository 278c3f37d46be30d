//! Testbench error types.
//!
//! All errors that can occur while building, driving or observing the
//! design are represented as variants of [`SimError`].

use std::io;

use pong_config::ConfigError;

/// Errors that can occur during simulation setup, execution or capture.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The design configuration was rejected.
    #[error("invalid design configuration: {0}")]
    Config(#[from] ConfigError),

    /// An observed pin or register violated an expected property.
    #[error("assertion failed at {time_fs} fs: {message}")]
    AssertionFailed {
        /// Time in femtoseconds when the violation was observed.
        time_fs: u64,
        /// What was expected and what was seen.
        message: String,
    },

    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),

    /// PNG encoding failed.
    #[error("PNG error: {0}")]
    Png(String),
}

impl From<png::EncodingError> for SimError {
    fn from(e: png::EncodingError) -> Self {
        SimError::Png(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_failed_display() {
        let e = SimError::AssertionFailed {
            time_fs: 500,
            message: "hsync stuck high".into(),
        };
        assert_eq!(e.to_string(), "assertion failed at 500 fs: hsync stuck high");
    }

    #[test]
    fn waveform_io_display() {
        let e = SimError::WaveformIo(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(e.to_string().contains("waveform I/O error"));
    }

    #[test]
    fn png_display() {
        let e = SimError::Png("bad header".into());
        assert_eq!(e.to_string(), "PNG error: bad header");
    }

    #[test]
    fn config_wraps_validation() {
        let e: SimError = ConfigError::PinConflict(0).into();
        assert_eq!(
            e.to_string(),
            "invalid design configuration: hsync and vsync share bit 0"
        );
    }
}
