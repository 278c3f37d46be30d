//! Parsing and validation of `pong.toml` design configuration files.
//!
//! Every timing constant and game dimension the design uses lives in a
//! single [`DesignConfig`]. The defaults describe the canonical 640x480@60
//! VGA design on a 25 MHz pixel clock; [`DesignConfig::small`] provides a
//! reduced synthetic configuration for fast tests.

#![warn(missing_docs)]

pub mod error;
pub mod frequency;
pub mod loader;
pub mod types;
pub mod validate;

pub use error::ConfigError;
pub use frequency::{Frequency, ParseFrequencyError};
pub use loader::{
    load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME, DEFAULT_CONFIG_TOML,
};
pub use types::*;
pub use validate::validate;
