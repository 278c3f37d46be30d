//! `vgapong init`: write a starter configuration.
//!
//! Creates the target directory if needed and writes a commented
//! `pong.toml` holding every default, so the file documents itself.

use std::fs;
use std::path::PathBuf;

use pong_config::{CONFIG_FILE_NAME, DEFAULT_CONFIG_TOML};

use crate::GlobalArgs;

/// Runs the `vgapong init` command.
///
/// Refuses to overwrite an existing `pong.toml`. Returns exit code 0 on
/// success.
pub fn run(dir: Option<String>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match dir {
        Some(d) => {
            let dir = PathBuf::from(d);
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    let path = project_dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(format!("'{}' already exists", path.display()).into());
    }
    fs::write(&path, DEFAULT_CONFIG_TOML)?;

    if !global.quiet {
        eprintln!("     Created {}", path.display());
    }
    Ok(0)
}
