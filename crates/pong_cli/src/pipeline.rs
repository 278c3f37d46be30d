//! Shared plumbing for the CLI commands: configuration lookup and argument
//! parsing.

use std::ops::Range;
use std::path::PathBuf;

use pong_config::DesignConfig;
use pong_sim::time::{FS_PER_MS, FS_PER_NS, FS_PER_PS, FS_PER_S, FS_PER_US};
use pong_sim::{Testbench, DEFAULT_RESET_CYCLES};

use crate::GlobalArgs;

/// Loads the design configuration selected by `--config`.
///
/// `--config` may name a file or a directory holding `pong.toml`. Without it
/// the current directory is searched; a directory with no `pong.toml` gives
/// the defaults.
pub fn resolve_config(global: &GlobalArgs) -> Result<DesignConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => {
            let p = PathBuf::from(path);
            if p.is_file() {
                pong_config::load_config_file(&p)?
            } else if p.is_dir() {
                pong_config::load_config(&p)?
            } else {
                return Err(format!("config path '{path}' does not exist").into());
            }
        }
        None => pong_config::load_config(&std::env::current_dir()?)?,
    };
    log::debug!(
        "design {}x{} at {}",
        config.timing.h_total(),
        config.timing.v_total(),
        config.clock.frequency
    );
    Ok(config)
}

/// Builds a testbench and applies the standard reset sequence.
pub fn reset_bench(config: &DesignConfig) -> Result<Testbench, Box<dyn std::error::Error>> {
    let mut tb = Testbench::new(config)?;
    tb.reset_sequence(DEFAULT_RESET_CYCLES);
    Ok(tb)
}

/// Parses a human-readable duration string into femtoseconds.
///
/// Supports suffixes: `fs`, `ps`, `ns`, `us`, `ms`, `s`.
pub fn parse_duration(s: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".into());
    }

    let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digit_end == 0 {
        return Err(format!("invalid duration: no numeric value in '{s}'").into());
    }

    let number: u64 = s[..digit_end]
        .parse()
        .map_err(|_| format!("invalid number in duration '{s}'"))?;

    let unit = s[digit_end..].trim();
    let multiplier = match unit {
        "fs" => 1,
        "ps" => FS_PER_PS,
        "ns" => FS_PER_NS,
        "us" => FS_PER_US,
        "ms" => FS_PER_MS,
        "s" => FS_PER_S,
        "" => {
            return Err(
                format!("missing unit in duration '{s}' (use fs, ps, ns, us, ms, or s)").into(),
            )
        }
        _ => {
            return Err(
                format!("unknown duration unit '{unit}' (use fs, ps, ns, us, ms, or s)").into(),
            )
        }
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("duration '{s}' is too long").into())
}

/// Parses an `A..B` cycle range.
pub fn parse_cycle_range(s: &str) -> Result<Range<u64>, Box<dyn std::error::Error>> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected a range like 0..10000, got '{s}'"))?;
    let start: u64 = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid range start in '{s}'"))?;
    let end: u64 = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid range end in '{s}'"))?;
    if end < start {
        return Err(format!("range '{s}' ends before it starts").into());
    }
    Ok(start..end)
}
