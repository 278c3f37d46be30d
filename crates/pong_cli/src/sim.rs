//! `vgapong sim`: run the design from reset with scripted buttons.
//!
//! Resets the design for the standard ten cycles, then runs for the
//! requested number of cycles (or simulated time), holding the up and down
//! buttons during the given cycle ranges. Prints a summary of the final
//! registers and optionally dumps a waveform.

use std::ops::Range;
use std::path::Path;

use pong_config::DesignConfig;
use pong_rtl::pins::{UI_DOWN, UI_UP};
use pong_sim::{Testbench, VcdFile, DEFAULT_RESET_CYCLES};

use crate::pipeline::{parse_cycle_range, parse_duration, resolve_config};
use crate::{GlobalArgs, SimArgs};

/// Button ranges, in cycles counted from reset release.
#[derive(Debug, Default)]
struct ButtonSchedule {
    up: Vec<Range<u64>>,
    down: Vec<Range<u64>>,
}

impl ButtonSchedule {
    fn parse(up: &[String], down: &[String]) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            up: up
                .iter()
                .map(|s| parse_cycle_range(s))
                .collect::<Result<_, _>>()?,
            down: down
                .iter()
                .map(|s| parse_cycle_range(s))
                .collect::<Result<_, _>>()?,
        })
    }

    fn ui_in_at(&self, cycle: u64) -> u8 {
        let mut ui_in = 0;
        if self.up.iter().any(|r| r.contains(&cycle)) {
            ui_in |= UI_UP;
        }
        if self.down.iter().any(|r| r.contains(&cycle)) {
            ui_in |= UI_DOWN;
        }
        ui_in
    }
}

/// Runs the `vgapong sim` command. Returns exit code 0 on success.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = resolve_config(global)?;
    let mut tb = Testbench::new(&config)?;
    let cycles = run_length(args, &config, tb.period_fs())?;
    let schedule = ButtonSchedule::parse(&args.up, &args.down)?;

    if let Some(path) = &args.vcd {
        tb.attach_recorder(Box::new(VcdFile::create(Path::new(path))?))?;
    }

    if !global.quiet {
        eprintln!(
            "   Simulating {cycles} cycles at {}",
            config.clock.frequency
        );
    }

    tb.reset_sequence(DEFAULT_RESET_CYCLES);
    for cycle in 0..cycles {
        tb.set_ui_in(schedule.ui_in_at(cycle));
        tb.clock(1);
    }
    tb.finish_trace()?;

    let s = tb.probe();
    if !global.quiet {
        let frame = config.timing.frame_clocks();
        eprintln!("    Finished at {} ({} cycles)", tb.time(), tb.cycles());
        eprintln!("      frames  {}", cycles / frame);
        eprintln!("      paddles left_y={} right_y={}", s.left_y, s.right_y);
        eprintln!(
            "      ball    ({}, {}) moving ({}, {})",
            s.ball_x, s.ball_y, s.ball_dx, s.ball_dy
        );
        eprintln!("      score   {}:{}", s.score.left, s.score.right);
        if let Some(path) = &args.vcd {
            eprintln!("    Waveform written to {path}");
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&s)?);
    }
    Ok(0)
}

/// Cycles to run after reset: `--cycles`, `--time`, or one frame.
fn run_length(
    args: &SimArgs,
    config: &DesignConfig,
    period_fs: u64,
) -> Result<u64, Box<dyn std::error::Error>> {
    if let Some(n) = args.cycles {
        return Ok(n);
    }
    let Some(time) = &args.time else {
        return Ok(config.timing.frame_clocks());
    };
    let fs = parse_duration(time)?;
    let cycles = fs / period_fs.max(1);
    if cycles == 0 {
        return Err(format!("--time {time} is shorter than one clock period").into());
    }
    Ok(cycles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// The reduced 40x30 design as a config file.
    const SMALL_TOML: &str = r#"
[timing]
h_visible = 40
h_front_porch = 2
h_sync = 4
h_back_porch = 2
v_visible = 30
v_front_porch = 1
v_sync = 2
v_back_porch = 1

[game]
paddle_width = 2
paddle_height = 8
paddle_margin = 2
paddle_tick_lines = 2
ball_size = 2
ball_dx = 1
border = 2
"#;

    fn sim_args() -> SimArgs {
        SimArgs {
            cycles: None,
            time: None,
            up: Vec::new(),
            down: Vec::new(),
            vcd: None,
            json: false,
        }
    }

    fn small_global(tmp: &TempDir) -> GlobalArgs {
        std::fs::write(tmp.path().join("pong.toml"), SMALL_TOML).unwrap();
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(tmp.path().display().to_string()),
        }
    }

    #[test]
    fn small_toml_matches_small_config() {
        let config = pong_config::load_config_from_str(SMALL_TOML).unwrap();
        assert_eq!(config, DesignConfig::small());
    }

    #[test]
    fn schedule_bits() {
        let s = ButtonSchedule::parse(&["0..10".into()], &["5..20".into()]).unwrap();
        assert_eq!(s.ui_in_at(0), UI_UP);
        assert_eq!(s.ui_in_at(7), UI_UP | UI_DOWN);
        assert_eq!(s.ui_in_at(10), UI_DOWN);
        assert_eq!(s.ui_in_at(20), 0);
    }

    #[test]
    fn bad_range_is_error() {
        assert!(ButtonSchedule::parse(&["ten".into()], &[]).is_err());
    }

    #[test]
    fn run_length_sources() {
        let config = DesignConfig::default();
        let period = 40_000_000;
        let mut args = sim_args();
        assert_eq!(run_length(&args, &config, period).unwrap(), 420_000);
        args.time = Some("16800us".into());
        assert_eq!(run_length(&args, &config, period).unwrap(), 420_000);
        args.time = Some("10ns".into());
        assert!(run_length(&args, &config, period).is_err());
        args.time = None;
        args.cycles = Some(7);
        assert_eq!(run_length(&args, &config, period).unwrap(), 7);
    }

    #[test]
    fn sim_writes_gzipped_waveform() {
        let tmp = TempDir::new().unwrap();
        let global = small_global(&tmp);
        let vcd = tmp.path().join("run.vcd.gz");
        let args = SimArgs {
            cycles: Some(500),
            up: vec!["0..200".into()],
            vcd: Some(vcd.display().to_string()),
            ..sim_args()
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        let bytes = std::fs::read(&vcd).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn sim_with_missing_config_fails() {
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some("/nonexistent/pong.toml".into()),
        };
        assert!(run(&sim_args(), &global).is_err());
    }
}
