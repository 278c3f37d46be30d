//! `vgapong`: command-line driver for the VGA Pong design.
//!
//! Provides `vgapong init` to write a starter `pong.toml`, `vgapong sim` to
//! run the design for a fixed time with scripted button presses,
//! `vgapong test` to run the built-in conformance checks, and
//! `vgapong frame` to capture a rendered frame as PNG or ASCII art.

#![warn(missing_docs)]

mod frame;
mod init;
mod logger;
mod pipeline;
mod sim;

use std::process;

use clap::{Parser, Subcommand};

/// VGA Pong design simulator.
#[derive(Parser, Debug)]
#[command(name = "vgapong", version, about = "VGA Pong design simulator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `pong.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a commented default `pong.toml`.
    Init {
        /// Target directory (created if missing). Defaults to the current
        /// directory.
        dir: Option<String>,
    },
    /// Run the design from reset and print a summary.
    Sim(SimArgs),
    /// Run the built-in conformance checks.
    Test(TestArgs),
    /// Capture one rendered frame.
    Frame(FrameArgs),
}

/// Arguments for the `vgapong sim` subcommand.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Number of clock cycles to run after reset.
    #[arg(long, conflicts_with = "time")]
    pub cycles: Option<u64>,

    /// Simulated time to run after reset (e.g., "16800us", "20ms").
    #[arg(long)]
    pub time: Option<String>,

    /// Cycle range (after reset) during which the up button is held,
    /// e.g. `0..10000`. May be repeated.
    #[arg(long, value_name = "A..B")]
    pub up: Vec<String>,

    /// Cycle range (after reset) during which the down button is held.
    #[arg(long, value_name = "A..B")]
    pub down: Vec<String>,

    /// Write a waveform dump (gzip-compressed if the path ends in `.gz`).
    #[arg(long)]
    pub vcd: Option<String>,

    /// Print the final register snapshot as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `vgapong test` subcommand.
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Substring filter for check names.
    #[arg(long)]
    pub filter: Option<String>,
}

/// Arguments for the `vgapong frame` subcommand.
#[derive(Parser, Debug)]
pub struct FrameArgs {
    /// Frames to run before capturing.
    #[arg(long, default_value_t = 1)]
    pub frames: u64,

    /// PNG output path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print the frame as ASCII art on stdout.
    #[arg(long)]
    pub ascii: bool,

    /// Pixels per ASCII character column.
    #[arg(long, default_value_t = 8)]
    pub scale: u32,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    if let Err(e) = logger::init(logger::level_for(global.quiet, global.verbose)) {
        eprintln!("warning: logger already installed: {e}");
    }

    let result = match cli.command {
        Command::Init { dir } => init::run(dir, &global),
        Command::Sim(ref args) => sim::run(args, &global),
        Command::Test(ref args) => test::run(args, &global),
        Command::Frame(ref args) => frame::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_init_default() {
        let cli = Cli::parse_from(["vgapong", "init"]);
        match cli.command {
            Command::Init { dir } => assert!(dir.is_none()),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_dir() {
        let cli = Cli::parse_from(["vgapong", "init", "board"]);
        match cli.command {
            Command::Init { dir } => assert_eq!(dir.as_deref(), Some("board")),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["vgapong", "--quiet", "--config", "pong.toml", "test"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("pong.toml"));
    }

    #[test]
    fn parse_global_flag_after_subcommand() {
        let cli = Cli::parse_from(["vgapong", "test", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_sim_defaults() {
        let cli = Cli::parse_from(["vgapong", "sim"]);
        match cli.command {
            Command::Sim(ref args) => {
                assert!(args.cycles.is_none());
                assert!(args.time.is_none());
                assert!(args.up.is_empty());
                assert!(args.down.is_empty());
                assert!(args.vcd.is_none());
                assert!(!args.json);
            }
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn parse_sim_scenario() {
        let cli = Cli::parse_from([
            "vgapong",
            "sim",
            "--cycles",
            "421000",
            "--up",
            "0..10000",
            "--down",
            "10000..20000",
            "--up",
            "30000..31000",
            "--vcd",
            "out.vcd.gz",
        ]);
        match cli.command {
            Command::Sim(ref args) => {
                assert_eq!(args.cycles, Some(421_000));
                assert_eq!(args.up, vec!["0..10000", "30000..31000"]);
                assert_eq!(args.down, vec!["10000..20000"]);
                assert_eq!(args.vcd.as_deref(), Some("out.vcd.gz"));
            }
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn cycles_and_time_conflict() {
        let r = Cli::try_parse_from(["vgapong", "sim", "--cycles", "5", "--time", "1ms"]);
        assert!(r.is_err());
    }

    #[test]
    fn parse_test_filter() {
        let cli = Cli::parse_from(["vgapong", "test", "--filter", "paddle"]);
        match cli.command {
            Command::Test(ref args) => assert_eq!(args.filter.as_deref(), Some("paddle")),
            _ => panic!("expected Test command"),
        }
    }

    #[test]
    fn parse_frame_defaults() {
        let cli = Cli::parse_from(["vgapong", "frame"]);
        match cli.command {
            Command::Frame(ref args) => {
                assert_eq!(args.frames, 1);
                assert!(args.output.is_none());
                assert!(!args.ascii);
                assert_eq!(args.scale, 8);
            }
            _ => panic!("expected Frame command"),
        }
    }

    #[test]
    fn parse_frame_png() {
        let cli = Cli::parse_from(["vgapong", "frame", "--frames", "3", "-o", "f.png"]);
        match cli.command {
            Command::Frame(ref args) => {
                assert_eq!(args.frames, 3);
                assert_eq!(args.output.as_deref(), Some("f.png"));
            }
            _ => panic!("expected Frame command"),
        }
    }
}
