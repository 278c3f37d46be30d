//! `vgapong frame`: capture one rendered frame.

use std::path::Path;

use pong_sim::capture_frame;

use crate::pipeline::{reset_bench, resolve_config};
use crate::{FrameArgs, GlobalArgs};

/// Runs the `vgapong frame` command.
///
/// Runs `--frames` frames after reset, captures the next one from the pins
/// and writes it as PNG (`-o`) and/or ASCII art (`--ascii`). With neither
/// option the frame is written to `frame.png`.
pub fn run(args: &FrameArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = resolve_config(global)?;
    let mut tb = reset_bench(&config)?;
    tb.clock(args.frames * config.timing.frame_clocks());

    let frame = capture_frame(&mut tb)?;
    let snap = tb.probe();
    log::info!(
        "captured frame ending at {}: ball ({}, {}), score {}:{}",
        tb.time(),
        snap.ball_x,
        snap.ball_y,
        snap.score.left,
        snap.score.right
    );

    if args.ascii {
        print!("{}", frame.to_ascii(args.scale));
    }

    let output = match (&args.output, args.ascii) {
        (Some(p), _) => Some(p.as_str()),
        (None, false) => Some("frame.png"),
        (None, true) => None,
    };
    if let Some(path) = output {
        frame.save_png(Path::new(path))?;
        if !global.quiet {
            eprintln!(
                "     Created {path} ({}x{})",
                frame.width(),
                frame.height()
            );
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_png() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("pong.toml"),
            "[timing]\nh_visible = 40\nh_front_porch = 2\nh_sync = 4\nh_back_porch = 2\n\
             v_visible = 30\nv_front_porch = 1\nv_sync = 2\nv_back_porch = 1\n\
             [game]\npaddle_width = 2\npaddle_height = 8\npaddle_margin = 2\n\
             paddle_tick_lines = 2\nball_size = 2\nball_dx = 1\nborder = 2\n",
        )
        .unwrap();
        let out = tmp.path().join("shot.png");
        let args = FrameArgs {
            frames: 2,
            output: Some(out.display().to_string()),
            ascii: false,
            scale: 4,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(tmp.path().display().to_string()),
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
