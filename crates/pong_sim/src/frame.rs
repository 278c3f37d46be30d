//! Frame capture from the output pins.
//!
//! [`capture_frame`] samples one full frame of `uo_out` words, decodes the
//! color bits through the design's output mux and keeps the visible area.
//! Everything a [`Frame`] knows comes from the pins, so it doubles as an
//! independent check that the renderer draws what the registers say.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use pong_rtl::{Object, Phase, Rgb222};

use crate::error::SimError;
use crate::testbench::Testbench;

/// ASCII glyphs in the order they win when several objects share a cell.
const GLYPHS: [(Object, char); 5] = [
    (Object::Ball, 'O'),
    (Object::LeftPaddle, 'L'),
    (Object::RightPaddle, 'R'),
    (Object::Border, '#'),
    (Object::Net, ':'),
];

/// An axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The visible area of one frame in RGB222.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Rgb222>,
}

impl Frame {
    /// A black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb222::BLACK; (width * height) as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at `(x, y)`; black outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb222 {
        if x >= self.width || y >= self.height {
            return Rgb222::BLACK;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Sets the color at `(x, y)`; ignored outside the frame.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb222) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Number of pixels with exactly this color.
    pub fn count_color(&self, color: Rgb222) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Bounding box of every pixel with this color.
    pub fn find_color(&self, color: Rgb222) -> Option<Rect> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixel(x, y) != color {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds.map(|(x0, y0, x1, y1)| Rect {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        })
    }

    /// Bounding box of an object, located by its palette color.
    pub fn find_object(&self, object: Object) -> Option<Rect> {
        self.find_color(object.color())
    }

    /// Expands to 8-bit RGBA, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            let [r, g, b] = p.to_rgb8();
            rgba.extend_from_slice(&[r, g, b, 0xFF]);
        }
        rgba
    }

    /// Encodes the frame as PNG into `w`.
    pub fn write_png<W: Write>(&self, w: W) -> Result<(), SimError> {
        let mut encoder = png::Encoder::new(w, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.to_rgba8())?;
        Ok(())
    }

    /// Saves the frame as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), SimError> {
        let file = File::create(path)?;
        self.write_png(BufWriter::new(file))
    }

    /// Renders a coarse text picture, one character per `scale` x
    /// `2 * scale` pixel cell.
    pub fn to_ascii(&self, scale: u32) -> String {
        let cw = scale.max(1);
        let ch = cw * 2;
        let mut out = String::new();
        for cy in (0..self.height).step_by(ch as usize) {
            for cx in (0..self.width).step_by(cw as usize) {
                out.push(self.cell_glyph(cx, cy, cw, ch));
            }
            out.push('\n');
        }
        out
    }

    fn cell_glyph(&self, x0: u32, y0: u32, w: u32, h: u32) -> char {
        let mut lit = false;
        let mut best: Option<usize> = None;
        for y in y0..(y0 + h).min(self.height) {
            for x in x0..(x0 + w).min(self.width) {
                let p = self.pixel(x, y);
                if p == Rgb222::BLACK {
                    continue;
                }
                lit = true;
                if let Some(i) = GLYPHS.iter().position(|(o, _)| o.color() == p) {
                    best = Some(best.map_or(i, |b| b.min(i)));
                }
            }
        }
        match best {
            Some(i) => GLYPHS[i].1,
            None if lit => '?',
            None => ' ',
        }
    }
}

/// Clocks until the counters sit at the first pixel of a frame.
pub fn run_to_frame_start(tb: &mut Testbench) -> Result<(), SimError> {
    let limit = tb.top().geometry().timing.frame_clocks() + 2;
    for _ in 0..limit {
        let s = tb.probe();
        if s.phase == Phase::Run && s.h_count == 0 && s.v_count == 0 {
            return Ok(());
        }
        tb.clock(1);
    }
    Err(tb.fail("no frame start within one frame period (held in reset or disabled?)"))
}

/// Runs to the start of the next frame and samples one full frame.
pub fn capture_frame(tb: &mut Testbench) -> Result<Frame, SimError> {
    run_to_frame_start(tb)?;
    let timing = tb.top().geometry().timing.clone();
    let mux = *tb.top().mux();
    let mut frame = Frame::new(timing.h_visible, timing.v_visible);
    for _ in 0..timing.frame_clocks() {
        let s = tb.probe();
        if s.h_count < timing.h_visible && s.v_count < timing.v_visible {
            let color = mux.decode(tb.outputs().uo_out).color;
            frame.set_pixel(s.h_count, s.v_count, color);
        }
        tb.clock(1);
    }
    log::debug!("captured {}x{} frame at {}", frame.width, frame.height, tb.time());
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testbench::DEFAULT_RESET_CYCLES;
    use pong_config::DesignConfig;

    fn small_bench() -> Testbench {
        let mut tb = Testbench::new(&DesignConfig::small()).unwrap();
        tb.reset_sequence(DEFAULT_RESET_CYCLES);
        tb
    }

    #[test]
    fn find_color_bounds() {
        let mut f = Frame::new(10, 10);
        f.set_pixel(2, 3, Rgb222::WHITE);
        f.set_pixel(4, 6, Rgb222::WHITE);
        assert_eq!(
            f.find_color(Rgb222::WHITE),
            Some(Rect {
                x: 2,
                y: 3,
                width: 3,
                height: 4
            })
        );
        assert_eq!(f.count_color(Rgb222::WHITE), 2);
        assert_eq!(f.find_color(Rgb222::new(1, 0, 0)), None);
    }

    #[test]
    fn out_of_range_pixels_are_black() {
        let mut f = Frame::new(2, 2);
        f.set_pixel(5, 5, Rgb222::WHITE);
        assert_eq!(f.pixel(5, 5), Rgb222::BLACK);
        assert_eq!(f.count_color(Rgb222::WHITE), 0);
    }

    #[test]
    fn rgba_expansion() {
        let mut f = Frame::new(2, 1);
        f.set_pixel(1, 0, Rgb222::new(3, 1, 0));
        assert_eq!(f.to_rgba8(), vec![0, 0, 0, 255, 255, 85, 0, 255]);
    }

    #[test]
    fn ascii_priority() {
        let mut f = Frame::new(4, 2);
        f.set_pixel(0, 0, Object::Net.color());
        f.set_pixel(1, 1, Object::Ball.color());
        f.set_pixel(2, 0, Rgb222::new(1, 0, 0));
        assert_eq!(f.to_ascii(2), "O?\n");
        assert_eq!(f.to_ascii(1).lines().count(), 1);
    }

    #[test]
    fn png_header() {
        let f = Frame::new(4, 3);
        let mut bytes = Vec::new();
        f.write_png(&mut bytes).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let reader = png::Decoder::new(&bytes[..]).read_info().unwrap();
        assert_eq!(reader.info().width, 4);
        assert_eq!(reader.info().height, 3);
    }

    #[test]
    fn save_png_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        Frame::new(8, 8).save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 8);
    }

    #[test]
    fn capture_matches_registers() {
        let mut tb = small_bench();
        run_to_frame_start(&mut tb).unwrap();
        let s = tb.probe();
        let frame = capture_frame(&mut tb).unwrap();
        let geo = tb.top().geometry().clone();

        assert_eq!((frame.width(), frame.height()), (40, 30));
        assert_eq!(
            frame.find_object(Object::Ball),
            Some(Rect {
                x: s.ball_x as u32,
                y: s.ball_y as u32,
                width: 2,
                height: 2
            })
        );
        assert_eq!(
            frame.find_object(Object::LeftPaddle),
            Some(Rect {
                x: geo.left_paddle_x() as u32,
                y: s.left_y as u32,
                width: 2,
                height: 8
            })
        );
        let border = frame.find_object(Object::Border).unwrap();
        assert_eq!((border.y, border.height), (0, 30));
    }

    #[test]
    fn capture_takes_one_frame() {
        let mut tb = small_bench();
        run_to_frame_start(&mut tb).unwrap();
        let before = tb.cycles();
        capture_frame(&mut tb).unwrap();
        assert_eq!(tb.cycles() - before, 1632);
    }

    #[test]
    fn capture_in_reset_fails() {
        let mut tb = Testbench::new(&DesignConfig::small()).unwrap();
        tb.set_reset(true);
        assert!(matches!(
            capture_frame(&mut tb),
            Err(SimError::AssertionFailed { .. })
        ));
    }
}
