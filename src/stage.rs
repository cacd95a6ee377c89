//! The rendering sink the simulation draws into.
//!
//! The simulation works in a fixed [-10, 10] square with y pointing up (the
//! scale show scripts are written in). A `Stage` turns draw-circle calls in
//! that space into something visible; the terminal implementation rasterizes
//! onto a `Canvas` and writes ANSI frames to stdout.

use std::io::{self, BufWriter, Stdout, Write};
use std::thread;
use std::time::Duration;

use crate::backdrop::Backdrop;
use crate::render::{Canvas, ColorMode, RenderMode, Rgba};

/// Half-width of the scene square in world units.
const SCENE_HALF: f64 = 10.0;

/// Full scene span in world units.
const SCENE_SPAN: f64 = 2.0 * SCENE_HALF;

/// Where the simulation's draw/present/pause/repaint calls land.
pub trait Stage {
    /// Draw a filled circle at world coordinates.
    fn draw_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba);

    /// Push the composed frame to the viewer.
    fn present(&mut self) -> io::Result<()>;

    /// Fixed-duration inter-frame yield.
    fn pause(&mut self);

    /// Repaint the whole scene with the backdrop, erasing prior marks.
    fn clear_to_backdrop(&mut self);
}

/// Terminal stage: a pixel canvas plus buffered stdout.
pub struct TermStage {
    canvas: Canvas,
    backdrop: Backdrop,
    out: BufWriter<Stdout>,
    frame_pause: Duration,
}

impl TermStage {
    pub fn new(
        term_cols: usize,
        term_rows: usize,
        render_mode: RenderMode,
        color_mode: ColorMode,
        fps: u32,
        backdrop_name: &str,
    ) -> Self {
        let mut canvas = Canvas::new(term_cols, term_rows, render_mode, color_mode);
        let backdrop = Backdrop::generate(backdrop_name, canvas.width, canvas.height);
        backdrop.paint(&mut canvas);
        TermStage {
            canvas,
            backdrop,
            out: BufWriter::with_capacity(256 * 1024, io::stdout()),
            frame_pause: Duration::from_secs_f64(1.0 / fps.clamp(1, 120) as f64),
        }
    }

    fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let px = (x + SCENE_HALF) / SCENE_SPAN * self.canvas.width as f64;
        let py = (SCENE_HALF - y) / SCENE_SPAN * self.canvas.height as f64;
        (px, py)
    }
}

impl Stage for TermStage {
    fn draw_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        let (px, py) = self.to_pixel(x, y);
        let pr = radius / SCENE_SPAN * self.canvas.width as f64;
        self.canvas.fill_circle(px, py, pr, color);
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x1b[H")?;
        self.out.write_all(self.canvas.render().as_bytes())?;
        self.out.flush()
    }

    fn pause(&mut self) {
        thread::sleep(self.frame_pause);
    }

    fn clear_to_backdrop(&mut self) {
        self.backdrop.paint(&mut self.canvas);
    }
}
