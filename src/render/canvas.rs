//! Pixel canvas and its character renderers.
//!
//! The canvas lives in sub-cell pixel space (2x4 per terminal cell for
//! braille, 1x2 for half-blocks). Drawing composites by brightness: a new
//! mark only lands where it is at least as bright as what is already there,
//! so frames that skip the backdrop repaint keep after-images of earlier
//! particle positions.

use super::{ColorMode, RenderMode, Rgba, bg_code, fg_code};

/// Minimum brightness a braille dot needs to be raised.
const DOT_THRESHOLD: f64 = 0.08;

/// Minimum brightness for a half-block half to count as lit at all.
const LIT_THRESHOLD: f64 = 0.02;

pub struct Canvas {
    /// Width in sub-cell pixels
    pub width: usize,
    /// Height in sub-cell pixels
    pub height: usize,
    bright: Vec<f64>,
    tint: Vec<(u8, u8, u8)>,
    render_mode: RenderMode,
    color_mode: ColorMode,
}

impl Canvas {
    pub fn new(
        term_cols: usize,
        term_rows: usize,
        render_mode: RenderMode,
        color_mode: ColorMode,
    ) -> Self {
        let (w, h) = match render_mode {
            RenderMode::Braille => (term_cols * 2, term_rows * 4),
            RenderMode::HalfBlock => (term_cols, term_rows * 2),
        };
        Canvas {
            width: w,
            height: h,
            bright: vec![0.0; w * h],
            tint: vec![(0, 0, 0); w * h],
            render_mode,
            color_mode,
        }
    }

    /// Overwrite a pixel unconditionally. Used by the backdrop painter.
    #[inline]
    pub fn put(&mut self, x: usize, y: usize, brightness: f64, rgb: (u8, u8, u8)) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.bright[idx] = brightness;
            self.tint[idx] = rgb;
        }
    }

    /// Composite a pixel: keeps whichever of old and new is brighter.
    #[inline]
    pub fn blend(&mut self, x: usize, y: usize, brightness: f64, rgb: (u8, u8, u8)) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if brightness >= self.bright[idx] {
                self.bright[idx] = brightness;
                self.tint[idx] = rgb;
            }
        }
    }

    /// Brightness and tint at a pixel. Out-of-range reads come back dark.
    #[allow(dead_code)]
    pub fn sample(&self, x: usize, y: usize) -> (f64, (u8, u8, u8)) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            (self.bright[idx], self.tint[idx])
        } else {
            (0.0, (0, 0, 0))
        }
    }

    /// Filled circle in pixel coordinates. Alpha becomes brightness, so a
    /// nearly transparent particle composites behind brighter marks.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        let rgb = color.to_bytes();
        let brightness = color.a.clamp(0.0, 1.0);
        let r = radius.max(0.5);
        let x0 = (cx - r).floor().max(0.0) as usize;
        let x1 = (cx + r).ceil().min(self.width as f64) as usize;
        let y0 = (cy - r).floor().max(0.0) as usize;
        let y1 = (cy + r).ceil().min(self.height as f64) as usize;
        let r2 = r * r;
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, brightness, rgb);
                }
            }
        }
    }

    /// Terminal cell dimensions backing this canvas.
    pub fn term_size(&self) -> (usize, usize) {
        match self.render_mode {
            RenderMode::Braille => (self.width / 2, self.height / 4),
            RenderMode::HalfBlock => (self.width, self.height / 2),
        }
    }

    /// Render to an ANSI string. The caller homes the cursor first; rows end
    /// with explicit cursor moves rather than newlines.
    pub fn render(&self) -> String {
        match self.render_mode {
            RenderMode::Braille => self.render_braille(),
            RenderMode::HalfBlock => self.render_half_blocks(),
        }
    }

    fn render_half_blocks(&self) -> String {
        let (cols, rows) = self.term_size();
        let mut out = String::with_capacity(cols * rows * 12);
        let mut pen = Pen::new();

        for row in 0..rows {
            for col in 0..cols {
                let top = row * 2 * self.width + col;
                let bot = (row * 2 + 1) * self.width + col;
                let tv = self.bright[top];
                let bv = self.bright[bot];

                if self.color_mode == ColorMode::Mono {
                    out.push(match (tv >= LIT_THRESHOLD, bv >= LIT_THRESHOLD) {
                        (true, true) => '█',
                        (true, false) => '▀',
                        (false, true) => '▄',
                        (false, false) => ' ',
                    });
                    continue;
                }

                if tv < LIT_THRESHOLD && bv < LIT_THRESHOLD {
                    pen.reset(&mut out);
                    out.push(' ');
                } else {
                    let fg = scale(self.tint[top], tv);
                    let bg = scale(self.tint[bot], bv);
                    pen.set(&mut out, self.color_mode, Some(fg), Some(bg));
                    out.push('▀');
                }
            }
            pen.reset(&mut out);
            out.push_str(&format!("\x1b[{};1H", row + 2));
        }
        out
    }

    fn render_braille(&self) -> String {
        // Dot bit layout of U+2800..: columns (0,1), rows 0..3, plus the
        // 7/8 dots on the bottom row.
        const DOTS: [(usize, usize, u32); 8] = [
            (0, 0, 0x01),
            (0, 1, 0x02),
            (0, 2, 0x04),
            (1, 0, 0x08),
            (1, 1, 0x10),
            (1, 2, 0x20),
            (0, 3, 0x40),
            (1, 3, 0x80),
        ];

        let (cols, rows) = self.term_size();
        let mut out = String::with_capacity(cols * rows * 16);
        let mut pen = Pen::new();

        for row in 0..rows {
            for col in 0..cols {
                let mut bits = 0u32;
                let mut acc = (0u32, 0u32, 0u32);
                let mut lit = 0u32;
                for &(dx, dy, bit) in &DOTS {
                    let x = col * 2 + dx;
                    let y = row * 4 + dy;
                    let idx = y * self.width + x;
                    if self.bright[idx] >= DOT_THRESHOLD {
                        bits |= bit;
                        let (r, g, b) = scale(self.tint[idx], self.bright[idx]);
                        acc = (acc.0 + r as u32, acc.1 + g as u32, acc.2 + b as u32);
                        lit += 1;
                    }
                }
                let ch = char::from_u32(0x2800 + bits).unwrap_or(' ');
                if self.color_mode != ColorMode::Mono && lit > 0 {
                    let avg = (
                        (acc.0 / lit) as u8,
                        (acc.1 / lit) as u8,
                        (acc.2 / lit) as u8,
                    );
                    pen.set(&mut out, self.color_mode, Some(avg), None);
                } else {
                    pen.reset(&mut out);
                }
                out.push(ch);
            }
            pen.reset(&mut out);
            out.push_str(&format!("\x1b[{};1H", row + 2));
        }
        out
    }
}

#[inline]
fn scale(rgb: (u8, u8, u8), v: f64) -> (u8, u8, u8) {
    let v = v.clamp(0.0, 1.0);
    (
        (rgb.0 as f64 * v) as u8,
        (rgb.1 as f64 * v) as u8,
        (rgb.2 as f64 * v) as u8,
    )
}

/// Tracks the last emitted SGR state so runs of same-colored cells share one
/// escape sequence.
struct Pen {
    fg: Option<(u8, u8, u8)>,
    bg: Option<(u8, u8, u8)>,
}

impl Pen {
    fn new() -> Self {
        Pen { fg: None, bg: None }
    }

    fn set(
        &mut self,
        out: &mut String,
        mode: ColorMode,
        fg: Option<(u8, u8, u8)>,
        bg: Option<(u8, u8, u8)>,
    ) {
        let mut parts: Vec<String> = Vec::new();
        if let Some((r, g, b)) = fg
            && self.fg != fg
        {
            parts.push(fg_code(mode, r, g, b));
            self.fg = fg;
        }
        if let Some((r, g, b)) = bg
            && self.bg != bg
        {
            parts.push(bg_code(mode, r, g, b));
            self.bg = bg;
        }
        if !parts.is_empty() {
            out.push_str("\x1b[");
            out.push_str(&parts.join(";"));
            out.push('m');
        }
    }

    fn reset(&mut self, out: &mut String) {
        if self.fg.is_some() || self.bg.is_some() {
            out.push_str("\x1b[0m");
            self.fg = None;
            self.bg = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braille_canvas_has_subcell_resolution() {
        let c = Canvas::new(10, 5, RenderMode::Braille, ColorMode::Mono);
        assert_eq!((c.width, c.height), (20, 20));
        assert_eq!(c.term_size(), (10, 5));
    }

    #[test]
    fn half_block_canvas_doubles_rows() {
        let c = Canvas::new(10, 5, RenderMode::HalfBlock, ColorMode::TrueColor);
        assert_eq!((c.width, c.height), (10, 10));
        assert_eq!(c.term_size(), (10, 5));
    }

    #[test]
    fn blend_keeps_brighter_pixel() {
        let mut c = Canvas::new(4, 4, RenderMode::HalfBlock, ColorMode::TrueColor);
        c.blend(1, 1, 0.9, (255, 0, 0));
        c.blend(1, 1, 0.2, (0, 255, 0));
        assert_eq!(c.sample(1, 1), (0.9, (255, 0, 0)));
        c.blend(1, 1, 0.95, (0, 0, 255));
        assert_eq!(c.sample(1, 1), (0.95, (0, 0, 255)));
    }

    #[test]
    fn put_overwrites_even_when_darker() {
        let mut c = Canvas::new(4, 4, RenderMode::HalfBlock, ColorMode::TrueColor);
        c.blend(0, 0, 1.0, (255, 255, 255));
        c.put(0, 0, 0.1, (10, 10, 10));
        assert_eq!(c.sample(0, 0), (0.1, (10, 10, 10)));
    }

    #[test]
    fn fill_circle_clips_at_edges() {
        let mut c = Canvas::new(8, 4, RenderMode::HalfBlock, ColorMode::TrueColor);
        // Center beyond the left edge: only the overlapping part lands.
        c.fill_circle(-1.0, 4.0, 3.0, Rgba::new(1.0, 1.0, 1.0, 1.0));
        let (lit, _) = c.sample(0, 4);
        assert!(lit > 0.0);
    }

    #[test]
    fn fill_circle_marks_center() {
        let mut c = Canvas::new(8, 8, RenderMode::HalfBlock, ColorMode::TrueColor);
        c.fill_circle(4.0, 8.0, 1.5, Rgba::new(1.0, 0.5, 0.0, 0.8));
        let (v, rgb) = c.sample(4, 8);
        assert!((v - 0.8).abs() < 1e-12);
        assert_eq!(rgb, (255, 127, 0));
    }

    #[test]
    fn half_block_render_emits_block_for_lit_pixel() {
        let mut c = Canvas::new(4, 2, RenderMode::HalfBlock, ColorMode::Mono);
        c.put(0, 0, 1.0, (255, 255, 255));
        let s = c.render();
        assert!(s.contains('▀'));
    }

    #[test]
    fn braille_render_raises_dots() {
        let mut c = Canvas::new(2, 1, RenderMode::Braille, ColorMode::Mono);
        c.put(0, 0, 1.0, (255, 255, 255));
        let s = c.render();
        // dot 1 alone is U+2801
        assert!(s.contains('\u{2801}'));
    }

    #[test]
    fn dim_pixels_render_as_space_in_half_block() {
        let mut c = Canvas::new(1, 1, RenderMode::HalfBlock, ColorMode::TrueColor);
        c.put(0, 0, 0.001, (255, 255, 255));
        c.put(0, 1, 0.001, (255, 255, 255));
        let s = c.render();
        assert!(s.contains(' '));
        assert!(!s.contains('▀'));
    }
}
