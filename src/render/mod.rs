pub mod canvas;

pub use canvas::Canvas;

/// How canvas pixels map onto terminal characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    /// Unicode braille characters (2x4 dots per cell = highest resolution)
    Braille,
    /// Half-block characters ▀ (1x2 per cell, full brightness range)
    HalfBlock,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// No color — monochrome
    Mono,
    /// 256-color palette
    Ansi256,
    /// 24-bit true color (RGB)
    TrueColor,
}

/// A color with straight alpha, all channels in 0.0..=1.0.
///
/// This is the unit the simulation hands to the rendering sink; the canvas
/// folds alpha into brightness when compositing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    /// Quantize the color channels to bytes, ignoring alpha.
    pub fn to_bytes(self) -> (u8, u8, u8) {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

/// SGR foreground fragment for an RGB triple under the given color mode.
pub(crate) fn fg_code(mode: ColorMode, r: u8, g: u8, b: u8) -> String {
    match mode {
        ColorMode::Mono => "37".into(),
        ColorMode::TrueColor => format!("38;2;{};{};{}", r, g, b),
        ColorMode::Ansi256 => format!("38;5;{}", cube_216(r, g, b)),
    }
}

/// SGR background fragment for an RGB triple under the given color mode.
pub(crate) fn bg_code(mode: ColorMode, r: u8, g: u8, b: u8) -> String {
    match mode {
        ColorMode::Mono => "40".into(),
        ColorMode::TrueColor => format!("48;2;{};{};{}", r, g, b),
        ColorMode::Ansi256 => format!("48;5;{}", cube_216(r, g, b)),
    }
}

/// Nearest entry in the 6x6x6 xterm color cube.
fn cube_216(r: u8, g: u8, b: u8) -> u8 {
    let idx = 16 + 36 * (r as u16 / 51) + 6 * (g as u16 / 51) + (b as u16 / 51);
    idx as u8
}
