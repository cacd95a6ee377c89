//! Procedural night-scene backdrops.
//!
//! Show scripts name their backdrop; the same identifier always produces
//! the same scene at a given canvas size, so repaints between frames are
//! stable. Identifiers mentioning a city get a Perlin-ridged skyline
//! silhouette with a few lit windows; everything else is open night sky.

use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::render::Canvas;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0001_0000_01b3;

/// Sky brightness stays below the braille dot threshold so only stars,
/// windows, and fireworks raise dots in that mode.
const SKY_BRIGHT_TOP: f64 = 0.055;
const SKY_BRIGHT_HORIZON: f64 = 0.02;

/// A prerendered background layer matching one canvas size.
pub struct Backdrop {
    width: usize,
    height: usize,
    bright: Vec<f64>,
    tint: Vec<(u8, u8, u8)>,
}

impl Backdrop {
    pub fn generate(name: &str, width: usize, height: usize) -> Self {
        let seed = fnv1a(name);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut bd = Backdrop {
            width,
            height,
            bright: vec![0.0; width * height],
            tint: vec![(0, 0, 0); width * height],
        };

        bd.fill_sky(seed);
        bd.scatter_stars(&mut rng);
        if name.contains("sky") || name.contains("city") {
            bd.raise_skyline(seed, &mut rng);
        }
        bd
    }

    /// Stamp the layer over the whole canvas, erasing prior marks.
    pub fn paint(&self, canvas: &mut Canvas) {
        debug_assert_eq!((canvas.width, canvas.height), (self.width, self.height));
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                canvas.put(x, y, self.bright[idx], self.tint[idx]);
            }
        }
    }

    fn fill_sky(&mut self, seed: u64) {
        // a handful of night palettes, picked by the identifier hash
        let palettes: [((u8, u8, u8), (u8, u8, u8)); 3] = [
            ((10, 12, 40), (24, 18, 52)),
            ((6, 16, 34), (16, 30, 54)),
            ((16, 8, 36), (40, 20, 48)),
        ];
        let (zenith, horizon) = palettes[(seed % palettes.len() as u64) as usize];
        for y in 0..self.height {
            let t = y as f64 / self.height.max(1) as f64;
            let v = SKY_BRIGHT_TOP + (SKY_BRIGHT_HORIZON - SKY_BRIGHT_TOP) * t;
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t) as u8;
            let rgb = (
                mix(zenith.0, horizon.0),
                mix(zenith.1, horizon.1),
                mix(zenith.2, horizon.2),
            );
            for x in 0..self.width {
                let idx = y * self.width + x;
                self.bright[idx] = v;
                self.tint[idx] = rgb;
            }
        }
    }

    fn scatter_stars(&mut self, rng: &mut StdRng) {
        let count = (self.width * self.height / 160).max(8);
        for _ in 0..count {
            let x = rng.random_range(0..self.width);
            let y = rng.random_range(0..(self.height * 4 / 5).max(1));
            let v = rng.random_range(0.12..0.5);
            let warm = rng.random_range(0u8..40);
            let idx = y * self.width + x;
            self.bright[idx] = v;
            self.tint[idx] = (200 + warm / 2, 200 + warm / 4, 235 - warm);
        }
    }

    fn raise_skyline(&mut self, seed: u64, rng: &mut StdRng) {
        let ridge = Perlin::new(seed as u32);
        let block = (self.width / 24).max(3);
        for x in 0..self.width {
            // flat-topped buildings: sample the ridge once per block
            let b = (x / block) as f64;
            let n = ridge.get([b * 0.35, 0.5]);
            let top = self.height as f64 * (0.82 - 0.10 * n);
            for y in top as usize..self.height {
                let idx = y * self.width + x;
                self.bright[idx] = 0.03;
                self.tint[idx] = (12, 12, 18);
                // the odd lit window
                if rng.random_range(0..400) == 0 {
                    self.bright[idx] = 0.3;
                    self.tint[idx] = (230, 190, 110);
                }
            }
        }
    }
}

fn fnv1a(name: &str) -> u64 {
    let mut hash = FNV_OFFSET;
    for b in name.bytes() {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_identifier_means_same_scene() {
        let a = Backdrop::generate("skyline", 64, 32);
        let b = Backdrop::generate("skyline", 64, 32);
        assert_eq!(a.bright, b.bright);
        assert_eq!(a.tint, b.tint);
    }

    #[test]
    fn different_identifiers_differ() {
        let a = Backdrop::generate("skyline", 64, 32);
        let b = Backdrop::generate("midnight", 64, 32);
        assert_ne!(a.tint, b.tint);
    }

    #[test]
    fn city_names_get_a_silhouette() {
        let bd = Backdrop::generate("city", 64, 64);
        // bottom rows should hold silhouette pixels darker than the sky
        let bottom = &bd.bright[63 * 64..];
        assert!(bottom.iter().any(|v| (*v - 0.03).abs() < 1e-9 || *v > 0.2));
    }

    #[test]
    fn paint_covers_the_whole_canvas() {
        use crate::render::{ColorMode, RenderMode};
        let mut canvas = Canvas::new(16, 8, RenderMode::HalfBlock, ColorMode::TrueColor);
        let bd = Backdrop::generate("midnight", canvas.width, canvas.height);
        // dirty the canvas, then repaint
        canvas.blend(3, 3, 1.0, (255, 255, 255));
        bd.paint(&mut canvas);
        let (v, _) = canvas.sample(3, 3);
        assert!(v < 1.0);
    }

    #[test]
    fn hash_separates_names() {
        assert_ne!(fnv1a("skyline"), fnv1a("midnight"));
        assert_ne!(fnv1a(""), fnv1a("a"));
    }
}
