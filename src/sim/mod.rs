//! The firework simulation: particles, single fireworks, and the
//! multi-firework choreography loop.
//!
//! Everything that consumes randomness takes an explicit `&mut R` so the
//! whole simulation can be driven by a seeded generator.

pub mod choreography;
pub mod firework;
pub mod particle;

pub use choreography::FireworkGroup;
pub use firework::Firework;
pub use particle::Particle;

use rand::RngExt;
use rand_distr::{Distribution, Normal};

/// Constructor-parameter bundle for one firework: the shape of a show
/// script record, also used directly by the learn and quiz flows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireworkSpec {
    pub count: usize,
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
    pub ax: f64,
    pub ay: f64,
    pub size: f64,
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// One draw from a normal distribution.
pub(crate) fn gaussian<R: RngExt>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev).unwrap().sample(rng)
}
