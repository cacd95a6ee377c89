//! A single point mass inside a firework burst.

use rand::RngExt;

use super::{FireworkSpec, gaussian};
use crate::error::PyroError;
use crate::render::Rgba;

/// Standard deviation of the per-channel color jitter, both at construction
/// and on every fade step.
const CHANNEL_JITTER: f64 = 0.05;

/// One particle: projectile kinematics plus an RGBA color that decays
/// toward transparency once the owning firework bursts.
#[derive(Debug, Clone)]
pub struct Particle {
    px: f64,
    py: f64,
    vx: f64,
    vy: f64,
    ax: f64,
    ay: f64,
    size: f64,
    r: f64,
    g: f64,
    b: f64,
    alpha: f64,
}

impl Particle {
    /// Build a particle from the shared firework parameters. Each color
    /// channel gets an independent Gaussian nudge; a nudge that would leave
    /// 0..=1 is discarded and the unperturbed base value kept instead.
    pub fn new<R: RngExt>(spec: &FireworkSpec, rng: &mut R) -> Self {
        let mut jittered = |base: f64| {
            let moved = base + gaussian(rng, 0.0, CHANNEL_JITTER);
            if (0.0..=1.0).contains(&moved) { moved } else { base }
        };
        let r = jittered(spec.r);
        let g = jittered(spec.g);
        let b = jittered(spec.b);
        Particle {
            px: spec.px,
            py: spec.py,
            vx: spec.vx,
            vy: spec.vy,
            ax: spec.ax,
            ay: spec.ay,
            size: spec.size,
            r,
            g,
            b,
            alpha: 1.0,
        }
    }

    /// One explicit Euler step. Acceleration folds into velocity before the
    /// velocity folds into position, axis by axis; the exact order is part
    /// of the contract and the numbers downstream depend on it.
    pub fn advance(&mut self) {
        self.vx += self.ax;
        self.px += self.vx;
        self.vy += self.ay;
        self.py += self.vy;
    }

    /// Scale alpha by `decrement` and let each color channel wander by a
    /// fresh Gaussian sample. A sample that would push a channel outside
    /// 0..=1 is dropped and that channel left untouched.
    ///
    /// The decrement must lie strictly between 0 and 1; anything else is
    /// rejected rather than clamped.
    pub fn fade<R: RngExt>(&mut self, decrement: f64, rng: &mut R) -> Result<(), PyroError> {
        if decrement <= 0.0 || decrement >= 1.0 {
            return Err(PyroError::FadeDecrement(decrement));
        }
        self.alpha *= decrement;
        for ch in [&mut self.r, &mut self.g, &mut self.b] {
            let moved = *ch + gaussian(rng, 0.0, CHANNEL_JITTER);
            if (0.0..=1.0).contains(&moved) {
                *ch = moved;
            }
        }
        Ok(())
    }

    /// Replace the velocity outright. Only the burst geometry does this.
    pub fn set_velocity(&mut self, vx: f64, vy: f64) {
        self.vx = vx;
        self.vy = vy;
    }

    pub fn x(&self) -> f64 {
        self.px
    }

    pub fn y(&self) -> f64 {
        self.py
    }

    pub fn vx(&self) -> f64 {
        self.vx
    }

    pub fn vy(&self) -> f64 {
        self.vy
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn color(&self) -> Rgba {
        Rgba::new(self.r, self.g, self.b, self.alpha)
    }
}
