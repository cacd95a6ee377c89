//! One firework: a fixed batch of particles launched together, burst into a
//! radial bloom, and faded out.

use std::f64::consts::TAU;

use rand::RngExt;

use super::{FireworkSpec, Particle, gaussian};
use crate::audio::{AudioSink, Cue};
use crate::error::PyroError;
use crate::stage::Stage;

/// Radial speed every burst particle gets before its per-particle spread.
pub(crate) const RADIAL_SPEED: f64 = 0.3;

/// Half-width of the uniform spread added to both velocity components at
/// burst time.
const RADIAL_SPREAD: f64 = 0.02;

/// Standard deviation of the burst-point threshold sampled per check.
pub(crate) const BURST_SIGMA: f64 = 0.15;

/// Per-step alpha decrement once a firework is fading.
pub(crate) const FADE_STEP: f64 = 0.9;

/// A firework below this alpha is done.
pub(crate) const ALPHA_FLOOR: f64 = 0.01;

/// Backdrop repaint interval while a burst is spreading; skipped repaints
/// leave the particle tails.
pub(crate) const TRAIL_INTERVAL: u32 = 5;

/// A fixed-length batch of particles sharing launch parameters.
///
/// All particles carry the same acceleration and size; color jitter at
/// construction and the burst spread make them diverge. The first particle
/// stands proxy for the whole firework in every phase check, which is sound
/// because `prepare_burst`, `advance_all`, and `fade_all` drive all
/// particles in lockstep.
pub struct Firework {
    particles: Vec<Particle>,
}

impl Firework {
    /// Build `spec.count` identically-seeded particles. Zero particles is
    /// out of contract.
    pub fn new<R: RngExt>(spec: &FireworkSpec, rng: &mut R) -> Self {
        assert!(spec.count > 0, "a firework needs at least one particle");
        let particles = (0..spec.count).map(|_| Particle::new(spec, rng)).collect();
        Firework { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particle(&self, index: usize) -> &Particle {
        &self.particles[index]
    }

    /// Assign the bloom velocities: the circle is split into `len()` equal
    /// slices starting at angle 0, and each particle flies outward along its
    /// slice at `RADIAL_SPEED`. One uniform sample per particle lands on
    /// both components, so the spread shifts the whole velocity diagonally
    /// instead of re-aiming it.
    pub fn prepare_burst<R: RngExt>(&mut self, rng: &mut R) {
        let slice = TAU / self.particles.len() as f64;
        for (i, p) in self.particles.iter_mut().enumerate() {
            let angle = i as f64 * slice;
            let spread = rng.random_range(-RADIAL_SPREAD..RADIAL_SPREAD);
            p.set_velocity(
                angle.cos() * RADIAL_SPEED + spread,
                angle.sin() * RADIAL_SPEED + spread,
            );
        }
    }

    /// Step every particle once.
    pub fn advance_all(&mut self) {
        for p in &mut self.particles {
            p.advance();
        }
    }

    /// Fade every particle by the same decrement.
    pub fn fade_all<R: RngExt>(&mut self, decrement: f64, rng: &mut R) -> Result<(), PyroError> {
        for p in &mut self.particles {
            p.fade(decrement, rng)?;
        }
        Ok(())
    }

    /// Whether the lead particle's vertical velocity has dropped to the
    /// given threshold. Callers sample a fresh `gaussian(0, BURST_SIGMA)`
    /// threshold per check, which is what makes burst timing stochastic.
    pub fn reached_burst_point(&self, threshold: f64) -> bool {
        self.particles[0].vy() <= threshold
    }

    /// Terminal condition for the fade phase.
    pub fn nearly_invisible(&self) -> bool {
        self.particles[0].alpha() <= ALPHA_FLOOR
    }

    /// Draw every particle into the stage.
    pub fn draw<S: Stage>(&self, stage: &mut S) {
        for p in &self.particles {
            stage.draw_circle(p.x(), p.y(), p.size(), p.color());
        }
    }

    /// Ascent phase: draw, present, step, and repaint the backdrop every
    /// frame until the randomized burst point is crossed.
    ///
    /// The loop has no step bound; it terminates because a constant negative
    /// vertical acceleration pulls the lead particle's velocity below any
    /// threshold the sampler produces. A spec with `ay >= 0` and a positive
    /// launch velocity can ascend forever; that contract is on the caller.
    pub fn launch<S: Stage, R: RngExt>(
        &mut self,
        stage: &mut S,
        rng: &mut R,
    ) -> Result<(), PyroError> {
        loop {
            let threshold = gaussian(rng, 0.0, BURST_SIGMA);
            if self.reached_burst_point(threshold) {
                return Ok(());
            }
            self.draw(stage);
            stage.present()?;
            self.advance_all();
            stage.pause();
            stage.clear_to_backdrop();
        }
    }

    /// Burst phase: re-aim the particles radially, play the explosion cue,
    /// then spread-and-fade until nearly invisible. The backdrop is only
    /// repainted every `TRAIL_INTERVAL` steps so earlier positions linger as
    /// tails; one last repaint wipes the remains.
    pub fn burst<S: Stage, A: AudioSink, R: RngExt>(
        &mut self,
        stage: &mut S,
        audio: &mut A,
        rng: &mut R,
    ) -> Result<(), PyroError> {
        self.prepare_burst(rng);
        audio.play(Cue::Burst);
        let mut step: u32 = 0;
        while !self.nearly_invisible() {
            self.draw(stage);
            stage.present()?;
            self.advance_all();
            stage.pause();
            if step % TRAIL_INTERVAL == 0 {
                stage.clear_to_backdrop();
            }
            self.fade_all(FADE_STEP, rng)?;
            step += 1;
        }
        stage.clear_to_backdrop();
        Ok(())
    }
}
