//! Multi-firework choreography: several fireworks share one frame loop but
//! each crosses its own randomized burst point independently.

use rand::RngExt;

use super::firework::{ALPHA_FLOOR, BURST_SIGMA, FADE_STEP, Firework, TRAIL_INTERVAL};
use super::gaussian;
use crate::audio::{AudioSink, Cue};
use crate::error::PyroError;
use crate::stage::Stage;

/// Alpha decrement applied the frame a firework crosses its burst point: a
/// near-no-op nudge below 1.0 so the fading branch picks the firework up on
/// the next frame.
const BURST_NUDGE: f64 = 0.999;

/// An insertion-ordered collection of fireworks, keyed densely from 0.
#[derive(Default)]
pub struct FireworkGroup {
    fireworks: Vec<Firework>,
}

impl FireworkGroup {
    pub fn new() -> Self {
        FireworkGroup::default()
    }

    /// Append a firework; its key is the next dense index.
    pub fn push(&mut self, firework: Firework) {
        self.fireworks.push(firework);
    }

    pub fn len(&self) -> usize {
        self.fireworks.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fireworks.is_empty()
    }

    pub fn get(&self, key: usize) -> Option<&Firework> {
        self.fireworks.get(key)
    }

    /// Highest lead-particle alpha across the group; 0.0 for an empty group.
    pub fn max_alpha(&self) -> f64 {
        self.fireworks
            .iter()
            .map(|fw| fw.particle(0).alpha())
            .fold(0.0, f64::max)
    }

    /// Run the whole group to transparency.
    ///
    /// Per frame, in key order, each firework is exactly one of:
    /// fading (lead alpha below 1.0): draw, step, fade;
    /// just past its burst point: nudge alpha, play the cue, assign burst
    /// velocities (it starts fading next frame);
    /// still ascending: draw, step.
    ///
    /// The backdrop repaints every frame until the first burst in the group,
    /// then only every `TRAIL_INTERVAL` frames, so tails appear exactly when
    /// the sky starts filling with blooms. A firework at alpha 1.0 whose
    /// velocity has not crossed keeps ascending even on a frame where a
    /// neighbor bursts.
    pub fn perform<S: Stage, A: AudioSink, R: RngExt>(
        &mut self,
        stage: &mut S,
        audio: &mut A,
        rng: &mut R,
    ) -> Result<(), PyroError> {
        let mut frame: u32 = 0;
        let mut any_burst = false;

        while self.max_alpha() > ALPHA_FLOOR {
            for fw in &mut self.fireworks {
                let threshold = gaussian(rng, 0.0, BURST_SIGMA);
                if fw.particle(0).alpha() < 1.0 {
                    fw.draw(stage);
                    fw.advance_all();
                    fw.fade_all(FADE_STEP, rng)?;
                } else if fw.reached_burst_point(threshold) {
                    fw.fade_all(BURST_NUDGE, rng)?;
                    audio.play(Cue::Burst);
                    fw.prepare_burst(rng);
                    any_burst = true;
                } else {
                    fw.draw(stage);
                    fw.advance_all();
                }
            }
            stage.present()?;
            stage.pause();
            if !any_burst || frame % TRAIL_INTERVAL == 0 {
                stage.clear_to_backdrop();
            }
            frame += 1;
        }
        stage.clear_to_backdrop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::sim::FireworkSpec;
    use crate::stage::testing::{RecordingStage, StageEvent};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spec(count: usize, vy: f64, ay: f64) -> FireworkSpec {
        FireworkSpec {
            count,
            px: 0.0,
            py: -10.0,
            vx: 0.0,
            vy,
            ax: 0.0,
            ay,
            size: 0.1,
            r: 0.5,
            g: 0.9,
            b: 0.2,
        }
    }

    fn has_clear(frame: &[StageEvent]) -> bool {
        frame.iter().any(|e| matches!(e, StageEvent::Clear))
    }

    #[test]
    fn max_alpha_tracks_the_brightest_firework() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut group = FireworkGroup::new();
        group.push(Firework::new(&spec(3, 0.5, -0.01), &mut rng));
        group.push(Firework::new(&spec(3, 0.5, -0.01), &mut rng));
        assert_eq!(group.max_alpha(), 1.0);

        // fade one firework; the untouched one keeps the max at 1.0
        let mut faded = Firework::new(&spec(3, 0.5, -0.01), &mut rng);
        faded.fade_all(0.5, &mut rng).unwrap();
        let mut group = FireworkGroup::new();
        group.push(faded);
        group.push(Firework::new(&spec(3, 0.5, -0.01), &mut rng));
        assert_eq!(group.max_alpha(), 1.0);
    }

    #[test]
    fn empty_group_has_zero_alpha_and_finishes_immediately() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut group = FireworkGroup::new();
        assert_eq!(group.max_alpha(), 0.0);
        let mut stage = RecordingStage::new();
        let mut audio = NullAudio;
        group.perform(&mut stage, &mut audio, &mut rng).unwrap();
        // no frames, just the final wipe
        assert_eq!(stage.events().len(), 1);
        assert!(matches!(stage.last_event(), Some(StageEvent::Clear)));
    }

    #[test]
    fn clears_every_frame_until_first_burst_then_every_fifth() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut group = FireworkGroup::new();
        // slow ascent so a good stretch of pre-burst frames accumulates
        group.push(Firework::new(&spec(2, 0.6, -0.01), &mut rng));
        let mut stage = RecordingStage::new();
        let mut audio = NullAudio;
        group.perform(&mut stage, &mut audio, &mut rng).unwrap();

        let circles = stage.circles_per_frame();
        let frames = stage.frames();
        // burst frame: the firework takes the burst branch and draws nothing
        let burst_frame = circles
            .iter()
            .position(|c| c.is_empty())
            .expect("the firework never burst");
        assert!(burst_frame > 0, "expected a few ascending frames first");

        for (i, f) in frames.iter().enumerate() {
            if i < burst_frame {
                assert!(has_clear(f), "pre-burst frame {} skipped its repaint", i);
            }
        }
        // post-burst: repaints thin out to the trail cadence
        let post: Vec<bool> = frames[burst_frame..].iter().map(|f| has_clear(f)).collect();
        assert!(post.iter().any(|c| !*c));
        let longest_gap = post
            .split(|c| *c)
            .map(|run| run.len())
            .max()
            .unwrap_or(0);
        assert!(longest_gap >= (TRAIL_INTERVAL - 1) as usize);
    }

    #[test]
    fn fireworks_cross_their_burst_points_independently() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut group = FireworkGroup::new();
        // already past any plausible threshold: bursts on frame 0
        group.push(Firework::new(&spec(4, -2.0, -0.01), &mut rng));
        // still climbing: ascends for many frames
        group.push(Firework::new(&spec(3, 0.6, -0.01), &mut rng));
        let mut stage = RecordingStage::new();
        let mut audio = NullAudio;
        group.perform(&mut stage, &mut audio, &mut rng).unwrap();

        let circles = stage.circles_per_frame();
        // frame 0: the sinking firework takes the burst branch (no draw),
        // the climbing one draws at full alpha
        let first = &circles[0];
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|c| match c {
            StageEvent::Circle { alpha, .. } => *alpha == 1.0,
            _ => false,
        }));

        // soon after, one firework fades while the other still ascends
        let mixed = circles.iter().skip(1).take(20).any(|frame| {
            let mut some_fading = false;
            let mut some_opaque = false;
            for c in frame {
                if let StageEvent::Circle { alpha, .. } = c {
                    if *alpha < 1.0 {
                        some_fading = true;
                    } else {
                        some_opaque = true;
                    }
                }
            }
            some_fading && some_opaque
        });
        assert!(mixed, "expected fading and ascending fireworks in one frame");
    }

    #[test]
    fn perform_plays_one_cue_per_firework() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut group = FireworkGroup::new();
        group.push(Firework::new(&spec(2, 0.4, -0.01), &mut rng));
        group.push(Firework::new(&spec(2, 0.5, -0.01), &mut rng));
        let mut stage = RecordingStage::new();
        let mut audio = crate::audio::testing::CountingAudio::default();
        group.perform(&mut stage, &mut audio, &mut rng).unwrap();
        assert_eq!(audio.bursts, 2);
    }

    #[test]
    fn group_preserves_insertion_order() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut group = FireworkGroup::new();
        group.push(Firework::new(&spec(1, 0.5, -0.01), &mut rng));
        group.push(Firework::new(&spec(2, 0.5, -0.01), &mut rng));
        group.push(Firework::new(&spec(3, 0.5, -0.01), &mut rng));
        assert_eq!(group.len(), 3);
        for (key, want) in [(0usize, 1usize), (1, 2), (2, 3)] {
            assert_eq!(group.get(key).map(|fw| fw.len()), Some(want));
        }
        assert!(group.get(3).is_none());
    }
}
