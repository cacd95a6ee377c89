//! Fire-and-forget sound.
//!
//! No media files ship with the binary; cues are synthesized at play time
//! and handed to rodio, which mixes them on its own thread. The simulation
//! never waits on a cue, and a machine without an output device simply
//! stays silent.

use rand::RngExt;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle};

const SAMPLE_RATE: u32 = 44_100;

/// What to play.
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    /// The thump of a firework bursting.
    Burst,
    /// The show's backing pad, derived from the script's song identifier.
    Song(String),
}

/// Anything that consumes cues.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Swallows every cue. Used for `--no-audio` and in tests.
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}
}

/// rodio-backed sink. The output stream must stay alive for playback, so it
/// rides along unused.
pub struct RodioAudio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioAudio {
    /// None when no output device is available; callers fall back to
    /// `NullAudio`.
    pub fn open() -> Option<Self> {
        let (stream, handle) = OutputStream::try_default().ok()?;
        Some(RodioAudio {
            _stream: stream,
            handle,
        })
    }
}

/// Runtime-selected sink: a real device when available and wanted,
/// otherwise silence.
pub enum Audio {
    Device(RodioAudio),
    Silent,
}

impl Audio {
    pub fn open(enabled: bool) -> Self {
        if enabled {
            match RodioAudio::open() {
                Some(dev) => Audio::Device(dev),
                None => Audio::Silent,
            }
        } else {
            Audio::Silent
        }
    }
}

impl AudioSink for Audio {
    fn play(&mut self, cue: Cue) {
        match self {
            Audio::Device(dev) => dev.play(cue),
            Audio::Silent => {}
        }
    }
}

impl AudioSink for RodioAudio {
    fn play(&mut self, cue: Cue) {
        let samples = match cue {
            Cue::Burst => burst_samples(&mut rand::rng()),
            Cue::Song(name) => song_samples(&name),
        };
        // fire and forget; a failed enqueue is as silent as no device
        let _ = self
            .handle
            .play_raw(SamplesBuffer::new(1, SAMPLE_RATE, samples));
    }
}

/// Noise burst with an exponential tail over a low thump.
fn burst_samples<R: RngExt>(rng: &mut R) -> Vec<f32> {
    let len = (SAMPLE_RATE as f64 * 0.7) as usize;
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let t = i as f64 / SAMPLE_RATE as f64;
        let env = (-6.0 * t).exp();
        let noise = rng.random_range(-1.0..1.0);
        let thump = (2.0 * std::f64::consts::PI * 60.0 * t).sin() * (-10.0 * t).exp();
        out.push(((noise * 0.25 + thump * 0.4) * env) as f32);
    }
    out
}

/// A soft pad: three partials of a chord chosen by the identifier hash,
/// with a slow attack so the show can open under it.
fn song_samples(name: &str) -> Vec<f32> {
    // roots of a pentatonic scale, in Hz
    const ROOTS: [f64; 5] = [196.0, 220.0, 246.9, 293.7, 329.6];
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in name.bytes() {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0001_0000_01b3);
    }
    let root = ROOTS[(hash % ROOTS.len() as u64) as usize];
    // tiny per-name detune so two shows on the same root still sound distinct
    let detune = 1.0 + ((hash >> 16) % 100) as f64 / 20_000.0;
    let root = root * detune;
    let partials = [root, root * 1.5, root * 2.0];

    let len = (SAMPLE_RATE as f64 * 6.0) as usize;
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let t = i as f64 / SAMPLE_RATE as f64;
        let attack = (t / 1.5).min(1.0);
        let release = ((6.0 - t) / 1.5).min(1.0);
        let env = attack * release * 0.18;
        let mut s = 0.0;
        for (k, f) in partials.iter().enumerate() {
            s += (2.0 * std::f64::consts::PI * f * t).sin() / (k + 1) as f64;
        }
        out.push((s * env) as f32);
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn burst_is_short_and_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = burst_samples(&mut rng);
        assert_eq!(s.len(), (SAMPLE_RATE as f64 * 0.7) as usize);
        assert!(s.iter().all(|v| v.abs() <= 1.0));
        assert!(s.iter().any(|v| v.abs() > 0.01));
    }

    #[test]
    fn burst_decays_toward_silence() {
        let mut rng = StdRng::seed_from_u64(2);
        let s = burst_samples(&mut rng);
        let head: f32 = s[..2000].iter().map(|v| v.abs()).sum();
        let tail: f32 = s[s.len() - 2000..].iter().map(|v| v.abs()).sum();
        assert!(tail < head / 10.0);
    }

    #[test]
    fn songs_differ_by_identifier_but_not_by_run() {
        let base = song_samples("anthem");
        assert_eq!(base, song_samples("anthem"));
        let others = ["prism", "rocket", "ember", "salute", "glow"];
        assert!(others.iter().any(|n| song_samples(n) != base));
    }

    #[test]
    fn song_opens_quietly() {
        let s = song_samples("anthem");
        assert!(s[..100].iter().all(|v| v.abs() < 0.05));
        assert!(s.iter().all(|v| v.abs() <= 1.0));
    }
}
