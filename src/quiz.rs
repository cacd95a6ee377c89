//! The color-match quiz: which chemical burns which color.
//!
//! A small state machine over a dense-keyed question set. Questions are
//! drawn by weighted random selection; a correctly answered question is
//! removed, its weight zeroed, and the remaining weights renormalized to
//! uniform, so it can never come up again. Wrong answers cost a point and
//! leave the deck untouched.

use rand::RngExt;

/// A chemical, the color name it produces, and that color for launching a
/// matching firework. The table drives both the learn menu and the quiz.
pub struct Chemical {
    pub name: &'static str,
    pub color_name: &'static str,
    pub rgb: (f64, f64, f64),
}

pub const CHEMICALS: [Chemical; 6] = [
    Chemical {
        name: "Strontium Salts",
        color_name: "RED",
        rgb: (1.0, 0.0, 0.0),
    },
    Chemical {
        name: "Calcium Salts",
        color_name: "ORANGE",
        rgb: (1.0, 0.6, 0.0),
    },
    Chemical {
        name: "Sodium Salts",
        color_name: "YELLOW",
        rgb: (1.0, 1.0, 0.0),
    },
    Chemical {
        name: "Barium Salts",
        color_name: "GREEN",
        rgb: (0.5, 0.9, 0.2),
    },
    Chemical {
        name: "Copper Salts",
        color_name: "BLUE",
        rgb: (0.364, 0.501, 0.976),
    },
    Chemical {
        name: "Copper and Strontium Salts",
        color_name: "PURPLE",
        rgb: (0.8, 0.509, 0.972),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Final standing, by score against the size of the full deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Every question right on the first try.
    Perfect,
    /// Non-negative but short of perfect.
    RoomToImprove,
    /// More wrong than right.
    ReviewSuggested,
}

pub struct QuizEngine {
    /// Dense keys; answered questions become `None` but keep their slot so
    /// keys stay stable.
    questions: Vec<Option<(String, String)>>,
    weights: Vec<f64>,
    total: usize,
    remaining: usize,
    score: i32,
    posed: Option<usize>,
}

impl QuizEngine {
    /// The standard six-chemical deck.
    pub fn new() -> Self {
        Self::with_questions(
            CHEMICALS
                .iter()
                .map(|c| (c.name.to_string(), c.color_name.to_string()))
                .collect(),
        )
    }

    /// A custom deck; weights start uniform.
    pub fn with_questions(pairs: Vec<(String, String)>) -> Self {
        let total = pairs.len();
        let weight = if total > 0 { 1.0 / total as f64 } else { 0.0 };
        QuizEngine {
            questions: pairs.into_iter().map(Some).collect(),
            weights: vec![weight; total],
            total,
            remaining: total,
            score: 0,
            posed: None,
        }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn finished(&self) -> bool {
        self.remaining == 0
    }

    /// The current weight of a key; exactly 0.0 once answered.
    #[allow(dead_code)]
    pub fn weight(&self, key: usize) -> f64 {
        self.weights.get(key).copied().unwrap_or(0.0)
    }

    /// Draw the next question. Returns the key and the chemical name, or
    /// None when the deck is empty. Posing again before answering simply
    /// re-draws.
    pub fn pose<R: RngExt>(&mut self, rng: &mut R) -> Option<(usize, &str)> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.draw_key(rng);
        self.posed = Some(key);
        self.questions[key].as_ref().map(|(name, _)| (key, name.as_str()))
    }

    /// Score the selected color name against the posed question. Exact,
    /// case-sensitive comparison. Returns None if nothing was posed.
    pub fn answer(&mut self, selected: &str) -> Option<Verdict> {
        let key = self.posed.take()?;
        let correct = match &self.questions[key] {
            Some((_, color)) => color == selected,
            None => return None,
        };
        if correct {
            self.score += 1;
            self.questions[key] = None;
            self.weights[key] = 0.0;
            self.remaining -= 1;
            self.renormalize();
            Some(Verdict::Correct)
        } else {
            self.score -= 1;
            Some(Verdict::Incorrect)
        }
    }

    /// Three-tier standing once the deck is done.
    pub fn feedback(&self) -> Feedback {
        if self.score == self.total as i32 {
            Feedback::Perfect
        } else if self.score >= 0 {
            Feedback::RoomToImprove
        } else {
            Feedback::ReviewSuggested
        }
    }

    /// Weighted draw over the live keys. Answered keys hold weight 0.0 and
    /// are skipped outright, so they can never be selected even if a roll
    /// lands on a zero-width slot.
    fn draw_key<R: RngExt>(&self, rng: &mut R) -> usize {
        let tot: f64 = self.weights.iter().sum();
        let mut roll = rng.random_range(0.0..tot);
        let mut last_live = 0;
        for (key, w) in self.weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            if roll < *w {
                return key;
            }
            roll -= w;
            last_live = key;
        }
        // float drift past the last slot
        last_live
    }

    fn renormalize(&mut self) {
        if self.remaining == 0 {
            return;
        }
        let w = 1.0 / self.remaining as f64;
        for (key, q) in self.questions.iter().enumerate() {
            if q.is_some() {
                self.weights[key] = w;
            }
        }
    }
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn correct_color(key: usize) -> &'static str {
        CHEMICALS[key].color_name
    }

    fn wrong_color(key: usize) -> &'static str {
        CHEMICALS[(key + 1) % CHEMICALS.len()].color_name
    }

    #[test]
    fn fresh_deck_has_uniform_weights() {
        let q = QuizEngine::new();
        assert_eq!(q.remaining(), 6);
        let sum: f64 = (0..6).map(|k| q.weight(k)).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for k in 0..6 {
            assert!((q.weight(k) - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn one_correct_then_one_incorrect_scores_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut q = QuizEngine::new();

        let (key, _) = q.pose(&mut rng).unwrap();
        assert_eq!(q.answer(correct_color(key)), Some(Verdict::Correct));
        assert_eq!(q.score(), 1);

        let (key, _) = q.pose(&mut rng).unwrap();
        assert_eq!(q.answer(wrong_color(key)), Some(Verdict::Incorrect));
        assert_eq!(q.score(), 0);
    }

    #[test]
    fn answered_questions_get_zero_weight_and_never_return() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut q = QuizEngine::new();
        let (answered, _) = q.pose(&mut rng).unwrap();
        q.answer(correct_color(answered)).unwrap();

        assert_eq!(q.weight(answered), 0.0);
        for _ in 0..500 {
            let (key, _) = q.pose(&mut rng).unwrap();
            assert_ne!(key, answered);
        }
    }

    #[test]
    fn weights_renormalize_to_one_after_each_correct_answer() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut q = QuizEngine::new();
        while !q.finished() {
            let (key, _) = q.pose(&mut rng).unwrap();
            q.answer(correct_color(key)).unwrap();
            if !q.finished() {
                let sum: f64 = (0..6).map(|k| q.weight(k)).sum();
                assert!((sum - 1.0).abs() < 1e-12);
                let live = 1.0 / q.remaining() as f64;
                for k in 0..6 {
                    let w = q.weight(k);
                    assert!(w == 0.0 || (w - live).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn wrong_answers_leave_the_deck_untouched() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut q = QuizEngine::new();
        let (key, _) = q.pose(&mut rng).unwrap();
        q.answer(wrong_color(key)).unwrap();
        assert_eq!(q.remaining(), 6);
        assert!((q.weight(key) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn perfect_run_earns_top_feedback() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut q = QuizEngine::new();
        while let Some((key, _)) = q.pose(&mut rng) {
            q.answer(correct_color(key)).unwrap();
        }
        assert!(q.finished());
        assert_eq!(q.score(), 6);
        assert_eq!(q.feedback(), Feedback::Perfect);
    }

    #[test]
    fn middling_and_negative_scores_map_to_lower_tiers() {
        let mut rng = StdRng::seed_from_u64(6);
        // one miss on the way through: final score 5, middle tier
        let mut q = QuizEngine::new();
        let (key, _) = q.pose(&mut rng).unwrap();
        q.answer(wrong_color(key)).unwrap();
        while let Some((key, _)) = q.pose(&mut rng) {
            q.answer(correct_color(key)).unwrap();
        }
        assert_eq!(q.score(), 5);
        assert_eq!(q.feedback(), Feedback::RoomToImprove);

        // miss everything twice first: deeply negative, bottom tier
        let mut q = QuizEngine::new();
        for _ in 0..13 {
            let (key, _) = q.pose(&mut rng).unwrap();
            q.answer(wrong_color(key)).unwrap();
        }
        while let Some((key, _)) = q.pose(&mut rng) {
            q.answer(correct_color(key)).unwrap();
        }
        assert!(q.score() < 0);
        assert_eq!(q.feedback(), Feedback::ReviewSuggested);
    }

    #[test]
    fn answer_without_a_posed_question_is_none() {
        let mut q = QuizEngine::new();
        assert_eq!(q.answer("RED"), None);
    }

    #[test]
    fn empty_deck_poses_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = QuizEngine::with_questions(Vec::new());
        assert!(q.finished());
        assert!(q.pose(&mut rng).is_none());
        // vacuously perfect: nothing was missed
        assert_eq!(q.feedback(), Feedback::Perfect);
    }
}
