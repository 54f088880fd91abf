use rand::Rng;

use crate::engine::reorder::move_item;
use crate::engine::shuffle::{ShufflePolicy, shuffle_with};
use crate::engine::verify::{same_unit, verify};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verdict {
    #[default]
    Unverified,
    Correct,
    Incorrect,
}

/// One text to put back in order.
#[derive(Clone, Debug)]
pub struct Round {
    pub truth: Vec<String>,
    pub live: Vec<String>,
    pub verdict: Verdict,
    /// Number of checks made, correct or not.
    pub attempts: u32,
    /// Set by the first correct check; replays do not clear it.
    pub scored: bool,
}

impl Round {
    pub fn new(truth: Vec<String>) -> Self {
        Self {
            live: truth.clone(),
            truth,
            verdict: Verdict::Unverified,
            attempts: 0,
            scored: false,
        }
    }

    /// Deals a fresh order and forgets the previous verdict. `normalize` is
    /// the comparison the order will be checked with.
    pub fn deal<R: Rng + ?Sized>(
        &mut self,
        policy: ShufflePolicy,
        attempts: usize,
        normalize: bool,
        rng: &mut R,
    ) {
        self.live = shuffle_with(&self.truth, policy, attempts, rng, |a, b| {
            same_unit(a, b, normalize)
        });
        self.verdict = Verdict::Unverified;
    }

    /// Returns false when either index is out of range or they are equal.
    pub fn apply_move(&mut self, from: usize, to: usize) -> bool {
        let len = self.live.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        self.live = move_item(&self.live, from, to);
        self.verdict = Verdict::Unverified;
        true
    }

    pub fn check(&mut self, normalize: bool) -> bool {
        self.attempts += 1;
        let correct = verify(&self.live, &self.truth, normalize);
        self.verdict = if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        correct
    }

    pub fn is_solved(&self) -> bool {
        self.verdict == Verdict::Correct
    }

    /// Marks the round as scored. Returns false when it already was.
    pub fn mark_scored(&mut self) -> bool {
        !std::mem::replace(&mut self.scored, true)
    }

    /// Back to a never-checked round, for a fresh play-through.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.scored = false;
        self.verdict = Verdict::Unverified;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn units(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_round_starts_in_order() {
        let round = Round::new(units(&["a", "b"]));
        assert_eq!(round.live, round.truth);
        assert_eq!(round.verdict, Verdict::Unverified);
        assert_eq!(round.attempts, 0);
        assert!(!round.scored);
    }

    #[test]
    fn test_deal_keeps_units_and_resets_verdict() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut round = Round::new(units(&["a", "b", "c", "d"]));
        round.verdict = Verdict::Incorrect;
        round.deal(ShufflePolicy::AvoidIdentity, 8, false, &mut rng);
        assert_ne!(round.live, round.truth);
        let mut sorted = round.live.clone();
        sorted.sort();
        assert_eq!(sorted, round.truth);
        assert_eq!(round.verdict, Verdict::Unverified);
    }

    #[test]
    fn test_apply_move_and_check() {
        let mut round = Round::new(units(&["a", "b", "c"]));
        round.live = units(&["c", "a", "b"]);
        assert!(!round.check(false));
        assert_eq!(round.verdict, Verdict::Incorrect);

        assert!(round.apply_move(0, 2));
        assert_eq!(round.verdict, Verdict::Unverified);
        assert!(round.check(false));
        assert!(round.is_solved());
        assert_eq!(round.attempts, 2);
    }

    #[test]
    fn test_apply_move_rejects_bad_indices() {
        let mut round = Round::new(units(&["a", "b"]));
        assert!(!round.apply_move(0, 2));
        assert!(!round.apply_move(1, 1));
        assert_eq!(round.live, units(&["a", "b"]));
    }

    #[test]
    fn test_deal_never_hands_back_a_passing_order() {
        let truth = units(&["the ", "cat ", "and ", "the ", "dog ", "saw ", "the"]);
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut round = Round::new(truth.clone());
            round.deal(ShufflePolicy::AvoidIdentity, 8, true, &mut rng);
            assert!(!round.check(true), "seed {seed} dealt {:?}", round.live);
        }
    }

    #[test]
    fn test_scored_once_until_reset() {
        let mut round = Round::new(units(&["a", "b"]));
        assert!(round.mark_scored());
        assert!(!round.mark_scored());
        round.attempts = 3;
        round.reset();
        assert_eq!(round.attempts, 0);
        assert!(round.mark_scored());
    }
}
