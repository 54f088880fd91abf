use std::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::content::RoundSet;
use crate::engine::pointer::{DragFeedback, DragStyle, MoveRequest, Point, PointerTracker, Rect};
use crate::engine::shuffle::ShufflePolicy;
use crate::engine::tokenize::{Granularity, tokenize};
use crate::error::{SessionError, TransitionError, ValidationError};
use crate::session::result::{
    Advance, Feedback, FeedbackKind, RoundStarted, SessionSummary, VerifyOutcome,
};
use crate::session::round::{Round, Verdict};

const MSG_CORRECT: &str = "Correct! Everything is in order.";
const MSG_CORRECT_NEXT: &str = "Correct! Everything is in order. Continue to the next one.";
const MSG_INCORRECT: &str = "Not quite. The order is still wrong, try again!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Input,
    Playing,
    Checking,
    Finished,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Input => "input",
            Phase::Playing => "playing",
            Phase::Checking => "checking",
            Phase::Finished => "finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds and shuffling behavior for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    pub min_chars: usize,
    pub min_sentences: usize,
    pub max_rounds: usize,
    pub shuffle_policy: ShufflePolicy,
    pub shuffle_attempts: usize,
    pub normalize_words: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_chars: 20,
            min_sentences: 2,
            max_rounds: 10,
            shuffle_policy: ShufflePolicy::AvoidIdentity,
            shuffle_attempts: 8,
            normalize_words: true,
        }
    }
}

/// Read-only view for rendering.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub granularity: Granularity,
    pub live: &'a [String],
    pub verdict: Verdict,
    pub score: usize,
    pub round_index: usize,
    pub round_count: usize,
    pub feedback: Option<&'a Feedback>,
    pub dragging: Option<usize>,
}

/// A play-through: rounds, score and the phase they are in.
pub struct Session {
    rules: Rules,
    phase: Phase,
    granularity: Granularity,
    rounds: Vec<Round>,
    current: usize,
    score: usize,
    feedback: Option<Feedback>,
    last_text: String,
    tracker: PointerTracker,
    rng: SmallRng,
}

impl Session {
    pub fn new(rules: Rules) -> Self {
        Self::with_rng(rules, SmallRng::from_entropy())
    }

    pub fn with_seed(rules: Rules, seed: u64) -> Self {
        Self::with_rng(rules, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rules: Rules, rng: SmallRng) -> Self {
        Self {
            rules,
            phase: Phase::Input,
            granularity: Granularity::Sentence,
            rounds: Vec::new(),
            current: 0,
            score: 0,
            feedback: None,
            last_text: String::new(),
            tracker: PointerTracker::new(),
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Text from the last submission, kept for re-editing.
    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.get(self.current)
    }

    pub fn state(&self) -> Snapshot<'_> {
        let round = self.current_round();
        Snapshot {
            phase: self.phase,
            granularity: self.granularity,
            live: round.map(|r| r.live.as_slice()).unwrap_or(&[]),
            verdict: round.map(|r| r.verdict).unwrap_or_default(),
            score: self.score,
            round_index: self.current,
            round_count: self.rounds.len(),
            feedback: self.feedback.as_ref(),
            dragging: self.tracker.gesture().map(|g| g.source_index),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_rounds(self.score, &self.rounds)
    }

    /// Starts a one-round game from a single text.
    pub fn submit_text(&mut self, raw: &str, granularity: Granularity) -> Result<RoundStarted, SessionError> {
        self.expect_phase("submit text", &[Phase::Input])?;
        self.last_text = raw.to_string();
        let truth = self.validate_text(raw, granularity).inspect_err(|err| {
            self.reject(err);
        })?;
        Ok(self.start(vec![Round::new(truth)], granularity))
    }

    /// Starts a game with one round per non-blank phrase.
    pub fn submit_rounds<S: AsRef<str>>(
        &mut self,
        texts: &[S],
        granularity: Granularity,
    ) -> Result<RoundStarted, SessionError> {
        self.expect_phase("submit rounds", &[Phase::Input])?;
        let phrases: Vec<&str> = texts
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .collect();
        self.last_text = phrases.join(" | ");

        let rounds = self.validate_phrases(&phrases, granularity).inspect_err(|err| {
            self.reject(err);
        })?;
        Ok(self.start(rounds, granularity))
    }

    /// Starts a game from a content set: one text plays as a single round,
    /// several as a phrase sequence.
    pub fn submit_set(&mut self, set: &RoundSet) -> Result<RoundStarted, SessionError> {
        match set.texts.as_slice() {
            [single] => self.submit_text(single, set.granularity),
            texts => self.submit_rounds(texts, set.granularity),
        }
    }

    fn validate_text(&self, raw: &str, granularity: Granularity) -> Result<Vec<String>, ValidationError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len < self.rules.min_chars {
            return Err(ValidationError::TooShort {
                len,
                min: self.rules.min_chars,
            });
        }
        let units = tokenize(trimmed, granularity);
        let min = self.min_units(granularity);
        if units.len() < min {
            return Err(ValidationError::TooFewUnits {
                found: units.len(),
                min,
            });
        }
        Ok(units)
    }

    fn validate_phrases(&self, phrases: &[&str], granularity: Granularity) -> Result<Vec<Round>, ValidationError> {
        if phrases.len() < 2 {
            return Err(ValidationError::TooFewRounds {
                found: phrases.len(),
                min: 2,
            });
        }
        if phrases.len() > self.rules.max_rounds {
            return Err(ValidationError::TooManyRounds {
                found: phrases.len(),
                max: self.rules.max_rounds,
            });
        }
        let min = self.min_units(granularity);
        phrases
            .iter()
            .map(|phrase| {
                let units = tokenize(phrase, granularity);
                if units.len() < min {
                    Err(ValidationError::TooFewUnits {
                        found: units.len(),
                        min,
                    })
                } else {
                    Ok(Round::new(units))
                }
            })
            .collect()
    }

    fn min_units(&self, granularity: Granularity) -> usize {
        match granularity {
            Granularity::Sentence => self.rules.min_sentences,
            Granularity::Word => 1,
        }
    }

    fn reject(&mut self, err: &ValidationError) {
        debug!(%err, "submission rejected");
        self.phase = Phase::Input;
        self.feedback = Some(Feedback::new(FeedbackKind::Error, err.to_string()));
    }

    fn start(&mut self, rounds: Vec<Round>, granularity: Granularity) -> RoundStarted {
        info!(rounds = rounds.len(), granularity = granularity.as_str(), "game started");
        self.rounds = rounds;
        self.granularity = granularity;
        self.current = 0;
        self.score = 0;
        self.deal_current()
    }

    fn deal_current(&mut self) -> RoundStarted {
        self.tracker.cancel();
        let Rules {
            shuffle_policy,
            shuffle_attempts,
            ..
        } = self.rules;
        let normalize = self.normalizes();
        if let Some(round) = self.rounds.get_mut(self.current) {
            round.deal(shuffle_policy, shuffle_attempts, normalize, &mut self.rng);
        }
        self.phase = Phase::Playing;
        self.feedback = None;
        debug!(round = self.current, "round dealt");
        RoundStarted {
            round_index: self.current,
            round_count: self.rounds.len(),
        }
    }

    fn normalizes(&self) -> bool {
        self.rules.normalize_words && self.granularity.normalizes()
    }

    fn expect_phase(&self, action: &'static str, allowed: &[Phase]) -> Result<(), TransitionError> {
        if allowed.contains(&self.phase) {
            return Ok(());
        }
        warn!(action, phase = %self.phase, "action not valid in this phase");
        Err(TransitionError {
            action,
            phase: self.phase,
        })
    }

    fn live_len(&self) -> usize {
        self.current_round().map_or(0, |r| r.live.len())
    }

    pub fn begin_drag(
        &mut self,
        style: DragStyle,
        index: usize,
        pointer: Point,
        element: Rect,
        container_origin: Point,
    ) -> Result<(), SessionError> {
        self.expect_phase("drag", &[Phase::Playing])?;
        let len = self.live_len();
        self.tracker
            .begin(style, index, len, pointer, element, container_origin)?;
        Ok(())
    }

    pub fn update_drag(&mut self, pointer: Point, bounds: &[Rect]) -> Result<DragFeedback, SessionError> {
        Ok(self.tracker.update(pointer, bounds)?)
    }

    pub fn hover_drag(&mut self, index: usize) -> Result<(), SessionError> {
        Ok(self.tracker.hover(index)?)
    }

    /// Ends a tracked drag; returns the move made, if any.
    pub fn end_drag(&mut self, pointer: Point, bounds: &[Rect]) -> Result<Option<MoveRequest>, SessionError> {
        let request = self.tracker.end(pointer, bounds)?;
        Ok(self.apply_request(request))
    }

    /// Ends a drag on the unit at `target`.
    pub fn drop_drag(&mut self, target: usize) -> Result<Option<MoveRequest>, SessionError> {
        let len = self.live_len();
        let request = self.tracker.drop_on(target, len)?;
        Ok(self.apply_request(request))
    }

    /// Ends a tracked drag at the last position it was seen, for a pointer
    /// that left the surface.
    pub fn release_drag(&mut self, bounds: &[Rect]) -> Result<Option<MoveRequest>, SessionError> {
        let request = self.tracker.end_at_last(bounds)?;
        Ok(self.apply_request(request))
    }

    /// Abandons the drag in progress, if any, leaving the order untouched.
    pub fn cancel_drag(&mut self) -> bool {
        self.tracker.cancel()
    }

    pub fn move_unit(&mut self, from: usize, to: usize) -> Result<bool, SessionError> {
        self.expect_phase("reorder", &[Phase::Playing])?;
        Ok(self.apply_request(Some(MoveRequest { from, to })).is_some())
    }

    fn apply_request(&mut self, request: Option<MoveRequest>) -> Option<MoveRequest> {
        let request = request?;
        if self.phase != Phase::Playing {
            return None;
        }
        let round = self.rounds.get_mut(self.current)?;
        if !round.apply_move(request.from, request.to) {
            return None;
        }
        debug!(from = request.from, to = request.to, "unit moved");
        self.feedback = None;
        Some(request)
    }

    /// Checks the current order. A correct order moves to `checking` and
    /// scores the first time the round is solved; a wrong one stays in
    /// `playing` for another try.
    pub fn verify_current(&mut self) -> Result<VerifyOutcome, SessionError> {
        self.expect_phase("verify", &[Phase::Playing])?;
        let normalize = self.normalizes();
        let has_next = self.current + 1 < self.rounds.len();
        let Some(round) = self.rounds.get_mut(self.current) else {
            return Err(TransitionError {
                action: "verify",
                phase: self.phase,
            }
            .into());
        };

        let correct = round.check(normalize);
        let attempts = round.attempts;
        if correct && round.mark_scored() {
            self.score += 1;
        }
        let message = if correct {
            self.phase = Phase::Checking;
            self.tracker.cancel();
            if has_next { MSG_CORRECT_NEXT } else { MSG_CORRECT }
        } else {
            MSG_INCORRECT
        };
        debug!(round = self.current, correct, attempts, "order checked");

        let kind = if correct {
            FeedbackKind::Correct
        } else {
            FeedbackKind::Incorrect
        };
        self.feedback = Some(Feedback::new(kind, message));
        Ok(VerifyOutcome {
            correct,
            message: message.to_string(),
        })
    }

    /// Moves past a solved round, or finishes the game after the last one.
    pub fn advance_round(&mut self) -> Result<Advance, SessionError> {
        self.expect_phase("advance", &[Phase::Checking])?;
        if self.current + 1 < self.rounds.len() {
            self.current += 1;
            return Ok(Advance::Started(self.deal_current()));
        }
        self.phase = Phase::Finished;
        let summary = self.summary();
        info!(score = summary.score, total = summary.total, "game finished");
        self.feedback = Some(Feedback::new(
            FeedbackKind::Final,
            format!("Game over! Final score: {}/{}", summary.score, summary.total),
        ));
        Ok(Advance::Finished(summary))
    }

    /// Reshuffles the current round. Score is kept.
    pub fn replay_round(&mut self) -> Result<RoundStarted, SessionError> {
        self.expect_phase("replay", &[Phase::Playing, Phase::Checking])?;
        Ok(self.deal_current())
    }

    /// Plays the same rounds again from the first, with the score reset.
    pub fn restart(&mut self) -> Result<RoundStarted, SessionError> {
        self.expect_phase("restart", &[Phase::Finished])?;
        for round in &mut self.rounds {
            round.reset();
        }
        self.current = 0;
        self.score = 0;
        info!("game restarted");
        Ok(self.deal_current())
    }

    /// Drops the game and goes back to text entry.
    pub fn exit(&mut self) -> Result<(), SessionError> {
        self.expect_phase("exit", &[Phase::Playing, Phase::Checking, Phase::Finished])?;
        self.tracker.cancel();
        self.rounds.clear();
        self.current = 0;
        self.score = 0;
        self.feedback = None;
        self.phase = Phase::Input;
        debug!("back to input");
        Ok(())
    }
}
