use crate::session::round::Round;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    Final,
    Error,
}

/// Message shown under the units after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    pub fn new(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub correct: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundStarted {
    pub round_index: usize,
    pub round_count: usize,
}

/// End of game tally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: usize,
    pub total: usize,
    pub attempts: Vec<u32>,
}

impl SessionSummary {
    pub fn from_rounds(score: usize, rounds: &[Round]) -> Self {
        Self {
            score,
            total: rounds.len(),
            attempts: rounds.iter().map(|r| r.attempts).collect(),
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 / self.total as f64 * 100.0
    }

    /// Rounds solved on the first check.
    pub fn first_try(&self) -> usize {
        self.attempts.iter().filter(|&&a| a == 1).count()
    }

    pub fn total_attempts(&self) -> u32 {
        self.attempts.iter().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Started(RoundStarted),
    Finished(SessionSummary),
}
