use thiserror::Error;

use crate::session::game::Phase;

/// Raw text or a phrase list that cannot start a game.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("text is too short ({len} characters, need at least {min})")]
    TooShort { len: usize, min: usize },
    #[error("text splits into {found} pieces, need at least {min}")]
    TooFewUnits { found: usize, min: usize },
    #[error("only {found} non-empty phrases, need at least {min}")]
    TooFewRounds { found: usize, min: usize },
    #[error("{found} phrases exceed the limit of {max}")]
    TooManyRounds { found: usize, max: usize },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GestureError {
    #[error("index {index} is outside a sequence of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("a drag is already in progress")]
    AlreadyActive,
    #[error("no drag is in progress")]
    NotActive,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {phase}")]
pub struct TransitionError {
    pub action: &'static str,
    pub phase: Phase,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML round set: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON round set: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported round set format: {0}")]
    UnknownFormat(String),
    #[error("round set '{0}' not found")]
    NotFound(String),
    #[error("round set '{0}' has no texts")]
    NoTexts(String),
}

/// Any action the session refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gesture(#[from] GestureError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
