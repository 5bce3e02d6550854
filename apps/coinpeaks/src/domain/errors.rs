//! Domain-level outcomes and errors.
//!
//! `MoveRejected` and `UndoRejected` are expected, non-exceptional outcomes:
//! the UI answers them with a rejection animation and they are never logged as
//! errors. `LevelError` covers level documents that cannot produce a board at
//! all; individual malformed slots are skipped instead (see `domain::level`).

use thiserror::Error;

use super::board::CardId;

/// Why a tableau play or a stock draw did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error("card {0:?} is not on the tableau")]
    NotInTableau(CardId),
    #[error("card {0:?} is still covered")]
    Covered(CardId),
    #[error("card {0:?} is face down")]
    FaceDown(CardId),
    #[error("card {0:?} is not rank-adjacent to the waste card")]
    NotAdjacent(CardId),
    #[error("stock pile is empty")]
    StockEmpty,
}

/// Why an undo request was refused. No state changes when refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UndoRejected {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("undo costs {cost} coins, only {available} available")]
    InsufficientCoins { cost: u64, available: u64 },
}

/// A level document that cannot be turned into a playable board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level parse error: {0}")]
    Parse(String),
    #[error("invalid card: {0}")]
    InvalidCard(String),
    #[error("level {level}: no usable waste card")]
    MissingWaste { level: String },
    #[error("level {level}: no usable tableau slots")]
    Empty { level: String },
    #[error("level io error at {path}: {detail}")]
    Io { path: String, detail: String },
}

impl LevelError {
    pub fn invalid_card(detail: impl Into<String>) -> Self {
        Self::InvalidCard(detail.into())
    }

    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            detail: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::Parse(err.to_string())
    }
}
