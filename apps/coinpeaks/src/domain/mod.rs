//! Domain layer: pure game logic types and helpers.

pub mod board;
pub mod cards_parsing;
pub mod cards_types;
pub mod dealing;
pub mod errors;
pub mod history;
pub mod level;
pub mod moves;
pub mod round;
pub mod scoring;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod tests_board;
#[cfg(test)]
mod tests_level;
#[cfg(test)]
mod tests_props_undo;
#[cfg(test)]
mod tests_round;

// Re-exports for ergonomics
pub use board::{Board, BoardBuilder, Card, CardId, Location, Placement};
pub use cards_types::{CardFace, Rank, Suit};
pub use dealing::deal_peaks;
pub use errors::{LevelError, MoveRejected, UndoRejected};
pub use history::{MoveHistory, Wallet};
pub use level::{LevelCatalog, LevelData, Slot};
pub use moves::MoveRecord;
pub use round::{Completion, HintState, PlayOutcome, Round, RoundRules, RoundStatus};
pub use scoring::{ScoreKeeper, ScoringRules};
