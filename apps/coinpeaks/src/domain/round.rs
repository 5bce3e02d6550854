//! One level being played: board, move history and score together.

use tracing::debug;

use super::board::{Board, CardId};
use super::errors::{MoveRejected, UndoRejected};
use super::history::{MoveHistory, Wallet};
use super::moves::MoveRecord;
use super::scoring::{ScoreKeeper, ScoringRules};

/// What the player should be nudged towards when no tableau card is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HintState {
    #[default]
    None,
    /// No tableau play, but the stock can still be drawn from.
    DrawFromStock,
    /// No tableau play and the stock is empty: the round is lost.
    NoMoves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    InProgress,
    Completed,
    OutOfMoves,
}

/// Result of a successful tableau play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    pub card: CardId,
    pub points: u64,
    pub flipped: usize,
}

/// Final tally once the tableau is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub score: u64,
    pub stock_bonus: u64,
    pub coins: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRules {
    pub undo_cost: u64,
    pub scoring: ScoringRules,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            undo_cost: 50,
            scoring: ScoringRules::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Round {
    level_id: String,
    board: Board,
    history: MoveHistory,
    score: ScoreKeeper,
}

impl Round {
    pub fn new(level_id: impl Into<String>, board: Board, rules: RoundRules) -> Self {
        Self {
            level_id: level_id.into(),
            board,
            history: MoveHistory::new(rules.undo_cost),
            score: ScoreKeeper::new(rules.scoring),
        }
    }

    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    pub fn streak(&self) -> u32 {
        self.score.streak()
    }

    pub fn play(&mut self, card: CardId) -> Result<PlayOutcome, MoveRejected> {
        let record = self.board.play(card)?;
        let flipped = match &record {
            MoveRecord::Tableau { flipped, .. } => flipped.len(),
            MoveRecord::Stock { .. } => 0,
        };
        self.history.record_move(record);
        let points = self.score.on_play();
        debug!(level_id = %self.level_id, card = card.0, points, "card played");
        Ok(PlayOutcome {
            card,
            points,
            flipped,
        })
    }

    pub fn draw(&mut self) -> Result<CardId, MoveRejected> {
        let record = self.board.draw_from_stock()?;
        let drawn = record.played();
        self.history.record_move(record);
        self.score.on_draw();
        Ok(drawn)
    }

    pub fn undo(&mut self, wallet: &mut Wallet) -> Result<MoveRecord, UndoRejected> {
        let record = self.history.undo(&mut self.board, wallet)?;
        self.score.on_undo();
        Ok(record)
    }

    pub fn status(&self) -> RoundStatus {
        if self.board.is_complete() {
            RoundStatus::Completed
        } else if self.board.has_any_move(self.board.waste_rank()) || !self.board.stock().is_empty() {
            RoundStatus::InProgress
        } else {
            RoundStatus::OutOfMoves
        }
    }

    pub fn hint(&self) -> HintState {
        if self.board.is_complete() || self.board.has_any_move(self.board.waste_rank()) {
            HintState::None
        } else if self.board.stock().is_empty() {
            HintState::NoMoves
        } else {
            HintState::DrawFromStock
        }
    }

    pub fn completion(&self) -> Option<Completion> {
        if !self.board.is_complete() {
            return None;
        }
        let stock_left = self.board.stock().len();
        let score = self.score.final_score(stock_left);
        Some(Completion {
            score,
            stock_bonus: self.score.stock_bonus(stock_left),
            coins: self.score.coins_for(score),
        })
    }
}
