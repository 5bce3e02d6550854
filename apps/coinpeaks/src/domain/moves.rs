//! Reversible move records.

use super::board::{CardId, Placement};

/// One applied move, carrying everything needed to reverse it exactly.
///
/// Records are owned by `MoveHistory`, created at move time and consumed by
/// undo. They never outlive the gameplay scene that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveRecord {
    /// A tableau card played onto the waste.
    Tableau {
        played: CardId,
        previous_waste: CardId,
        /// Cards turned face up because `played` was their last cover.
        flipped: Vec<CardId>,
        /// Cards `played` was sitting on when it left the tableau.
        covered: Vec<CardId>,
        original: Placement,
        /// Position in the tableau ordering, restored on undo.
        tableau_index: usize,
    },
    /// The top stock card turned onto the waste.
    Stock {
        played: CardId,
        previous_waste: CardId,
    },
}

impl MoveRecord {
    pub fn played(&self) -> CardId {
        match self {
            MoveRecord::Tableau { played, .. } | MoveRecord::Stock { played, .. } => *played,
        }
    }

    pub fn previous_waste(&self) -> CardId {
        match self {
            MoveRecord::Tableau { previous_waste, .. } | MoveRecord::Stock { previous_waste, .. } => {
                *previous_waste
            }
        }
    }

    pub fn is_stock(&self) -> bool {
        matches!(self, MoveRecord::Stock { .. })
    }
}
