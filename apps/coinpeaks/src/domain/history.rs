//! Move history and the coin-gated undo.

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::errors::UndoRejected;
use super::moves::MoveRecord;

/// Coin balance. Undo is paid for from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    coins: u64,
}

impl Wallet {
    pub fn new(coins: u64) -> Self {
        Self { coins }
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.coins >= cost
    }

    pub fn charge(&mut self, cost: u64) -> Result<(), UndoRejected> {
        if !self.can_afford(cost) {
            return Err(UndoRejected::InsufficientCoins {
                cost,
                available: self.coins,
            });
        }
        self.coins -= cost;
        Ok(())
    }

    pub fn earn(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }
}

/// Append-only stack of applied moves.
///
/// No cap: every move net-removes a card from play, so the stack is bounded
/// by the level size.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
    undo_cost: u64,
}

impl MoveHistory {
    pub fn new(undo_cost: u64) -> Self {
        Self {
            records: Vec::new(),
            undo_cost,
        }
    }

    pub fn undo_cost(&self) -> u64 {
        self.undo_cost
    }

    pub fn record_move(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    /// Pop and reverse the most recent move, charging `undo_cost` coins.
    ///
    /// Refused with no state change (no record consumed, no coins taken) when
    /// the history is empty or the wallet cannot cover the cost.
    pub fn undo(
        &mut self,
        board: &mut Board,
        wallet: &mut Wallet,
    ) -> Result<MoveRecord, UndoRejected> {
        if self.records.is_empty() {
            return Err(UndoRejected::NothingToUndo);
        }
        wallet.charge(self.undo_cost)?;
        let record = self.records.pop().ok_or(UndoRejected::NothingToUndo)?;
        board.revert(&record);
        Ok(record)
    }
}
