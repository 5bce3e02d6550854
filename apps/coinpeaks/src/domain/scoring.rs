//! Score keeping: streak-multiplied plays and the stock bonus at completion.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Points for a play at streak 1; multiplied by the current streak.
    pub base_points: u64,
    /// Bonus per card still in the stock when the tableau is cleared.
    pub stock_card_bonus: u64,
    /// Points per coin earned at completion.
    pub points_per_coin: u64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: 100,
            stock_card_bonus: 500,
            points_per_coin: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScoreDelta {
    points: u64,
    streak_before: u32,
}

/// Running score for one round. Keeps one delta per recorded move so undo
/// reverts score and streak exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreKeeper {
    rules: ScoringRules,
    score: u64,
    streak: u32,
    deltas: Vec<ScoreDelta>,
}

impl ScoreKeeper {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            rules,
            score: 0,
            streak: 0,
            deltas: Vec::new(),
        }
    }

    pub fn rules(&self) -> ScoringRules {
        self.rules
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// A tableau play: extends the streak and returns the points awarded.
    pub fn on_play(&mut self) -> u64 {
        let streak_before = self.streak;
        self.streak = self.streak.saturating_add(1);
        let points = self.rules.base_points.saturating_mul(u64::from(self.streak));
        self.score = self.score.saturating_add(points);
        self.deltas.push(ScoreDelta {
            points,
            streak_before,
        });
        points
    }

    /// A stock draw breaks the streak.
    pub fn on_draw(&mut self) {
        self.deltas.push(ScoreDelta {
            points: 0,
            streak_before: self.streak,
        });
        self.streak = 0;
    }

    pub fn on_undo(&mut self) {
        if let Some(delta) = self.deltas.pop() {
            self.score = self.score.saturating_sub(delta.points);
            self.streak = delta.streak_before;
        }
    }

    pub fn stock_bonus(&self, stock_left: usize) -> u64 {
        u64::try_from(stock_left)
            .unwrap_or(u64::MAX)
            .saturating_mul(self.rules.stock_card_bonus)
    }

    pub fn final_score(&self, stock_left: usize) -> u64 {
        self.score.saturating_add(self.stock_bonus(stock_left))
    }

    /// Coins earned for a completed round; at least one.
    pub fn coins_for(&self, final_score: u64) -> u64 {
        (final_score / self.rules.points_per_coin.max(1)).max(1)
    }
}
