use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{fade, handle_audio_toggle, GameplayScene, SCENE_LEVEL_COMPLETE};
use crate::context::{GameContext, InputEvent};
use crate::domain::Completion;
use crate::scene::{Scene, SceneError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Cleared(Completion),
    Failed { score: u64 },
}

/// Result screen. `Confirm` moves on to the player's current level, which is
/// the next one after a clear and the same one after a failure.
#[derive(Debug)]
pub struct LevelCompleteScene {
    level_id: String,
    outcome: LevelOutcome,
    high_score: u64,
}

impl LevelCompleteScene {
    pub fn new(level_id: impl Into<String>, outcome: LevelOutcome) -> Self {
        Self {
            level_id: level_id.into(),
            outcome,
            high_score: 0,
        }
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }
}

#[async_trait]
impl Scene for LevelCompleteScene {
    fn name(&self) -> &'static str {
        SCENE_LEVEL_COMPLETE
    }

    async fn create(&mut self, ctx: &mut GameContext) -> Result<(), SceneError> {
        self.high_score = ctx.progress.high_score;
        info!(
            level_id = %self.level_id,
            outcome = ?self.outcome,
            high_score = self.high_score,
            coins = ctx.progress.wallet.coins(),
            "showing level result"
        );
        Ok(())
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut GameContext) {}

    fn handle_input(&mut self, event: InputEvent, ctx: &mut GameContext) {
        if handle_audio_toggle(event, ctx) {
            return;
        }
        if event == InputEvent::Confirm && !ctx.scenes.has_pending() {
            let next = GameplayScene::new(ctx.progress.current_level);
            ctx.scenes.request(Box::new(next), fade());
        }
    }
}
