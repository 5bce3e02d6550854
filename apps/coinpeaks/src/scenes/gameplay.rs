//! The playing field: routes input into the round and reports the outcome.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{fade, handle_audio_toggle, LevelCompleteScene, LevelOutcome, SCENE_GAMEPLAY};
use crate::audio::{
    MusicOptions, SfxOptions, MUSIC_MAIN, SFX_CARD_FLIP, SFX_CARD_PLAY, SFX_DRAW,
    SFX_LEVEL_COMPLETE, SFX_REJECT, SFX_UNDO,
};
use crate::context::{GameContext, InputEvent, RuntimeEvent};
use crate::domain::{Board, CardId, HintState, MoveRejected, Round, RoundStatus, UndoRejected};
use crate::layout::to_design_space;
use crate::scene::{Scene, SceneError};

/// How long a feedback signal stays visible.
pub const FEEDBACK_TTL: Duration = Duration::from_millis(400);

/// Last visible reaction to player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Played { card: CardId, points: u64 },
    Drew(CardId),
    /// Shake the card (or the stock when `card` is `None`).
    Rejected {
        card: Option<CardId>,
        reason: MoveRejected,
    },
    Undone,
    UndoRefused(UndoRejected),
}

pub struct GameplayScene {
    level_index: u32,
    round: Option<Round>,
    hint: HintState,
    feedback: Option<(Feedback, Duration)>,
    finished: bool,
}

impl GameplayScene {
    pub fn new(level_index: u32) -> Self {
        Self {
            level_index,
            round: None,
            hint: HintState::None,
            feedback: None,
            finished: false,
        }
    }

    pub fn level_index(&self) -> u32 {
        self.level_index
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn hint(&self) -> HintState {
        self.hint
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback.map(|(f, _)| f)
    }

    fn show(&mut self, feedback: Feedback) {
        self.feedback = Some((feedback, Duration::ZERO));
    }

    fn on_pointer(&mut self, x: f64, y: f64, ctx: &mut GameContext) {
        let Some(point) = to_design_space(x, y, &ctx.layout) else {
            return;
        };
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(card) = round.board().hit_test(point) else {
            return;
        };
        match round.play(card) {
            Ok(outcome) => {
                ctx.audio.play_sfx(SFX_CARD_PLAY, SfxOptions::default());
                if outcome.flipped > 0 {
                    ctx.audio.play_sfx(SFX_CARD_FLIP, SfxOptions::default());
                }
                self.show(Feedback::Played {
                    card,
                    points: outcome.points,
                });
            }
            Err(reason) => self.reject(Some(card), reason, ctx),
        }
    }

    fn on_draw(&mut self, ctx: &mut GameContext) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        match round.draw() {
            Ok(card) => {
                ctx.audio.play_sfx(SFX_DRAW, SfxOptions::default());
                self.show(Feedback::Drew(card));
            }
            Err(reason) => self.reject(None, reason, ctx),
        }
    }

    fn on_undo(&mut self, ctx: &mut GameContext) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        match round.undo(&mut ctx.progress.wallet) {
            Ok(_) => {
                ctx.audio.play_sfx(SFX_UNDO, SfxOptions::default());
                self.show(Feedback::Undone);
                ctx.request_save();
            }
            Err(reason) => {
                debug!(error = %reason, "undo refused");
                ctx.audio.play_sfx(SFX_REJECT, SfxOptions::default());
                self.show(Feedback::UndoRefused(reason));
            }
        }
    }

    fn reject(&mut self, card: Option<CardId>, reason: MoveRejected, ctx: &mut GameContext) {
        debug!(card = ?card, error = %reason, "move rejected");
        ctx.audio.play_sfx(SFX_REJECT, SfxOptions::default());
        self.show(Feedback::Rejected { card, reason });
    }

    /// Re-derive the hint and finish the level when it is won or lost.
    fn refresh(&mut self, ctx: &mut GameContext) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        self.hint = round.hint();
        if self.finished {
            return;
        }

        if let Some(completion) = round.completion() {
            self.finished = true;
            info!(
                level_id = round.level_id(),
                score = completion.score,
                coins = completion.coins,
                "level cleared"
            );
            ctx.audio.play_sfx(SFX_LEVEL_COMPLETE, SfxOptions::default());
            ctx.emit(RuntimeEvent::LevelCompleted {
                level_id: round.level_id().to_string(),
                score: completion.score,
                coins: completion.coins,
            });
            let next = LevelCompleteScene::new(round.level_id(), LevelOutcome::Cleared(completion));
            ctx.scenes.request(Box::new(next), fade());
            return;
        }

        // Out of moves is final only once undo cannot help.
        let undo_possible = !round.history().is_empty()
            && ctx.progress.wallet.can_afford(round.history().undo_cost());
        if round.status() == RoundStatus::OutOfMoves && !undo_possible {
            self.fail(ctx);
        }
    }

    fn fail(&mut self, ctx: &mut GameContext) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        self.finished = true;
        info!(level_id = round.level_id(), score = round.score(), "level failed");
        ctx.emit(RuntimeEvent::LevelFailed {
            level_id: round.level_id().to_string(),
            score: round.score(),
        });
        let next = LevelCompleteScene::new(
            round.level_id(),
            LevelOutcome::Failed {
                score: round.score(),
            },
        );
        ctx.scenes.request(Box::new(next), fade());
    }
}

#[async_trait]
impl Scene for GameplayScene {
    fn name(&self) -> &'static str {
        SCENE_GAMEPLAY
    }

    async fn create(&mut self, ctx: &mut GameContext) -> Result<(), SceneError> {
        let level = ctx
            .levels
            .level_for(self.level_index)
            .ok_or_else(|| SceneError::Asset {
                scene: SCENE_GAMEPLAY,
                asset: format!("level #{}", self.level_index),
            })?;
        let round = level.to_round(ctx.round_rules());
        info!(
            level_id = round.level_id(),
            index = self.level_index,
            cards = round.board().total_cards(),
            "round started"
        );
        self.hint = round.hint();
        self.round = Some(round);
        self.feedback = None;
        self.finished = false;
        ctx.audio.play_music(MUSIC_MAIN, MusicOptions::default());
        Ok(())
    }

    fn update(&mut self, dt: Duration, _ctx: &mut GameContext) {
        if let Some((_, age)) = self.feedback.as_mut() {
            *age += dt;
            if *age >= FEEDBACK_TTL {
                self.feedback = None;
            }
        }
    }

    fn handle_input(&mut self, event: InputEvent, ctx: &mut GameContext) {
        if self.finished || handle_audio_toggle(event, ctx) {
            return;
        }
        match event {
            InputEvent::Pointer { x, y } => self.on_pointer(x, y, ctx),
            InputEvent::DrawStock => self.on_draw(ctx),
            InputEvent::Undo => self.on_undo(ctx),
            // Giving up is only offered once no move is left.
            InputEvent::Confirm if self.hint == HintState::NoMoves => {
                self.fail(ctx);
                return;
            }
            InputEvent::Confirm | InputEvent::ToggleMusic | InputEvent::ToggleSfx => return,
            InputEvent::UserGesture => return,
        }
        self.refresh(ctx);
    }

    fn destroy(&mut self) {
        self.round = None;
        self.feedback = None;
    }

    fn rebuild(&self) -> Option<Box<dyn Scene>> {
        Some(Box::new(GameplayScene::new(self.level_index)))
    }

    fn board(&self) -> Option<&Board> {
        self.round.as_ref().map(Round::board)
    }
}
