//! The game's built-in scenes.

use std::time::Duration;

use crate::context::{GameContext, InputEvent};
use crate::scene::TransitionOptions;

mod gameplay;
mod level_complete;
mod loading;
mod retry;

pub use gameplay::{Feedback, GameplayScene};
pub use level_complete::{LevelCompleteScene, LevelOutcome};
pub use loading::LoadingScene;
pub use retry::RetryScene;

pub const SCENE_LOADING: &str = "loading";
pub const SCENE_GAMEPLAY: &str = "gameplay";
pub const SCENE_LEVEL_COMPLETE: &str = "level_complete";
pub const SCENE_RETRY: &str = "retry";

pub(crate) fn fade() -> TransitionOptions {
    TransitionOptions::fade(Duration::from_millis(250))
}

/// Apply the audio toggles every interactive scene shares. Returns whether
/// the event was consumed.
pub(crate) fn handle_audio_toggle(event: InputEvent, ctx: &mut GameContext) -> bool {
    let settings = ctx.audio.settings();
    match event {
        InputEvent::ToggleMusic => ctx.audio.set_music_enabled(!settings.music_enabled),
        InputEvent::ToggleSfx => ctx.audio.set_sfx_enabled(!settings.sfx_enabled),
        _ => return false,
    }
    ctx.request_save();
    true
}
