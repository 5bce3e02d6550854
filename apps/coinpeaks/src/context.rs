//! Shared services handed to the live scene by `&mut` borrow.

use std::sync::Arc;

use crate::audio::AudioManager;
use crate::config::RuntimeConfig;
use crate::domain::{LevelCatalog, RoundRules};
use crate::layout::{compute_layout, LayoutState};
use crate::platform::{Platform, PlayerIdentity};
use crate::progress::Progress;
use crate::scene::SceneRequests;

/// Host input, already serialized onto the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer press in physical viewport pixels.
    Pointer { x: f64, y: f64 },
    DrawStock,
    Undo,
    Confirm,
    ToggleMusic,
    ToggleSfx,
    /// First trusted user gesture; unlocks audio output.
    UserGesture,
}

/// Outcomes scenes report upward for the runtime to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    LevelCompleted {
        level_id: String,
        score: u64,
        coins: u64,
    },
    LevelFailed {
        level_id: String,
        score: u64,
    },
}

pub struct GameContext {
    pub layout: LayoutState,
    pub audio: AudioManager,
    pub platform: Arc<dyn Platform>,
    pub progress: Progress,
    pub identity: PlayerIdentity,
    pub levels: LevelCatalog,
    pub config: RuntimeConfig,
    pub scenes: SceneRequests,
    pub events: Vec<RuntimeEvent>,
    save_requested: bool,
}

impl GameContext {
    /// Context with default progress, a guest identity, an empty catalog and
    /// a layout for a viewport the size of the design canvas.
    pub fn new(config: RuntimeConfig, platform: Arc<dyn Platform>, audio: AudioManager) -> Self {
        let layout = compute_layout(config.design, config.design.width, config.design.height);
        Self {
            layout,
            audio,
            platform,
            progress: Progress::default(),
            identity: PlayerIdentity::guest(),
            levels: LevelCatalog::default(),
            config,
            scenes: SceneRequests::default(),
            events: Vec::new(),
            save_requested: false,
        }
    }

    pub fn round_rules(&self) -> RoundRules {
        self.config.round_rules()
    }

    pub fn emit(&mut self, event: RuntimeEvent) {
        self.events.push(event);
    }

    /// Ask the runtime to persist progress and audio settings after this frame.
    pub fn request_save(&mut self) {
        self.save_requested = true;
    }

    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }
}
