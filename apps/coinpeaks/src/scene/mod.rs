//! Scene state machine: one active scene, one pending transition slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::context::{GameContext, InputEvent};
use crate::domain::{Board, LevelError};

mod manager;
mod stage;

#[cfg(test)]
mod tests_manager;

pub use manager::SceneManager;
pub use stage::{RootId, Stage, StageError, StageRoot};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("scene '{scene}' failed to build: {detail}")]
    Create { scene: &'static str, detail: String },
    #[error("scene '{scene}' is missing asset '{asset}'")]
    Asset { scene: &'static str, asset: String },
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Stage(#[from] StageError),
}

impl SceneError {
    pub fn create(scene: &'static str, detail: impl Into<String>) -> Self {
        Self::Create {
            scene,
            detail: detail.into(),
        }
    }
}

/// Visual transition hint passed to the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionOptions {
    pub fade: Option<Duration>,
}

impl TransitionOptions {
    pub fn fade(duration: Duration) -> Self {
        Self {
            fade: Some(duration),
        }
    }
}

/// A screen of the game. Lifecycle per instance: `create` once, then any
/// number of `update`/`handle_input`, then `exit` and `destroy` once. An
/// instance whose `create` failed is destroyed without `exit`.
#[async_trait]
pub trait Scene: Send {
    fn name(&self) -> &'static str;

    /// Build the scene. May suspend on platform or asset work.
    async fn create(&mut self, ctx: &mut GameContext) -> Result<(), SceneError>;

    fn update(&mut self, dt: Duration, ctx: &mut GameContext);

    fn handle_input(&mut self, _event: InputEvent, _ctx: &mut GameContext) {}

    fn exit(&mut self, _ctx: &mut GameContext) {}

    fn destroy(&mut self) {}

    /// A new, not yet created instance equivalent to this one. Offered as the
    /// retry target when `create` fails.
    fn rebuild(&self) -> Option<Box<dyn Scene>> {
        None
    }

    /// The board in play, for scenes that have one.
    fn board(&self) -> Option<&Board> {
        None
    }
}

pub struct SceneRequest {
    pub scene: Box<dyn Scene>,
    pub options: TransitionOptions,
}

#[derive(Default)]
struct RequestSlot {
    pending: Mutex<Option<SceneRequest>>,
    transitioning: AtomicBool,
}

/// Cloneable handle for requesting scene changes. Holds at most one pending
/// request; a newer request replaces an older one that has not started.
#[derive(Clone, Default)]
pub struct SceneRequests {
    slot: Arc<RequestSlot>,
}

impl SceneRequests {
    pub fn request(&self, scene: Box<dyn Scene>, options: TransitionOptions) {
        let incoming = scene.name();
        let replaced = self
            .slot
            .pending
            .lock()
            .replace(SceneRequest { scene, options });
        if let Some(old) = replaced {
            debug!(dropped = old.scene.name(), scene = incoming, "pending scene superseded");
        }
    }

    pub fn take(&self) -> Option<SceneRequest> {
        self.slot.pending.lock().take()
    }

    pub fn pending_name(&self) -> Option<&'static str> {
        self.slot.pending.lock().as_ref().map(|r| r.scene.name())
    }

    pub fn has_pending(&self) -> bool {
        self.slot.pending.lock().is_some()
    }

    pub fn clear(&self) {
        self.slot.pending.lock().take();
    }

    pub fn is_transitioning(&self) -> bool {
        self.slot.transitioning.load(Ordering::Acquire)
    }

    fn set_transitioning(&self, value: bool) {
        self.slot.transitioning.store(value, Ordering::Release);
    }
}
