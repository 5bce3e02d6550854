use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{fade, LoadingScene, SCENE_RETRY};
use crate::context::{GameContext, InputEvent};
use crate::scene::{Scene, SceneError};

/// Shown in place of a scene whose construction failed. `Confirm` requests a
/// fresh instance of that scene, or a restart from loading when the failed
/// scene offered none.
pub struct RetryScene {
    target: Option<Box<dyn Scene>>,
    reason: String,
}

impl RetryScene {
    pub fn new(target: Option<Box<dyn Scene>>, reason: impl Into<String>) -> Self {
        Self {
            target,
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn target_name(&self) -> Option<&'static str> {
        self.target.as_ref().map(|s| s.name())
    }
}

#[async_trait]
impl Scene for RetryScene {
    fn name(&self) -> &'static str {
        SCENE_RETRY
    }

    async fn create(&mut self, _ctx: &mut GameContext) -> Result<(), SceneError> {
        info!(retry_scene = ?self.target_name(), reason = %self.reason, "offering retry");
        Ok(())
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut GameContext) {}

    fn handle_input(&mut self, event: InputEvent, ctx: &mut GameContext) {
        if event != InputEvent::Confirm || ctx.scenes.has_pending() {
            return;
        }
        let target = self
            .target
            .take()
            .unwrap_or_else(|| Box::new(LoadingScene::new()) as Box<dyn Scene>);
        ctx.scenes.request(target, fade());
    }

    fn destroy(&mut self) {
        self.target = None;
    }
}
