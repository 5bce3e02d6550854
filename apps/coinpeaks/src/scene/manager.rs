use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::stage::{RootId, Stage};
use super::{Scene, SceneError, TransitionOptions};
use crate::context::{GameContext, InputEvent};
use crate::domain::Board;

struct ActiveScene {
    scene: Box<dyn Scene>,
    root: RootId,
}

/// Owns the active scene and runs transitions one at a time.
#[derive(Default)]
pub struct SceneManager {
    active: Option<ActiveScene>,
    stage: Stage,
    transitions: u64,
    failed_rebuild: Option<Box<dyn Scene>>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.scene.name())
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.active.as_ref().and_then(|a| a.scene.board())
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Completed scene activations.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Replace the active scene with `scene`, then keep applying whatever is
    /// left in the pending slot until it is empty. Requests made while this
    /// runs coalesce: only the latest one is applied.
    ///
    /// If a `create` fails the failed scene is detached and destroyed, no
    /// scene is active, the pending slot is cleared and the error returned.
    pub async fn change_scene(
        &mut self,
        ctx: &mut GameContext,
        scene: Box<dyn Scene>,
        options: TransitionOptions,
    ) -> Result<(), SceneError> {
        ctx.scenes.set_transitioning(true);
        let result = self.drain(ctx, scene, options).await;
        ctx.scenes.set_transitioning(false);
        if result.is_err() {
            ctx.scenes.clear();
        }
        result
    }

    /// Apply a request left in the slot since the last frame, if any.
    pub async fn flush_pending(&mut self, ctx: &mut GameContext) -> Result<bool, SceneError> {
        match ctx.scenes.take() {
            Some(request) => self
                .change_scene(ctx, request.scene, request.options)
                .await
                .map(|()| true),
            None => Ok(false),
        }
    }

    async fn drain(
        &mut self,
        ctx: &mut GameContext,
        scene: Box<dyn Scene>,
        options: TransitionOptions,
    ) -> Result<(), SceneError> {
        let mut next = Some((scene, options));
        while let Some((scene, options)) = next.take() {
            self.swap(ctx, scene, options).await?;
            next = ctx.scenes.take().map(|r| (r.scene, r.options));
        }
        Ok(())
    }

    async fn swap(
        &mut self,
        ctx: &mut GameContext,
        mut scene: Box<dyn Scene>,
        options: TransitionOptions,
    ) -> Result<(), SceneError> {
        self.teardown(ctx);

        let name = scene.name();
        let root = self.stage.attach(name, options)?;
        let started = Instant::now();
        if let Err(err) = scene.create(ctx).await {
            self.stage.detach(root);
            self.failed_rebuild = scene.rebuild();
            scene.destroy();
            return Err(err);
        }
        self.active = Some(ActiveScene { scene, root });
        self.transitions += 1;
        info!(scene = name, elapsed_ms = started.elapsed().as_millis() as u64, "scene active");
        Ok(())
    }

    fn teardown(&mut self, ctx: &mut GameContext) {
        if let Some(ActiveScene { mut scene, root }) = self.active.take() {
            debug!(scene = scene.name(), "scene exit");
            scene.exit(ctx);
            self.stage.detach(root);
            scene.destroy();
        }
    }

    /// Fresh instance of the scene whose `create` last failed, if it offers one.
    pub fn take_failed_rebuild(&mut self) -> Option<Box<dyn Scene>> {
        self.failed_rebuild.take()
    }

    pub fn update(&mut self, dt: Duration, ctx: &mut GameContext) {
        if ctx.scenes.is_transitioning() {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.scene.update(dt, ctx);
        }
    }

    pub fn handle_input(&mut self, event: InputEvent, ctx: &mut GameContext) {
        if ctx.scenes.is_transitioning() {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.scene.handle_input(event, ctx);
        }
    }

    /// Exit and destroy the active scene, leaving nothing attached.
    pub fn shutdown(&mut self, ctx: &mut GameContext) {
        self.teardown(ctx);
        ctx.scenes.clear();
    }
}
