//! Top-level game runtime: boots the collaborators, owns the frame loop and
//! the orientation gate, and turns scene events into persisted progress.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::audio::{AudioBackend, AudioManager, AudioSettings};
use crate::config::RuntimeConfig;
use crate::context::{GameContext, InputEvent, RuntimeEvent};
use crate::domain::Board;
use crate::error::RuntimeError;
use crate::layout::{LayoutEngine, ScreenSize};
use crate::platform::{with_timeout, Platform, PlatformError, PlayerIdentity};
use crate::progress::{self, Progress};
use crate::scene::{Scene, SceneError, SceneManager, TransitionOptions};
use crate::scenes::RetryScene;

/// Blocking UI shown over a paused game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    RotateDevice,
}

/// Everything the host feeds the runtime, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Tick(Duration),
    Resize { width: f64, height: f64 },
    Input(InputEvent),
    Shutdown,
}

pub struct GameRuntime {
    ctx: GameContext,
    scenes: SceneManager,
    layout: LayoutEngine,
    paused: bool,
    overlay: Overlay,
    frames: u64,
}

impl GameRuntime {
    /// Initialize the platform, load progress and activate `initial`.
    ///
    /// A platform that fails or does not answer within the configured timeout
    /// leaves the game running as a guest with default progress.
    pub async fn boot(
        config: RuntimeConfig,
        platform: Arc<dyn Platform>,
        audio_backend: Box<dyn AudioBackend>,
        viewport: ScreenSize,
        initial: Box<dyn Scene>,
    ) -> Result<Self, RuntimeError> {
        let limit = config.platform_timeout();
        let ready = match with_timeout("initialize", limit, platform.initialize()).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "platform unavailable; continuing as guest");
                false
            }
        };

        let (identity, stored, audio_settings) = if ready {
            let identity = PlayerIdentity::resolve(platform.as_ref(), limit).await;
            let loaded = with_timeout("getData", limit, async {
                Ok(progress::load(platform.as_ref()).await)
            })
            .await;
            match loaded {
                Ok((stored, audio)) => (identity, stored, audio),
                Err(err) => {
                    warn!(error = %err, "progress load timed out; using defaults");
                    (identity, Progress::default(), AudioSettings::default())
                }
            }
        } else {
            (
                PlayerIdentity::guest(),
                Progress::default(),
                AudioSettings::default(),
            )
        };
        info!(
            player_id = %identity.id,
            locale = %identity.locale,
            level = stored.current_level,
            platform = platform.is_platform_context(),
            "runtime booting"
        );

        let layout = LayoutEngine::new(config.design, viewport);
        let audio = AudioManager::with_settings(audio_backend, audio_settings);
        let mut ctx = GameContext::new(config, platform, audio);
        ctx.layout = *layout.current();
        ctx.progress = stored;
        ctx.identity = identity;

        let mut runtime = Self {
            ctx,
            scenes: SceneManager::new(),
            layout,
            paused: false,
            overlay: Overlay::None,
            frames: 0,
        };
        runtime.apply_orientation();
        runtime.activate(initial, TransitionOptions::default()).await?;
        runtime.settle().await?;
        Ok(runtime)
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn active_scene(&self) -> Option<&'static str> {
        self.scenes.active_name()
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.scenes.active_board()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One tick. Nothing advances while paused.
    pub async fn frame(&mut self, dt: Duration) -> Result<(), RuntimeError> {
        if self.paused {
            return Ok(());
        }
        self.frames += 1;
        self.scenes.update(dt, &mut self.ctx);
        self.settle().await
    }

    /// Recompute the layout for a new viewport and re-check orientation.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.ctx.layout = *self.layout.resize(width, height);
        debug!(width, height, scale = self.ctx.layout.fit.scale, "viewport resized");
        self.apply_orientation();
    }

    pub async fn input(&mut self, event: InputEvent) -> Result<(), RuntimeError> {
        if event == InputEvent::UserGesture {
            self.ctx.audio.unlock();
            return Ok(());
        }
        if self.paused {
            return Ok(());
        }
        self.scenes.handle_input(event, &mut self.ctx);
        self.settle().await
    }

    /// Serve host events until `Shutdown` or the sender goes away.
    pub async fn run(&mut self, mut events: mpsc::Receiver<HostEvent>) -> Result<(), RuntimeError> {
        while let Some(event) = events.recv().await {
            if !self.handle(event).await? {
                break;
            }
        }
        self.shutdown().await
    }

    /// Apply one host event. Returns `false` for `Shutdown`; the caller then
    /// stops feeding events and calls [`GameRuntime::shutdown`].
    pub async fn handle(&mut self, event: HostEvent) -> Result<bool, RuntimeError> {
        match event {
            HostEvent::Tick(dt) => self.frame(dt).await?,
            HostEvent::Resize { width, height } => self.resize(width, height),
            HostEvent::Input(input) => self.input(input).await?,
            HostEvent::Shutdown => return Ok(false),
        }
        Ok(true)
    }

    /// Tear down the active scene and flush progress. Unlike saves during
    /// play, a failed final save is returned to the host.
    pub async fn shutdown(&mut self) -> Result<(), RuntimeError> {
        self.scenes.shutdown(&mut self.ctx);
        self.try_save().await?;
        info!(frames = self.frames, "runtime stopped");
        Ok(())
    }

    fn apply_orientation(&mut self) {
        let layout = &self.ctx.layout;
        if layout.screen.is_empty() {
            return;
        }
        let supported = self.ctx.config.orientation.accepts(layout.orientation());
        match (supported, self.overlay) {
            (false, Overlay::None) => {
                info!(orientation = ?layout.orientation(), "unsupported orientation; pausing");
                self.paused = true;
                self.overlay = Overlay::RotateDevice;
            }
            (true, Overlay::RotateDevice) => {
                info!("orientation restored; resuming");
                self.paused = false;
                self.overlay = Overlay::None;
            }
            _ => {}
        }
    }

    /// Change scene, catching a construction failure once by showing a
    /// retry prompt in its place.
    async fn activate(
        &mut self,
        scene: Box<dyn Scene>,
        options: TransitionOptions,
    ) -> Result<(), RuntimeError> {
        match self.scenes.change_scene(&mut self.ctx, scene, options).await {
            Ok(()) => Ok(()),
            Err(err) => self.recover(err).await,
        }
    }

    async fn recover(&mut self, err: SceneError) -> Result<(), RuntimeError> {
        error!(error = %err, "scene construction failed");
        let retry = RetryScene::new(self.scenes.take_failed_rebuild(), err.to_string());
        self.scenes
            .change_scene(&mut self.ctx, Box::new(retry), TransitionOptions::default())
            .await
            .map_err(RuntimeError::from)
    }

    /// Post-update work: apply scene events, pending transitions and saves.
    async fn settle(&mut self) -> Result<(), RuntimeError> {
        self.apply_events().await;
        match self.scenes.flush_pending(&mut self.ctx).await {
            Ok(_) => {}
            Err(err) => self.recover(err).await?,
        }
        // Scenes created just now may have emitted events of their own.
        self.apply_events().await;
        if self.ctx.take_save_request() {
            self.save().await;
        }
        Ok(())
    }

    async fn apply_events(&mut self) {
        let events = std::mem::take(&mut self.ctx.events);
        for event in events {
            match event {
                RuntimeEvent::LevelCompleted {
                    level_id,
                    score,
                    coins,
                } => {
                    self.ctx.progress.record_completion(score, coins);
                    info!(
                        level_id = %level_id,
                        score,
                        coins,
                        next_level = self.ctx.progress.current_level,
                        "progress recorded"
                    );
                    self.report_score(score).await;
                    self.ctx.request_save();
                }
                RuntimeEvent::LevelFailed { level_id, score } => {
                    self.ctx.progress.record_failure(score);
                    info!(level_id = %level_id, score, "level failed");
                    self.ctx.request_save();
                }
            }
        }
    }

    async fn report_score(&self, score: u64) {
        let limit = self.ctx.config.platform_timeout();
        if let Err(err) = with_timeout("updateScore", limit, self.ctx.platform.update_score(score)).await {
            warn!(score, error = %err, "score not reported");
        }
    }

    async fn save(&self) {
        if let Err(err) = self.try_save().await {
            warn!(error = %err, "progress not saved");
        }
    }

    async fn try_save(&self) -> Result<(), PlatformError> {
        let limit = self.ctx.config.platform_timeout();
        let audio = self.ctx.audio.settings();
        with_timeout(
            "setData",
            limit,
            progress::save(self.ctx.platform.as_ref(), &self.ctx.progress, &audio),
        )
        .await
    }
}
