use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{fade, GameplayScene, SCENE_LOADING};
use crate::context::GameContext;
use crate::domain::LevelCatalog;
use crate::platform::with_timeout;
use crate::scene::{Scene, SceneError};

/// Dealt levels used when no level directory is configured or it is empty.
pub const DEALT_LEVEL_COUNT: usize = 24;
pub const DEALT_LEVEL_SEED: u64 = 0x00C0_1A5E;

/// Loads the level catalog while reporting progress, then hands over to the
/// gameplay scene for the player's current level.
#[derive(Debug, Default)]
pub struct LoadingScene {
    percent: u8,
}

impl LoadingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    async fn report(&mut self, ctx: &GameContext, percent: u8) {
        self.percent = percent;
        let limit = ctx.config.platform_timeout();
        if let Err(err) = with_timeout(
            "setLoadingProgress",
            limit,
            ctx.platform.set_loading_progress(percent),
        )
        .await
        {
            warn!(percent, error = %err, "loading progress not reported");
        }
    }
}

async fn load_catalog(ctx: &GameContext) -> LevelCatalog {
    if let Some(dir) = &ctx.config.levels_dir {
        match LevelCatalog::load_dir(dir).await {
            Ok(catalog) if !catalog.is_empty() => return catalog,
            Ok(_) => warn!(dir = %dir.display(), "no usable levels; dealing instead"),
            Err(err) => warn!(dir = %dir.display(), error = %err, "level directory unreadable; dealing instead"),
        }
    }
    LevelCatalog::generated(DEALT_LEVEL_COUNT, DEALT_LEVEL_SEED)
}

#[async_trait]
impl Scene for LoadingScene {
    fn name(&self) -> &'static str {
        SCENE_LOADING
    }

    async fn create(&mut self, ctx: &mut GameContext) -> Result<(), SceneError> {
        self.report(ctx, 0).await;
        if ctx.levels.is_empty() {
            ctx.levels = load_catalog(ctx).await;
        }
        info!(levels = ctx.levels.len(), "level catalog ready");
        self.report(ctx, 100).await;

        let limit = ctx.config.platform_timeout();
        if let Err(err) = with_timeout("startGame", limit, ctx.platform.start_game()).await {
            warn!(error = %err, "platform did not acknowledge game start");
        }

        let next = GameplayScene::new(ctx.progress.current_level);
        ctx.scenes.request(Box::new(next), fade());
        Ok(())
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut GameContext) {}

    fn rebuild(&self) -> Option<Box<dyn Scene>> {
        Some(Box::new(LoadingScene::new()))
    }
}
