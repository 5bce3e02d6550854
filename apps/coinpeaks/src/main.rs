//! Headless driver: boots the runtime against the local platform and plays
//! it with a greedy bot through the host event channel.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use coinpeaks::layout::{DesignPoint, ScreenSize};
use coinpeaks::scenes::{LoadingScene, SCENE_GAMEPLAY, SCENE_LEVEL_COMPLETE, SCENE_RETRY};
use coinpeaks::telemetry;
use coinpeaks::{GameRuntime, HostEvent, InputEvent, LocalPlatform, RuntimeConfig, SilentBackend};
use tokio::sync::mpsc;
use tracing::info;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "coinpeaks")]
#[command(about = "Play Coin Peaks headlessly with a greedy bot")]
struct Args {
    /// Directory of JSON level files (overrides COINPEAKS_LEVELS_DIR)
    #[arg(long)]
    levels_dir: Option<PathBuf>,

    /// Save file for progress (overrides COINPEAKS_SAVE_PATH)
    #[arg(long)]
    save: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value = "2000")]
    frames: u64,

    /// Viewport width in pixels
    #[arg(long, default_value = "1280")]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value = "720")]
    height: f64,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,
}

/// Play the first playable card, else draw, else give up; confirm any
/// result or retry prompt.
fn next_move(runtime: &GameRuntime) -> Option<InputEvent> {
    match runtime.active_scene()? {
        SCENE_GAMEPLAY => {
            let board = runtime.active_board()?;
            if let Some(card) = board.playable_cards().first() {
                let placement = board.card(*card)?.placement;
                let screen = runtime
                    .context()
                    .layout
                    .fit
                    .to_screen(DesignPoint::new(placement.x, placement.y));
                Some(InputEvent::Pointer {
                    x: screen.x,
                    y: screen.y,
                })
            } else if !board.stock().is_empty() {
                Some(InputEvent::DrawStock)
            } else {
                Some(InputEvent::Confirm)
            }
        }
        SCENE_LEVEL_COMPLETE | SCENE_RETRY => Some(InputEvent::Confirm),
        _ => None,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    telemetry::init_tracing(args.json);

    let mut config = RuntimeConfig::from_env()?;
    if let Some(dir) = args.levels_dir {
        config = config.with_levels_dir(dir);
    }
    if let Some(save) = args.save {
        config = config.with_save_path(save);
    }

    let platform = Arc::new(match &config.save_path {
        Some(path) => LocalPlatform::open(path).await,
        None => LocalPlatform::new(),
    });
    let mut runtime = GameRuntime::boot(
        config,
        platform,
        Box::new(SilentBackend),
        ScreenSize::new(args.width, args.height),
        Box::new(LoadingScene::new()),
    )
    .await?;

    let (tx, mut rx) = mpsc::channel(16);
    tx.send(HostEvent::Input(InputEvent::UserGesture)).await?;
    for _ in 0..args.frames {
        tx.send(HostEvent::Tick(FRAME)).await?;
        if let Some(event) = next_move(&runtime) {
            tx.send(HostEvent::Input(event)).await?;
        }
        while let Ok(event) = rx.try_recv() {
            runtime.handle(event).await?;
        }
    }
    tx.send(HostEvent::Shutdown).await?;
    drop(tx);
    runtime.run(rx).await?;

    let progress = runtime.context().progress;
    info!(
        frames = runtime.frames(),
        level = progress.current_level,
        high_score = progress.high_score,
        last_score = progress.last_score,
        coins = progress.wallet.coins(),
        "session finished"
    );
    println!(
        "level {} | high score {} | last score {} | coins {}",
        progress.current_level + 1,
        progress.high_score,
        progress.last_score,
        progress.wallet.coins()
    );
    Ok(())
}
