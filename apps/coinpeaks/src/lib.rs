#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod audio;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod layout;
pub mod platform;
pub mod progress;
pub mod runtime;
pub mod scene;
pub mod scenes;
pub mod telemetry;

// Re-exports for public API
pub use audio::{AudioBackend, AudioManager, AudioSettings, SilentBackend};
pub use config::RuntimeConfig;
pub use context::{GameContext, InputEvent, RuntimeEvent};
pub use error::RuntimeError;
pub use layout::{compute_layout, to_design_space, LayoutEngine, LayoutState};
pub use platform::{LocalPlatform, Platform, PlatformError, PlayerIdentity};
pub use progress::Progress;
pub use runtime::{GameRuntime, HostEvent, Overlay};
pub use scene::{Scene, SceneError, SceneManager, SceneRequests, TransitionOptions};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    coinpeaks_test_support::logging::init();
}
