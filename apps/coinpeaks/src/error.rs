use thiserror::Error;

use crate::platform::PlatformError;
use crate::scene::SceneError;

/// Top-level failure surfaced to the host.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl RuntimeError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

