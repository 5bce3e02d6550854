//! Host platform capability: identity, key/value storage, loading and
//! score reporting. Hosts provide an implementation; [`LocalPlatform`] is
//! the built-in fallback.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

mod local;

pub use local::LocalPlatform;

pub const DEFAULT_LOCALE: &str = "en_US";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("platform unavailable: {detail}")]
    Unavailable { detail: String },
    #[error("platform call '{op}' timed out after {after_ms}ms")]
    Timeout { op: &'static str, after_ms: u64 },
    #[error("platform io error: {detail}")]
    Io { detail: String },
    #[error("platform data is not valid JSON: {detail}")]
    Serde { detail: String },
}

impl PlatformError {
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::Unavailable {
            detail: detail.into(),
        }
    }
}

impl From<std::io::Error> for PlatformError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            detail: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            detail: err.to_string(),
        }
    }
}

/// Who is playing. Falls back to a guest when the platform cannot say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub id: String,
    pub name: String,
    pub locale: String,
}

impl PlayerIdentity {
    pub fn guest() -> Self {
        Self {
            id: format!("guest-{}", Uuid::new_v4()),
            name: "Guest".to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.id.starts_with("guest-")
    }

    /// Read identity from an initialized platform, filling gaps from a guest.
    /// The name lookup is time-boxed like every other platform call.
    pub async fn resolve(platform: &dyn Platform, limit: Duration) -> Self {
        let guest = Self::guest();
        let name = match with_timeout("getPlayerName", limit, platform.player_name()).await {
            Ok(name) if !name.trim().is_empty() => name,
            Ok(_) => guest.name,
            Err(err) => {
                warn!(error = %err, "player name unavailable; using guest name");
                guest.name
            }
        };
        Self {
            id: platform.player_id().unwrap_or(guest.id),
            name,
            locale: platform.locale(),
        }
    }
}

#[async_trait]
pub trait Platform: Send + Sync {
    async fn initialize(&self) -> Result<(), PlatformError>;

    fn player_id(&self) -> Option<String>;

    async fn player_name(&self) -> Result<String, PlatformError>;

    fn locale(&self) -> String;

    /// Store one string value, overwriting any existing one.
    async fn set_data(&self, key: &str, value: &str) -> Result<(), PlatformError>;

    /// Fetch one value. `None` when the key was never stored.
    async fn get_data(&self, key: &str) -> Result<Option<String>, PlatformError>;

    /// Store several values, stopping at the first failure.
    async fn set_many(&self, data: &BTreeMap<String, String>) -> Result<(), PlatformError> {
        for (key, value) in data {
            self.set_data(key, value).await?;
        }
        Ok(())
    }

    /// Fetch several values. Missing keys are absent from the result.
    async fn get_many(&self, keys: &[&str]) -> Result<BTreeMap<String, String>, PlatformError> {
        let mut found = BTreeMap::new();
        for key in keys {
            if let Some(value) = self.get_data(key).await? {
                found.insert((*key).to_string(), value);
            }
        }
        Ok(found)
    }

    /// Report asset loading progress, 0 to 100.
    async fn set_loading_progress(&self, percent: u8) -> Result<(), PlatformError>;

    async fn start_game(&self) -> Result<(), PlatformError>;

    async fn update_score(&self, _score: u64) -> Result<(), PlatformError> {
        Ok(())
    }

    /// Whether the game runs inside a real host platform rather than the
    /// local fallback.
    fn is_platform_context(&self) -> bool;
}

/// Await a platform call, turning an overrun into [`PlatformError::Timeout`].
pub async fn with_timeout<T, F>(
    op: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, PlatformError>
where
    F: Future<Output = Result<T, PlatformError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(PlatformError::Timeout {
            op,
            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
