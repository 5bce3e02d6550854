//! Fallback platform for running outside a host: in-memory storage with an
//! optional JSON file behind it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Platform, PlatformError, DEFAULT_LOCALE};

#[derive(Debug)]
pub struct LocalPlatform {
    player_id: String,
    locale: String,
    data: Mutex<BTreeMap<String, String>>,
    save_path: Option<PathBuf>,
    loading_progress: AtomicU8,
    started: AtomicBool,
}

impl Default for LocalPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalPlatform {
    /// Memory-only storage.
    pub fn new() -> Self {
        Self {
            player_id: format!("guest-{}", Uuid::new_v4()),
            locale: locale_from_env(),
            data: Mutex::new(BTreeMap::new()),
            save_path: None,
            loading_progress: AtomicU8::new(0),
            started: AtomicBool::new(false),
        }
    }

    /// Storage backed by a JSON object file. A missing file starts empty; an
    /// unreadable or corrupt one is logged and also starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match read_store(&path).await {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "save file unusable; starting empty");
                BTreeMap::new()
            }
        };
        Self {
            data: Mutex::new(data),
            save_path: Some(path),
            ..Self::new()
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    pub fn loading_progress(&self) -> u8 {
        self.loading_progress.load(Ordering::Relaxed)
    }

    pub fn game_started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.data.lock().clone()
    }

    async fn persist(&self, snapshot: &BTreeMap<String, String>) -> Result<(), PlatformError> {
        if let Some(path) = &self.save_path {
            let json = serde_json::to_string_pretty(snapshot)?;
            tokio::fs::write(path, json).await?;
        }
        Ok(())
    }
}

async fn read_store(path: &Path) -> Result<BTreeMap<String, String>, PlatformError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(err) => Err(err.into()),
    }
}

/// `LANG=de_DE.UTF-8` yields `de_DE`.
fn locale_from_env() -> String {
    std::env::var("LANG")
        .ok()
        .and_then(|lang| {
            let tag = lang.split('.').next().unwrap_or_default().trim().to_string();
            (!tag.is_empty() && tag != "C" && tag != "POSIX").then_some(tag)
        })
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

#[async_trait]
impl Platform for LocalPlatform {
    async fn initialize(&self) -> Result<(), PlatformError> {
        debug!(player_id = %self.player_id, "local platform ready");
        Ok(())
    }

    fn player_id(&self) -> Option<String> {
        Some(self.player_id.clone())
    }

    async fn player_name(&self) -> Result<String, PlatformError> {
        Ok("Guest".to_string())
    }

    fn locale(&self) -> String {
        self.locale.clone()
    }

    async fn set_data(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        let snapshot = {
            let mut store = self.data.lock();
            store.insert(key.to_string(), value.to_string());
            store.clone()
        };
        self.persist(&snapshot).await
    }

    async fn get_data(&self, key: &str) -> Result<Option<String>, PlatformError> {
        Ok(self.data.lock().get(key).cloned())
    }

    /// One file write for the whole batch.
    async fn set_many(&self, data: &BTreeMap<String, String>) -> Result<(), PlatformError> {
        let snapshot = {
            let mut store = self.data.lock();
            store.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
            store.clone()
        };
        self.persist(&snapshot).await
    }

    async fn get_many(&self, keys: &[&str]) -> Result<BTreeMap<String, String>, PlatformError> {
        let store = self.data.lock();
        Ok(keys
            .iter()
            .filter_map(|k| store.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set_loading_progress(&self, percent: u8) -> Result<(), PlatformError> {
        self.loading_progress
            .store(percent.min(100), Ordering::Relaxed);
        Ok(())
    }

    async fn start_game(&self) -> Result<(), PlatformError> {
        self.started.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn is_platform_context(&self) -> bool {
        false
    }
}
