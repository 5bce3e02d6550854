//! Player progress and its string-encoded persistence through the platform.
//!
//! Every stored value is a string. Loading never fails: a missing, garbled
//! or out-of-range value falls back to its default, and a platform failure
//! falls back to all defaults.

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::audio::AudioSettings;
use crate::domain::Wallet;
use crate::platform::{Platform, PlatformError};

pub const KEY_HIGH_SCORE: &str = "highScore";
pub const KEY_LAST_SCORE: &str = "lastScore";
pub const KEY_MUSIC_ENABLED: &str = "musicEnabled";
pub const KEY_SFX_ENABLED: &str = "sfxEnabled";
pub const KEY_MUSIC_VOLUME: &str = "musicVolume";
pub const KEY_SFX_VOLUME: &str = "sfxVolume";
pub const KEY_CURRENT_LEVEL: &str = "currentLevel";
pub const KEY_COINS: &str = "coins";

pub const ALL_KEYS: [&str; 8] = [
    KEY_HIGH_SCORE,
    KEY_LAST_SCORE,
    KEY_MUSIC_ENABLED,
    KEY_SFX_ENABLED,
    KEY_MUSIC_VOLUME,
    KEY_SFX_VOLUME,
    KEY_CURRENT_LEVEL,
    KEY_COINS,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub last_score: u64,
    pub high_score: u64,
    /// Zero-based index into the level catalog.
    pub current_level: u32,
    pub wallet: Wallet,
}

impl Progress {
    /// A level was cleared with `score` points and `coins` earned.
    pub fn record_completion(&mut self, score: u64, coins: u64) {
        self.last_score = score;
        self.high_score = self.high_score.max(score);
        self.current_level = self.current_level.saturating_add(1);
        self.wallet.earn(coins);
    }

    pub fn record_failure(&mut self, score: u64) {
        self.last_score = score;
        self.high_score = self.high_score.max(score);
    }
}

fn parse_or<T: FromStr>(data: &BTreeMap<String, String>, key: &str, default: T) -> T {
    data.get(key)
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_volume(data: &BTreeMap<String, String>, key: &str, default: f64) -> f64 {
    let volume = parse_or(data, key, default);
    if volume.is_finite() && (0.0..=1.0).contains(&volume) {
        volume
    } else {
        default
    }
}

pub fn decode(data: &BTreeMap<String, String>) -> (Progress, AudioSettings) {
    let audio_defaults = AudioSettings::default();
    let progress = Progress {
        last_score: parse_or(data, KEY_LAST_SCORE, 0),
        high_score: parse_or(data, KEY_HIGH_SCORE, 0),
        current_level: parse_or(data, KEY_CURRENT_LEVEL, 0),
        wallet: Wallet::new(parse_or(data, KEY_COINS, 0)),
    };
    let audio = AudioSettings {
        music_enabled: parse_or(data, KEY_MUSIC_ENABLED, audio_defaults.music_enabled),
        sfx_enabled: parse_or(data, KEY_SFX_ENABLED, audio_defaults.sfx_enabled),
        music_volume: parse_volume(data, KEY_MUSIC_VOLUME, audio_defaults.music_volume),
        sfx_volume: parse_volume(data, KEY_SFX_VOLUME, audio_defaults.sfx_volume),
    };
    (progress, audio)
}

pub fn encode(progress: &Progress, audio: &AudioSettings) -> BTreeMap<String, String> {
    [
        (KEY_HIGH_SCORE, progress.high_score.to_string()),
        (KEY_LAST_SCORE, progress.last_score.to_string()),
        (KEY_CURRENT_LEVEL, progress.current_level.to_string()),
        (KEY_COINS, progress.wallet.coins().to_string()),
        (KEY_MUSIC_ENABLED, audio.music_enabled.to_string()),
        (KEY_SFX_ENABLED, audio.sfx_enabled.to_string()),
        (KEY_MUSIC_VOLUME, audio.music_volume.to_string()),
        (KEY_SFX_VOLUME, audio.sfx_volume.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Load progress and audio settings, degrading to defaults on failure.
pub async fn load(platform: &dyn Platform) -> (Progress, AudioSettings) {
    match platform.get_many(&ALL_KEYS).await {
        Ok(data) => {
            debug!(keys = data.len(), "progress loaded");
            decode(&data)
        }
        Err(err) => {
            warn!(error = %err, "could not load progress; using defaults");
            (Progress::default(), AudioSettings::default())
        }
    }
}

/// Write progress and audio settings.
pub async fn save(
    platform: &dyn Platform,
    progress: &Progress,
    audio: &AudioSettings,
) -> Result<(), PlatformError> {
    platform.set_many(&encode(progress, audio)).await
}
