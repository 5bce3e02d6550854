//! Audio capability. The physical output sits behind [`AudioBackend`];
//! [`AudioManager`] owns the policy: the gesture unlock queue, per-channel
//! enable flags and volume scaling.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const SFX_CARD_PLAY: &str = "card_play";
pub const SFX_CARD_FLIP: &str = "card_flip";
pub const SFX_DRAW: &str = "stock_draw";
pub const SFX_REJECT: &str = "reject";
pub const SFX_UNDO: &str = "undo";
pub const SFX_LEVEL_COMPLETE: &str = "level_complete";
pub const MUSIC_MAIN: &str = "main_theme";

/// Effects kept while waiting for the unlock gesture; older ones are shed.
pub const MAX_QUEUED_SFX: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicOptions {
    pub looping: bool,
    /// Multiplied by the music channel volume.
    pub volume: f64,
}

impl Default for MusicOptions {
    fn default() -> Self {
        Self {
            looping: true,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SfxOptions {
    /// Multiplied by the sfx channel volume.
    pub volume: f64,
    pub rate: f64,
}

impl Default for SfxOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            rate: 1.0,
        }
    }
}

/// Persisted audio preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSettings {
    pub music_enabled: bool,
    pub sfx_enabled: bool,
    pub music_volume: f64,
    pub sfx_volume: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sfx_enabled: true,
            music_volume: 0.5,
            sfx_volume: 0.8,
        }
    }
}

/// Physical audio output.
pub trait AudioBackend: Send + Sync {
    fn play_music(&mut self, track: &str, looping: bool, volume: f64);
    fn stop_music(&mut self);
    fn set_music_volume(&mut self, volume: f64);
    fn play_sfx(&mut self, name: &str, volume: f64, rate: f64);
}

/// Output that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play_music(&mut self, track: &str, _looping: bool, _volume: f64) {
        trace!(track, "silent music");
    }

    fn stop_music(&mut self) {}

    fn set_music_volume(&mut self, _volume: f64) {}

    fn play_sfx(&mut self, name: &str, _volume: f64, _rate: f64) {
        trace!(sfx = name, "silent sfx");
    }
}

#[derive(Debug, Clone, PartialEq)]
enum AudioCommand {
    PlayMusic { track: String, options: MusicOptions },
    StopMusic,
    PlaySfx { name: String, options: SfxOptions },
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    settings: AudioSettings,
    unlocked: bool,
    queue: VecDeque<AudioCommand>,
    /// Track requested while music was disabled or before unlock.
    current_track: Option<(String, MusicOptions)>,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self::with_settings(backend, AudioSettings::default())
    }

    pub fn with_settings(backend: Box<dyn AudioBackend>, settings: AudioSettings) -> Self {
        let mut manager = Self {
            backend,
            settings: AudioSettings::default(),
            unlocked: false,
            queue: VecDeque::new(),
            current_track: None,
        };
        manager.apply_settings(settings);
        manager
    }

    pub fn silent() -> Self {
        Self::new(Box::new(SilentBackend))
    }

    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn apply_settings(&mut self, settings: AudioSettings) {
        self.settings = AudioSettings {
            music_volume: clamp_volume(settings.music_volume),
            sfx_volume: clamp_volume(settings.sfx_volume),
            ..settings
        };
    }

    /// First user gesture: output becomes possible. Queued commands replay in
    /// order.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        debug!(queued = self.queue.len(), "audio unlocked");
        while let Some(command) = self.queue.pop_front() {
            self.execute(command);
        }
    }

    pub fn play_music(&mut self, track: &str, options: MusicOptions) {
        self.current_track = Some((track.to_string(), options));
        self.submit(AudioCommand::PlayMusic {
            track: track.to_string(),
            options,
        });
    }

    pub fn stop_music(&mut self) {
        self.current_track = None;
        self.submit(AudioCommand::StopMusic);
    }

    pub fn play_sfx(&mut self, name: &str, options: SfxOptions) {
        self.submit(AudioCommand::PlaySfx {
            name: name.to_string(),
            options,
        });
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        if self.settings.music_enabled == enabled {
            return;
        }
        self.settings.music_enabled = enabled;
        if !self.unlocked {
            return;
        }
        if enabled {
            if let Some((track, options)) = self.current_track.clone() {
                self.execute(AudioCommand::PlayMusic { track, options });
            }
        } else {
            self.backend.stop_music();
        }
    }

    pub fn set_sfx_enabled(&mut self, enabled: bool) {
        self.settings.sfx_enabled = enabled;
    }

    pub fn set_music_volume(&mut self, volume: f64) {
        self.settings.music_volume = clamp_volume(volume);
        if self.unlocked && self.settings.music_enabled {
            self.backend.set_music_volume(self.settings.music_volume);
        }
    }

    pub fn set_sfx_volume(&mut self, volume: f64) {
        self.settings.sfx_volume = clamp_volume(volume);
    }

    fn submit(&mut self, command: AudioCommand) {
        if self.unlocked {
            self.execute(command);
            return;
        }
        match command {
            // Only the latest music command decides what plays after unlock.
            AudioCommand::PlayMusic { .. } | AudioCommand::StopMusic => {
                self.queue.retain(|queued| matches!(queued, AudioCommand::PlaySfx { .. }));
            }
            AudioCommand::PlaySfx { .. } => {
                let sfx = self
                    .queue
                    .iter()
                    .filter(|queued| matches!(queued, AudioCommand::PlaySfx { .. }))
                    .count();
                if sfx >= MAX_QUEUED_SFX {
                    if let Some(oldest) = self
                        .queue
                        .iter()
                        .position(|queued| matches!(queued, AudioCommand::PlaySfx { .. }))
                    {
                        trace!("shedding stale queued sfx");
                        self.queue.remove(oldest);
                    }
                }
            }
        }
        self.queue.push_back(command);
    }

    /// Channel flags are checked when a command reaches the backend.
    fn execute(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::PlayMusic { track, options } => {
                if self.settings.music_enabled {
                    let volume = clamp_volume(options.volume) * self.settings.music_volume;
                    self.backend.play_music(&track, options.looping, volume);
                }
            }
            AudioCommand::StopMusic => self.backend.stop_music(),
            AudioCommand::PlaySfx { name, options } => {
                if self.settings.sfx_enabled {
                    let volume = clamp_volume(options.volume) * self.settings.sfx_volume;
                    self.backend.play_sfx(&name, volume, options.rate);
                }
            }
        }
    }
}
