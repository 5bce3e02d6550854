//! Runtime configuration from `COINPEAKS_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{RoundRules, ScoringRules};
use crate::error::RuntimeError;
use crate::layout::{DesignSize, SupportedOrientation};

pub const DEFAULT_PLATFORM_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_UNDO_COST: u64 = 50;
pub const DEFAULT_STOCK_CARD_BONUS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub design: DesignSize,
    pub orientation: SupportedOrientation,
    pub platform_timeout_ms: u64,
    pub undo_cost: u64,
    pub stock_card_bonus: u64,
    /// Directory of `*.json` level files. Dealt levels are used when unset.
    pub levels_dir: Option<PathBuf>,
    /// File backing the local platform's key/value store.
    pub save_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            design: DesignSize::default(),
            orientation: SupportedOrientation::default(),
            platform_timeout_ms: DEFAULT_PLATFORM_TIMEOUT_MS,
            undo_cost: DEFAULT_UNDO_COST,
            stock_card_bonus: DEFAULT_STOCK_CARD_BONUS,
            levels_dir: None,
            save_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, RuntimeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset variables take their
    /// default; set but malformed ones are a configuration error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let width = parse_var(&lookup, "COINPEAKS_DESIGN_WIDTH")?.unwrap_or(defaults.design.width);
        let height =
            parse_var(&lookup, "COINPEAKS_DESIGN_HEIGHT")?.unwrap_or(defaults.design.height);
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(RuntimeError::config(format!(
                "design size must be positive, got {width}x{height}"
            )));
        }

        let orientation = match lookup("COINPEAKS_ORIENTATION") {
            Some(raw) => SupportedOrientation::parse(&raw).ok_or_else(|| {
                RuntimeError::config(format!(
                    "COINPEAKS_ORIENTATION must be landscape, portrait or any, got '{raw}'"
                ))
            })?,
            None => defaults.orientation,
        };

        Ok(Self {
            design: DesignSize::new(width, height),
            orientation,
            platform_timeout_ms: parse_var(&lookup, "COINPEAKS_PLATFORM_TIMEOUT_MS")?
                .unwrap_or(defaults.platform_timeout_ms),
            undo_cost: parse_var(&lookup, "COINPEAKS_UNDO_COST")?.unwrap_or(defaults.undo_cost),
            stock_card_bonus: parse_var(&lookup, "COINPEAKS_STOCK_CARD_BONUS")?
                .unwrap_or(defaults.stock_card_bonus),
            levels_dir: non_empty(&lookup, "COINPEAKS_LEVELS_DIR").map(PathBuf::from),
            save_path: non_empty(&lookup, "COINPEAKS_SAVE_PATH").map(PathBuf::from),
        })
    }

    pub fn with_design(mut self, design: DesignSize) -> Self {
        self.design = design;
        self
    }

    pub fn with_orientation(mut self, orientation: SupportedOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_platform_timeout(mut self, timeout: Duration) -> Self {
        self.platform_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_undo_cost(mut self, cost: u64) -> Self {
        self.undo_cost = cost;
        self
    }

    pub fn with_levels_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.levels_dir = Some(dir.into());
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn platform_timeout(&self) -> Duration {
        Duration::from_millis(self.platform_timeout_ms)
    }

    pub fn round_rules(&self) -> RoundRules {
        RoundRules {
            undo_cost: self.undo_cost,
            scoring: ScoringRules {
                stock_card_bonus: self.stock_card_bonus,
                ..ScoringRules::default()
            },
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Parse a variable if present; a malformed value is an error rather than a
/// silent fallback.
fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, RuntimeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| RuntimeError::config(format!("{key}='{raw}' is invalid: {e}"))),
    }
}
