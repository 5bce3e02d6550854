//! Level documents: parsing, validation and board construction.
//!
//! Parsing is best-effort. A slot with an unknown suit, an out-of-range rank or
//! missing coordinates is skipped with a warning instead of failing the whole
//! level; `covers` entries that point at skipped or out-of-range slots are
//! dropped. Only a document with no usable waste card or no usable tableau
//! slot is rejected.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::board::{Board, Placement};
use super::cards_parsing::face_from_parts;
use super::cards_types::CardFace;
use super::dealing::deal_peaks;
use super::errors::LevelError;
use super::round::{Round, RoundRules};

/// A validated tableau slot. `covers` holds indices into the level layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    #[serde(flatten)]
    pub face: CardFace,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub covers: Vec<usize>,
}

/// A validated level, serializable back to the authored JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub id: String,
    pub waste_card: CardFace,
    /// Bottom first: the last entry is drawn first.
    pub stock_pile: Vec<CardFace>,
    pub layout: Vec<Slot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLevel {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    waste_card: Option<JsonValue>,
    #[serde(default)]
    stock_pile: Vec<JsonValue>,
    #[serde(default)]
    layout: Vec<JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCard {
    #[serde(default)]
    suit: Option<String>,
    #[serde(default)]
    rank: Option<JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSlot {
    #[serde(default)]
    suit: Option<String>,
    #[serde(default)]
    rank: Option<JsonValue>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    angle: Option<f64>,
    #[serde(default)]
    covers: Vec<JsonValue>,
}

fn parse_card(value: &JsonValue) -> Result<CardFace, LevelError> {
    let raw: RawCard = serde_json::from_value(value.clone())?;
    face_from_parts(raw.suit.as_deref(), raw.rank.as_ref())
}

fn parse_slot(value: &JsonValue) -> Result<(CardFace, Placement, Vec<JsonValue>), LevelError> {
    let raw: RawSlot = serde_json::from_value(value.clone())?;
    let face = face_from_parts(raw.suit.as_deref(), raw.rank.as_ref())?;
    let (Some(x), Some(y)) = (raw.x, raw.y) else {
        return Err(LevelError::invalid_card("missing coordinates"));
    };
    Ok((face, Placement::new(x, y, raw.angle.unwrap_or(0.0)), raw.covers))
}

impl FromStr for LevelData {
    type Err = LevelError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        let raw: RawLevel = serde_json::from_str(json)?;
        let id = raw
            .id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "untitled".to_string());

        let mut stock_pile = Vec::with_capacity(raw.stock_pile.len());
        for (i, entry) in raw.stock_pile.iter().enumerate() {
            match parse_card(entry) {
                Ok(face) => stock_pile.push(face),
                Err(err) => warn!(level_id = %id, index = i, error = %err, "skipping stock card"),
            }
        }

        let waste_card = match raw.waste_card.as_ref().map(parse_card) {
            Some(Ok(face)) => face,
            other => {
                if let Some(Err(err)) = other {
                    warn!(level_id = %id, error = %err, "waste card unusable; drawing from stock");
                }
                stock_pile
                    .pop()
                    .ok_or_else(|| LevelError::MissingWaste { level: id.clone() })?
            }
        };

        // Original layout index -> compacted slot index.
        let mut remap: Vec<Option<usize>> = Vec::with_capacity(raw.layout.len());
        let mut parsed = Vec::with_capacity(raw.layout.len());
        for (i, entry) in raw.layout.iter().enumerate() {
            match parse_slot(entry) {
                Ok(slot) => {
                    remap.push(Some(parsed.len()));
                    parsed.push(slot);
                }
                Err(err) => {
                    warn!(level_id = %id, index = i, error = %err, "skipping layout slot");
                    remap.push(None);
                }
            }
        }
        if parsed.is_empty() {
            return Err(LevelError::Empty { level: id });
        }

        let layout = parsed
            .into_iter()
            .enumerate()
            .map(|(own, (face, placement, covers))| {
                let covers = covers
                    .iter()
                    .filter_map(|c| {
                        let target = c
                            .as_u64()
                            .and_then(|n| usize::try_from(n).ok())
                            .and_then(|n| remap.get(n).copied().flatten());
                        if target.is_none() {
                            debug!(level_id = %id, cover = %c, "dropping dangling cover");
                        }
                        target
                    })
                    .filter(|target| *target != own)
                    .collect();
                Slot {
                    face,
                    x: placement.x,
                    y: placement.y,
                    angle: placement.angle,
                    covers,
                }
            })
            .collect();

        Ok(LevelData {
            id,
            waste_card,
            stock_pile,
            layout,
        })
    }
}

impl LevelData {
    pub fn total_cards(&self) -> usize {
        self.layout.len() + self.stock_pile.len() + 1
    }

    /// Instantiate the board. Slot `i` covering slot `j` means `j`'s
    /// `covered_by` gains `i`.
    pub fn to_board(&self) -> Board {
        let mut builder = Board::builder(self.waste_card);
        let ids: Vec<_> = self
            .layout
            .iter()
            .map(|slot| builder.tableau_card(slot.face, Placement::new(slot.x, slot.y, slot.angle)))
            .collect();
        for (top, slot) in self.layout.iter().enumerate() {
            for beneath in &slot.covers {
                if let Some(beneath) = ids.get(*beneath) {
                    builder.cover(ids[top], *beneath);
                }
            }
        }
        for face in &self.stock_pile {
            builder.stock_card(*face);
        }
        builder.build()
    }

    pub fn to_round(&self, rules: RoundRules) -> Round {
        Round::new(self.id.clone(), self.to_board(), rules)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Ordered set of levels. Progression cycles through it.
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: Vec<LevelData>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelData>) -> Self {
        Self { levels }
    }

    /// Deterministically dealt levels for when no level files are configured.
    pub fn generated(count: usize, seed: u64) -> Self {
        let levels = (0..count as u64)
            .map(|n| deal_peaks(&format!("dealt-{:03}", n + 1), seed.wrapping_add(n)))
            .collect();
        Self { levels }
    }

    /// Load every `*.json` file in `dir`, sorted by file name. Documents that
    /// cannot produce a level are skipped with a warning.
    pub async fn load_dir(dir: &Path) -> Result<Self, LevelError> {
        let display = dir.display().to_string();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| LevelError::io(&display, &e))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| LevelError::io(&display, &e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut levels = Vec::with_capacity(paths.len());
        for path in paths {
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "unreadable level file");
                    continue;
                }
            };
            match text.parse::<LevelData>() {
                Ok(level) => levels.push(level),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping level file"),
            }
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[LevelData] {
        &self.levels
    }

    /// Level for a zero-based progression index, cycling past the end.
    pub fn level_for(&self, current_level: u32) -> Option<&LevelData> {
        if self.levels.is_empty() {
            return None;
        }
        self.levels.get(current_level as usize % self.levels.len())
    }
}
