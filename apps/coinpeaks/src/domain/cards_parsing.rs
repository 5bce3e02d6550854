//! Card parsing from level-document tokens (e.g. `"hearts"`/`"H"`, `13`/`"K"`)

use std::str::FromStr;

use serde_json::Value as JsonValue;

use super::cards_types::{CardFace, Rank, Suit};
use super::errors::LevelError;

impl FromStr for Suit {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "club" | "clubs" => Ok(Suit::Clubs),
            "d" | "diamond" | "diamonds" => Ok(Suit::Diamonds),
            "h" | "heart" | "hearts" => Ok(Suit::Hearts),
            "s" | "spade" | "spades" => Ok(Suit::Spades),
            _ => Err(LevelError::invalid_card(format!("unknown suit {s:?}"))),
        }
    }
}

impl FromStr for Rank {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        let value = match token.as_str() {
            "A" | "ACE" => 1,
            "J" | "JACK" => 11,
            "Q" | "QUEEN" => 12,
            "K" | "KING" => 13,
            digits => digits
                .parse::<u8>()
                .map_err(|_| LevelError::invalid_card(format!("unknown rank {s:?}")))?,
        };
        Rank::new(value).ok_or_else(|| LevelError::invalid_card(format!("rank {value} out of range")))
    }
}

/// Rank from a JSON value: an integer or a rank token string.
pub fn rank_from_json(value: &JsonValue) -> Result<Rank, LevelError> {
    match value {
        JsonValue::Number(n) => {
            let raw = n
                .as_u64()
                .ok_or_else(|| LevelError::invalid_card(format!("rank {n} is not a positive integer")))?;
            u8::try_from(raw)
                .ok()
                .and_then(Rank::new)
                .ok_or_else(|| LevelError::invalid_card(format!("rank {raw} out of range")))
        }
        JsonValue::String(s) => s.parse(),
        other => Err(LevelError::invalid_card(format!("rank has unexpected type: {other}"))),
    }
}

/// Card face from optional suit/rank fields of a level slot.
pub fn face_from_parts(
    suit: Option<&str>,
    rank: Option<&JsonValue>,
) -> Result<CardFace, LevelError> {
    let suit = suit
        .ok_or_else(|| LevelError::invalid_card("missing suit"))?
        .parse::<Suit>()?;
    let rank = rank_from_json(rank.ok_or_else(|| LevelError::invalid_card("missing rank"))?)?;
    Ok(CardFace::new(suit, rank))
}
