//! Deterministic three-peaks deal, used when no level files are configured.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::cards_types::{CardFace, Rank, Suit};
use super::level::{LevelData, Slot};

const CENTER_X: f64 = 960.0;
const COLUMN_STEP: f64 = 150.0;
const BASE_ROW_Y: f64 = 700.0;
const ROW_STEP: f64 = 110.0;

/// Row sizes from the peaks down to the base.
const ROWS: [usize; 4] = [3, 6, 9, 10];

fn full_deck() -> Vec<CardFace> {
    Suit::ALL
        .iter()
        .flat_map(|suit| Rank::all().map(move |rank| CardFace::new(*suit, rank)))
        .collect()
}

/// Horizontal position for card `k` of `row` (0 = peak tips, 3 = base).
fn column_x(row: usize, k: usize) -> f64 {
    let half_steps = match row {
        0 => 3.0 * k as f64 - 3.0,
        1 => {
            let (peak, offset) = (k / 2, k % 2);
            (3 * peak + offset) as f64 - 3.5
        }
        2 => k as f64 - 4.0,
        _ => k as f64 - 4.5,
    };
    CENTER_X + half_steps * COLUMN_STEP
}

/// Indices (within the row below) that card `k` of `row + 1` sits on.
fn beneath(row_below: usize, k: usize) -> Vec<usize> {
    match row_below {
        // row 1 card k covers peak tip k / 2
        0 => vec![k / 2],
        // row 2 card k covers row 1 cards of the same peak that touch it
        1 => {
            let (peak, offset) = (k / 3, k % 3);
            match offset {
                0 => vec![2 * peak],
                1 => vec![2 * peak, 2 * peak + 1],
                _ => vec![2 * peak + 1],
            }
        }
        // base card k covers row 2 cards k - 1 and k
        _ => [k.checked_sub(1), Some(k).filter(|k| *k < ROWS[2])]
            .into_iter()
            .flatten()
            .collect(),
    }
}

/// Deal a 28-card three-peaks tableau, one waste card and a 23-card stock.
pub fn deal_peaks(id: &str, seed: u64) -> LevelData {
    let mut deck = full_deck();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);

    let row_start: Vec<usize> = ROWS
        .iter()
        .scan(0, |acc, n| {
            let start = *acc;
            *acc += n;
            Some(start)
        })
        .collect();

    let mut cards = deck.into_iter();
    let mut layout = Vec::with_capacity(ROWS.iter().sum());
    for (row, count) in ROWS.iter().enumerate() {
        for k in 0..*count {
            let Some(face) = cards.next() else {
                break;
            };
            let covers = if row == 0 {
                Vec::new()
            } else {
                beneath(row - 1, k)
                    .into_iter()
                    .map(|j| row_start[row - 1] + j)
                    .collect()
            };
            layout.push(Slot {
                face,
                x: column_x(row, k),
                y: BASE_ROW_Y - (ROWS.len() - 1 - row) as f64 * ROW_STEP,
                angle: 0.0,
                covers,
            });
        }
    }

    let waste_card = cards
        .next()
        .unwrap_or(CardFace::new(Suit::Spades, Rank::ACE));
    let stock_pile = cards.collect();

    LevelData {
        id: id.to_string(),
        waste_card,
        stock_pile,
        layout,
    }
}
