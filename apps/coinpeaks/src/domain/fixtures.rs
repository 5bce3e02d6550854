//! Small hand-built boards for domain tests.

use super::board::{Board, CardId, Placement};
use super::cards_types::{CardFace, Rank, Suit};

pub fn face(suit: Suit, rank: u8) -> CardFace {
    CardFace::new(suit, Rank::new(rank).expect("test rank in range"))
}

pub fn at(x: f64, y: f64) -> Placement {
    Placement::new(x, y, 0.0)
}

/// Waste 5H; tableau: 6S covering 9C (face down) and 4D; 4D uncovered;
/// stock (bottom → top): KC, 2H.
pub struct SmallBoard {
    pub board: Board,
    pub six: CardId,
    pub nine: CardId,
    pub four: CardId,
}

pub fn small_board() -> SmallBoard {
    let mut builder = Board::builder(face(Suit::Hearts, 5));
    let nine = builder.tableau_card(face(Suit::Clubs, 9), at(400.0, 300.0));
    let four = builder.tableau_card(face(Suit::Diamonds, 4), at(800.0, 300.0));
    let six = builder.tableau_card(face(Suit::Spades, 6), at(400.0, 400.0));
    builder.cover(six, nine);
    builder.stock_card(face(Suit::Clubs, 13));
    builder.stock_card(face(Suit::Hearts, 2));
    SmallBoard {
        board: builder.build(),
        six,
        nine,
        four,
    }
}
