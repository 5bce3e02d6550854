use super::board::Board;
use super::cards_types::{Rank, Suit};
use super::errors::{MoveRejected, UndoRejected};
use super::fixtures::{at, face, small_board, SmallBoard};
use super::history::{MoveHistory, Wallet};
use super::moves::MoveRecord;
use crate::layout::DesignPoint;

fn rank(v: u8) -> Rank {
    Rank::new(v).unwrap()
}

#[test]
fn can_play_accepts_king_ace_wraparound() {
    let mut builder = Board::builder(face(Suit::Hearts, 13));
    let ace = builder.tableau_card(face(Suit::Spades, 1), at(100.0, 100.0));
    let three = builder.tableau_card(face(Suit::Spades, 3), at(300.0, 100.0));
    let board = builder.build();

    assert!(board.can_play(ace, rank(13)));
    assert!(!board.can_play(three, rank(13)));

    let mut builder = Board::builder(face(Suit::Hearts, 1));
    let king = builder.tableau_card(face(Suit::Clubs, 13), at(100.0, 100.0));
    let three = builder.tableau_card(face(Suit::Clubs, 3), at(300.0, 100.0));
    let board = builder.build();

    assert!(board.can_play(king, rank(1)));
    assert_eq!(
        board.check_play(three, rank(1)),
        Err(MoveRejected::NotAdjacent(three))
    );
}

#[test]
fn covered_cards_start_face_down_and_cannot_play() {
    let SmallBoard {
        board, six, nine, four, ..
    } = small_board();
    assert!(board.card(six).unwrap().face_up);
    assert!(board.card(four).unwrap().face_up);
    let nine_card = board.card(nine).unwrap();
    assert!(!nine_card.face_up);
    assert_eq!(nine_card.covered_by, vec![six]);
    assert_eq!(board.check_play(nine, rank(10)), Err(MoveRejected::Covered(nine)));
}

#[test]
fn play_moves_card_to_waste_and_flips_uncovered() {
    let SmallBoard {
        mut board, six, nine, ..
    } = small_board();
    let previous = board.waste_card();

    let record = board.play(six).unwrap();
    assert_eq!(board.waste_card(), six);
    assert_eq!(board.discard(), &[previous]);
    assert!(!board.tableau().contains(&six));

    let nine_card = board.card(nine).unwrap();
    assert!(nine_card.face_up);
    assert!(nine_card.covered_by.is_empty());

    match record {
        MoveRecord::Tableau {
            played,
            previous_waste,
            flipped,
            covered,
            original,
            tableau_index,
        } => {
            assert_eq!(played, six);
            assert_eq!(previous_waste, previous);
            assert_eq!(flipped, vec![nine]);
            assert_eq!(covered, vec![nine]);
            assert_eq!(original, at(400.0, 400.0));
            assert_eq!(tableau_index, 2);
        }
        MoveRecord::Stock { .. } => panic!("expected a tableau record"),
    }
    assert!(board.check_partition());
}

#[test]
fn shared_cover_keeps_card_face_down_until_last_cover_leaves() {
    let mut builder = Board::builder(face(Suit::Hearts, 7));
    let base = builder.tableau_card(face(Suit::Clubs, 2), at(500.0, 300.0));
    let left = builder.tableau_card(face(Suit::Spades, 8), at(430.0, 400.0));
    let right = builder.tableau_card(face(Suit::Diamonds, 9), at(570.0, 400.0));
    builder.cover(left, base);
    builder.cover(right, base);
    let mut board = builder.build();

    let record = board.play(left).unwrap();
    let MoveRecord::Tableau { flipped, covered, .. } = record else {
        panic!("expected a tableau record");
    };
    assert_eq!(covered, vec![base]);
    assert!(flipped.is_empty());
    assert!(!board.card(base).unwrap().face_up);

    board.play(right).unwrap();
    assert!(board.card(base).unwrap().face_up);
}

#[test]
fn rejected_play_changes_nothing() {
    let SmallBoard { mut board, nine, .. } = small_board();
    let before = board.clone();
    assert_eq!(board.play(nine), Err(MoveRejected::Covered(nine)));
    assert_eq!(board, before);
}

#[test]
fn draw_from_stock_is_lifo_and_fails_when_empty() {
    let SmallBoard { mut board, .. } = small_board();
    let first = board.draw_from_stock().unwrap();
    assert_eq!(board.card(first.played()).unwrap().face, face(Suit::Hearts, 2));
    assert!(board.card(first.played()).unwrap().face_up);
    let second = board.draw_from_stock().unwrap();
    assert_eq!(board.card(second.played()).unwrap().face, face(Suit::Clubs, 13));
    assert_eq!(second.previous_waste(), first.played());

    let before = board.clone();
    assert_eq!(board.draw_from_stock(), Err(MoveRejected::StockEmpty));
    assert_eq!(board, before);
}

#[test]
fn undo_restores_stock_order() {
    let SmallBoard { mut board, .. } = small_board();
    let start = board.clone();
    let mut history = MoveHistory::new(10);
    let mut wallet = Wallet::new(100);

    history.record_move(board.draw_from_stock().unwrap());
    history.record_move(board.draw_from_stock().unwrap());
    assert!(history.undo(&mut board, &mut wallet).unwrap().is_stock());
    assert!(history.undo(&mut board, &mut wallet).is_ok());
    assert_eq!(board, start);
    assert_eq!(wallet.coins(), 80);
}

#[test]
fn undo_refused_without_coins_or_history() {
    let SmallBoard {
        mut board, six, ..
    } = small_board();
    let mut history = MoveHistory::new(50);
    let mut wallet = Wallet::new(40);

    assert_eq!(
        history.undo(&mut board, &mut wallet),
        Err(UndoRejected::NothingToUndo)
    );

    history.record_move(board.play(six).unwrap());
    let after_play = board.clone();
    assert_eq!(
        history.undo(&mut board, &mut wallet),
        Err(UndoRejected::InsufficientCoins {
            cost: 50,
            available: 40
        })
    );
    assert_eq!(board, after_play);
    assert_eq!(history.len(), 1);
    assert_eq!(wallet.coins(), 40);
}

#[test]
fn has_any_move_false_when_only_covered_cards_and_empty_stock() {
    let mut builder = Board::builder(face(Suit::Hearts, 5));
    let low = builder.tableau_card(face(Suit::Clubs, 4), at(300.0, 300.0));
    let top = builder.tableau_card(face(Suit::Clubs, 10), at(300.0, 400.0));
    builder.cover(top, low);
    let board = builder.build();

    assert!(!board.has_any_move(board.waste_rank()));
    assert!(board.playable_cards().is_empty());
    assert!(board.stock().is_empty());
}

#[test]
fn completion_allows_cards_left_in_stock() {
    let mut builder = Board::builder(face(Suit::Hearts, 5));
    let only = builder.tableau_card(face(Suit::Spades, 6), at(300.0, 300.0));
    builder.stock_card(face(Suit::Clubs, 1));
    let mut board = builder.build();

    assert!(!board.is_complete());
    board.play(only).unwrap();
    assert!(board.is_complete());
    assert_eq!(board.stock().len(), 1);
}

#[test]
fn hit_test_prefers_uncovered_card() {
    let SmallBoard { board, six, four, .. } = small_board();
    // 9C at (400,300) and 6S at (400,400) overlap around y=350.
    assert_eq!(board.hit_test(DesignPoint::new(400.0, 350.0)), Some(six));
    assert_eq!(board.hit_test(DesignPoint::new(800.0, 300.0)), Some(four));
    assert_eq!(board.hit_test(DesignPoint::new(1500.0, 100.0)), None);
}

#[test]
fn hit_test_respects_rotation() {
    let mut builder = Board::builder(face(Suit::Hearts, 5));
    let tilted = builder.tableau_card(
        face(Suit::Spades, 6),
        super::board::Placement::new(500.0, 500.0, 90.0),
    );
    let board = builder.build();
    // Rotated 90 degrees: wide along y becomes wide along x.
    assert_eq!(board.hit_test(DesignPoint::new(500.0 + 90.0, 500.0)), Some(tilted));
    assert_eq!(board.hit_test(DesignPoint::new(500.0, 500.0 + 90.0)), None);
}
