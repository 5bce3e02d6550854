use super::board::Board;
use super::cards_types::Suit;
use super::errors::{MoveRejected, UndoRejected};
use super::fixtures::{at, face, small_board};
use super::history::Wallet;
use super::round::{HintState, Round, RoundRules, RoundStatus};

fn rules() -> RoundRules {
    RoundRules::default()
}

#[test]
fn single_card_level_completes_with_stock_bonus() {
    let mut builder = Board::builder(face(Suit::Hearts, 5));
    let card_a = builder.tableau_card(face(Suit::Spades, 4), at(300.0, 300.0));
    builder.stock_card(face(Suit::Clubs, 9));
    builder.stock_card(face(Suit::Clubs, 10));
    let mut round = Round::new("one-card", builder.build(), rules());

    assert_eq!(round.status(), RoundStatus::InProgress);
    assert!(round.completion().is_none());

    let outcome = round.play(card_a).unwrap();
    assert_eq!(outcome.points, 100);
    assert_eq!(round.status(), RoundStatus::Completed);

    let completion = round.completion().unwrap();
    assert_eq!(completion.stock_bonus, 1000);
    assert_eq!(completion.score, 1100);
    assert_eq!(completion.coins, 11);
}

#[test]
fn hint_draws_then_reports_no_moves() {
    let mut builder = Board::builder(face(Suit::Hearts, 5));
    let low = builder.tableau_card(face(Suit::Clubs, 4), at(300.0, 300.0));
    let top = builder.tableau_card(face(Suit::Clubs, 10), at(300.0, 400.0));
    builder.cover(top, low);
    builder.stock_card(face(Suit::Diamonds, 2));
    let mut round = Round::new("stuck", builder.build(), rules());

    assert_eq!(round.hint(), HintState::DrawFromStock);
    round.draw().unwrap();
    assert_eq!(round.hint(), HintState::NoMoves);
    assert_eq!(round.status(), RoundStatus::OutOfMoves);
    assert_eq!(round.draw(), Err(MoveRejected::StockEmpty));
}

#[test]
fn undo_reverts_score_and_charges_coins() {
    let fixture = small_board();
    let mut round = Round::new("small", fixture.board, rules());
    let mut wallet = Wallet::new(120);

    round.play(fixture.six).unwrap();
    round.play(fixture.four).unwrap_err();
    assert_eq!(round.score(), 100);
    assert_eq!(round.streak(), 1);

    round.undo(&mut wallet).unwrap();
    assert_eq!(round.score(), 0);
    assert_eq!(round.streak(), 0);
    assert_eq!(wallet.coins(), 70);
    assert!(round.history().is_empty());

    assert_eq!(round.undo(&mut wallet), Err(UndoRejected::NothingToUndo));
    assert_eq!(wallet.coins(), 70);
}

#[test]
fn huge_configured_stock_bonus_saturates_on_the_winning_play() {
    let max = u64::MAX.to_string();
    let config = crate::config::RuntimeConfig::from_lookup(|key| {
        (key == "COINPEAKS_STOCK_CARD_BONUS").then(|| max.clone())
    })
    .unwrap();

    let mut builder = Board::builder(face(Suit::Hearts, 5));
    let card = builder.tableau_card(face(Suit::Spades, 6), at(300.0, 300.0));
    builder.stock_card(face(Suit::Clubs, 9));
    builder.stock_card(face(Suit::Clubs, 10));
    let mut round = Round::new("bonus", builder.build(), config.round_rules());

    round.play(card).unwrap();
    let completion = round.completion().unwrap();
    assert_eq!(completion.stock_bonus, u64::MAX);
    assert_eq!(completion.score, u64::MAX);
    assert_eq!(completion.coins, u64::MAX / 100);
}
